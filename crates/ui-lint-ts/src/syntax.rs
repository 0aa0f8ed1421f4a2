//! Syntax tree provider.
//!
//! A [`SourceUnit`] owns the text of one source file and its tree-sitter
//! tree. Mutations edit the in-memory buffer and re-parse incrementally;
//! nothing here ever writes to disk.

use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tree_sitter::{InputEdit, Language, Node, Parser, Point, Tree};

use crate::query;

/// The directive marking a unit as a client boundary.
pub const CLIENT_DIRECTIVE: &str = "use client";

/// Grammar used to parse a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// TSX grammar (`.tsx`, `.jsx`, `.js`, ...).
    Tsx,
    /// Plain TypeScript grammar (`.ts`), where `<T>expr` is a cast.
    TypeScript,
}

impl Dialect {
    /// File extensions (without dot) that ui-lint analyzes.
    pub const EXTENSIONS: &'static [&'static str] =
        &["tsx", "jsx", "ts", "js", "mjs", "cjs", "mts", "cts"];

    /// Picks the dialect from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str())? {
            "tsx" | "jsx" | "js" | "mjs" | "cjs" => Some(Self::Tsx),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            _ => None,
        }
    }

    /// Returns the tree-sitter language for this dialect.
    #[must_use]
    pub fn language(self) -> Language {
        match self {
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }
}

/// A unit that could not be turned into a well-formed syntax tree.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseFailure {
    /// Extension is not one of [`Dialect::EXTENSIONS`].
    #[error("unsupported file type: {}", path.display())]
    Unsupported {
        /// Offending path.
        path: PathBuf,
    },
    /// The grammar could not be loaded into the parser.
    #[error("failed to load grammar: {message}")]
    Language {
        /// Loader message.
        message: String,
    },
    /// The parser returned no tree.
    #[error("parser produced no tree for {}", path.display())]
    NoTree {
        /// Offending path.
        path: PathBuf,
    },
    /// The tree contains an `ERROR` or `MISSING` node.
    #[error("syntax error in {} at {line}:{column}", path.display())]
    Syntax {
        /// Offending path.
        path: PathBuf,
        /// 1-indexed line of the first error node.
        line: usize,
        /// 1-indexed column of the first error node.
        column: usize,
    },
}

/// Failure to load a unit from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Reading the file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file was read but did not parse.
    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

/// A file-level directive such as `"use client"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Directive text without quotes.
    pub value: String,
    /// 1-indexed line.
    pub line: usize,
    /// Byte range of the whole statement.
    pub byte_range: Range<usize>,
    /// Whether the directive sits in the prologue (before any other
    /// statement), which is the only place it takes effect.
    pub in_prologue: bool,
}

/// One parsed source file with a mutable buffer.
#[derive(Clone)]
pub struct SourceUnit {
    path: PathBuf,
    dialect: Dialect,
    text: String,
    tree: Tree,
}

impl fmt::Debug for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceUnit")
            .field("path", &self.path)
            .field("dialect", &self.dialect)
            .field("len", &self.text.len())
            .finish_non_exhaustive()
    }
}

impl SourceUnit {
    /// Parses `text` as the contents of `path`. The dialect comes from the
    /// extension. Fails on any syntax error.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure`] for unsupported extensions or malformed text.
    pub fn parse(path: impl Into<PathBuf>, text: impl Into<String>) -> Result<Self, ParseFailure> {
        let unit = Self::parse_lenient(path, text)?;
        if let Some((line, column)) = unit.syntax_error() {
            return Err(ParseFailure::Syntax {
                path: unit.path,
                line,
                column,
            });
        }
        Ok(unit)
    }

    /// Parses without rejecting trees that contain error nodes.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure`] only when no tree can be produced at all.
    pub fn parse_lenient(
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Result<Self, ParseFailure> {
        let path = path.into();
        let dialect = Dialect::from_path(&path)
            .ok_or_else(|| ParseFailure::Unsupported { path: path.clone() })?;
        let text = text.into();
        let tree = parse_tree(dialect, &path, &text, None)?;
        Ok(Self {
            path,
            dialect,
            text,
            tree,
        })
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the file cannot be read or parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();
        tracing::trace!(path = %path.display(), "loading unit");
        let text = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Self::parse(path, text)?)
    }

    /// Path this unit was parsed as.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Grammar used for this unit.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Full current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the unit, returning its text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Root node (`program`).
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Text covered by `node`.
    #[must_use]
    pub fn node_text(&self, node: Node<'_>) -> &str {
        query::text(node, &self.text)
    }

    /// All nodes whose kind is in `kinds`, in document order.
    #[must_use]
    pub fn descendants_of_kind(&self, kinds: &[&str]) -> Vec<Node<'_>> {
        query::descendants_of_kind(self.root(), kinds)
    }

    /// Top-level statements, skipping comments.
    #[must_use]
    pub fn statements(&self) -> Vec<Node<'_>> {
        query::named_children(self.root())
    }

    /// Position (line, column; 1-indexed) of the first syntax error.
    #[must_use]
    pub fn syntax_error(&self) -> Option<(usize, usize)> {
        query::first_error(self.root()).map(|n| (query::line(n), query::column(n)))
    }

    /// Number of lines in the buffer.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    /// Byte offset where 1-indexed `line` starts, or `None` past the end.
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        if line == 0 {
            return None;
        }
        if line == 1 {
            return Some(0);
        }
        self.text
            .match_indices('\n')
            .nth(line - 2)
            .map(|(i, _)| i + 1)
            .filter(|&i| i <= self.text.len())
    }

    /// Byte range of 1-indexed `line`, including its trailing newline.
    #[must_use]
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        let start = self.line_start(line)?;
        if start >= self.text.len() && line > 1 {
            return None;
        }
        let end = self.text[start..]
            .find('\n')
            .map_or(self.text.len(), |i| start + i + 1);
        Some(start..end)
    }

    /// File-level directives: leading string-expression statements, plus
    /// any later top-level ones (reported with `in_prologue = false`).
    #[must_use]
    pub fn directives(&self) -> Vec<Directive> {
        let mut out = Vec::new();
        let mut prologue = true;
        for stmt in self.statements() {
            if stmt.kind() == "hash_bang_line" {
                continue;
            }
            let value = directive_value(stmt, &self.text);
            match value {
                Some(value) => out.push(Directive {
                    value,
                    line: query::line(stmt),
                    byte_range: stmt.byte_range(),
                    in_prologue: prologue,
                }),
                None => prologue = false,
            }
        }
        out
    }

    /// Returns `true` if the prologue holds `directive`.
    #[must_use]
    pub fn has_directive(&self, directive: &str) -> bool {
        self.directives()
            .iter()
            .any(|d| d.in_prologue && d.value == directive)
    }

    /// Number of top-level declarations, looking through `export`.
    #[must_use]
    pub fn top_level_declaration_count(&self) -> usize {
        self.statements()
            .into_iter()
            .map(query::unwrap_export)
            .filter(|n| query::DECLARATION_KINDS.contains(&n.kind()))
            .count()
    }

    /// Replaces the bytes in `range` with `replacement` and re-parses
    /// incrementally. The resulting tree may contain errors; callers that
    /// need well-formedness check [`Self::syntax_error`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure`] if the range is not on character boundaries
    /// or the parser yields no tree.
    pub fn replace_range(
        &mut self,
        range: Range<usize>,
        replacement: &str,
    ) -> Result<(), ParseFailure> {
        if range.start > range.end
            || range.end > self.text.len()
            || !self.text.is_char_boundary(range.start)
            || !self.text.is_char_boundary(range.end)
        {
            return Err(ParseFailure::Syntax {
                path: self.path.clone(),
                line: point_at(&self.text, range.start.min(self.text.len())).row + 1,
                column: 0,
            });
        }

        let start_position = point_at(&self.text, range.start);
        let old_end_position = point_at(&self.text, range.end);
        self.text.replace_range(range.clone(), replacement);
        let new_end_byte = range.start + replacement.len();
        let new_end_position = point_at(&self.text, new_end_byte);

        self.tree.edit(&InputEdit {
            start_byte: range.start,
            old_end_byte: range.end,
            new_end_byte,
            start_position,
            old_end_position,
            new_end_position,
        });
        self.tree = parse_tree(self.dialect, &self.path, &self.text, Some(&self.tree))?;
        Ok(())
    }

    /// Replaces the whole buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure`] if the parser yields no tree.
    pub fn replace_all(&mut self, text: impl Into<String>) -> Result<(), ParseFailure> {
        self.text = text.into();
        self.tree = parse_tree(self.dialect, &self.path, &self.text, None)?;
        Ok(())
    }

    /// Inserts `line_text` as a new line before 1-indexed `line`. A line
    /// past the end appends.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure`] if re-parsing fails.
    pub fn insert_line(&mut self, line: usize, line_text: &str) -> Result<(), ParseFailure> {
        match self.line_start(line.max(1)) {
            Some(at) if at < self.text.len() || self.text.is_empty() => {
                self.replace_range(at..at, &format!("{line_text}\n"))
            }
            _ => {
                let end = self.text.len();
                let prefix = if self.text.is_empty() || self.text.ends_with('\n') {
                    ""
                } else {
                    "\n"
                };
                self.replace_range(end..end, &format!("{prefix}{line_text}\n"))
            }
        }
    }

    /// Removes 1-indexed `line` with its newline. Returns the removed text,
    /// or `None` if the line does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure`] if re-parsing fails.
    pub fn remove_line(&mut self, line: usize) -> Result<Option<String>, ParseFailure> {
        let Some(range) = self.line_range(line) else {
            return Ok(None);
        };
        let removed = self.text[range.clone()].to_string();
        self.replace_range(range, "")?;
        Ok(Some(removed))
    }
}

fn directive_value(stmt: Node<'_>, src: &str) -> Option<String> {
    if stmt.kind() != "expression_statement" {
        return None;
    }
    let children = query::named_children(stmt);
    match children.as_slice() {
        [only] if only.kind() == "string" => query::string_value(*only, src),
        _ => None,
    }
}

fn parse_tree(
    dialect: Dialect,
    path: &Path,
    text: &str,
    old: Option<&Tree>,
) -> Result<Tree, ParseFailure> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|e| ParseFailure::Language {
            message: e.to_string(),
        })?;
    parser.parse(text, old).ok_or_else(|| ParseFailure::NoTree {
        path: path.to_path_buf(),
    })
}

/// Row/column point of byte offset `byte` in `text`.
fn point_at(text: &str, byte: usize) -> Point {
    let before = &text[..byte];
    let row = before.matches('\n').count();
    let column = before.rfind('\n').map_or(byte, |i| byte - i - 1);
    Point { row, column }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_follows_extension() {
        assert_eq!(Dialect::from_path(Path::new("a/b.tsx")), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_path(Path::new("a/b.jsx")), Some(Dialect::Tsx));
        assert_eq!(
            Dialect::from_path(Path::new("a/b.ts")),
            Some(Dialect::TypeScript)
        );
        assert_eq!(Dialect::from_path(Path::new("a/b.css")), None);
    }

    #[test]
    fn rejects_unsupported_extension() {
        let err = SourceUnit::parse("style.css", "a {}").unwrap_err();
        assert!(matches!(err, ParseFailure::Unsupported { .. }));
    }

    #[test]
    fn rejects_malformed_text() {
        let err = SourceUnit::parse("a.tsx", "function f( {\n").unwrap_err();
        assert!(matches!(err, ParseFailure::Syntax { .. }));
    }

    #[test]
    fn reparsing_is_idempotent() {
        let src = "export function Foo() { return <div />; }\n";
        let a = SourceUnit::parse("a.tsx", src).unwrap();
        let b = SourceUnit::parse("a.tsx", a.text().to_string()).unwrap();
        assert_eq!(a.root().to_sexp(), b.root().to_sexp());
    }

    #[test]
    fn finds_prologue_directive() {
        let u = SourceUnit::parse("a.tsx", "\"use client\";\nimport x from 'x';\n").unwrap();
        let d = u.directives();
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].value, CLIENT_DIRECTIVE);
        assert!(d[0].in_prologue);
        assert!(u.has_directive(CLIENT_DIRECTIVE));
    }

    #[test]
    fn directive_after_import_is_not_in_prologue() {
        let u = SourceUnit::parse("a.tsx", "import x from 'x';\n'use client';\n").unwrap();
        let d = u.directives();
        assert_eq!(d.len(), 1);
        assert!(!d[0].in_prologue);
        assert!(!u.has_directive(CLIENT_DIRECTIVE));
    }

    #[test]
    fn replace_range_reparses() {
        let mut u = SourceUnit::parse("a.tsx", "const bar = 1;\n").unwrap();
        u.replace_range(6..9, "Bar").unwrap();
        assert_eq!(u.text(), "const Bar = 1;\n");
        assert!(u.syntax_error().is_none());
        let ids = u.descendants_of_kind(&["identifier"]);
        assert_eq!(u.node_text(ids[0]), "Bar");
    }

    #[test]
    fn insert_and_remove_lines() {
        let mut u = SourceUnit::parse("a.tsx", "const a = 1;\nconst b = 2;\n").unwrap();
        u.insert_line(1, "\"use client\";").unwrap();
        assert_eq!(u.text(), "\"use client\";\nconst a = 1;\nconst b = 2;\n");
        let removed = u.remove_line(1).unwrap();
        assert_eq!(removed.as_deref(), Some("\"use client\";\n"));
        assert_eq!(u.text(), "const a = 1;\nconst b = 2;\n");
    }

    #[test]
    fn insert_past_end_appends() {
        let mut u = SourceUnit::parse("a.ts", "const a = 1;").unwrap();
        u.insert_line(10, "const b = 2;").unwrap();
        assert_eq!(u.text(), "const a = 1;\nconst b = 2;\n");
    }

    #[test]
    fn counts_top_level_declarations_through_exports() {
        let u = SourceUnit::parse(
            "a.tsx",
            "interface P {}\nexport function A() {}\nconst b = 1;\nexport default A;\n",
        )
        .unwrap();
        assert_eq!(u.top_level_declaration_count(), 3);
    }

    #[test]
    fn point_at_tracks_rows_and_columns() {
        let p = point_at("ab\ncd", 4);
        assert_eq!((p.row, p.column), (1, 1));
    }
}
