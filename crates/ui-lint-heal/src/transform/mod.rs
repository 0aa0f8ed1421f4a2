//! Named transformers.
//!
//! A `NamedTransform` fix carries a transformer id and a string context.
//! Every transformer re-locates its target in the unit's *current* tree
//! (by declaration name, class tokens, or expression text), so earlier
//! fixes in the same run never leave it pointing at stale offsets.

mod classes;
mod directive;
mod exports;
mod files;
mod props;
mod scaffold;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tree_sitter::Node;
use ui_lint_core::Conventions;
use ui_lint_ts::query;
use ui_lint_ts::SourceUnit;

use crate::error::TransformError;

pub use classes::{AddDarkVariant, ClassMerge, SortClasses};
pub use directive::HoistDirective;
pub(crate) use directive::insert_directive;
pub use exports::{AddDefaultExport, NamedExport};
pub use files::Relocate;
pub use props::{AnnotateProps, PropsInterface};
pub use scaffold::{scaffold_test_text, ScaffoldTest};

/// Transformer arguments, as carried by the fix descriptor.
pub type Args = BTreeMap<String, String>;

/// A file produced alongside a unit (test scaffolds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the root.
    pub path: PathBuf,
    /// Full text.
    pub text: String,
}

/// What a transformer works on.
pub struct TransformCx<'a> {
    /// The unit being healed; mutations stay in memory.
    pub unit: &'a mut SourceUnit,
    /// Path of the unit relative to the root, before any relocation.
    pub path: PathBuf,
    /// Project conventions.
    pub conventions: &'a Conventions,
    /// Where the unit will be written, if it moves.
    pub relocation: Option<PathBuf>,
    /// Files to create next to the unit.
    pub generated: Vec<GeneratedFile>,
}

impl<'a> TransformCx<'a> {
    /// Creates a context for `unit` at `path`.
    pub fn new(unit: &'a mut SourceUnit, path: PathBuf, conventions: &'a Conventions) -> Self {
        Self {
            unit,
            path,
            conventions,
            relocation: None,
            generated: Vec::new(),
        }
    }

    /// Where the unit currently lives, relocations included.
    #[must_use]
    pub fn current_path(&self) -> &Path {
        self.relocation.as_deref().unwrap_or(&self.path)
    }
}

impl fmt::Debug for TransformCx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformCx")
            .field("path", &self.path)
            .field("relocation", &self.relocation)
            .field("generated", &self.generated.len())
            .finish_non_exhaustive()
    }
}

/// A registered rewrite.
pub trait Transformer: Send + Sync {
    /// Id referenced by `NamedTransform` fixes.
    fn id(&self) -> &'static str;

    /// Rewrites the unit in `cx`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError`] when the target cannot be found or
    /// rewritten. The caller restores the unit's previous state.
    fn apply(&self, cx: &mut TransformCx<'_>, args: &Args) -> Result<(), TransformError>;
}

/// Transformers by id.
pub struct TransformRegistry {
    transformers: BTreeMap<&'static str, Box<dyn Transformer>>,
}

impl TransformRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            transformers: BTreeMap::new(),
        }
    }

    /// Registry with every built-in transformer.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry
            .register(NamedExport)
            .register(HoistDirective)
            .register(PropsInterface)
            .register(AnnotateProps)
            .register(AddDefaultExport)
            .register(SortClasses)
            .register(ClassMerge)
            .register(AddDarkVariant)
            .register(Relocate::rename())
            .register(Relocate::moving())
            .register(ScaffoldTest);
        registry
    }

    /// Adds (or replaces) a transformer.
    pub fn register<T: Transformer + 'static>(&mut self, transformer: T) -> &mut Self {
        self.transformers
            .insert(transformer.id(), Box::new(transformer));
        self
    }

    /// Looks up a transformer.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn Transformer> {
        self.transformers.get(id).map(AsRef::as_ref)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.transformers.keys().copied()
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.transformers.keys()).finish()
    }
}

/// Required argument `key`.
pub(crate) fn arg<'a>(args: &'a Args, key: &str) -> Result<&'a str, TransformError> {
    args.get(key)
        .map(String::as_str)
        .ok_or_else(|| TransformError::MissingArgument(key.to_string()))
}

/// Top-level statement declaring `name`, and the function node that
/// implements it (looking through `memo(...)`/`forwardRef(...)`).
pub(crate) fn find_declaration<'t>(
    unit: &'t SourceUnit,
    name: &str,
) -> Option<(Node<'t>, Node<'t>)> {
    let src = unit.text();
    unit.statements().into_iter().find_map(|stmt| {
        let decl = query::unwrap_export(stmt);
        match decl.kind() {
            "function_declaration" | "generator_function_declaration" => {
                (query::field_text(decl, "name", src) == Some(name)).then_some((stmt, decl))
            }
            "lexical_declaration" | "variable_declaration" => query::named_children(decl)
                .into_iter()
                .filter(|d| d.kind() == "variable_declarator")
                .find(|d| query::field_text(*d, "name", src) == Some(name))
                .and_then(|d| d.child_by_field_name("value"))
                .and_then(function_of)
                .map(|f| (stmt, f)),
            _ => None,
        }
    })
}

fn function_of(value: Node<'_>) -> Option<Node<'_>> {
    match value.kind() {
        "arrow_function" | "function_expression" | "function" => Some(value),
        "parenthesized_expression" => query::named_children(value)
            .into_iter()
            .next()
            .and_then(function_of),
        "call_expression" => value
            .child_by_field_name("arguments")
            .and_then(|args| query::named_children(args).into_iter().find_map(function_of)),
        _ => None,
    }
}

/// Byte offset where text for a new statement placed before `stmt` goes:
/// the start of `stmt`, or of the comment block directly above it.
pub(crate) fn statement_insert_point(stmt: Node<'_>) -> usize {
    let mut start = stmt;
    while let Some(prev) = start.prev_sibling() {
        let adjacent = prev.end_position().row + 1 >= start.start_position().row;
        if prev.kind() == "comment" && adjacent {
            start = prev;
        } else {
            break;
        }
    }
    start.start_byte()
}

/// Byte range of `node` widened to whole lines when nothing else shares
/// them, so removing it leaves no blank line behind.
pub(crate) fn removal_range(unit: &SourceUnit, node: Node<'_>) -> std::ops::Range<usize> {
    let text = unit.text();
    let range = node.byte_range();
    let line_start = text[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[range.end..]
        .find('\n')
        .map_or(text.len(), |i| range.end + i + 1);
    let before = &text[line_start..range.start];
    let after = &text[range.end..line_end];
    if before.trim().is_empty() && after.trim().is_empty() {
        line_start..line_end
    } else {
        range
    }
}

/// Byte offset after the directive prologue and the last import, where a
/// new import line goes.
pub(crate) fn import_insert_point(unit: &SourceUnit) -> usize {
    let text = unit.text();
    let mut point = 0;
    for stmt in unit.statements() {
        let is_directive = unit
            .directives()
            .iter()
            .any(|d| d.in_prologue && d.byte_range == stmt.byte_range());
        if stmt.kind() == "import_statement" || stmt.kind() == "hash_bang_line" || is_directive {
            point = stmt.end_byte();
        }
    }
    if point == 0 {
        return 0;
    }
    text[point..].find('\n').map_or(text.len(), |i| point + i + 1)
}
