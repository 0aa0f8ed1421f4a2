//! Fix descriptors shared by several rules.

use std::path::{Path, PathBuf};

use ui_lint_core::FixDescriptor;
use ui_lint_ts::DeclarationShape;

/// Renames the declaration site of `old` only. The pattern is anchored on
/// the declaring keyword and the healer runs it over the issue's line, so
/// call sites and same-named locals elsewhere are untouched.
#[must_use]
pub fn rename_declaration(shape: DeclarationShape, old: &str, new: &str) -> FixDescriptor {
    let old = regex::escape(old);
    let (pattern, replacement) = match shape {
        DeclarationShape::FunctionDecl => (
            format!(r"\bfunction(\s*\*?\s+){old}\b"),
            format!("function${{1}}{new}"),
        ),
        DeclarationShape::ArrowVar => (
            format!(r"\b(const|let|var)(\s+){old}\b"),
            format!("${{1}}${{2}}{new}"),
        ),
    };
    FixDescriptor::ReplacePattern {
        pattern,
        flags: String::new(),
        replacement,
    }
}

/// `dir/<stem>.<ext>` for `path`, keeping every extension segment
/// (`.test.tsx`, `.d.ts`).
#[must_use]
pub fn with_stem(path: &Path, stem: &str) -> PathBuf {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let rest = name.find('.').map_or("", |i| &name[i..]);
    path.with_file_name(format!("{stem}{rest}"))
}

/// File stem up to the first dot.
#[must_use]
pub fn stem(path: &Path) -> &str {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.split('.').next().unwrap_or(name)
}

/// Forward-slash rendering of a relative path, for fix contexts.
#[must_use]
pub fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
