//! Hook context extraction.

use std::ops::Range;
use std::path::Path;

use serde::Serialize;

use crate::component::{self, ComponentContext, DeclarationShape};
use crate::query::{self, text};
use crate::syntax::SourceUnit;

/// A non-rendering function that follows (or is expected to follow) the
/// hook convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookContext {
    /// Declared name.
    pub name: String,
    /// Declaration shape.
    pub shape: DeclarationShape,
    /// 1-indexed line of the name.
    pub line: usize,
    /// 1-indexed column of the name.
    pub column: usize,
    /// Byte range of the name.
    pub name_range: Range<usize>,
    /// Name starts with `use` + uppercase.
    pub starts_with_convention_prefix: bool,
    /// Body returns a value.
    pub has_return_statement: bool,
    /// A hook call inside this function is not unconditional.
    pub has_conditional_call: bool,
    /// Exported from the unit.
    pub exported: bool,
}

/// Returns `true` for files that hold hooks by location or name:
/// anything under a `hooks` directory, or a `use-*`/`useX` file stem.
#[must_use]
pub fn is_hook_module(path: &Path) -> bool {
    let under_hooks = path
        .parent()
        .is_some_and(|p| p.components().any(|c| c.as_os_str() == "hooks"));
    let stem = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or("");
    under_hooks || stem.starts_with("use-") || component::is_hook_name(stem)
}

/// Extracts the hook declared by `unit`, if any.
///
/// A candidate qualifies when it does not render UI and either carries a
/// hook name, or is an exported hook-calling function in a hook module.
#[must_use]
pub fn extract_hook_context(unit: &SourceUnit, ctx: &ComponentContext) -> Option<HookContext> {
    let src = unit.text();
    let hook_module = is_hook_module(unit.path());

    component::candidates(unit).into_iter().find_map(|c| {
        let name = text(c.name_node, src);
        if ctx.name() == Some(name) || component::renders_ui(c.function, src) {
            return None;
        }
        let range = c.function.byte_range();
        let calls: Vec<_> = ctx
            .hook_calls
            .iter()
            .filter(|h| range.contains(&h.offset))
            .collect();
        let conventional = component::is_hook_name(name);
        if !conventional && !(hook_module && c.exported && !calls.is_empty()) {
            return None;
        }

        let has_return_statement = c.function.child_by_field_name("body").is_some_and(|body| {
            body.kind() != "statement_block"
                || !query::descendants_in_scope(body, &["return_statement"]).is_empty()
        });

        Some(HookContext {
            name: name.to_string(),
            shape: c.shape,
            line: query::line(c.name_node),
            column: query::column(c.name_node),
            name_range: c.name_node.byte_range(),
            starts_with_convention_prefix: conventional,
            has_return_statement,
            has_conditional_call: calls.iter().any(|h| h.is_conditional()),
            exported: c.exported,
        })
    })
}
