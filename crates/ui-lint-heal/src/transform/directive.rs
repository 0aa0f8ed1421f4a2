use ui_lint_ts::CLIENT_DIRECTIVE;

use super::{removal_range, Args, TransformCx, Transformer};
use crate::error::TransformError;

/// The statement written at the top of a client unit.
pub(crate) const DIRECTIVE_STATEMENT: &str = "\"use client\";";

/// Moves an inert `"use client"` into the prologue.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoistDirective;

impl Transformer for HoistDirective {
    fn id(&self) -> &'static str {
        "hoist-directive"
    }

    fn apply(&self, cx: &mut TransformCx<'_>, _args: &Args) -> Result<(), TransformError> {
        let misplaced: Vec<_> = cx
            .unit
            .directives()
            .into_iter()
            .filter(|d| !d.in_prologue && d.value == CLIENT_DIRECTIVE)
            .collect();
        if misplaced.is_empty() {
            return Err(TransformError::NotFound(
                "no directive below the first statement".to_string(),
            ));
        }

        // Last first so earlier ranges stay valid.
        for directive in misplaced.iter().rev() {
            let range = {
                let root = cx.unit.root();
                let node = root
                    .descendant_for_byte_range(directive.byte_range.start, directive.byte_range.end)
                    .ok_or_else(|| TransformError::NotFound("directive node".to_string()))?;
                removal_range(cx.unit, node)
            };
            cx.unit.replace_range(range, "")?;
        }

        if !cx.unit.has_directive(CLIENT_DIRECTIVE) {
            insert_directive(cx.unit)?;
        }
        Ok(())
    }
}

/// Inserts the directive as the first line, after a shebang.
pub(crate) fn insert_directive(unit: &mut ui_lint_ts::SourceUnit) -> Result<(), TransformError> {
    let line = if unit.text().starts_with("#!") { 2 } else { 1 };
    unit.insert_line(line, DIRECTIVE_STATEMENT)?;
    Ok(())
}
