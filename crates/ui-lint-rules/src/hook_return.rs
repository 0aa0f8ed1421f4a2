//! Rule suggesting hooks return a value.

use ui_lint_core::{
    AnalyzedUnit, FileContext, Location, Rule, RuleArea, Severity, ValidationIssue,
};

/// Rule code for hook-return.
pub const CODE: &str = "UL012";

/// Rule name for hook-return.
pub const NAME: &str = "hook-return";

/// Flags custom hooks that never return.
#[derive(Debug, Clone, Default)]
pub struct HookReturn;

impl HookReturn {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for HookReturn {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Custom hooks should return state or callbacks"
    }

    fn area(&self) -> RuleArea {
        RuleArea::ComponentApi
    }

    fn default_severity(&self) -> Severity {
        Severity::Suggestion
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        match &unit.hook {
            Some(hook) if !hook.has_return_statement && !ctx.is_test => {
                vec![ValidationIssue::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    self.area(),
                    Location::new(ctx.relative_path.to_path_buf(), hook.line, hook.column),
                    format!(
                        "Hook `{}` returns nothing; a plain effect helper may not need to be a hook",
                        hook.name
                    ),
                )]
            }
            _ => Vec::new(),
        }
    }
}
