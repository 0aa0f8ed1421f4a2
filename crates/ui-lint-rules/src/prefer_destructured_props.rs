//! Rule suggesting destructured props.
//!
//! `function Card(props)` hides which props the component reads; a
//! destructured parameter documents them at the signature.

use ui_lint_core::{
    AnalyzedUnit, FileContext, Location, Rule, RuleArea, Severity, ValidationIssue,
};
use ui_lint_ts::PropsStyle;

/// Rule code for prefer-destructured-props.
pub const CODE: &str = "UL013";

/// Rule name for prefer-destructured-props.
pub const NAME: &str = "prefer-destructured-props";

/// Flags components that take props as a single identifier.
#[derive(Debug, Clone, Default)]
pub struct PreferDestructuredProps;

impl PreferDestructuredProps {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for PreferDestructuredProps {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Components should destructure their props in the signature"
    }

    fn area(&self) -> RuleArea {
        RuleArea::ComponentApi
    }

    fn default_severity(&self) -> Severity {
        Severity::Suggestion
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        let component = &unit.component;
        let (Some(name), Some(props)) = (component.name(), &component.props) else {
            return Vec::new();
        };
        let PropsStyle::Identifier(param) = &props.style else {
            return Vec::new();
        };

        let used: Vec<&str> = component.prop_names.iter().map(String::as_str).collect();
        let message = if used.is_empty() {
            format!("`{name}` takes `{param}` without destructuring")
        } else {
            format!(
                "`{name}` takes `{param}` without destructuring; use `{{ {} }}`",
                used.join(", ")
            )
        };
        vec![ValidationIssue::new(
            CODE,
            NAME,
            self.default_severity(),
            self.area(),
            Location::new(ctx.relative_path.to_path_buf(), props.line, 1),
            message,
        )]
    }
}
