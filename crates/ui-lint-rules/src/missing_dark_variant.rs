//! Rule pairing color utilities with a dark-mode variant.
//!
//! The suggested counterpart comes from a fixed shade inversion (see
//! [`crate::classes::dark_counterpart`]); it is a starting point, not a
//! design decision.

use ui_lint_core::{
    AnalyzedUnit, FileContext, FixDescriptor, Location, Rule, RuleArea, Severity,
    ValidationIssue,
};
use ui_lint_ts::ClassValue;

use crate::classes::missing_dark_variants;

/// Rule code for missing-dark-variant.
pub const CODE: &str = "UL062";

/// Rule name for missing-dark-variant.
pub const NAME: &str = "missing-dark-variant";

/// Flags color utilities without a `dark:` counterpart.
#[derive(Debug, Clone, Default)]
pub struct MissingDarkVariant;

impl MissingDarkVariant {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for MissingDarkVariant {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Color utilities should have a dark-mode variant"
    }

    fn area(&self) -> RuleArea {
        RuleArea::UtilityClass
    }

    fn default_severity(&self) -> Severity {
        Severity::Suggestion
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        unit.component
            .class_attributes
            .iter()
            .filter_map(|attr| {
                let ClassValue::Literal { value } = &attr.value else {
                    return None;
                };
                let additions = missing_dark_variants(value);
                if additions.is_empty() {
                    return None;
                }
                let additions = additions.join(" ");
                Some(
                    ValidationIssue::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        self.area(),
                        Location::new(ctx.relative_path.to_path_buf(), attr.line, attr.column)
                            .with_span(attr.value_range.start, attr.value_range.len()),
                        format!("Colors without a dark variant; add `{additions}`"),
                    )
                    .with_fix(FixDescriptor::transform(
                        "add-dark-variant",
                        [("classes", value.as_str()), ("additions", additions.as_str())],
                    ))
                    .heuristic(),
                )
            })
            .collect()
    }
}
