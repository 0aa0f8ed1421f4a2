//! Rule for overlong utility-class lists.
//!
//! # Configuration
//!
//! - `max_length`: characters allowed in one class string (default:
//!   `conventions.max_class_length`)

use ui_lint_core::{
    AnalyzedUnit, FileContext, FixDescriptor, Location, Rule, RuleArea, RuleConfig, Severity,
    ValidationIssue,
};
use ui_lint_ts::ClassValue;

use crate::classes::{is_sorted, sort_classes, tokens};

/// Rule code for long-class-list.
pub const CODE: &str = "UL060";

/// Rule name for long-class-list.
pub const NAME: &str = "long-class-list";

/// Flags class strings longer than the configured threshold.
#[derive(Debug, Clone, Default)]
pub struct LongClassList {
    max_length: Option<usize>,
}

impl LongClassList {
    /// Creates a new rule using the project's class-length convention.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the rule from its `[rules.long-class-list]` block.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let max_length = config
            .and_then(|c| c.get_option::<usize>("max_length"))
            .filter(|n| *n > 0);
        Self { max_length }
    }

    /// Overrides the maximum length.
    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }
}

impl Rule for LongClassList {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Long class lists should be grouped or ordered by concern"
    }

    fn area(&self) -> RuleArea {
        RuleArea::UtilityClass
    }

    fn default_severity(&self) -> Severity {
        Severity::Suggestion
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        let max = self.max_length.unwrap_or(ctx.conventions.max_class_length);

        unit.component
            .class_attributes
            .iter()
            .filter_map(|attr| {
                let ClassValue::Literal { value } = &attr.value else {
                    return None;
                };
                let length = value.trim().chars().count();
                if length <= max {
                    return None;
                }

                let count = tokens(value).count();
                let mut issue = ValidationIssue::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    self.area(),
                    Location::new(ctx.relative_path.to_path_buf(), attr.line, attr.column)
                        .with_span(attr.value_range.start, attr.value_range.len()),
                    format!(
                        "Class list is {length} characters ({count} classes, max {max}); group it by concern"
                    ),
                )
                .heuristic();
                if !is_sorted(value) {
                    issue = issue.with_fix(FixDescriptor::transform(
                        "sort-classes",
                        [("classes", value.clone()), ("sorted", sort_classes(value))],
                    ));
                }
                Some(issue)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check;
    use ui_lint_core::{Confidence, Config};

    const LONG: &str = "p-4 m-4 text-sm font-bold flex flex-col items-center justify-center bg-white";

    #[test]
    fn test_long_unsorted_list_gets_sort_fix() {
        let src = format!("export const Hero = () => <div className=\"{LONG}\" />;\n");
        let issues = check(&LongClassList::new(), "src/components/hero.tsx", &src);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].confidence, Confidence::Heuristic);
        assert!(issues[0].message.starts_with("Class list is 76 characters (9 classes, max 50)"));
        let Some(FixDescriptor::NamedTransform { context, .. }) = &issues[0].fix else {
            panic!("expected sort fix");
        };
        assert_eq!(
            context["sorted"],
            "flex flex-col items-center justify-center p-4 m-4 text-sm font-bold bg-white"
        );
    }

    #[test]
    fn test_long_sorted_list_has_no_fix() {
        let sorted = "flex flex-col items-center justify-center p-4 m-4 text-sm font-bold bg-white";
        let src = format!("export const Hero = () => <div className=\"{sorted}\" />;\n");
        let issues = check(&LongClassList::new(), "src/components/hero.tsx", &src);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].fix.is_none());
    }

    #[test]
    fn test_configured_threshold() {
        let config = Config::parse("[rules.long-class-list]\nmax_length = 100\n").unwrap();
        let src = format!("export const Hero = () => <div className=\"{LONG}\" />;\n");
        assert!(check(
            &LongClassList::from_config(config.rule_config(NAME)),
            "src/components/hero.tsx",
            &src
        )
        .is_empty());
    }
}
