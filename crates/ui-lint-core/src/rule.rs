//! Rule traits.
//!
//! Rules are pure functions of their context: no shared mutable state, so
//! the analyzer is free to run them in any order and on any thread.

use crate::context::{AnalyzedUnit, FileContext, ProjectContext};
use crate::types::{RuleArea, Severity, ValidationIssue};

/// A rule over one unit's extracted contexts.
///
/// # Example
///
/// ```ignore
/// use ui_lint_core::{AnalyzedUnit, FileContext, Rule, RuleArea, ValidationIssue};
///
/// pub struct NoAnonymousDefault;
///
/// impl Rule for NoAnonymousDefault {
///     fn name(&self) -> &'static str { "no-anonymous-default" }
///     fn code(&self) -> &'static str { "UL099" }
///     fn area(&self) -> RuleArea { RuleArea::ComponentApi }
///
///     fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
///         // inspect unit.component.exports ...
///         Vec::new()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Kebab-case name, used in config tables and allow comments.
    fn name(&self) -> &'static str;

    /// Primary issue code. A rule may emit secondary codes as well.
    fn code(&self) -> &'static str;

    /// One-line summary for `list-rules`.
    fn description(&self) -> &'static str {
        ""
    }

    /// Area of the issues this rule emits; decides healing order.
    fn area(&self) -> RuleArea;

    /// Severity before config overrides.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether an allow comment must carry `reason="..."`. Error-level
    /// rules require one unless they say otherwise.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Issues for `unit`.
    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue>;
}

/// Boxed [`Rule`].
pub type RuleBox = Box<dyn Rule>;

/// A rule over the whole inventory. Runs once every unit is parsed and
/// checked.
pub trait ProjectRule: Send + Sync {
    /// Kebab-case name.
    fn name(&self) -> &'static str;

    /// Primary issue code.
    fn code(&self) -> &'static str;

    /// One-line summary for `list-rules`.
    fn description(&self) -> &'static str {
        ""
    }

    /// Area of the issues this rule emits.
    fn area(&self) -> RuleArea;

    /// Severity before config overrides.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Issues for the project.
    fn check_project(&self, ctx: &ProjectContext) -> Vec<ValidationIssue>;
}

/// Boxed [`ProjectRule`].
pub type ProjectRuleBox = Box<dyn ProjectRule>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Advisory;

    impl Rule for Advisory {
        fn name(&self) -> &'static str {
            "advisory"
        }
        fn code(&self) -> &'static str {
            "UL900"
        }
        fn area(&self) -> RuleArea {
            RuleArea::UtilityClass
        }
        fn default_severity(&self) -> Severity {
            Severity::Suggestion
        }
        fn check(&self, _ctx: &FileContext, _unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
            Vec::new()
        }
    }

    struct Strict;

    impl ProjectRule for Strict {
        fn name(&self) -> &'static str {
            "strict"
        }
        fn code(&self) -> &'static str {
            "UL901"
        }
        fn area(&self) -> RuleArea {
            RuleArea::Architecture
        }
        fn check_project(&self, _ctx: &ProjectContext) -> Vec<ValidationIssue> {
            Vec::new()
        }
    }

    #[test]
    fn reason_required_only_for_errors() {
        let rules: Vec<RuleBox> = vec![Box::new(Advisory)];
        assert!(!rules[0].requires_allow_reason());
        assert_eq!(rules[0].description(), "");
    }

    #[test]
    fn project_rules_default_to_error() {
        let rule: ProjectRuleBox = Box::new(Strict);
        assert_eq!(rule.default_severity(), Severity::Error);
        assert_eq!(rule.area(), RuleArea::Architecture);
    }
}
