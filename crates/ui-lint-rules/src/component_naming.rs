//! Rule requiring `PascalCase` component names.
//!
//! JSX treats lowercase tags as intrinsic elements, so `<bar />` never
//! renders a `bar` component. The fix renames the declaration site only;
//! references in other files are left for a manual follow-up.

use ui_lint_core::utils::{is_pascal_case, to_pascal_case};
use ui_lint_core::{AnalyzedUnit, FileContext, Location, Rule, RuleArea, ValidationIssue};

use crate::fixes::rename_declaration;

/// Rule code for component-naming.
pub const CODE: &str = "UL020";

/// Rule name for component-naming.
pub const NAME: &str = "component-naming";

/// Flags component declarations whose name is not `PascalCase`.
#[derive(Debug, Clone, Default)]
pub struct ComponentNaming;

impl ComponentNaming {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ComponentNaming {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Component names must be PascalCase"
    }

    fn area(&self) -> RuleArea {
        RuleArea::ComponentApi
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        let Some(decl) = &unit.component.declaration else {
            return Vec::new();
        };
        if ctx.is_test || is_pascal_case(&decl.name) {
            return Vec::new();
        }

        let renamed = to_pascal_case(&decl.name);
        let mut message = format!("Component `{}` should be named `{renamed}`", decl.name);
        if unit.occurrences.count(&decl.name) > 1 {
            message.push_str("; other references to it are not renamed");
        }
        vec![ValidationIssue::new(
            CODE,
            NAME,
            self.default_severity(),
            self.area(),
            Location::new(ctx.relative_path.to_path_buf(), decl.line, decl.column)
                .with_span(decl.name_range.start, decl.name.len()),
            message,
        )
        .with_fix(rename_declaration(decl.shape, &decl.name, &renamed))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check;
    use ui_lint_core::FixDescriptor;

    #[test]
    fn test_lowercase_arrow_component() {
        let issues = check(
            &ComponentNaming::new(),
            "src/components/bar.tsx",
            "const bar = () => <div/>\n",
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Component `bar` should be named `Bar`");
        assert_eq!(issues[0].location.line, 1);
        assert_eq!(issues[0].location.column, 7);
        assert_eq!(
            issues[0].fix,
            Some(FixDescriptor::ReplacePattern {
                pattern: r"\b(const|let|var)(\s+)bar\b".to_string(),
                flags: String::new(),
                replacement: "${1}${2}Bar".to_string(),
            })
        );
    }

    #[test]
    fn test_references_are_called_out() {
        let issues = check(
            &ComponentNaming::new(),
            "src/components/user-card.tsx",
            "function user_card() { return <div/>; }\nexport default user_card;\n",
        );
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("`UserCard`"));
        assert!(issues[0].message.contains("not renamed"));
    }

    #[test]
    fn test_pascal_case_passes() {
        let issues = check(
            &ComponentNaming::new(),
            "src/components/foo.tsx",
            "export function Foo() { return <p />; }\n",
        );
        assert!(issues.is_empty());
    }
}
