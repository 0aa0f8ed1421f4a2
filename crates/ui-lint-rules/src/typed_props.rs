//! Rule requiring typed component props.
//!
//! # Detected Patterns
//!
//! - `UL040`: an untyped props parameter and no `*Props` declaration; the
//!   fix declares `<Name>Props` from the props the component reads and
//!   annotates the parameter
//! - `UL041`: an untyped props parameter although a `*Props` declaration
//!   exists; the fix annotates the parameter with it
//!
//! JavaScript files cannot carry annotations and are skipped.

use ui_lint_core::{
    AnalyzedUnit, FileContext, FixDescriptor, Location, Rule, RuleArea, Severity,
    ValidationIssue,
};

/// Rule code for a missing props interface.
pub const CODE: &str = "UL040";

/// Rule code for an untyped props parameter.
pub const CODE_UNTYPED: &str = "UL041";

/// Rule name for typed-props.
pub const NAME: &str = "typed-props";

const TYPED_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

/// Flags components whose props parameter has no type.
#[derive(Debug, Clone, Default)]
pub struct TypedProps;

impl TypedProps {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TypedProps {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Component props must be typed with a Props interface"
    }

    fn area(&self) -> RuleArea {
        RuleArea::Typing
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        let component = &unit.component;
        let (Some(name), Some(props)) = (component.name(), &component.props) else {
            return Vec::new();
        };
        let typed_file = ctx
            .relative_path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| TYPED_EXTENSIONS.contains(&e));
        if props.is_typed() || !typed_file || ctx.is_test {
            return Vec::new();
        }

        let location = Location::new(ctx.relative_path.to_path_buf(), props.line, 1);
        let preferred = format!("{name}Props");

        if component.has_props_interface {
            let interface = component
                .declared_types
                .iter()
                .map(|t| t.name.as_str())
                .find(|t| *t == preferred)
                .or_else(|| {
                    component
                        .declared_types
                        .iter()
                        .map(|t| t.name.as_str())
                        .find(|t| t.ends_with("Props"))
                })
                .unwrap_or(preferred.as_str());
            return vec![ValidationIssue::new(
                CODE_UNTYPED,
                NAME,
                self.default_severity(),
                self.area(),
                location,
                format!("Props of `{name}` are untyped; annotate them with `{interface}`"),
            )
            .with_fix(FixDescriptor::transform(
                "annotate-props",
                [("component", name), ("interface", interface)],
            ))];
        }

        let members: Vec<&str> = component.prop_names.iter().map(String::as_str).collect();
        vec![ValidationIssue::new(
            CODE,
            NAME,
            self.default_severity(),
            self.area(),
            location,
            format!("`{name}` has no props interface; declare `{preferred}`"),
        )
        .with_fix(FixDescriptor::transform(
            "props-interface",
            [
                ("component", name.to_string()),
                ("interface", preferred.clone()),
                ("props", members.join(",")),
                ("children", component.has_children.to_string()),
            ],
        ))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check;

    #[test]
    fn test_missing_interface() {
        let issues = check(
            &TypedProps::new(),
            "src/components/profile-card.tsx",
            "export function ProfileCard({ name, avatar, children }) {\n  return <div>{name}{children}</div>;\n}\n",
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, CODE);
        let Some(FixDescriptor::NamedTransform { transformer, context }) = &issues[0].fix else {
            panic!("expected transform");
        };
        assert_eq!(transformer, "props-interface");
        assert_eq!(context["interface"], "ProfileCardProps");
        assert_eq!(context["props"], "avatar,children,name");
        assert_eq!(context["children"], "true");
    }

    #[test]
    fn test_existing_interface_is_referenced() {
        let issues = check(
            &TypedProps::new(),
            "src/components/badge.tsx",
            "interface BadgeProps { label: string }\nexport const Badge = ({ label }) => <span>{label}</span>;\n",
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, CODE_UNTYPED);
        assert_eq!(issues[0].location.line, 2);
        assert!(issues[0].message.contains("`BadgeProps`"));
    }

    #[test]
    fn test_typed_and_javascript_pass() {
        let rule = TypedProps::new();
        assert!(check(
            &rule,
            "src/components/badge.tsx",
            "export const Badge = ({ label }: { label: string }) => <span>{label}</span>;\n"
        )
        .is_empty());
        assert!(check(
            &rule,
            "src/components/badge.jsx",
            "export const Badge = ({ label }) => <span>{label}</span>;\n"
        )
        .is_empty());
    }

    #[test]
    fn test_component_without_props_passes() {
        assert!(check(
            &TypedProps::new(),
            "src/components/logo.tsx",
            "export function Logo() { return <svg />; }\n"
        )
        .is_empty());
    }
}
