//! Rule preferring named exports over a lone default export.
//!
//! Named exports keep one name per component across the codebase and make
//! barrel re-exports straightforward. Routing files are exempt: the
//! framework requires their default export.

use ui_lint_core::{
    AnalyzedUnit, FileContext, FixDescriptor, Location, Rule, RuleArea, Severity,
    ValidationIssue,
};
use ui_lint_ts::DefaultExportShape;

/// Rule code for prefer-named-export.
pub const CODE: &str = "UL030";

/// Rule name for prefer-named-export.
pub const NAME: &str = "prefer-named-export";

/// Flags units whose only export is the default export.
#[derive(Debug, Clone, Default)]
pub struct PreferNamedExport;

impl PreferNamedExport {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_tooling_config(ctx: &FileContext) -> bool {
    ctx.relative_path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains(".config.") || n.starts_with("middleware."))
}

impl Rule for PreferNamedExport {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Prefer named exports over a lone default export"
    }

    fn area(&self) -> RuleArea {
        RuleArea::ComponentApi
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        let exports = &unit.component.exports;
        if !exports.has_default
            || exports.has_named()
            || unit.component.route.is_some()
            || ctx.is_test
            || is_tooling_config(ctx)
        {
            return Vec::new();
        }

        let line = exports.default_line.unwrap_or(1);
        let location = Location::new(ctx.relative_path.to_path_buf(), line, 1);
        let shape = exports
            .default_shape
            .clone()
            .unwrap_or(DefaultExportShape::Anonymous);

        let Some(name) = shape.name() else {
            return vec![ValidationIssue::new(
                CODE,
                NAME,
                self.default_severity(),
                self.area(),
                location,
                "Anonymous default export; give it a name and export it by name",
            )
            .with_fix(FixDescriptor::manual(
                "Name the default-exported value",
                [
                    "Declare the value as a named const or function",
                    "Export it by name and update importers",
                ],
            ))];
        };

        vec![ValidationIssue::new(
            CODE,
            NAME,
            self.default_severity(),
            self.area(),
            location,
            format!("`{name}` is only exported as default; export it by name (importers are not updated)"),
        )
        .with_fix(FixDescriptor::transform(
            "named-export",
            [("name", name), ("shape", shape.as_str())],
        ))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check;

    fn transformer_context(issue: &ValidationIssue) -> Vec<(String, String)> {
        match &issue.fix {
            Some(FixDescriptor::NamedTransform { context, .. }) => context
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            other => panic!("unexpected fix {other:?}"),
        }
    }

    #[test]
    fn test_default_function_declaration() {
        let issues = check(
            &PreferNamedExport::new(),
            "src/components/card.tsx",
            "export default function Card() {\n  return <div />;\n}\n",
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(
            transformer_context(&issues[0]),
            vec![
                ("name".to_string(), "Card".to_string()),
                ("shape".to_string(), "function-declaration".to_string())
            ]
        );
    }

    #[test]
    fn test_default_of_local_declaration() {
        let issues = check(
            &PreferNamedExport::new(),
            "src/components/card.tsx",
            "const Card = () => <div />;\n\nexport default Card;\n",
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].location.line, 3);
        assert_eq!(transformer_context(&issues[0])[1].1, "local-declaration");
    }

    #[test]
    fn test_anonymous_default_is_manual() {
        let issues = check(
            &PreferNamedExport::new(),
            "src/components/card.tsx",
            "export default () => <div />;\n",
        );
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_fixable());
    }

    #[test]
    fn test_exemptions() {
        let rule = PreferNamedExport::new();
        assert!(check(
            &rule,
            "src/app/page.tsx",
            "export default function Page() { return <main />; }\n"
        )
        .is_empty());
        assert!(check(&rule, "tailwind.config.ts", "export default { content: [] };\n").is_empty());
        assert!(check(
            &rule,
            "src/components/card.tsx",
            "export function Card() { return <i />; }\nexport default Card;\n"
        )
        .is_empty());
    }
}
