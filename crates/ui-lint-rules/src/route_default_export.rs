//! Rule requiring a default export from routing files.
//!
//! The framework loads `page`, `layout`, `loading`, `error`, `not-found`,
//! `template` and `default` files through their default export; without one
//! the route fails to build. Route handlers (`route.ts`) are exempt.

use ui_lint_core::{
    AnalyzedUnit, FileContext, FixDescriptor, Location, Rule, RuleArea, ValidationIssue,
};

/// Rule code for route-default-export.
pub const CODE: &str = "UL050";

/// Rule name for route-default-export.
pub const NAME: &str = "route-default-export";

/// Flags routing files without a default export.
#[derive(Debug, Clone, Default)]
pub struct RouteDefaultExport;

impl RouteDefaultExport {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for RouteDefaultExport {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Routing files must default-export their component"
    }

    fn area(&self) -> RuleArea {
        RuleArea::Routing
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        let component = &unit.component;
        let Some(route) = component.route else {
            return Vec::new();
        };
        if !route.requires_default_export() || component.exports.has_default {
            return Vec::new();
        }

        let (line, fix) = match &component.declaration {
            Some(decl) => (
                decl.line,
                FixDescriptor::transform("add-default-export", [("name", decl.name.as_str())]),
            ),
            None => (
                1,
                FixDescriptor::manual(
                    "Add a default-exported component",
                    ["Declare the route component and `export default` it"],
                ),
            ),
        };
        vec![ValidationIssue::new(
            CODE,
            NAME,
            self.default_severity(),
            self.area(),
            Location::new(ctx.relative_path.to_path_buf(), line, 1),
            format!("Routing file `{}` has no default export", ctx.relative_path.display()),
        )
        .with_fix(fix)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check;

    #[test]
    fn test_page_without_default_export() {
        let issues = check(
            &RouteDefaultExport::new(),
            "src/app/settings/page.tsx",
            "export function SettingsPage() {\n  return <main />;\n}\n",
        );
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0].fix,
            Some(FixDescriptor::NamedTransform { transformer, context })
                if transformer == "add-default-export" && context["name"] == "SettingsPage"
        ));
    }

    #[test]
    fn test_handlers_and_defaults_pass() {
        let rule = RouteDefaultExport::new();
        assert!(check(
            &rule,
            "src/app/api/users/route.ts",
            "export async function GET() { return Response.json([]); }\n"
        )
        .is_empty());
        assert!(check(
            &rule,
            "src/app/layout.tsx",
            "export default function RootLayout({ children }) { return <html>{children}</html>; }\n"
        )
        .is_empty());
    }

    #[test]
    fn test_page_without_component_is_manual() {
        let issues = check(&RouteDefaultExport::new(), "src/app/page.tsx", "export const revalidate = 60;\n");
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_fixable());
    }
}
