//! Rule requiring the `use` prefix on hook declarations.
//!
//! A function in a hook module that calls other hooks is itself a hook, and
//! tooling (and readers) only recognize hooks by the `useX` name.

use ui_lint_core::utils::to_hook_name;
use ui_lint_core::{
    AnalyzedUnit, FileContext, Location, Rule, RuleArea, Severity, ValidationIssue,
};

use crate::fixes::rename_declaration;

/// Rule code for hook-naming.
pub const CODE: &str = "UL011";

/// Rule name for hook-naming.
pub const NAME: &str = "hook-naming";

/// Flags hook declarations without the conventional prefix.
#[derive(Debug, Clone, Default)]
pub struct HookNaming;

impl HookNaming {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for HookNaming {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Custom hooks must be named useX"
    }

    fn area(&self) -> RuleArea {
        RuleArea::ComponentApi
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        let Some(hook) = &unit.hook else {
            return Vec::new();
        };
        if hook.starts_with_convention_prefix || ctx.is_test {
            return Vec::new();
        }

        let renamed = to_hook_name(&hook.name);
        vec![ValidationIssue::new(
            CODE,
            NAME,
            self.default_severity(),
            self.area(),
            Location::new(ctx.relative_path.to_path_buf(), hook.line, hook.column)
                .with_span(hook.name_range.start, hook.name.len()),
            format!(
                "Hook `{}` should be named `{renamed}` (call sites are not renamed)",
                hook.name
            ),
        )
        .with_fix(rename_declaration(hook.shape, &hook.name, &renamed))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check;
    use ui_lint_core::FixDescriptor;

    #[test]
    fn test_unprefixed_hook_is_renamed() {
        let issues = check(
            &HookNaming::new(),
            "src/hooks/auth.ts",
            "export function fetchUser() {\n  const [u] = useState(null);\n  return u;\n}\n",
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, CODE);
        assert!(issues[0].message.contains("`useFetchUser`"));
        assert!(matches!(
            &issues[0].fix,
            Some(FixDescriptor::ReplacePattern { replacement, .. }) if replacement == "function${1}useFetchUser"
        ));
    }

    #[test]
    fn test_prefixed_hook_passes() {
        let issues = check(
            &HookNaming::new(),
            "src/hooks/use-auth.ts",
            "export const useAuth = () => {\n  return useContext(AuthContext);\n};\n",
        );
        assert!(issues.is_empty());
    }
}
