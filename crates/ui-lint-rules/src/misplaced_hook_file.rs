//! Rule placing hook modules under the hooks directory.

use std::path::{Component, Path};

use ui_lint_core::utils::to_kebab_case;
use ui_lint_core::{
    AnalyzedUnit, FileContext, FixDescriptor, Location, Rule, RuleArea, Severity, UnitRole,
    ValidationIssue,
};

use crate::fixes::slash_path;

/// Rule code for misplaced-hook-file.
pub const CODE: &str = "UL073";

/// Rule name for misplaced-hook-file.
pub const NAME: &str = "misplaced-hook-file";

/// Flags hook modules living outside a `hooks` directory.
#[derive(Debug, Clone, Default)]
pub struct MisplacedHookFile;

impl MisplacedHookFile {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn in_hooks_dir(path: &Path) -> bool {
    path.parent().is_some_and(|p| {
        p.components()
            .any(|c| matches!(c, Component::Normal(s) if s == "hooks"))
    })
}

fn extension(path: &Path) -> &str {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.find('.').map_or("", |i| &name[i..])
}

impl Rule for MisplacedHookFile {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Custom hook modules belong in the hooks directory"
    }

    fn area(&self) -> RuleArea {
        RuleArea::Architecture
    }

    fn default_severity(&self) -> Severity {
        Severity::Suggestion
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        let Some(hook) = &unit.hook else {
            return Vec::new();
        };
        if ctx.role != UnitRole::Hook || in_hooks_dir(ctx.relative_path) {
            return Vec::new();
        }

        let target = ctx.conventions.source_root.join("hooks").join(format!(
            "{}{}",
            to_kebab_case(&hook.name),
            extension(ctx.relative_path)
        ));
        let target = slash_path(&target);
        vec![ValidationIssue::new(
            CODE,
            NAME,
            self.default_severity(),
            self.area(),
            Location::new(ctx.relative_path.to_path_buf(), hook.line, hook.column),
            format!(
                "Hook `{}` lives outside the hooks directory; move it to `{target}`",
                hook.name
            ),
        )
        .with_fix(FixDescriptor::transform("move-file", [("to", target)]))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check;

    const HOOK: &str = "export function useAuth() {\n  return useContext(AuthContext);\n}\n";

    #[test]
    fn test_hook_outside_hooks_dir() {
        let issues = check(&MisplacedHookFile::new(), "src/lib/auth.ts", HOOK);
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0].fix,
            Some(FixDescriptor::NamedTransform { context, .. })
                if context["to"] == "src/hooks/use-auth.ts"
        ));
    }

    #[test]
    fn test_nested_hooks_dir_passes() {
        assert!(check(&MisplacedHookFile::new(), "src/features/auth/hooks/use-auth.ts", HOOK)
            .is_empty());
    }
}
