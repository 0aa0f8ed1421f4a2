//! Rule for the project's top-level groupings.

use std::path::Path;

use ui_lint_core::{
    FixDescriptor, Location, ProjectContext, ProjectRule, RuleArea, Severity, ValidationIssue,
};

use crate::fixes::slash_path;

/// Rule code for required-directories.
pub const CODE: &str = "UL070";

/// Rule name for required-directories.
pub const NAME: &str = "required-directories";

/// Flags required directories that do not exist.
#[derive(Debug, Clone, Default)]
pub struct RequiredDirectories;

impl RequiredDirectories {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProjectRule for RequiredDirectories {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Configured top-level directories must exist under the source root"
    }

    fn area(&self) -> RuleArea {
        RuleArea::Architecture
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_project(&self, ctx: &ProjectContext) -> Vec<ValidationIssue> {
        // Projects without the configured source root keep their groupings
        // at the root.
        let base = if ctx.source_root().is_dir() {
            ctx.conventions.source_root.clone()
        } else {
            Path::new("").to_path_buf()
        };

        ctx.conventions
            .required_dirs
            .iter()
            .filter(|dir| !ctx.root.join(&base).join(dir).is_dir())
            .map(|dir| {
                let relative = base.join(dir);
                let shown = slash_path(&relative);
                ValidationIssue::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    self.area(),
                    Location::new(relative, 1, 1),
                    format!("Required directory `{shown}` does not exist"),
                )
                .with_fix(FixDescriptor::manual(
                    format!("Create `{shown}`"),
                    [format!("Create `{shown}` and move the matching modules into it")],
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ui_lint_core::Conventions;

    fn run(root: &Path) -> Vec<ValidationIssue> {
        let conventions = Conventions::default();
        let ctx = ProjectContext::new(root, &conventions, &[]);
        RequiredDirectories::new().check_project(&ctx)
    }

    #[test]
    fn test_missing_directories_under_source_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src/components")).unwrap();

        let issues = run(dir.path());
        let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Required directory `src/hooks` does not exist",
                "Required directory `src/lib` does not exist",
            ]
        );
        assert!(!issues[0].is_fixable());
    }

    #[test]
    fn test_root_layout_without_source_root() {
        let dir = tempfile::tempdir().unwrap();
        for d in ["components", "hooks", "lib"] {
            std::fs::create_dir_all(dir.path().join(d)).unwrap();
        }
        assert!(run(dir.path()).is_empty());
    }
}
