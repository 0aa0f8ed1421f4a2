//! Rule bounding directory nesting under the source root.
//!
//! Depth counts directories between the source root and the file, so with
//! the default bound of 2, `src/components/ui/button.tsx` passes and
//! `src/components/ui/forms/input.tsx` does not. Routing trees mirror URLs
//! and are exempt.
//!
//! # Configuration
//!
//! - `max_depth`: overrides `conventions.max_depth`

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use ui_lint_core::{
    FixDescriptor, Location, ProjectContext, ProjectRule, RuleArea, RuleConfig, Severity,
    ValidationIssue,
};

use crate::fixes::slash_path;

/// Rule code for nesting-depth.
pub const CODE: &str = "UL072";

/// Rule name for nesting-depth.
pub const NAME: &str = "nesting-depth";

/// Flags directories nested deeper than the configured bound.
#[derive(Debug, Clone, Default)]
pub struct NestingDepth {
    max_depth: Option<usize>,
}

impl NestingDepth {
    /// Creates a new rule using the project's depth convention.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the rule from its `[rules.nesting-depth]` block.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        Self {
            max_depth: config.and_then(|c| c.get_option::<usize>("max_depth")),
        }
    }
}

fn is_routing_tree(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(s) if s == "app" || s == "pages"))
}

impl ProjectRule for NestingDepth {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Directories should not nest deeper than the configured bound"
    }

    fn area(&self) -> RuleArea {
        RuleArea::Architecture
    }

    fn default_severity(&self) -> Severity {
        Severity::Suggestion
    }

    fn check_project(&self, ctx: &ProjectContext) -> Vec<ValidationIssue> {
        let max = self.max_depth.unwrap_or(ctx.conventions.max_depth);
        let source_root = &ctx.conventions.source_root;

        // One issue per offending directory, reported on its first file.
        let mut deep: BTreeMap<PathBuf, (&Path, usize)> = BTreeMap::new();
        for file in &ctx.source_files {
            let Ok(inner) = file.strip_prefix(source_root) else {
                continue;
            };
            let Some(dir) = inner.parent() else {
                continue;
            };
            if is_routing_tree(inner) {
                continue;
            }
            let depth = dir.components().count();
            if depth > max {
                deep.entry(source_root.join(dir))
                    .or_insert((file.as_path(), depth));
            }
        }

        deep.into_iter()
            .map(|(dir, (file, depth))| {
                let shown = slash_path(&dir);
                ValidationIssue::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    self.area(),
                    Location::new(file.to_path_buf(), 1, 1),
                    format!("`{shown}` is nested {depth} levels deep (max {max})"),
                )
                .with_fix(FixDescriptor::manual(
                    format!("Flatten `{shown}`"),
                    [
                        "Move its modules up a level or split the grouping".to_string(),
                        "Update the imports that reference the moved modules".to_string(),
                    ],
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check_project;
    use ui_lint_core::Conventions;

    const SRC: &str = "export const X = () => <div />;\n";

    #[test]
    fn test_deep_directory_reported_once() {
        let issues = check_project(
            &NestingDepth::new(),
            &Conventions::default(),
            &[
                ("src/components/ui/button.tsx", SRC),
                ("src/components/ui/forms/input.tsx", SRC),
                ("src/components/ui/forms/select.tsx", SRC),
                ("src/app/dashboard/settings/profile/page.tsx", SRC),
            ],
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message,
            "`src/components/ui/forms` is nested 3 levels deep (max 2)"
        );
        assert_eq!(
            issues[0].location.file,
            PathBuf::from("src/components/ui/forms/input.tsx")
        );
    }

    #[test]
    fn test_configured_bound() {
        let conventions = Conventions {
            max_depth: 3,
            ..Conventions::default()
        };
        let issues = check_project(
            &NestingDepth::new(),
            &conventions,
            &[("src/components/ui/forms/input.tsx", SRC)],
        );
        assert!(issues.is_empty());
    }
}
