//! Rule for props types shared across files.
//!
//! A `*Props` declaration referenced from more than one unit is part of a
//! shared contract and belongs in a shared types module, not next to one
//! of its consumers. Uses the run-scoped identifier index.

use std::path::Path;

use ui_lint_core::{
    FixDescriptor, Location, ProjectContext, ProjectRule, RuleArea, Severity, UnitRole,
    ValidationIssue,
};

use crate::fixes::slash_path;

/// Rule code for shared-props-type.
pub const CODE: &str = "UL042";

/// Rule name for shared-props-type.
pub const NAME: &str = "shared-props-type";

/// Flags props types referenced from several units.
#[derive(Debug, Clone, Default)]
pub struct SharedPropsType;

impl SharedPropsType {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProjectRule for SharedPropsType {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Props types used by several files belong in a shared types module"
    }

    fn area(&self) -> RuleArea {
        RuleArea::Typing
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check_project(&self, ctx: &ProjectContext) -> Vec<ValidationIssue> {
        let shared_dir = ctx.conventions.source_root.join("types");
        let mut issues = Vec::new();

        for unit in ctx.units {
            if matches!(unit.role, UnitRole::Type | UnitRole::Test) {
                continue;
            }
            for decl in &unit.component.declared_types {
                if !decl.name.ends_with("Props") {
                    continue;
                }
                let referencing: Vec<&Path> = ctx
                    .identifier_index()
                    .files_referencing(&decl.name)
                    .into_iter()
                    .filter(|p| *p != unit.relative_path.as_path())
                    .collect();
                if referencing.is_empty() {
                    continue;
                }

                let others: Vec<String> = referencing.iter().map(|p| slash_path(p)).collect();
                issues.push(
                    ValidationIssue::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        self.area(),
                        Location::new(unit.relative_path.clone(), decl.line, 1),
                        format!(
                            "`{}` is also referenced by {}; move it to a shared types module",
                            decl.name,
                            others.join(", ")
                        ),
                    )
                    .with_fix(FixDescriptor::manual(
                        format!("Move `{}` to {}", decl.name, slash_path(&shared_dir)),
                        [
                            format!("Declare and export `{}` under {}", decl.name, slash_path(&shared_dir)),
                            "Import it from there in every referencing file".to_string(),
                        ],
                    )),
                );
            }
        }

        issues
    }
}
