//! Rule for kebab-case file names.
//!
//! Only files under the source root are checked. Routing files, files the
//! framework reserves with a leading `_`, and dynamic segments (`[id].tsx`)
//! keep their names.

use ui_lint_core::utils::{is_kebab_case, to_kebab_case};
use ui_lint_core::{
    AnalyzedUnit, FileContext, FixDescriptor, Location, Rule, RuleArea, Severity,
    ValidationIssue,
};
use ui_lint_ts::RouteKind;

use crate::fixes::{slash_path, stem, with_stem};

/// Rule code for kebab-case-filename.
pub const CODE: &str = "UL071";

/// Rule name for kebab-case-filename.
pub const NAME: &str = "kebab-case-filename";

/// Flags file names that are not kebab-case.
#[derive(Debug, Clone, Default)]
pub struct KebabCaseFilename;

impl KebabCaseFilename {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for KebabCaseFilename {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "File names must be kebab-case"
    }

    fn area(&self) -> RuleArea {
        RuleArea::Architecture
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        let path = ctx.relative_path;
        if !path.starts_with(&ctx.conventions.source_root)
            || unit.component.route.is_some()
            || RouteKind::misnamed(path).is_some()
        {
            return Vec::new();
        }
        let name = stem(path);
        if name.starts_with('_') || name.starts_with('[') || is_kebab_case(name) {
            return Vec::new();
        }

        let renamed = to_kebab_case(name);
        if renamed.is_empty() {
            return Vec::new();
        }
        let target = slash_path(&with_stem(path, &renamed));
        vec![ValidationIssue::new(
            CODE,
            NAME,
            self.default_severity(),
            self.area(),
            Location::new(path.to_path_buf(), 1, 1),
            format!("File name `{name}` should be kebab-case: `{target}` (imports are not updated)"),
        )
        .with_fix(FixDescriptor::transform("rename-file", [("to", target)]))]
    }
}
