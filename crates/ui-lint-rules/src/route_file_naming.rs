//! Rule for routing file names.
//!
//! Routing file names are case-sensitive: `Page.tsx` under `app/` is an
//! ordinary module and the route silently 404s.

use ui_lint_core::{
    AnalyzedUnit, FileContext, FixDescriptor, Location, Rule, RuleArea, ValidationIssue,
};
use ui_lint_ts::RouteKind;

use crate::fixes::{slash_path, with_stem};

/// Rule code for route-file-naming.
pub const CODE: &str = "UL051";

/// Rule name for route-file-naming.
pub const NAME: &str = "route-file-naming";

/// Flags routing files whose name differs only in case.
#[derive(Debug, Clone, Default)]
pub struct RouteFileNaming;

impl RouteFileNaming {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for RouteFileNaming {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Routing files must use the framework's lowercase names"
    }

    fn area(&self) -> RuleArea {
        RuleArea::Routing
    }

    fn check(&self, ctx: &FileContext, _unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        let Some((_, expected)) = RouteKind::misnamed(ctx.relative_path) else {
            return Vec::new();
        };
        let target = with_stem(ctx.relative_path, expected);
        vec![ValidationIssue::new(
            CODE,
            NAME,
            self.default_severity(),
            self.area(),
            Location::new(ctx.relative_path.to_path_buf(), 1, 1),
            format!(
                "`{}` is not recognized as a routing file; rename it to `{}`",
                slash_path(ctx.relative_path),
                slash_path(&target)
            ),
        )
        .with_fix(FixDescriptor::transform(
            "rename-file",
            [("to", slash_path(&target))],
        ))]
    }
}
