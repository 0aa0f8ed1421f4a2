//! Rule suggesting pages stay server components.
//!
//! A `"use client"` page ships the whole route to the browser and gives up
//! server data fetching and metadata. Interactive parts usually belong in a
//! child component.

use ui_lint_core::{
    AnalyzedUnit, FileContext, FixDescriptor, Location, Rule, RuleArea, Severity,
    ValidationIssue,
};

/// Rule code for client-page.
pub const CODE: &str = "UL052";

/// Rule name for client-page.
pub const NAME: &str = "client-page";

/// Flags pages marked as client components.
#[derive(Debug, Clone, Default)]
pub struct ClientPage;

impl ClientPage {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ClientPage {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Pages should be server components; move client logic into children"
    }

    fn area(&self) -> RuleArea {
        RuleArea::Routing
    }

    fn default_severity(&self) -> Severity {
        Severity::Suggestion
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        let component = &unit.component;
        if !component.is_page || !component.uses_client_directive {
            return Vec::new();
        }
        vec![ValidationIssue::new(
            CODE,
            NAME,
            self.default_severity(),
            self.area(),
            Location::new(
                ctx.relative_path.to_path_buf(),
                component.directive_line.unwrap_or(1),
                1,
            ),
            "Page is a client component",
        )
        .with_fix(FixDescriptor::manual(
            "Split the page into a server page and a client child",
            [
                "Move hooks and event handlers into a new client component",
                "Render that component from the page and drop \"use client\" from the page",
            ],
        ))]
    }
}
