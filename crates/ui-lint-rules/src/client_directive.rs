//! Rule for client-boundary directive placement.
//!
//! # Rationale
//!
//! A unit that calls hooks, wires event handlers, or touches browser
//! globals only works as a client component. Without the `"use client"`
//! marker the framework renders it on the server and fails at runtime; with
//! a marker but no client behaviour, the unit ships to the browser for
//! nothing.
//!
//! # Detected Patterns
//!
//! - `UL001`: client-only constructs without the directive
//! - `UL002`: the directive without client-only constructs, or a second copy
//! - `UL003`: the directive below the first statement, where it is inert
//!
//! Hook modules are not client boundaries themselves and are skipped, as are
//! test files.

use ui_lint_core::{
    AnalyzedUnit, FileContext, FixDescriptor, Location, Rule, RuleArea, ValidationIssue,
};
use ui_lint_ts::PrimitiveKind;

/// Rule code for a missing directive.
pub const CODE: &str = "UL001";

/// Rule code for a redundant directive.
pub const CODE_REDUNDANT: &str = "UL002";

/// Rule code for a misplaced directive.
pub const CODE_MISPLACED: &str = "UL003";

/// Rule name for client-directive.
pub const NAME: &str = "client-directive";

/// The statement inserted by the fix.
pub const DIRECTIVE_LINE: &str = "\"use client\";";

/// Checks `"use client"` against the unit's client-only constructs.
#[derive(Debug, Clone, Default)]
pub struct ClientDirective;

impl ClientDirective {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn issue(
        &self,
        code: &str,
        ctx: &FileContext,
        line: usize,
        message: String,
        fix: FixDescriptor,
    ) -> ValidationIssue {
        ValidationIssue::new(
            code,
            NAME,
            self.default_severity(),
            self.area(),
            Location::new(ctx.relative_path.to_path_buf(), line, 1),
            message,
        )
        .with_fix(fix)
    }
}

fn describe(unit: &AnalyzedUnit) -> String {
    let component = &unit.component;
    match component.client_primitives.first() {
        Some(p) => {
            let what = match p.kind {
                PrimitiveKind::Hook => "calls",
                PrimitiveKind::EventHandler => "binds",
                PrimitiveKind::BrowserGlobal => "reads",
            };
            format!("{what} `{}` on line {}", p.name, p.line)
        }
        None => "is a routing file that must run on the client".to_string(),
    }
}

impl Rule for ClientDirective {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Client-only constructs require a leading \"use client\" directive, and only they do"
    }

    fn area(&self) -> RuleArea {
        RuleArea::Directive
    }

    fn check(&self, ctx: &FileContext, unit: &AnalyzedUnit) -> Vec<ValidationIssue> {
        let component = &unit.component;
        if ctx.is_test || (unit.hook.is_some() && !component.is_component()) {
            return Vec::new();
        }

        let needs = component.needs_client_boundary();
        let mut issues = Vec::new();

        if let Some(misplaced) = component.misplaced_directive_line {
            if needs && !component.uses_client_directive {
                issues.push(self.issue(
                    CODE_MISPLACED,
                    ctx,
                    misplaced,
                    "\"use client\" must be the first statement of the file".to_string(),
                    FixDescriptor::transform(
                        "hoist-directive",
                        [("line", misplaced.to_string())],
                    ),
                ));
                return issues;
            }
            issues.push(self.issue(
                CODE_REDUNDANT,
                ctx,
                misplaced,
                "\"use client\" below the first statement has no effect".to_string(),
                FixDescriptor::RemoveLine { line: misplaced },
            ));
        }

        match (needs, component.directive_line) {
            (true, None) if component.misplaced_directive_line.is_none() => {
                issues.push(self.issue(
                    CODE,
                    ctx,
                    1,
                    format!(
                        "Missing \"use client\" directive: this file {}",
                        describe(unit)
                    ),
                    FixDescriptor::InsertLine {
                        line: 1,
                        text: DIRECTIVE_LINE.to_string(),
                    },
                ));
            }
            (false, Some(line)) => {
                issues.push(self.issue(
                    CODE_REDUNDANT,
                    ctx,
                    line,
                    "Redundant \"use client\" directive: no hooks, event handlers or browser globals are used".to_string(),
                    FixDescriptor::RemoveLine { line },
                ));
            }
            _ => {}
        }

        issues
    }
}
