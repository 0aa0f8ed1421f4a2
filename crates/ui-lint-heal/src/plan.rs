//! Issue selection: collect, filter, cap and group.

use std::collections::BTreeMap;
use std::path::PathBuf;

use ui_lint_core::{FixDescriptor, HealConfig, RuleArea, ValidationIssue};

use crate::report::{IssueRef, ManualFix};

/// Transformer id of the test scaffold fix.
pub const SCAFFOLD_TEST: &str = "scaffold-test";

/// Options for one heal run.
#[derive(Debug, Clone, Default)]
pub struct HealOptions {
    /// Upper bound on selected fixes.
    pub max_fix: Option<usize>,
    /// Only fix issues in these areas (empty: all).
    pub areas: Vec<RuleArea>,
    /// Only fix issues in this unit, relative to the root.
    pub file: Option<PathBuf>,
    /// Maintain barrel files after writes.
    pub reconcile_barrels: bool,
    /// Generate missing component tests.
    pub scaffold_tests: bool,
    /// Report without touching disk.
    pub dry_run: bool,
}

impl HealOptions {
    /// Options from the `[heal]` configuration block.
    #[must_use]
    pub fn from_config(config: &HealConfig) -> Self {
        Self {
            max_fix: config.max_fix,
            areas: config.areas.clone(),
            file: None,
            reconcile_barrels: config.reconcile_barrels,
            scaffold_tests: config.scaffold_tests,
            dry_run: false,
        }
    }

    /// Sets the fix limit. Zero means no limit.
    #[must_use]
    pub fn max_fix(mut self, max: Option<usize>) -> Self {
        self.max_fix = max.filter(|n| *n > 0);
        self
    }

    /// Restricts healing to `areas`.
    #[must_use]
    pub fn areas(mut self, areas: Vec<RuleArea>) -> Self {
        self.areas = areas;
        self
    }

    /// Restricts healing to one unit.
    #[must_use]
    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Enables or disables barrel reconciliation.
    #[must_use]
    pub fn reconcile_barrels(mut self, enabled: bool) -> Self {
        self.reconcile_barrels = enabled;
        self
    }

    /// Enables or disables test scaffolding.
    #[must_use]
    pub fn scaffold_tests(mut self, enabled: bool) -> Self {
        self.scaffold_tests = enabled;
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Issues selected for healing, grouped by unit.
#[derive(Debug, Default)]
pub struct HealPlan {
    /// Selected issues per unit, in collection order.
    pub groups: BTreeMap<PathBuf, Vec<ValidationIssue>>,
    /// Flagged issues with a manual fix.
    pub manual: Vec<ManualFix>,
    /// Issues that passed the filters.
    pub eligible: usize,
    /// Issues kept after the cap.
    pub selected: usize,
    /// The cap in effect.
    pub fix_limit: Option<usize>,
}

impl HealPlan {
    /// Eligible issues deferred by the cap.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.eligible - self.selected
    }
}

pub(crate) fn passes_filters(issue: &ValidationIssue, options: &HealOptions) -> bool {
    if !options.areas.is_empty() && !options.areas.contains(&issue.area) {
        return false;
    }
    if options
        .file
        .as_ref()
        .is_some_and(|f| *f != issue.location.file)
    {
        return false;
    }
    let scaffold = matches!(
        &issue.fix,
        Some(FixDescriptor::NamedTransform { transformer, .. }) if transformer == SCAFFOLD_TEST
    );
    !scaffold || options.scaffold_tests
}

/// Builds the plan. Selection is deterministic: issues are taken in
/// collection order and the cap keeps the first `max_fix` eligible ones.
#[must_use]
pub fn plan(issues: &[ValidationIssue], options: &HealOptions) -> HealPlan {
    let mut out = HealPlan {
        fix_limit: options.max_fix,
        ..HealPlan::default()
    };

    for issue in issues {
        match &issue.fix {
            Some(FixDescriptor::Manual { description, steps }) => out.manual.push(ManualFix {
                issue: IssueRef::from(issue),
                description: description.clone(),
                steps: steps.clone(),
            }),
            Some(_) if passes_filters(issue, options) => {
                out.eligible += 1;
                if options.max_fix.is_some_and(|max| out.selected >= max) {
                    continue;
                }
                out.selected += 1;
                out.groups
                    .entry(issue.location.file.clone())
                    .or_default()
                    .push(issue.clone());
            }
            _ => {}
        }
    }

    if out.remaining() > 0 {
        tracing::info!(
            "Fix limit {} reached; {} eligible issues deferred",
            out.fix_limit.unwrap_or_default(),
            out.remaining()
        );
    }
    out
}

/// Orders one unit's fixes: by area priority, then collection order.
pub fn order_for_unit(issues: &mut [ValidationIssue]) {
    issues.sort_by_key(|issue| issue.area.heal_priority());
}
