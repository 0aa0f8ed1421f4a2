//! The healing pipeline.
//!
//! 1. Plan: collect fixable issues, filter, cap, group by unit.
//! 2. Apply: each unit's fixes run in memory, units in parallel.
//! 3. Validate: blocking post-validation findings discard a unit's text.
//! 4. Stage: accepted units go into a [`WriteSet`]; collisions are
//!    conflicts and neither side is written.
//! 5. Reconcile: barrels of touched directories are updated and completed.
//! 6. Flush, unless this is a dry run.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rayon::prelude::*;
use ui_lint_core::{Analysis, AnalyzedUnit, Conventions};
use ui_lint_ts::SourceUnit;

use crate::apply::{AppliedUnit, FixApplier};
use crate::plan::{passes_filters, plan, HealOptions};
use crate::reconcile::Reconciler;
use crate::report::{
    FailedFix, HealStats, HealingReport, IssueRef, Operation, OperationKind, Outcome,
    RejectedFile, TransformationResult,
};
use crate::transform::TransformRegistry;
use crate::validate::post_validate;
use crate::write::WriteSet;

/// Applies fixes from an [`Analysis`] and reports what happened.
#[derive(Debug)]
pub struct Healer {
    registry: TransformRegistry,
    options: HealOptions,
    conventions: Conventions,
}

/// One unit on its way through staging.
struct Pending {
    result: TransformationResult,
    fixed: Vec<IssueRef>,
    applied: AppliedUnit,
}

impl Healer {
    /// Creates a healer with the built-in transformers.
    #[must_use]
    pub fn new(options: HealOptions, conventions: Conventions) -> Self {
        Self {
            registry: TransformRegistry::builtin(),
            options,
            conventions,
        }
    }

    /// Replaces the transformer registry.
    #[must_use]
    pub fn with_registry(mut self, registry: TransformRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// The run options.
    #[must_use]
    pub fn options(&self) -> &HealOptions {
        &self.options
    }

    /// Heals the units of `analysis`. Failures are recorded per unit and
    /// never abort the run.
    #[must_use]
    pub fn heal(&self, analysis: &Analysis) -> HealingReport {
        let plan = plan(&analysis.result.issues, &self.options);
        let mut report = HealingReport {
            dry_run: self.options.dry_run,
            manual: plan.manual.clone(),
            stats: HealStats {
                eligible: plan.eligible,
                selected: plan.selected,
                remaining_issues: plan.remaining(),
                fix_limit: plan.fix_limit,
                ..HealStats::default()
            },
            ..HealingReport::default()
        };

        let units: BTreeMap<&Path, &AnalyzedUnit> = analysis
            .units
            .iter()
            .map(|u| (u.relative_path.as_path(), u))
            .collect();
        let applier = FixApplier::new(&self.registry, &self.conventions);

        let applied: Vec<AppliedUnit> = plan
            .groups
            .into_par_iter()
            .filter_map(|(path, issues)| match units.get(path.as_path()) {
                Some(unit) => Some(applier.apply(unit, issues)),
                None => {
                    tracing::warn!(file = %path.display(), "fixes target a file that was not analyzed");
                    None
                }
            })
            .collect();
        // Issues on files outside the analyzed inventory cannot be applied.
        for issue in analysis.result.issues.iter().filter(|i| {
            i.is_fixable() && !units.contains_key(i.location.file.as_path())
        }) {
            if passes_filters(issue, &self.options) {
                report.failed.push(FailedFix {
                    issue: IssueRef::from(issue),
                    error: "file was not analyzed".to_string(),
                });
            }
        }

        let mut writes = WriteSet::new(&analysis.root);
        let mut pending: Vec<Pending> = Vec::new();

        for unit in applied {
            report.failed.extend(unit.failed.iter().cloned());
            let mut pend = Pending {
                result: TransformationResult {
                    original_path: unit.path.clone(),
                    final_path: unit.final_path().to_path_buf(),
                    original_text: unit.original_text.clone(),
                    transformed_text: unit.unit.text().to_string(),
                    operations: unit.operations.clone(),
                    succeeded: true,
                    outcome: Outcome::Unchanged,
                },
                fixed: unit.fixed.clone(),
                applied: unit,
            };
            if pend.applied.is_changed() {
                if let Some(before) = units.get(pend.applied.path.as_path()) {
                    self.accept(&before.unit, &mut pend, &mut writes, &mut report);
                }
            }
            pending.push(pend);
        }
        // A conflict withdraws both writers, including one accepted earlier.
        for pend in &mut pending {
            let conflicted = report
                .conflicts
                .iter()
                .any(|c| c.units.contains(&pend.result.original_path));
            if conflicted {
                pend.result.set_outcome(Outcome::Conflict);
            }
        }

        if self.options.reconcile_barrels {
            self.reconcile(&pending, &mut writes, &mut report);
        }

        report.stats.files_written = writes.paths().count();
        if !self.options.dry_run {
            self.flush(writes, &analysis.root, &mut pending, &mut report);
        }

        for pend in pending {
            if pend.result.outcome == Outcome::Applied {
                report.fixed.extend(pend.fixed);
            }
            report.results.push(pend.result);
        }
        report.stats.applied = report.fixed.len();
        report.stats.failed = report.failed.len();
        report.stats.rejected_files = report.rejected.len();

        tracing::info!(
            applied = report.stats.applied,
            failed = report.stats.failed,
            rejected = report.stats.rejected_files,
            deferred = report.stats.remaining_issues,
            dry_run = report.dry_run,
            "Healing finished"
        );
        report
    }

    /// Post-validates and stages one changed unit.
    fn accept(
        &self,
        before: &SourceUnit,
        pend: &mut Pending,
        writes: &mut WriteSet,
        report: &mut HealingReport,
    ) {
        let path = pend.applied.path.clone();
        let result = &mut pend.result;

        if result.is_text_changed() {
            let findings = post_validate(before, &pend.applied.unit);
            let (blocking, advisory): (Vec<_>, Vec<_>) =
                findings.into_iter().partition(|f| f.blocking);
            report.warnings.extend(
                advisory
                    .iter()
                    .map(|f| format!("{}: {f}", path.display())),
            );
            if !blocking.is_empty() {
                tracing::warn!(file = %path.display(), findings = blocking.len(), "transformed text rejected");
                report.rejected.push(RejectedFile {
                    file: path,
                    reasons: blocking.iter().map(ToString::to_string).collect(),
                    issues: std::mem::take(&mut pend.fixed),
                });
                for op in result.operations.iter_mut().filter(|op| op.succeeded) {
                    op.succeeded = false;
                    op.error = Some("discarded: post-validation rejected the file".to_string());
                }
                result.transformed_text.clone_from(&result.original_text);
                result.final_path.clone_from(&result.original_path);
                result.set_outcome(Outcome::Rejected);
                return;
            }
        }

        if result.is_changed() {
            if let Err(conflict) = writes.stage_unit(
                &result.original_path,
                &result.final_path,
                result.transformed_text.clone(),
            ) {
                tracing::warn!(path = %conflict.path.display(), "write conflict");
                result.set_outcome(Outcome::Conflict);
                report.conflicts.push(conflict);
                return;
            }
        }

        for file in &pend.applied.generated {
            let op = Operation::derived(
                OperationKind::CreateFile,
                file.path.clone(),
                format!("scaffold for {}", path.display()),
            );
            if writes.stage_create(&file.path, file.text.clone()) {
                report.derived.push(op);
            } else {
                report
                    .warnings
                    .push(format!("{} already exists; not overwritten", file.path.display()));
                report.derived.push(op.failed("file already exists"));
            }
        }
        result.set_outcome(Outcome::Applied);
    }

    /// Updates barrels for the applied units, then completes the barrel of
    /// every directory they landed in.
    fn reconcile(&self, pending: &[Pending], writes: &mut WriteSet, report: &mut HealingReport) {
        let reconciler = Reconciler::new(&self.conventions);
        let mut touched = BTreeSet::new();
        for pend in pending.iter().filter(|p| p.result.outcome == Outcome::Applied) {
            let result = &pend.result;
            if result.is_relocated() {
                report
                    .derived
                    .extend(reconciler.remove_module(&result.original_path, writes));
            }
            report
                .derived
                .extend(reconciler.add_module(&result.final_path, writes));
            if reconciler.applies_to(&result.final_path) {
                touched.extend(result.final_path.parent().map(Path::to_path_buf));
            }
        }
        for dir in &touched {
            report
                .derived
                .extend(reconciler.reconcile_directory(dir, writes));
        }
    }

    fn flush(
        &self,
        writes: WriteSet,
        root: &Path,
        pending: &mut [Pending],
        report: &mut HealingReport,
    ) {
        match writes.flush() {
            Ok(written) => report.stats.files_written = written.len(),
            Err(errors) => {
                report.stats.files_written = report
                    .stats
                    .files_written
                    .saturating_sub(errors.len());
                for error in errors {
                    let relative = error.path().strip_prefix(root).unwrap_or(error.path());
                    tracing::error!(error = %error, "write failed");
                    if let Some(pend) = pending.iter_mut().find(|p| {
                        p.result.final_path == relative || p.result.original_path == relative
                    }) {
                        pend.result.set_outcome(Outcome::WriteFailed);
                    }
                    report.warnings.push(error.to_string());
                }
            }
        }
    }
}
