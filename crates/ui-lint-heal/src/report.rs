//! Healing results and the run report.

use std::path::{Path, PathBuf};

use serde::Serialize;
use ui_lint_core::{FixDescriptor, ValidationIssue};

use crate::write::WriteConflict;

/// What an operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    /// Applied (or attempted) one fix descriptor.
    Fix,
    /// Moved or renamed a unit.
    Relocate,
    /// Created a file that did not exist (test scaffold, barrel).
    CreateFile,
    /// Added or removed a barrel entry.
    UpdateBarrel,
}

/// One recorded step of a run. Failed attempts are recorded too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// What was done.
    pub kind: OperationKind,
    /// File acted on, relative to the root.
    pub file: PathBuf,
    /// Issue code, for fixes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Rule name, for fixes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Human description.
    pub description: String,
    /// Whether the step took effect.
    pub succeeded: bool,
    /// Why it did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Operation {
    /// A fix attempt for `issue`.
    #[must_use]
    pub fn fix(issue: &ValidationIssue) -> Self {
        let description = issue
            .fix
            .as_ref()
            .map_or_else(String::new, FixDescriptor::summary);
        Self {
            kind: OperationKind::Fix,
            file: issue.location.file.clone(),
            code: Some(issue.code.clone()),
            rule: Some(issue.rule.clone()),
            description,
            succeeded: true,
            error: None,
        }
    }

    /// A step that is not tied to one issue.
    #[must_use]
    pub fn derived(kind: OperationKind, file: impl Into<PathBuf>, description: String) -> Self {
        Self {
            kind,
            file: file.into(),
            code: None,
            rule: None,
            description,
            succeeded: true,
            error: None,
        }
    }

    /// Marks the operation as failed.
    #[must_use]
    pub fn failed(mut self, error: impl ToString) -> Self {
        self.succeeded = false;
        self.error = Some(error.to_string());
        self
    }
}

/// Final state of one unit's transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// Accepted and written (or would be, in a dry run).
    Applied,
    /// No fix changed the unit.
    Unchanged,
    /// Post-transform validation rejected the text; the file is untouched.
    Rejected,
    /// A write conflict kept the unit from being written.
    Conflict,
    /// Flushing the write failed.
    WriteFailed,
}

/// The transformation of one unit.
#[derive(Debug, Clone, Serialize)]
pub struct TransformationResult {
    /// Path before the run, relative to the root.
    pub original_path: PathBuf,
    /// Path after the run; differs on move or rename.
    pub final_path: PathBuf,
    /// Text before the run.
    #[serde(skip)]
    pub original_text: String,
    /// Text after every accepted fix.
    #[serde(skip)]
    pub transformed_text: String,
    /// Fix attempts and relocations, in application order.
    pub operations: Vec<Operation>,
    /// Whether the result was accepted.
    pub succeeded: bool,
    /// Final state.
    pub outcome: Outcome,
}

impl TransformationResult {
    /// Whether the unit changed location.
    #[must_use]
    pub fn is_relocated(&self) -> bool {
        self.original_path != self.final_path
    }

    /// Whether the text changed.
    #[must_use]
    pub fn is_text_changed(&self) -> bool {
        self.original_text != self.transformed_text
    }

    /// Whether anything needs writing.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.is_relocated() || self.is_text_changed()
    }

    pub(crate) fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = outcome;
        self.succeeded = matches!(outcome, Outcome::Applied | Outcome::Unchanged);
    }
}

/// Issue reference used in report sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRef {
    /// Issue code.
    pub code: String,
    /// Rule name.
    pub rule: String,
    /// File, relative to the root.
    pub file: PathBuf,
    /// 1-indexed line.
    pub line: usize,
    /// Issue message.
    pub message: String,
}

impl From<&ValidationIssue> for IssueRef {
    fn from(issue: &ValidationIssue) -> Self {
        Self {
            code: issue.code.clone(),
            rule: issue.rule.clone(),
            file: issue.location.file.clone(),
            line: issue.location.line,
            message: issue.message.clone(),
        }
    }
}

/// A fix that was attempted and failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFix {
    /// The issue.
    pub issue: IssueRef,
    /// Why the fix failed.
    pub error: String,
}

/// A unit whose transformed text was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedFile {
    /// The unit, relative to the root.
    pub file: PathBuf,
    /// Blocking post-validation findings.
    pub reasons: Vec<String>,
    /// Issues whose fixes were discarded with the file.
    pub issues: Vec<IssueRef>,
}

/// A flagged issue that needs a human.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualFix {
    /// The issue.
    pub issue: IssueRef,
    /// What needs to happen.
    pub description: String,
    /// Suggested steps.
    pub steps: Vec<String>,
}

/// Run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealStats {
    /// Issues with an automatic fix that passed the filters.
    pub eligible: usize,
    /// Eligible issues kept after the fix limit.
    pub selected: usize,
    /// Fixes that took effect in accepted units.
    pub applied: usize,
    /// Fix attempts that failed.
    pub failed: usize,
    /// Units rejected by post-validation.
    pub rejected_files: usize,
    /// Eligible issues deferred by the fix limit.
    pub remaining_issues: usize,
    /// The fix limit in effect.
    pub fix_limit: Option<usize>,
    /// Files written (or that would be, in a dry run).
    pub files_written: usize,
}

/// How a heal run ended, for the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExitStatus {
    /// Nothing needed (or could be) changed.
    Clean,
    /// At least one unit was healed.
    Healed,
    /// Post-validation rejected every affected unit.
    Failed,
}

/// Everything a heal run did, attempted, and left for a human.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HealingReport {
    /// Whether disk was left untouched.
    pub dry_run: bool,
    /// One result per affected unit.
    pub results: Vec<TransformationResult>,
    /// Barrel and scaffold operations.
    pub derived: Vec<Operation>,
    /// Issues fixed.
    pub fixed: Vec<IssueRef>,
    /// Fixes attempted but failed.
    pub failed: Vec<FailedFix>,
    /// Units rejected by post-validation.
    pub rejected: Vec<RejectedFile>,
    /// Write conflicts; both sides were skipped.
    pub conflicts: Vec<WriteConflict>,
    /// Flagged issues that are not auto-fixable.
    pub manual: Vec<ManualFix>,
    /// Advisory post-validation findings on accepted units.
    pub warnings: Vec<String>,
    /// Counters.
    pub stats: HealStats,
}

impl HealingReport {
    /// Exit status of the run.
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        let affected: Vec<&TransformationResult> = self
            .results
            .iter()
            .filter(|r| r.outcome != Outcome::Unchanged)
            .collect();
        if !affected.is_empty() && affected.iter().all(|r| r.outcome == Outcome::Rejected) {
            ExitStatus::Failed
        } else if affected.iter().any(|r| r.outcome == Outcome::Applied) {
            ExitStatus::Healed
        } else {
            ExitStatus::Clean
        }
    }

    /// Every fix operation recorded, in result order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.results.iter().flat_map(|r| r.operations.iter())
    }

    /// Result for the unit originally at `path`.
    #[must_use]
    pub fn result_for(&self, path: &Path) -> Option<&TransformationResult> {
        self.results.iter().find(|r| r.original_path == path)
    }
}
