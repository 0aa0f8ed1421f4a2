//! Applying a unit's fixes in memory.
//!
//! Fixes run in priority order against one [`SourceUnit`]. Each fix sees
//! the text left by the previous one; a failing fix restores the unit to
//! its state before that fix and the run continues with the next.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;

use regex::RegexBuilder;
use ui_lint_core::{AnalyzedUnit, Conventions, FixDescriptor, RuleArea, ValidationIssue};
use ui_lint_ts::{SourceUnit, CLIENT_DIRECTIVE};

use crate::error::FixError;
use crate::plan::order_for_unit;
use crate::report::{FailedFix, IssueRef, Operation, OperationKind};
use crate::transform::{
    insert_directive, removal_range, Args, GeneratedFile, TransformCx, TransformRegistry,
};

/// Line movement caused by the fixes applied so far.
///
/// Line numbers in fix descriptors refer to the text the rules saw. Each
/// applied edit is recorded as a region (in the coordinates of the text
/// it was applied to), and [`LineLedger::map`] replays the regions to
/// translate an original line into the current text.
#[derive(Debug, Clone, Default)]
pub struct LineLedger {
    edits: Vec<LineEdit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineEdit {
    start: usize,
    old_len: usize,
    new_len: usize,
}

impl LineLedger {
    /// Records that `old_len` lines from `start` became `new_len` lines.
    pub fn record(&mut self, start: usize, old_len: usize, new_len: usize) {
        if old_len != 0 || new_len != 0 {
            self.edits.push(LineEdit {
                start,
                old_len,
                new_len,
            });
        }
    }

    /// Records the region that differs between `before` and `after`.
    pub fn record_diff(&mut self, before: &str, after: &str) {
        let old: Vec<&str> = before.split_inclusive('\n').collect();
        let new: Vec<&str> = after.split_inclusive('\n').collect();
        let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
        let max_suffix = old.len().min(new.len()) - prefix;
        let suffix = old
            .iter()
            .rev()
            .zip(new.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();
        self.record(prefix + 1, old.len() - prefix - suffix, new.len() - prefix - suffix);
    }

    /// Current position of original `line`, or `None` if an edit rewrote it.
    #[must_use]
    pub fn map(&self, line: usize) -> Option<usize> {
        let mut current = line;
        for edit in &self.edits {
            if current < edit.start {
                continue;
            }
            if current >= edit.start + edit.old_len {
                current = current + edit.new_len - edit.old_len;
            } else {
                return None;
            }
        }
        Some(current)
    }

    /// Current lines (half-open) holding what was original `line`. Unlike
    /// [`Self::map`], a line rewritten by an edit widens to the edit's
    /// replacement instead of being lost.
    #[must_use]
    pub fn span(&self, line: usize) -> std::ops::Range<usize> {
        let (mut lo, mut hi) = (line, line + 1);
        for edit in &self.edits {
            let end = edit.start + edit.old_len;
            if hi <= edit.start {
                continue;
            }
            if lo >= end {
                lo = lo + edit.new_len - edit.old_len;
                hi = hi + edit.new_len - edit.old_len;
            } else {
                lo = lo.min(edit.start);
                hi = (hi.max(end) + edit.new_len - edit.old_len).max(lo + 1);
            }
        }
        lo..hi
    }
}

/// Everything produced by healing one unit in memory.
#[derive(Debug)]
pub struct AppliedUnit {
    /// Path relative to the root, before the run.
    pub path: PathBuf,
    /// Text before the run.
    pub original_text: String,
    /// The unit after every successful fix.
    pub unit: SourceUnit,
    /// New location, if a fix moved the unit.
    pub relocation: Option<PathBuf>,
    /// Files generated alongside.
    pub generated: Vec<GeneratedFile>,
    /// One operation per attempted fix.
    pub operations: Vec<Operation>,
    /// Issues whose fix took effect.
    pub fixed: Vec<IssueRef>,
    /// Issues whose fix failed.
    pub failed: Vec<FailedFix>,
}

impl AppliedUnit {
    /// Where the unit is written.
    #[must_use]
    pub fn final_path(&self) -> &std::path::Path {
        self.relocation.as_deref().unwrap_or(&self.path)
    }

    /// Whether any fix took effect.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.unit.text() != self.original_text
            || self.relocation.is_some()
            || !self.generated.is_empty()
    }
}

/// Applies fixes to units.
#[derive(Debug)]
pub struct FixApplier<'a> {
    registry: &'a TransformRegistry,
    conventions: &'a Conventions,
}

impl<'a> FixApplier<'a> {
    /// Creates an applier over `registry`.
    #[must_use]
    pub fn new(registry: &'a TransformRegistry, conventions: &'a Conventions) -> Self {
        Self {
            registry,
            conventions,
        }
    }

    /// Applies `issues` (all located in `analyzed`) in priority order.
    #[must_use]
    pub fn apply(&self, analyzed: &AnalyzedUnit, mut issues: Vec<ValidationIssue>) -> AppliedUnit {
        order_for_unit(&mut issues);
        let mut state = UnitState {
            unit: analyzed.unit.clone(),
            relocation: None,
            generated: Vec::new(),
            ledger: LineLedger::default(),
        };
        let path = &analyzed.relative_path;
        let mut operations = Vec::new();
        let mut fixed = Vec::new();
        let mut failed = Vec::new();

        for issue in issues {
            let Some(fix) = &issue.fix else {
                continue;
            };
            let snapshot = state.clone();
            let outcome = self.apply_one(&mut state, path, &issue, fix);
            let outcome = outcome.and_then(|()| {
                if state.same_as(&snapshot) {
                    Err(FixError::NoChange)
                } else {
                    Ok(())
                }
            });
            match outcome {
                Ok(()) => {
                    state
                        .ledger
                        .record_diff(snapshot.unit.text(), state.unit.text());
                    tracing::debug!(code = %issue.code, file = %path.display(), "fix applied");
                    operations.push(Operation::fix(&issue));
                    fixed.push(IssueRef::from(&issue));
                }
                Err(e) => {
                    tracing::warn!(code = %issue.code, file = %path.display(), error = %e, "fix failed");
                    state = snapshot;
                    operations.push(Operation::fix(&issue).failed(&e));
                    failed.push(FailedFix {
                        issue: IssueRef::from(&issue),
                        error: e.to_string(),
                    });
                }
            }
        }

        if let Some(to) = &state.relocation {
            operations.push(Operation::derived(
                OperationKind::Relocate,
                path.clone(),
                format!("move to {}", to.display()),
            ));
        }
        AppliedUnit {
            path: path.clone(),
            original_text: analyzed.text().to_string(),
            unit: state.unit,
            relocation: state.relocation,
            generated: state.generated,
            operations,
            fixed,
            failed,
        }
    }

    fn apply_one(
        &self,
        state: &mut UnitState,
        path: &std::path::Path,
        issue: &ValidationIssue,
        fix: &FixDescriptor,
    ) -> Result<(), FixError> {
        match fix {
            FixDescriptor::ReplacePattern {
                pattern,
                flags,
                replacement,
            } => {
                let line = issue.location.line;
                let lines = (line > 0).then(|| state.ledger.span(line));
                replace_pattern(&mut state.unit, lines, pattern, flags, replacement)
            }
            // Directive insertions always target the top of the file.
            FixDescriptor::InsertLine { .. } if is_directive_fix(issue) => {
                if state.unit.has_directive(CLIENT_DIRECTIVE) {
                    return Err(FixError::NoChange);
                }
                insert_directive(&mut state.unit).map_err(|e| FixError::transform("insert-line", e))
            }
            FixDescriptor::InsertLine { line, text } => {
                let at = state.ledger.map(*line).ok_or(FixError::StaleLine(*line))?;
                if at > state.unit.line_count() + 1 {
                    return Err(FixError::LineOutOfRange(*line));
                }
                state.unit.insert_line(at, text)?;
                Ok(())
            }
            FixDescriptor::RemoveLine { line } if is_directive_fix(issue) => {
                remove_directive(&mut state.unit, state.ledger.map(*line), *line)
            }
            FixDescriptor::RemoveLine { line } => {
                let at = state.ledger.map(*line).ok_or(FixError::StaleLine(*line))?;
                state
                    .unit
                    .remove_line(at)?
                    .ok_or(FixError::LineOutOfRange(*line))?;
                Ok(())
            }
            FixDescriptor::NamedTransform {
                transformer,
                context,
            } => self.run_transformer(state, path, transformer, context),
            FixDescriptor::Manual { .. } => Err(FixError::Manual),
        }
    }

    fn run_transformer(
        &self,
        state: &mut UnitState,
        path: &std::path::Path,
        id: &str,
        args: &Args,
    ) -> Result<(), FixError> {
        let transformer = self
            .registry
            .get(id)
            .ok_or_else(|| FixError::UnknownTransformer(id.to_string()))?;

        let mut cx = TransformCx::new(&mut state.unit, path.to_path_buf(), self.conventions);
        cx.relocation = state.relocation.take();
        cx.generated = std::mem::take(&mut state.generated);

        let outcome = catch_unwind(AssertUnwindSafe(|| transformer.apply(&mut cx, args)));
        let relocation = cx.relocation.take();
        let generated = std::mem::take(&mut cx.generated);
        state.relocation = relocation;
        state.generated = generated;

        match outcome {
            Ok(result) => result.map_err(|e| FixError::transform(id, e)),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(FixError::Panicked {
                    id: id.to_string(),
                    message,
                })
            }
        }
    }
}

#[derive(Clone)]
struct UnitState {
    unit: SourceUnit,
    relocation: Option<PathBuf>,
    generated: Vec<GeneratedFile>,
    ledger: LineLedger,
}

impl UnitState {
    fn same_as(&self, other: &Self) -> bool {
        self.unit.text() == other.unit.text()
            && self.relocation == other.relocation
            && self.generated == other.generated
    }
}

fn is_directive_fix(issue: &ValidationIssue) -> bool {
    issue.area == RuleArea::Directive
}

/// Runs a pattern fix over `lines` (the issue's current span), or over the
/// whole unit for issues without a line.
fn replace_pattern(
    unit: &mut SourceUnit,
    lines: Option<std::ops::Range<usize>>,
    pattern: &str,
    flags: &str,
    replacement: &str,
) -> Result<(), FixError> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .build()?;
    let range = match lines {
        Some(lines) => {
            let start = unit
                .line_start(lines.start)
                .ok_or(FixError::LineOutOfRange(lines.start))?;
            let end = unit
                .line_range(lines.end - 1)
                .map_or(unit.text().len(), |r| r.end);
            start..end.max(start)
        }
        None => 0..unit.text().len(),
    };
    let region = &unit.text()[range.clone()];
    if !re.is_match(region) {
        return Err(FixError::NoMatch(pattern.to_string()));
    }
    let replaced = if flags.contains('g') {
        re.replace_all(region, replacement)
    } else {
        re.replace(region, replacement)
    }
    .into_owned();
    unit.replace_range(range, &replaced)?;
    Ok(())
}

/// Removes the client directive at `mapped` (the original `line` after
/// earlier edits), or the only client directive when that line moved.
fn remove_directive(
    unit: &mut SourceUnit,
    mapped: Option<usize>,
    line: usize,
) -> Result<(), FixError> {
    let directives: Vec<_> = unit
        .directives()
        .into_iter()
        .filter(|d| d.value == CLIENT_DIRECTIVE)
        .collect();
    let target = directives
        .iter()
        .find(|d| Some(d.line) == mapped)
        .or_else(|| match directives.as_slice() {
            [only] => Some(only),
            _ => None,
        })
        .ok_or(FixError::StaleLine(line))?;

    let range = {
        let node = unit
            .root()
            .descendant_for_byte_range(target.byte_range.start, target.byte_range.end)
            .ok_or(FixError::StaleLine(line))?;
        removal_range(unit, node)
    };
    unit.replace_range(range, "")?;
    // A blank line left at the top of the file goes with the directive.
    if unit.text().starts_with('\n') {
        unit.replace_range(0..1, "")?;
    }
    Ok(())
}
