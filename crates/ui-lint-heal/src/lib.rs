//! # ui-lint-heal
//!
//! Applies the fixes attached to ui-lint issues.
//!
//! - [`plan`] selects fixable issues (area, file and count filters)
//! - [`FixApplier`] runs one unit's fixes in memory, in priority order
//! - [`post_validate`] rejects transformed text that no longer parses,
//!   has unbalanced delimiters, or lost top-level declarations
//! - [`WriteSet`] stages writes, detects conflicts and flushes them
//! - [`Reconciler`] keeps directory barrels in step with moved files
//! - [`Healer`] drives all of the above and returns a [`HealingReport`]
//!
//! ## Example
//!
//! ```ignore
//! use ui_lint_core::{Analyzer, Config};
//! use ui_lint_heal::{HealOptions, Healer};
//! use ui_lint_rules::Preset;
//!
//! let config = Config::default();
//! let analysis = Preset::Recommended
//!     .rules(&config)
//!     .apply(Analyzer::builder().root("./web").config(config.clone()))
//!     .build()?
//!     .analyze_units()?;
//!
//! let options = HealOptions::from_config(&config.heal).dry_run(true);
//! let report = Healer::new(options, config.conventions.clone()).heal(&analysis);
//! println!("{} fixes", report.stats.applied);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod apply;
mod engine;
mod error;
mod plan;
mod reconcile;
mod report;
pub mod transform;
mod validate;
mod write;

pub use apply::{AppliedUnit, FixApplier, LineLedger};
pub use engine::Healer;
pub use error::{FixError, TransformError, WriteError};
pub use plan::{order_for_unit, plan, HealOptions, HealPlan, SCAFFOLD_TEST};
pub use reconcile::{specifier_basename, Reconciler};
pub use report::{
    ExitStatus, FailedFix, HealStats, HealingReport, IssueRef, ManualFix, Operation,
    OperationKind, Outcome, RejectedFile, TransformationResult,
};
pub use transform::{TransformRegistry, Transformer};
pub use validate::{post_validate, Finding};
pub use write::{WriteConflict, WriteSet};
