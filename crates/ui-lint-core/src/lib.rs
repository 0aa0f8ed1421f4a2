//! # ui-lint-core
//!
//! Core framework for UI convention linting over tree-sitter contexts.
//!
//! This crate provides the foundational traits and types shared by the
//! rule set, the healer and the CLI:
//!
//! - [`Rule`] trait for per-unit rules over extracted contexts
//! - [`ProjectRule`] trait for project-wide structural rules
//! - [`Analyzer`] for orchestrating parsing and rule execution
//! - [`ValidationIssue`] and [`FixDescriptor`] for findings and their fixes
//! - [`Config`] for `ui-lint.toml`
//!
//! ## Example
//!
//! ```ignore
//! use ui_lint_core::{Analyzer, Severity};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./web")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! println!("{} issues", result.issues.len());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod inventory;
mod rule;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analysis, Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, Conventions, HealConfig, RuleConfig};
pub use context::{is_test_path, AnalyzedUnit, FileContext, ProjectContext, UnitRole};
pub use inventory::{
    relative_to, IgnoreList, Inventory, InventoryError, InventoryOptions, DEFAULT_EXCLUDES,
};
pub use rule::{ProjectRule, ProjectRuleBox, Rule, RuleBox};
pub use types::{
    CheckResult, Confidence, FailureStage, FixDescriptor, IssueDiagnostic, Label, Location,
    RuleArea, Severity, UnitFailure, ValidationIssue,
};
pub use utils::allowance::{AllowCheck, Suppressions};
