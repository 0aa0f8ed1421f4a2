//! Core analyzer for orchestrating rule execution.
//!
//! Parse → extract → validate runs per unit on a rayon pool; results are
//! collected in inventory order. Project rules run after that barrier.

use crate::config::{Config, RuleConfig};
use crate::context::{AnalyzedUnit, FileContext, ProjectContext};
use crate::inventory::{relative_to, IgnoreList, Inventory, InventoryError, InventoryOptions};
use crate::rule::{ProjectRule, ProjectRuleBox, Rule, RuleBox};
use crate::types::{CheckResult, FailureStage, Severity, UnitFailure, ValidationIssue};
use crate::utils::allowance::Suppressions;

use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use ui_lint_ts::SourceUnit;

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error resolving the root.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A unit failed to parse and `fail_on_parse_error` is set.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// File discovery failed.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    project_rules: Vec<ProjectRuleBox>,
    exclude_patterns: Vec<String>,
    files: Option<Vec<PathBuf>>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a per-unit rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed per-unit rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds a project-wide rule to the analyzer.
    #[must_use]
    pub fn project_rule<R: ProjectRule + 'static>(mut self, rule: R) -> Self {
        self.project_rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed project-wide rule to the analyzer.
    #[must_use]
    pub fn project_rule_box(mut self, rule: ProjectRuleBox) -> Self {
        self.project_rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Analyzes exactly these files instead of walking the root.
    #[must_use]
    pub fn files<I>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.files = Some(files.into_iter().collect());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved, the
    /// ignore file cannot be read, or an exclude pattern is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut ignore = IgnoreList::with_defaults();
        let ignore_file = root.join(&config.analyzer.ignore_file);
        if ignore_file.is_file() {
            let text = std::fs::read_to_string(&ignore_file).map_err(|source| {
                InventoryError::IgnoreFile {
                    path: ignore_file.clone(),
                    source,
                }
            })?;
            ignore.add_lines(&text)?;
            debug!("Loaded ignore file: {}", ignore_file.display());
        }
        for pattern in config.analyzer.exclude.iter().chain(&self.exclude_patterns) {
            ignore.add(pattern)?;
        }

        Ok(Analyzer {
            inventory_options: InventoryOptions {
                ignore,
                respect_gitignore: config.analyzer.respect_gitignore,
            },
            root,
            rules: self.rules,
            project_rules: self.project_rules,
            files: self.files,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// Everything one analysis run produced.
#[derive(Debug)]
pub struct Analysis {
    /// Issues and failures.
    pub result: CheckResult,
    /// Parsed units, in inventory order.
    pub units: Vec<AnalyzedUnit>,
    /// Absolute project root.
    pub root: PathBuf,
}

enum FileOutcome {
    Analyzed(Box<AnalyzedUnit>, Vec<ValidationIssue>, Vec<UnitFailure>),
    Failed(UnitFailure),
}

/// The main analyzer that orchestrates rule execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    project_rules: Vec<ProjectRuleBox>,
    inventory_options: InventoryOptions,
    files: Option<Vec<PathBuf>>,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len() + self.project_rules.len()
    }

    /// Gets the rule configuration for a specific rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.config.rules.get(rule_name)
    }

    /// Enumerates the files this analyzer would check.
    ///
    /// # Errors
    ///
    /// Returns an error if the walk fails.
    pub fn inventory(&self) -> Result<Inventory, AnalyzerError> {
        match &self.files {
            Some(files) => Ok(Inventory::from_files(&self.root, files.iter().cloned())),
            None => Ok(Inventory::discover(&self.root, &self.inventory_options)?),
        }
    }

    /// Analyzes all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, or a unit fails to parse
    /// with `fail_on_parse_error` set.
    pub fn analyze(&self) -> Result<CheckResult, AnalyzerError> {
        self.analyze_units().map(|analysis| analysis.result)
    }

    /// Analyzes all files, keeping the parsed units for healing.
    ///
    /// # Errors
    ///
    /// See [`Analyzer::analyze`].
    pub fn analyze_units(&self) -> Result<Analysis, AnalyzerError> {
        info!("Starting analysis at {}", self.root.display());

        let inventory = self.inventory()?;
        info!("Found {} files to analyze", inventory.len());

        let outcomes: Vec<FileOutcome> = self.run_pooled(|| {
            inventory
                .files()
                .par_iter()
                .map(|path| self.process_file(path))
                .collect()
        })?;

        let mut result = CheckResult::new();
        let mut units = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                FileOutcome::Analyzed(unit, issues, failures) => {
                    result.issues.extend(issues);
                    result.failures.extend(failures);
                    result.files_checked += 1;
                    units.push(*unit);
                }
                FileOutcome::Failed(failure) => {
                    warn!("Skipping {}: {}", failure.file.display(), failure.message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse {
                            path: failure.file,
                            message: failure.message,
                        });
                    }
                    result.failures.push(failure);
                }
            }
        }

        let (issues, failures) = self.check_project(&units, inventory.relative_files());
        result.issues.extend(issues);
        result.failures.extend(failures);

        // Stable: rule order is kept for issues at the same position.
        result.issues.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });

        info!(
            "Analysis complete: {} issues in {} files ({} failed)",
            result.issues.len(),
            result.files_checked,
            result.failures.len()
        );

        Ok(Analysis {
            result,
            units,
            root: self.root.clone(),
        })
    }

    fn run_pooled<T, F>(&self, work: F) -> Result<T, AnalyzerError>
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        match self.config.analyzer.parallelism {
            Some(threads) if threads > 0 => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| AnalyzerError::ThreadPool(e.to_string()))?;
                Ok(pool.install(work))
            }
            _ => Ok(work()),
        }
    }

    fn process_file(&self, path: &Path) -> FileOutcome {
        debug!("Analyzing: {}", path.display());
        match SourceUnit::load(path) {
            Ok(unit) => {
                let analyzed = AnalyzedUnit::new(unit, &self.root);
                let (issues, failures) = self.check_unit(&analyzed);
                FileOutcome::Analyzed(Box::new(analyzed), issues, failures)
            }
            Err(e) => FileOutcome::Failed(UnitFailure {
                file: relative_to(&self.root, path),
                stage: FailureStage::Parse,
                rule: None,
                message: e.to_string(),
            }),
        }
    }

    /// Runs every enabled per-unit rule on `unit`. A panicking rule is
    /// recorded as a failure and the remaining rules still run.
    #[must_use]
    pub fn check_unit(&self, unit: &AnalyzedUnit) -> (Vec<ValidationIssue>, Vec<UnitFailure>) {
        let ctx = FileContext::new(unit, &self.config.conventions);
        let suppressions = Suppressions::scan(unit.text());
        let mut issues = Vec::new();
        let mut failures = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            match panic::catch_unwind(AssertUnwindSafe(|| rule.check(&ctx, unit))) {
                Ok(found) => {
                    let found = apply_allowances(
                        found,
                        &suppressions,
                        rule.requires_allow_reason(),
                    );
                    issues.extend(self.apply_severity_override(rule.name(), found));
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(
                        "Rule {} failed on {}: {}",
                        rule.name(),
                        unit.relative_path.display(),
                        message
                    );
                    failures.push(UnitFailure {
                        file: unit.relative_path.clone(),
                        stage: FailureStage::Rule,
                        rule: Some(rule.name().to_string()),
                        message,
                    });
                }
            }
        }

        (issues, failures)
    }

    fn check_project(
        &self,
        units: &[AnalyzedUnit],
        source_files: Vec<PathBuf>,
    ) -> (Vec<ValidationIssue>, Vec<UnitFailure>) {
        let ctx = ProjectContext::new(&self.root, &self.config.conventions, units)
            .with_source_files(source_files);
        let mut issues = Vec::new();
        let mut failures = Vec::new();

        for rule in &self.project_rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            match panic::catch_unwind(AssertUnwindSafe(|| rule.check_project(&ctx))) {
                Ok(found) => {
                    let found: Vec<ValidationIssue> = found
                        .into_iter()
                        .filter(|issue| {
                            ctx.unit(&issue.location.file).map_or(true, |u| {
                                !Suppressions::scan(u.text())
                                    .check(issue.location.line, &issue.rule, &issue.code)
                                    .is_allowed()
                            })
                        })
                        .collect();
                    issues.extend(self.apply_severity_override(rule.name(), found));
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!("Project rule {} failed: {}", rule.name(), message);
                    failures.push(UnitFailure {
                        file: PathBuf::from("."),
                        stage: FailureStage::Rule,
                        rule: Some(rule.name().to_string()),
                        message,
                    });
                }
            }
        }

        (issues, failures)
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut issues: Vec<ValidationIssue>,
    ) -> Vec<ValidationIssue> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for issue in &mut issues {
                issue.severity = severity;
            }
        }
        issues
    }
}

/// Drops issues suppressed by an allow comment. A suppression without the
/// required reason is replaced by a warning about the missing reason.
fn apply_allowances(
    issues: Vec<ValidationIssue>,
    suppressions: &Suppressions,
    requires_reason: bool,
) -> Vec<ValidationIssue> {
    if suppressions.is_empty() {
        return issues;
    }
    issues
        .into_iter()
        .filter_map(|issue| {
            let allow = suppressions.check(issue.location.line, &issue.rule, &issue.code);
            if !allow.is_allowed() {
                return Some(issue);
            }
            if requires_reason && allow.reason().is_none() {
                let message = format!(
                    "Allow directive for '{}' is missing required reason",
                    issue.rule
                );
                return Some(ValidationIssue::new(
                    issue.code,
                    issue.rule,
                    Severity::Warning,
                    issue.area,
                    issue.location,
                    message,
                ));
            }
            None
        })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "rule panicked".to_string())
}
