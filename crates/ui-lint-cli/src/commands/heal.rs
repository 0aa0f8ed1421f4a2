//! Heal command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use ui_lint_core::{Config, RuleArea};
use ui_lint_heal::{ExitStatus, HealOptions, Healer};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Command-line overrides for a heal run.
#[derive(Debug, Clone, Default)]
pub struct HealArgs {
    pub dry_run: bool,
    pub max_fix: Option<usize>,
    pub areas: Vec<RuleArea>,
    pub file: Option<PathBuf>,
    pub no_barrels: bool,
    pub scaffold_tests: bool,
    pub format: OutputFormat,
}

/// `[heal]` config with the command-line flags layered on top.
pub fn options(config: &Config, args: &HealArgs) -> HealOptions {
    let mut options = HealOptions::from_config(&config.heal).dry_run(args.dry_run);
    if args.max_fix.is_some() {
        options = options.max_fix(args.max_fix);
    }
    if !args.areas.is_empty() {
        options = options.areas(args.areas.clone());
    }
    if let Some(file) = &args.file {
        options = options.file(file);
    }
    if args.no_barrels {
        options = options.reconcile_barrels(false);
    }
    if args.scaffold_tests {
        options = options.scaffold_tests(true);
    }
    options
}

/// Runs the heal command.
pub fn run(path: &Path, args: &HealArgs, source: &ConfigSource) -> Result<()> {
    let config = super::load_config(source)?;
    let options = options(&config, args);

    let analyzer = super::analyzer_builder(path, &config, None)?
        .build()
        .context("Failed to build analyzer")?;
    let analysis = analyzer.analyze_units().context("Analysis failed")?;

    tracing::info!(
        issues = analysis.result.issues.len(),
        fixable = analysis.result.fixable_count(),
        "Healing {:?}",
        path
    );

    let report = Healer::new(options, config.conventions.clone()).heal(&analysis);

    super::output::print_heal(&report, args.format)?;

    if report.exit_status() == ExitStatus::Failed {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let config = Config::parse(
            "[heal]\nmax_fix = 10\nareas = [\"typing\"]\nreconcile_barrels = true\n",
        )
        .unwrap();
        let args = HealArgs {
            max_fix: Some(2),
            areas: vec![RuleArea::Directive],
            no_barrels: true,
            scaffold_tests: true,
            dry_run: true,
            ..HealArgs::default()
        };

        let options = options(&config, &args);
        assert_eq!(options.max_fix, Some(2));
        assert_eq!(options.areas, vec![RuleArea::Directive]);
        assert!(!options.reconcile_barrels);
        assert!(options.scaffold_tests);
        assert!(options.dry_run);
    }

    #[test]
    fn config_applies_without_flags() {
        let config = Config::parse("[heal]\nmax_fix = 5\nareas = [\"typing\"]\n").unwrap();

        let options = options(&config, &HealArgs::default());
        assert_eq!(options.max_fix, Some(5));
        assert_eq!(options.areas, vec![RuleArea::Typing]);
        assert!(options.reconcile_barrels);
        assert!(!options.dry_run);
    }
}
