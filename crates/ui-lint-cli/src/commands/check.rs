//! Check command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = super::load_config(source)?;
    let fail_on = config.fail_on_severity().context("Invalid config")?;

    let analyzer = super::analyzer_builder(path, &config, rules_filter.as_deref())?
        .excludes(exclude)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, analyzer.root(), format)?;

    if result.has_issues_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}
