//! Sub-command implementations.

pub mod check;
pub mod heal;
pub mod init;
pub mod list_rules;
pub mod output;

use anyhow::{Context, Result};
use std::path::Path;
use ui_lint_core::{Analyzer, AnalyzerBuilder, Config};
use ui_lint_rules::{rules_by_name, Preset};

use crate::config_resolver::ConfigSource;

/// Loads the resolved configuration, or defaults.
pub fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(p) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", p.display());
    }
    Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
}

/// Analyzer builder for `path` with the configured preset, or only the
/// rules named in `filter` (comma-separated names or codes).
pub fn analyzer_builder(path: &Path, config: &Config, filter: Option<&str>) -> Result<AnalyzerBuilder> {
    let rules = match filter {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            rules_by_name(&names, config)
        }
        None => {
            let preset: Preset = config
                .preset
                .as_deref()
                .map(str::parse)
                .transpose()
                .map_err(anyhow::Error::msg)
                .context("Invalid preset in config")?
                .unwrap_or_default();
            preset.rules(config)
        }
    };
    tracing::debug!(rules = ?rules.names(), "Selected rules");
    Ok(rules.apply(Analyzer::builder().root(path).config(config.clone())))
}
