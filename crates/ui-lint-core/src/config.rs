//! Configuration types for ui-lint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::types::{RuleArea, Severity};

/// Contents of `ui-lint.toml`. Every table is optional; unknown top-level
/// keys are rejected so typos do not silently fall back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `recommended`, `strict` or `minimal`.
    pub preset: Option<String>,
    /// Lowest severity that fails `check`; see [`Config::fail_on_severity`].
    pub fail_on: Option<String>,
    /// `[analyzer]`: what to walk.
    pub analyzer: AnalyzerConfig,
    /// `[conventions]`: what the rules check against.
    pub conventions: Conventions,
    /// `[heal]`: defaults for heal runs.
    pub heal: HealConfig,
    /// `[rules.<name>]` tables.
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.heal.max_fix == Some(0) {
            return Err(ConfigError::Invalid {
                key: "heal.max_fix".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }
        self.fail_on_severity()?;
        Ok(())
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets the configuration block of a rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Severity at which `check` fails (default: error).
    ///
    /// # Errors
    ///
    /// Returns an error if `fail_on` names no severity.
    pub fn fail_on_severity(&self) -> Result<Severity, ConfigError> {
        match &self.fail_on {
            None => Ok(Severity::Error),
            Some(s) => s.parse().map_err(|message| ConfigError::Invalid {
                key: "fail_on".to_string(),
                message,
            }),
        }
    }
}

/// File discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Directory to analyze when no path is given.
    pub root: PathBuf,
    /// Extra exclude globs, on top of [`crate::DEFAULT_EXCLUDES`].
    pub exclude: Vec<String>,
    /// Ignore file read from the root (line-oriented globs, `#` comments).
    pub ignore_file: String,
    /// Honour `.gitignore`.
    pub respect_gitignore: bool,
    /// Rayon thread count; the global pool when unset.
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            exclude: Vec::new(),
            ignore_file: ".uilintignore".to_string(),
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

/// Project layout and style conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// Source directory under the root.
    pub source_root: PathBuf,
    /// Directories that must exist under `source_root`.
    pub required_dirs: Vec<String>,
    /// Maximum directory depth below a top-level grouping.
    pub max_depth: usize,
    /// Class-list length above which reorganization is suggested.
    pub max_class_length: usize,
    /// Functions that merge class lists.
    pub merge_helpers: Vec<String>,
    /// Module the default merge helper is imported from.
    pub merge_helper_import: String,
    /// Directory names whose contents are re-exported from a barrel.
    pub barrel_dirs: Vec<String>,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("src"),
            required_dirs: strings(&["components", "hooks", "lib"]),
            max_depth: 2,
            max_class_length: 50,
            merge_helpers: strings(&["cn", "clsx", "twMerge", "classNames", "cva"]),
            merge_helper_import: "@/lib/utils".to_string(),
            barrel_dirs: strings(&["components", "hooks", "lib", "utils"]),
        }
    }
}

impl Conventions {
    /// Primary merge helper name.
    #[must_use]
    pub fn merge_helper(&self) -> &str {
        self.merge_helpers.first().map_or("cn", String::as_str)
    }
}

/// Healing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealConfig {
    /// Upper bound on fixes applied per run.
    pub max_fix: Option<usize>,
    /// Restrict healing to these areas (empty: all).
    pub areas: Vec<RuleArea>,
    /// Maintain barrel files after writes.
    pub reconcile_barrels: bool,
    /// Generate missing component tests.
    pub scaffold_tests: bool,
}

impl Default for HealConfig {
    fn default() -> Self {
        Self {
            max_fix: None,
            areas: Vec::new(),
            reconcile_barrels: true,
            scaffold_tests: false,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// A `[rules.<name>]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// `false` turns the rule off.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Replaces the rule's default severity.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Everything else, read by the rule itself.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Option `key` deserialized as `T`; `None` when absent or mistyped.
    #[must_use]
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.options.get(key)?.clone();
        value.try_into().ok()
    }

    /// Boolean option, or `default`.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get_option(key).unwrap_or(default)
    }

    /// Integer option, or `default`.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_option(key).unwrap_or(default)
    }

    /// String option, or `default`.
    #[must_use]
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.options.get(key) {
            Some(toml::Value::String(s)) => s,
            _ => default,
        }
    }

    /// String-array option; empty when absent or mistyped.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Vec<String> {
        self.get_option(key).unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A value parsed but is out of range.
    #[error("Invalid value for {key}: {message}")]
    Invalid {
        /// Offending key.
        key: String,
        /// What is wrong.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert_eq!(config.analyzer.ignore_file, ".uilintignore");
        assert!(config.rules.is_empty());
        assert_eq!(config.conventions.max_class_length, 50);
        assert_eq!(config.conventions.merge_helper(), "cn");
        assert!(config.heal.reconcile_barrels);
        assert_eq!(config.fail_on_severity().ok(), Some(Severity::Error));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
fail_on = "warning"

[analyzer]
root = "./web"
exclude = ["**/generated/**"]

[conventions]
max_class_length = 80
barrel_dirs = ["components"]

[heal]
max_fix = 5
areas = ["typing", "utility-class"]

[rules.long-class-list]
enabled = true
severity = "warning"
max_length = 60
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.root, PathBuf::from("./web"));
        assert_eq!(config.conventions.max_class_length, 80);
        assert_eq!(config.conventions.source_root, PathBuf::from("src"));
        assert_eq!(config.heal.max_fix, Some(5));
        assert_eq!(
            config.heal.areas,
            vec![RuleArea::Typing, RuleArea::UtilityClass]
        );
        assert_eq!(config.fail_on_severity().ok(), Some(Severity::Warning));
        assert!(config.is_rule_enabled("long-class-list"));
        assert_eq!(
            config.rule_severity("long-class-list"),
            Some(Severity::Warning)
        );

        let rule_config = config.rule_config("long-class-list").unwrap();
        assert_eq!(rule_config.get_int("max_length", 50), 60);
    }

    #[test]
    fn zero_max_fix_is_rejected() {
        let err = Config::parse("[heal]\nmax_fix = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn unknown_fail_on_is_rejected() {
        let err = Config::parse("fail_on = \"fatal\"\n").unwrap_err();
        assert!(err.to_string().contains("fail_on"));
    }

    #[test]
    fn misspelled_table_is_rejected() {
        let err = Config::parse("[analyser]\nroot = \".\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn rule_options_are_typed() {
        let config = Config::parse(
            "[rules.long-class-list]\nmax_length = 60\nallow = [\"prose\"]\nstrict = true\n",
        )
        .unwrap();
        let rule = config.rule_config("long-class-list").unwrap();
        assert_eq!(rule.get_option::<usize>("max_length"), Some(60));
        assert!(rule.get_bool("strict", false));
        assert_eq!(rule.get_str("max_length", "x"), "x");
        assert_eq!(rule.get_str_array("allow"), vec!["prose".to_string()]);
        assert!(rule.get_str_array("missing").is_empty());
    }

    #[test]
    fn disabled_rule_is_reported_disabled() {
        let config = Config::parse("[rules.nesting-depth]\nenabled = false\n").unwrap();
        assert!(!config.is_rule_enabled("nesting-depth"));
        assert!(config.is_rule_enabled("component-naming"));
    }
}
