//! Configuration file lookup.
//!
//! First match wins:
//!
//! 1. `--config PATH`, trusted as given
//! 2. `ui-lint.toml` or `.ui-lint.toml` in the checked directory, then in
//!    each parent up to the package root (the nearest `package.json`)
//! 3. `config.toml` in the global directory (`$UI_LINT_CONFIG_DIR` or
//!    `~/.ui-lint/`)
//! 4. built-in defaults

use std::path::{Path, PathBuf};

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` flag.
    Explicit(PathBuf),
    /// Inside the package.
    Project(PathBuf),
    /// Global directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// The file to load, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Whether the file is the global fallback.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

/// Project config file names, in priority order.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["ui-lint.toml", ".ui-lint.toml"];

const PACKAGE_MANIFEST: &str = "package.json";

/// Resolves the configuration for a run over `target`.
#[must_use]
pub fn resolve(target: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(target, explicit, global_config_dir())
}

/// Takes the global directory as a parameter so tests need no env vars.
fn resolve_inner(target: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    let found = package_dirs(target).into_iter().find_map(|dir| {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    });
    if let Some(path) = found {
        tracing::debug!("Found project config: {}", path.display());
        return ConfigSource::Project(path);
    }

    match global_dir.map(|dir| dir.join("config.toml")) {
        Some(path) if path.is_file() => {
            tracing::debug!("Found global config: {}", path.display());
            ConfigSource::Global(path)
        }
        _ => ConfigSource::Default,
    }
}

/// `target` and its parents up to the nearest directory holding a
/// `package.json`. Without a manifest, only `target` itself.
fn package_dirs(target: &Path) -> Vec<PathBuf> {
    let start = if target.is_file() {
        target.parent().unwrap_or(target)
    } else {
        target
    };
    let mut dirs = Vec::new();
    for dir in start.ancestors() {
        dirs.push(dir.to_path_buf());
        if dir.join(PACKAGE_MANIFEST).is_file() {
            return dirs;
        }
    }
    dirs.truncate(1);
    dirs
}

/// `$UI_LINT_CONFIG_DIR`, else `~/.ui-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("UI_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".ui-lint"))
}
