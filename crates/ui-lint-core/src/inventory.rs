//! Source file inventory.
//!
//! Walks the project root with [`ignore::WalkBuilder`] (optionally honouring
//! `.gitignore`) and filters the result through an [`IgnoreList`]: the
//! built-in excludes, the project's ignore file, and configured globs.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::debug;
use ui_lint_ts::Dialect;

/// Directories never analyzed.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "node_modules",
    ".next",
    "dist",
    "build",
    "out",
    "coverage",
    ".git",
    ".turbo",
    ".vercel",
];

/// Errors while enumerating files.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// The root does not exist or is not a directory.
    #[error("root directory not found: {}", path.display())]
    MissingRoot {
        /// Requested root.
        path: PathBuf,
    },
    /// An ignore pattern is not a valid glob.
    #[error("invalid ignore pattern '{pattern}': {source}")]
    Pattern {
        /// Offending pattern.
        pattern: String,
        /// Glob error.
        source: glob::PatternError,
    },
    /// Reading the ignore file failed.
    #[error("failed to read ignore file {}: {source}", path.display())]
    IgnoreFile {
        /// Ignore file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The directory walk failed.
    #[error("walk failed: {0}")]
    Walk(#[from] ignore::Error),
}

#[derive(Debug, Clone)]
struct IgnorePattern {
    raw: String,
    pattern: Pattern,
    /// No `/` in the pattern: matched against each path component.
    component_only: bool,
}

/// Line-oriented glob ignore list.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreList {
    /// The built-in excludes.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut list = Self::default();
        for name in DEFAULT_EXCLUDES {
            // Plain names are always valid globs.
            let _ = list.add(name);
        }
        list
    }

    /// Adds the patterns of an ignore file: one glob per line, `#` starts a
    /// comment, blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error on the first invalid pattern.
    pub fn add_lines(&mut self, text: &str) -> Result<(), InventoryError> {
        for line in text.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if !line.is_empty() {
                self.add(line)?;
            }
        }
        Ok(())
    }

    /// Adds one glob.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a valid glob.
    pub fn add(&mut self, raw: &str) -> Result<(), InventoryError> {
        let trimmed = raw.trim().trim_start_matches("./").trim_end_matches('/');
        let pattern = Pattern::new(trimmed).map_err(|source| InventoryError::Pattern {
            pattern: raw.to_string(),
            source,
        })?;
        self.patterns.push(IgnorePattern {
            raw: raw.to_string(),
            pattern,
            component_only: !trimmed.contains('/'),
        });
        Ok(())
    }

    /// Number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether `relative` (to the root) is ignored.
    #[must_use]
    pub fn is_ignored(&self, relative: &Path) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        let path_str = relative.to_string_lossy().replace('\\', "/");

        self.patterns.iter().any(|p| {
            if p.component_only {
                relative.components().any(|c| match c {
                    Component::Normal(s) => p.pattern.matches_with(&s.to_string_lossy(), options),
                    _ => false,
                })
            } else {
                p.pattern.matches_with(&path_str, options)
                    || ancestors_match(&p.pattern, &path_str, options)
            }
        })
    }

    /// Raw patterns, in insertion order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.raw.as_str())
    }
}

/// `src/generated` also ignores everything below it.
fn ancestors_match(pattern: &Pattern, path: &str, options: MatchOptions) -> bool {
    path.match_indices('/')
        .any(|(i, _)| pattern.matches_with(&path[..i], options))
}

/// Options for [`Inventory::discover`].
#[derive(Debug, Clone)]
pub struct InventoryOptions {
    /// Ignore list applied to relative paths.
    pub ignore: IgnoreList,
    /// Honour `.gitignore` files.
    pub respect_gitignore: bool,
}

impl Default for InventoryOptions {
    fn default() -> Self {
        Self {
            ignore: IgnoreList::with_defaults(),
            respect_gitignore: true,
        }
    }
}

/// Files to analyze, sorted.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl Inventory {
    /// Enumerates source files under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is missing or the walk fails.
    pub fn discover(root: &Path, options: &InventoryOptions) -> Result<Self, InventoryError> {
        if !root.is_dir() {
            return Err(InventoryError::MissingRoot {
                path: root.to_path_buf(),
            });
        }

        let mut builder = ignore::WalkBuilder::new(root);
        builder
            .hidden(false)
            .git_ignore(options.respect_gitignore)
            .git_exclude(options.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || Dialect::from_path(path).is_none() {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(path);
            if options.ignore.is_ignored(relative) {
                debug!("Excluding: {}", relative.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(Self {
            root: root.to_path_buf(),
            files,
        })
    }

    /// Builds an inventory from explicit paths (relative paths are joined
    /// onto `root`).
    #[must_use]
    pub fn from_files(root: &Path, files: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut files: Vec<PathBuf> = files
            .into_iter()
            .map(|f| if f.is_absolute() { f } else { root.join(f) })
            .collect();
        files.sort();
        files.dedup();
        Self {
            root: root.to_path_buf(),
            files,
        }
    }

    /// Project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute file paths.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Paths relative to the root.
    #[must_use]
    pub fn relative_files(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .map(|f| relative_to(&self.root, f))
            .collect()
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// `path` relative to `root`, or `path` itself when outside it.
#[must_use]
pub fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export {};\n").unwrap();
    }

    #[test]
    fn default_excludes_skip_dependency_and_build_dirs() {
        let list = IgnoreList::with_defaults();
        assert!(list.is_ignored(Path::new("node_modules/react/index.js")));
        assert!(list.is_ignored(Path::new("web/.next/server/page.js")));
        assert!(!list.is_ignored(Path::new("src/components/button.tsx")));
    }

    #[test]
    fn ignore_file_lines_are_globs_with_comments() {
        let mut list = IgnoreList::default();
        list.add_lines("# generated code\nsrc/generated\n\n**/*.stories.tsx  # storybook\n")
            .unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.is_ignored(Path::new("src/generated/api.ts")));
        assert!(list.is_ignored(Path::new("src/components/button.stories.tsx")));
        assert!(!list.is_ignored(Path::new("src/components/button.tsx")));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let mut list = IgnoreList::default();
        assert!(matches!(
            list.add("src/[oops"),
            Err(InventoryError::Pattern { .. })
        ));
    }

    #[test]
    fn discovers_sorted_source_files() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "src/components/widget.tsx");
        touch(tmp.path(), "src/lib/utils.ts");
        touch(tmp.path(), "node_modules/pkg/index.js");
        fs::write(tmp.path().join("README.md"), "# readme").unwrap();

        let inventory = Inventory::discover(tmp.path(), &InventoryOptions::default()).unwrap();
        assert_eq!(
            inventory.relative_files(),
            vec![
                PathBuf::from("src/components/widget.tsx"),
                PathBuf::from("src/lib/utils.ts"),
            ]
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = Inventory::discover(Path::new("/definitely/not/here"), &InventoryOptions::default())
            .unwrap_err();
        assert!(matches!(err, InventoryError::MissingRoot { .. }));
    }
}
