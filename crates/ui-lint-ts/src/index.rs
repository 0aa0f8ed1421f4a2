//! Cross-file identifier lookup.
//!
//! Occurrences are collected per unit (cheap, parallelizable) and merged
//! into an [`IdentifierIndex`] only when a project-level rule asks for it.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::query::text;
use crate::syntax::SourceUnit;

const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
];

/// Identifier occurrences of one unit: name → lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdentifierOccurrences {
    names: BTreeMap<String, Vec<usize>>,
}

impl IdentifierOccurrences {
    /// Collects every identifier and type identifier in `unit`.
    #[must_use]
    pub fn collect(unit: &SourceUnit) -> Self {
        let mut names: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for node in unit.descendants_of_kind(IDENTIFIER_KINDS) {
            names
                .entry(text(node, unit.text()).to_string())
                .or_default()
                .push(node.start_position().row + 1);
        }
        Self { names }
    }

    /// Lines where `name` occurs.
    #[must_use]
    pub fn lines(&self, name: &str) -> &[usize] {
        self.names.get(name).map_or(&[], Vec::as_slice)
    }

    /// Number of occurrences of `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.lines(name).len()
    }
}

/// Project-wide map of identifier → files referencing it.
#[derive(Debug, Default)]
pub struct IdentifierIndex {
    by_name: HashMap<String, BTreeMap<PathBuf, usize>>,
}

impl IdentifierIndex {
    /// Merges per-unit occurrences.
    pub fn build<'a, I>(units: I) -> Self
    where
        I: IntoIterator<Item = (&'a Path, &'a IdentifierOccurrences)>,
    {
        let mut by_name: HashMap<String, BTreeMap<PathBuf, usize>> = HashMap::new();
        for (path, occurrences) in units {
            for (name, lines) in &occurrences.names {
                by_name
                    .entry(name.clone())
                    .or_default()
                    .insert(path.to_path_buf(), lines.len());
            }
        }
        Self { by_name }
    }

    /// Files referencing `name`, sorted.
    #[must_use]
    pub fn files_referencing(&self, name: &str) -> Vec<&Path> {
        self.by_name
            .get(name)
            .map(|files| files.keys().map(PathBuf::as_path).collect())
            .unwrap_or_default()
    }

    /// Total occurrences of `name` across the project.
    #[must_use]
    pub fn occurrence_count(&self, name: &str) -> usize {
        self.by_name
            .get(name)
            .map_or(0, |files| files.values().sum())
    }
}
