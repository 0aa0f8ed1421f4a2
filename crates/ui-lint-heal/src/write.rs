//! Staged writes.
//!
//! Nothing touches disk until [`WriteSet::flush`]. Staged content is
//! visible through [`WriteSet::read`], so barrel reconciliation sees the
//! files the run is about to produce.

use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::error::WriteError;

/// Two writes claimed the same destination; none of them was staged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteConflict {
    /// Contested destination, relative to the root.
    pub path: PathBuf,
    /// Units (original paths) whose writes were skipped.
    pub units: Vec<PathBuf>,
    /// What collided.
    pub reason: String,
}

#[derive(Debug, Clone)]
enum Origin {
    /// The transformed text of a unit.
    Unit(PathBuf),
    /// Derived content such as barrels; later stages replace earlier ones.
    Derived,
    /// A file that must not exist yet.
    Create,
}

#[derive(Debug, Clone)]
struct Staged {
    text: String,
    origin: Origin,
}

/// Writes accumulated by a heal run.
#[derive(Debug)]
pub struct WriteSet {
    root: PathBuf,
    writes: BTreeMap<PathBuf, Staged>,
    removals: BTreeSet<PathBuf>,
    /// Unit origin path to its destination.
    relocations: BTreeMap<PathBuf, PathBuf>,
    /// Renames that differ only in case, done before any write.
    case_renames: Vec<(PathBuf, PathBuf)>,
}

impl WriteSet {
    /// An empty set rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            writes: BTreeMap::new(),
            removals: BTreeSet::new(),
            relocations: BTreeMap::new(),
            case_renames: Vec::new(),
        }
    }

    /// Root the relative paths resolve against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn on_disk(&self, relative: &Path) -> bool {
        self.root.join(relative).exists()
    }

    /// Whether `relative` exists once the set is flushed.
    #[must_use]
    pub fn exists(&self, relative: &Path) -> bool {
        self.writes.contains_key(relative)
            || (!self.removals.contains(relative) && self.on_disk(relative))
    }

    /// Contents of `relative` once the set is flushed.
    #[must_use]
    pub fn read(&self, relative: &Path) -> Option<String> {
        if let Some(staged) = self.writes.get(relative) {
            return Some(staged.text.clone());
        }
        if self.removals.contains(relative) {
            return None;
        }
        std::fs::read_to_string(self.root.join(relative)).ok()
    }

    /// Stages a unit's text at `to`, removing `from` when it moves.
    ///
    /// # Errors
    ///
    /// Returns a [`WriteConflict`] when another unit already targets `to`
    /// (that unit's write is withdrawn as well) or when a move would land
    /// on a file that exists outside this run.
    pub fn stage_unit(
        &mut self,
        from: &Path,
        to: &Path,
        text: String,
    ) -> Result<(), WriteConflict> {
        if let Some(Staged {
            origin: Origin::Unit(other),
            ..
        }) = self.writes.get(to)
        {
            let other = other.clone();
            self.withdraw(&other);
            return Err(WriteConflict {
                path: to.to_path_buf(),
                units: vec![other, from.to_path_buf()],
                reason: "two units write the same file".to_string(),
            });
        }
        // A case-only rename lands on the same file on case-insensitive
        // filesystems.
        let same_file = to
            .to_string_lossy()
            .eq_ignore_ascii_case(&from.to_string_lossy());
        if from != to && !same_file && self.on_disk(to) && !self.relocations.contains_key(to) {
            return Err(WriteConflict {
                path: to.to_path_buf(),
                units: vec![from.to_path_buf()],
                reason: "destination already exists".to_string(),
            });
        }

        self.writes.insert(
            to.to_path_buf(),
            Staged {
                text,
                origin: Origin::Unit(from.to_path_buf()),
            },
        );
        if from != to {
            self.relocations.insert(from.to_path_buf(), to.to_path_buf());
            if same_file {
                self.case_renames.push((from.to_path_buf(), to.to_path_buf()));
            } else if !self.writes.contains_key(from) {
                self.removals.insert(from.to_path_buf());
            }
        }
        self.removals.remove(to);
        Ok(())
    }

    /// Drops everything staged for the unit originally at `from`.
    fn withdraw(&mut self, from: &Path) {
        let to = self
            .relocations
            .remove(from)
            .unwrap_or_else(|| from.to_path_buf());
        self.writes.remove(&to);
        self.removals.remove(from);
        self.case_renames.retain(|(f, _)| f != from);
    }

    /// Stages derived content, replacing earlier derived content.
    pub fn stage_derived(&mut self, path: &Path, text: String) {
        self.removals.remove(path);
        self.writes.insert(
            path.to_path_buf(),
            Staged {
                text,
                origin: Origin::Derived,
            },
        );
    }

    /// Stages a new file. Returns `false` (and stages nothing) when the
    /// path already exists or is already staged.
    pub fn stage_create(&mut self, path: &Path, text: String) -> bool {
        if self.exists(path) {
            return false;
        }
        self.writes.insert(
            path.to_path_buf(),
            Staged {
                text,
                origin: Origin::Create,
            },
        );
        true
    }

    /// Destinations staged so far.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.writes.keys().map(PathBuf::as_path)
    }

    /// Number of files that flushing writes or removes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len() + self.removals.len()
    }

    /// Returns `true` if nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes every staged file in parallel, then removes the old
    /// locations of moved units. Returns the paths written.
    ///
    /// # Errors
    ///
    /// Returns every failure; writes that succeeded stay on disk.
    pub fn flush(self) -> Result<Vec<PathBuf>, Vec<WriteError>> {
        let root = self.root;
        let mut errors = Vec::new();
        for (from, to) in &self.case_renames {
            if let Err(source) = retry(|| std::fs::rename(root.join(from), root.join(to))) {
                errors.push(WriteError::Io {
                    op: "rename",
                    path: root.join(from),
                    source,
                });
            }
        }

        let outcomes: Vec<Result<PathBuf, WriteError>> = self
            .writes
            .into_par_iter()
            .map(|(relative, staged)| {
                write_file(&root.join(&relative), &staged.text).map(|()| relative)
            })
            .collect();

        let mut written = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(path) => written.push(path),
                Err(e) => errors.push(e),
            }
        }

        // Only remove an old location once its replacement is on disk.
        for from in self.removals {
            let moved_ok = self
                .relocations
                .get(&from)
                .map_or(true, |to| written.contains(to));
            if !moved_ok {
                continue;
            }
            let path = root.join(&from);
            if let Err(source) = retry(|| std::fs::remove_file(&path)) {
                if source.kind() != ErrorKind::NotFound {
                    errors.push(WriteError::Io {
                        op: "remove",
                        path,
                        source,
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(written)
        } else {
            Err(errors)
        }
    }
}

fn is_transient(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
    )
}

/// Runs `op`, retrying once on a transient error.
fn retry<T>(mut op: impl FnMut() -> std::io::Result<T>) -> std::io::Result<T> {
    match op() {
        Err(e) if is_transient(&e) => {
            tracing::debug!(error = %e, "retrying transient I/O failure");
            op()
        }
        other => other,
    }
}

fn write_file(path: &Path, text: &str) -> Result<(), WriteError> {
    if let Some(parent) = path.parent() {
        retry(|| std::fs::create_dir_all(parent)).map_err(|source| WriteError::Io {
            op: "create directory for",
            path: path.to_path_buf(),
            source,
        })?;
    }
    retry(|| std::fs::write(path, text)).map_err(|source| WriteError::Io {
        op: "write",
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn overlay_reads_staged_text() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.ts"), "old").unwrap();
        let mut set = WriteSet::new(dir.path());
        assert_eq!(set.read(Path::new("a.ts")).as_deref(), Some("old"));

        set.stage_unit(Path::new("a.ts"), Path::new("b.ts"), "new".into())
            .unwrap();
        assert_eq!(set.read(Path::new("a.ts")), None);
        assert_eq!(set.read(Path::new("b.ts")).as_deref(), Some("new"));
        assert!(!set.exists(Path::new("a.ts")));
    }

    #[test]
    fn colliding_units_are_both_withdrawn() {
        let dir = TempDir::new().unwrap();
        let mut set = WriteSet::new(dir.path());
        set.stage_unit(Path::new("A.tsx"), Path::new("a.tsx"), "1".into())
            .unwrap();
        let conflict = set
            .stage_unit(Path::new("src/a.tsx"), Path::new("a.tsx"), "2".into())
            .unwrap_err();
        assert_eq!(conflict.units.len(), 2);
        assert!(set.is_empty());
    }

    #[test]
    fn move_onto_existing_file_conflicts() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("taken.ts"), "x").unwrap();
        let mut set = WriteSet::new(dir.path());
        assert!(set
            .stage_unit(Path::new("other.ts"), Path::new("taken.ts"), "y".into())
            .is_err());
    }

    #[test]
    fn flush_moves_files_and_never_overwrites_creations() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/Card.tsx"), "old").unwrap();
        std::fs::write(dir.path().join("src/keep.test.tsx"), "mine").unwrap();

        let mut set = WriteSet::new(dir.path());
        set.stage_unit(Path::new("src/Card.tsx"), Path::new("src/ui/card.tsx"), "new".into())
            .unwrap();
        assert!(!set.stage_create(Path::new("src/keep.test.tsx"), "generated".into()));
        assert!(set.stage_create(Path::new("src/ui/card.test.tsx"), "t".into()));

        let mut written = set.flush().unwrap();
        written.sort();
        assert_eq!(
            written,
            vec![PathBuf::from("src/ui/card.test.tsx"), PathBuf::from("src/ui/card.tsx")]
        );
        assert!(!dir.path().join("src/Card.tsx").exists());
        assert_eq!(std::fs::read_to_string(dir.path().join("src/keep.test.tsx")).unwrap(), "mine");
    }
}
