//! Barrel (re-export manifest) maintenance.
//!
//! A barrel is the `index.ts` of a directory under one of the configured
//! barrel directories. Entries are matched by specifier basename, so
//! `./widget`, `./widget.tsx` and `widget` all name the same module and
//! adding a module twice is a no-op.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ui_lint_core::utils::to_pascal_case;
use ui_lint_core::{is_test_path, Conventions};
use ui_lint_ts::component::extract_component_context;
use ui_lint_ts::{query, Dialect, RouteKind, SourceUnit};

use crate::report::{Operation, OperationKind};
use crate::transform::removal_range;
use crate::write::WriteSet;

const BARREL_NAMES: &[&str] = &["index.ts", "index.tsx", "index.js"];
const SOURCE_EXTENSIONS: &[&str] = &[".tsx", ".ts", ".jsx", ".js", ".mjs", ".cjs", ".mts", ".cts"];

/// `./widget.tsx` → `widget`.
#[must_use]
pub fn specifier_basename(specifier: &str) -> &str {
    let bare = specifier.trim_start_matches("./");
    SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| bare.strip_suffix(ext))
        .unwrap_or(bare)
}

fn module_stem(module: &Path) -> Option<&str> {
    module.file_name()?.to_str().map(specifier_basename)
}

/// Keeps barrels in step with the units a run writes.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    conventions: &'a Conventions,
}

impl<'a> Reconciler<'a> {
    /// Creates a reconciler for `conventions`.
    #[must_use]
    pub fn new(conventions: &'a Conventions) -> Self {
        Self { conventions }
    }

    /// Whether `module` (relative to the root) belongs in a barrel.
    #[must_use]
    pub fn applies_to(&self, module: &Path) -> bool {
        let Some(name) = module.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let in_barrel_dir = module.parent().is_some_and(|dir| {
            dir.components().any(|c| {
                self.conventions
                    .barrel_dirs
                    .iter()
                    .any(|b| c.as_os_str() == b.as_str())
            })
        });
        in_barrel_dir
            && Dialect::from_path(module).is_some()
            && !BARREL_NAMES.contains(&name)
            && !name.starts_with("index.")
            && !name.ends_with(".d.ts")
            && !is_test_path(module)
            && RouteKind::from_path(module).is_none()
    }

    /// Barrel of `dir`: an existing `index.ts`/`index.tsx`/`index.js`, or
    /// `index.ts`.
    #[must_use]
    pub fn barrel_path(&self, dir: &Path, writes: &WriteSet) -> PathBuf {
        BARREL_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| writes.exists(p))
            .unwrap_or_else(|| dir.join(BARREL_NAMES[0]))
    }

    /// Re-export statement for `module`, or `None` if it exports nothing.
    fn entry_for(&self, module: &Path, writes: &WriteSet) -> Option<String> {
        let stem = module_stem(module)?;
        let text = writes.read(module)?;
        let unit = SourceUnit::parse_lenient(module, text).ok()?;
        let exports = extract_component_context(&unit).exports;
        if exports.has_named() {
            Some(format!("export * from \"./{stem}\";"))
        } else if exports.has_default {
            let name = exports
                .default_shape
                .as_ref()
                .and_then(|s| s.name())
                .map_or_else(|| to_pascal_case(stem), ToString::to_string);
            Some(format!("export {{ default as {name} }} from \"./{stem}\";"))
        } else {
            None
        }
    }

    /// Adds `module` to its directory's barrel, creating the barrel if
    /// needed. Returns the operation, or `None` when nothing changed.
    pub fn add_module(&self, module: &Path, writes: &mut WriteSet) -> Option<Operation> {
        if !self.applies_to(module) {
            return None;
        }
        let dir = module.parent()?;
        let stem = module_stem(module)?;
        let barrel = self.barrel_path(dir, writes);
        let existing = writes.read(&barrel);
        let entry = self.entry_for(module, writes)?;
        if let Some(text) = &existing {
            match listed_entry(&barrel, text, stem) {
                // A default re-export of a module that lost its default
                // export is replaced.
                Some(listed) if listed.contains("default") && !entry.contains("default") => {
                    self.remove_module(module, writes);
                    return self.add_module(module, writes).map(|op| {
                        Operation::derived(
                            OperationKind::UpdateBarrel,
                            op.file,
                            format!("update ./{stem}"),
                        )
                    });
                }
                Some(_) => return None,
                None => {}
            }
        }

        let (kind, text) = match existing {
            Some(mut text) => {
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
                text.push_str(&entry);
                text.push('\n');
                (OperationKind::UpdateBarrel, text)
            }
            None => (OperationKind::CreateFile, format!("{entry}\n")),
        };
        tracing::debug!(barrel = %barrel.display(), module = stem, "adding barrel entry");
        writes.stage_derived(&barrel, text);
        Some(Operation::derived(kind, barrel, format!("re-export ./{stem}")))
    }

    /// Drops `module` from its directory's barrel.
    pub fn remove_module(&self, module: &Path, writes: &mut WriteSet) -> Option<Operation> {
        let dir = module.parent()?;
        let stem = module_stem(module)?;
        let barrel = self.barrel_path(dir, writes);
        let text = writes.read(&barrel)?;
        let mut unit = SourceUnit::parse_lenient(&barrel, text).ok()?;

        let ranges: Vec<_> = unit
            .statements()
            .into_iter()
            .filter(|s| {
                export_source(*s, unit.text()).is_some_and(|src| specifier_basename(&src) == stem)
            })
            .map(|s| removal_range(&unit, s))
            .collect();
        if ranges.is_empty() {
            return None;
        }
        for range in ranges.into_iter().rev() {
            unit.replace_range(range, "").ok()?;
        }
        tracing::debug!(barrel = %barrel.display(), module = stem, "removing barrel entry");
        writes.stage_derived(&barrel, unit.into_text());
        Some(Operation::derived(
            OperationKind::UpdateBarrel,
            barrel,
            format!("drop ./{stem}"),
        ))
    }

    /// Adds every module of `dir` (on disk or staged) to its barrel.
    /// Modules that export nothing get no entry, so a directory holding
    /// only such modules gets no barrel.
    pub fn reconcile_directory(&self, dir: &Path, writes: &mut WriteSet) -> Vec<Operation> {
        let mut modules: BTreeSet<PathBuf> = std::fs::read_dir(writes.root().join(dir))
            .into_iter()
            .flatten()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
            .map(|e| dir.join(e.file_name()))
            .filter(|p| writes.exists(p))
            .collect();
        modules.extend(
            writes
                .paths()
                .filter(|p| p.parent() == Some(dir))
                .map(Path::to_path_buf),
        );
        modules
            .iter()
            .filter_map(|m| self.add_module(m, writes))
            .collect()
    }
}

fn export_source(stmt: tree_sitter::Node<'_>, src: &str) -> Option<String> {
    if stmt.kind() != "export_statement" {
        return None;
    }
    stmt.child_by_field_name("source")
        .and_then(|s| query::string_value(s, src))
}

/// The barrel statement re-exporting the module named `stem`.
fn listed_entry(barrel: &Path, text: &str, stem: &str) -> Option<String> {
    let unit = SourceUnit::parse_lenient(barrel, text).ok()?;
    let statement = unit.statements().into_iter().find(|s| {
        export_source(*s, unit.text()).is_some_and(|src| specifier_basename(&src) == stem)
    })?;
    Some(unit.node_text(statement).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (path, text) in files {
            let path = dir.path().join(path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, text).unwrap();
        }
        dir
    }

    #[test]
    fn creates_barrel_for_directory() {
        let dir = project(&[("src/components/widget.tsx", "export function Widget() { return <div />; }\n")]);
        let conventions = Conventions::default();
        let reconciler = Reconciler::new(&conventions);
        let mut writes = WriteSet::new(dir.path());

        let ops = reconciler.reconcile_directory(Path::new("src/components"), &mut writes);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].kind, OperationKind::CreateFile);
        insta::assert_snapshot!(
            writes.read(Path::new("src/components/index.ts")).unwrap(),
            @r###"export * from "./widget";"###
        );
    }

    #[test]
    fn reconciling_twice_adds_nothing() {
        let dir = project(&[
            ("src/components/widget.tsx", "export function Widget() { return <div />; }\n"),
            ("src/components/index.ts", "export * from './widget.tsx';\n"),
            ("src/components/card.tsx", "export default function Card() { return <div />; }\n"),
        ]);
        let conventions = Conventions::default();
        let reconciler = Reconciler::new(&conventions);
        let mut writes = WriteSet::new(dir.path());

        let first = reconciler.reconcile_directory(Path::new("src/components"), &mut writes);
        assert_eq!(first.len(), 1);
        let second = reconciler.reconcile_directory(Path::new("src/components"), &mut writes);
        assert!(second.is_empty());
        insta::assert_snapshot!(writes.read(Path::new("src/components/index.ts")).unwrap(), @r###"
        export * from './widget.tsx';
        export { default as Card } from "./card";
        "###);
    }

    #[test]
    fn moved_module_leaves_old_barrel() {
        let dir = project(&[
            ("src/components/use-thing.ts", "export function useThing() { return useState(1); }\n"),
            ("src/components/index.ts", "export * from \"./use-thing\";\nexport * from \"./button\";\n"),
        ]);
        let conventions = Conventions::default();
        let reconciler = Reconciler::new(&conventions);
        let mut writes = WriteSet::new(dir.path());
        writes
            .stage_unit(
                Path::new("src/components/use-thing.ts"),
                Path::new("src/hooks/use-thing.ts"),
                "export function useThing() { return useState(1); }\n".into(),
            )
            .unwrap();

        assert!(reconciler
            .remove_module(Path::new("src/components/use-thing.ts"), &mut writes)
            .is_some());
        assert!(reconciler
            .add_module(Path::new("src/hooks/use-thing.ts"), &mut writes)
            .is_some());
        assert_eq!(
            writes.read(Path::new("src/components/index.ts")).unwrap(),
            "export * from \"./button\";\n"
        );
        assert_eq!(
            writes.read(Path::new("src/hooks/index.ts")).unwrap(),
            "export * from \"./use-thing\";\n"
        );
    }

    #[test]
    fn stale_default_entry_is_rewritten() {
        let dir = project(&[
            ("src/components/card.tsx", "export function Card() { return <div />; }\n"),
            ("src/components/index.ts", "export { default as Card } from \"./card\";\n"),
        ]);
        let conventions = Conventions::default();
        let reconciler = Reconciler::new(&conventions);
        let mut writes = WriteSet::new(dir.path());
        let op = reconciler
            .add_module(Path::new("src/components/card.tsx"), &mut writes)
            .unwrap();
        assert_eq!(op.kind, OperationKind::UpdateBarrel);
        assert_eq!(
            writes.read(Path::new("src/components/index.ts")).unwrap(),
            "export * from \"./card\";\n"
        );
    }

    #[test]
    fn skips_tests_routes_and_declarations() {
        let conventions = Conventions::default();
        let reconciler = Reconciler::new(&conventions);
        assert!(reconciler.applies_to(Path::new("src/components/card.tsx")));
        assert!(!reconciler.applies_to(Path::new("src/components/card.test.tsx")));
        assert!(!reconciler.applies_to(Path::new("src/components/types.d.ts")));
        assert!(!reconciler.applies_to(Path::new("src/components/index.ts")));
        assert!(!reconciler.applies_to(Path::new("src/app/page.tsx")));
        assert!(!reconciler.applies_to(Path::new("src/features/card.tsx")));
    }
}
