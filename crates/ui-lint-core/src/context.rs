//! Context types for rule execution.

use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use serde::Serialize;
use ui_lint_ts::{
    extract_component_context, extract_hook_context, ComponentContext, HookContext,
    IdentifierIndex, IdentifierOccurrences, RouteKind, SourceUnit,
};

use crate::config::Conventions;
use crate::inventory::relative_to;

/// What a unit is, by path and content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitRole {
    /// Renders UI.
    Component,
    /// Declares a custom hook.
    Hook,
    /// Test or story file.
    Test,
    /// Type declarations only.
    Type,
    /// Framework routing file.
    Route,
    /// Anything else.
    Util,
}

impl UnitRole {
    /// Classifies a unit. Path conventions (tests, declaration files,
    /// routes) win over content.
    #[must_use]
    pub fn classify(
        relative: &Path,
        component: &ComponentContext,
        hook: Option<&HookContext>,
    ) -> Self {
        if is_test_path(relative) {
            Self::Test
        } else if is_type_path(relative) {
            Self::Type
        } else if component.route.is_some() {
            Self::Route
        } else if component.is_component() {
            Self::Component
        } else if hook.is_some() {
            Self::Hook
        } else if component.declared_types.len() == component.top_level_declarations
            && component.top_level_declarations > 0
        {
            Self::Type
        } else {
            Self::Util
        }
    }
}

/// Returns `true` for `*.test.*`, `*.spec.*`, `*.stories.*` and files under
/// `__tests__`.
#[must_use]
pub fn is_test_path(path: &Path) -> bool {
    let in_tests_dir = path
        .components()
        .any(|c| matches!(c, Component::Normal(s) if s == "__tests__"));
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    in_tests_dir
        || [".test.", ".spec.", ".stories."]
            .iter()
            .any(|marker| name.contains(marker))
}

fn is_type_path(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.ends_with(".d.ts")
        || name.starts_with("types.")
        || path
            .parent()
            .is_some_and(|p| p.file_name().is_some_and(|n| n == "types"))
}

/// A parsed unit with everything rules read from it.
#[derive(Debug, Clone)]
pub struct AnalyzedUnit {
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    /// Classified role.
    pub role: UnitRole,
    /// Parsed source.
    pub unit: SourceUnit,
    /// Component fingerprint.
    pub component: ComponentContext,
    /// Hook fingerprint, for hook-shaped units.
    pub hook: Option<HookContext>,
    /// Identifier occurrences for the project index.
    pub occurrences: IdentifierOccurrences,
}

impl AnalyzedUnit {
    /// Extracts contexts from a parsed unit.
    #[must_use]
    pub fn new(unit: SourceUnit, root: &Path) -> Self {
        let relative_path = relative_to(root, unit.path());
        // Contexts see the relative path so route and directory conventions
        // do not depend on where the project lives.
        let mut component = extract_component_context(&unit);
        component.path.clone_from(&relative_path);
        component.route = RouteKind::from_path(&relative_path);
        component.is_page = component.route.is_some_and(RouteKind::is_page);
        let hook = extract_hook_context(&unit, &component);
        let role = UnitRole::classify(&relative_path, &component, hook.as_ref());
        let occurrences = IdentifierOccurrences::collect(&unit);
        Self {
            relative_path,
            role,
            unit,
            component,
            hook,
            occurrences,
        }
    }

    /// Absolute path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.unit.path()
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.unit.text()
    }
}

/// Context provided to per-file rules.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// Path relative to the project root.
    pub relative_path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Unit role.
    pub role: UnitRole,
    /// Whether this file is a test file.
    pub is_test: bool,
    /// Project conventions.
    pub conventions: &'a Conventions,
}

impl<'a> FileContext<'a> {
    /// Creates a file context for an analyzed unit.
    #[must_use]
    pub fn new(unit: &'a AnalyzedUnit, conventions: &'a Conventions) -> Self {
        Self {
            path: unit.path(),
            relative_path: &unit.relative_path,
            content: unit.text(),
            role: unit.role,
            is_test: unit.role == UnitRole::Test,
            conventions,
        }
    }

    /// Calculates byte offset for a given line and column (1-indexed), or
    /// the end of the content if out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.lines().enumerate() {
            if i + 1 == line {
                return offset + column.saturating_sub(1);
            }
            offset += line_content.len() + 1;
        }

        offset
    }
}

/// Context provided to project-wide rules.
#[derive(Debug)]
pub struct ProjectContext<'a> {
    /// Root directory of the project.
    pub root: &'a Path,
    /// Project conventions.
    pub conventions: &'a Conventions,
    /// Every successfully parsed unit, in inventory order.
    pub units: &'a [AnalyzedUnit],
    /// Every inventoried file relative to the root, parsed or not.
    pub source_files: Vec<PathBuf>,
    index: OnceLock<IdentifierIndex>,
}

impl<'a> ProjectContext<'a> {
    /// Creates a new project context.
    #[must_use]
    pub fn new(root: &'a Path, conventions: &'a Conventions, units: &'a [AnalyzedUnit]) -> Self {
        Self {
            root,
            conventions,
            units,
            source_files: units.iter().map(|u| u.relative_path.clone()).collect(),
            index: OnceLock::new(),
        }
    }

    /// Sets the list of source files.
    #[must_use]
    pub fn with_source_files(mut self, files: Vec<PathBuf>) -> Self {
        self.source_files = files;
        self
    }

    /// Units with `role`.
    pub fn units_with_role(&self, role: UnitRole) -> impl Iterator<Item = &'a AnalyzedUnit> {
        self.units.iter().filter(move |u| u.role == role)
    }

    /// Unit at `relative` path.
    #[must_use]
    pub fn unit(&self, relative: &Path) -> Option<&'a AnalyzedUnit> {
        self.units.iter().find(|u| u.relative_path == relative)
    }

    /// Project-wide identifier index, built on first use.
    pub fn identifier_index(&self) -> &IdentifierIndex {
        self.index.get_or_init(|| {
            tracing::debug!("Building identifier index over {} units", self.units.len());
            IdentifierIndex::build(
                self.units
                    .iter()
                    .map(|u| (u.relative_path.as_path(), &u.occurrences)),
            )
        })
    }

    /// The configured source root, absolute.
    #[must_use]
    pub fn source_root(&self) -> PathBuf {
        self.root.join(&self.conventions.source_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzed(rel: &str, src: &str) -> AnalyzedUnit {
        let root = Path::new("/project");
        let unit = SourceUnit::parse(root.join(rel), src).unwrap();
        AnalyzedUnit::new(unit, root)
    }

    #[test]
    fn test_detect_test_file() {
        assert!(is_test_path(Path::new("src/components/button.test.tsx")));
        assert!(is_test_path(Path::new("src/__tests__/button.tsx")));
        assert!(is_test_path(Path::new("src/components/button.stories.tsx")));
        assert!(!is_test_path(Path::new("src/components/button.tsx")));
    }

    #[test]
    fn classifies_roles() {
        assert_eq!(
            analyzed("src/components/card.tsx", "export const Card = () => <div />;\n").role,
            UnitRole::Component
        );
        assert_eq!(
            analyzed(
                "src/hooks/use-x.ts",
                "export function useX() { return useState(0); }\n"
            )
            .role,
            UnitRole::Hook
        );
        assert_eq!(
            analyzed("src/app/page.tsx", "export default function P() { return <main />; }\n").role,
            UnitRole::Route
        );
        assert_eq!(
            analyzed("src/types/user.ts", "export interface User { id: string }\n").role,
            UnitRole::Type
        );
        assert_eq!(
            analyzed("src/lib/math.ts", "export const add = (a: number, b: number) => a + b;\n")
                .role,
            UnitRole::Util
        );
    }

    #[test]
    fn contexts_use_relative_paths() {
        let u = analyzed("app/page.tsx", "export default function P() { return <main />; }\n");
        assert_eq!(u.relative_path, PathBuf::from("app/page.tsx"));
        assert_eq!(u.component.path, PathBuf::from("app/page.tsx"));
        assert!(u.component.is_page);
    }

    #[test]
    fn identifier_index_is_built_once() {
        let units = vec![
            analyzed("src/a.tsx", "export interface CardProps {}\n"),
            analyzed("src/b.tsx", "import { CardProps } from './a';\n"),
        ];
        let conventions = Conventions::default();
        let ctx = ProjectContext::new(Path::new("/project"), &conventions, &units);
        let first: *const IdentifierIndex = ctx.identifier_index();
        let second: *const IdentifierIndex = ctx.identifier_index();
        assert_eq!(first, second);
        assert_eq!(ctx.identifier_index().files_referencing("CardProps").len(), 2);
    }

    #[test]
    fn test_offset_calculation() {
        let u = analyzed("src/x.ts", "const a = 1;\nconst b = 2;\n");
        let conventions = Conventions::default();
        let ctx = FileContext::new(&u, &conventions);
        assert_eq!(ctx.offset_for(1, 1), 0);
        assert_eq!(ctx.offset_for(2, 1), 13);
        assert_eq!(ctx.offset_for(2, 7), 19);
    }
}
