//! Routing file conventions derived from a unit's path.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

/// Kind of routing file, if the path names one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteKind {
    /// `app/**/page.tsx`
    Page,
    /// `app/**/layout.tsx`
    Layout,
    /// `app/**/loading.tsx`
    Loading,
    /// `app/**/error.tsx` and `global-error.tsx`
    Error,
    /// `app/**/not-found.tsx`
    NotFound,
    /// `app/**/template.tsx`
    Template,
    /// `app/**/default.tsx`
    Default,
    /// `app/**/route.ts` (request handler, no component)
    Handler,
    /// `pages/**/*.tsx` outside `pages/api`
    LegacyPage,
}

const APP_ROUTE_FILES: &[(&str, RouteKind)] = &[
    ("page", RouteKind::Page),
    ("layout", RouteKind::Layout),
    ("loading", RouteKind::Loading),
    ("error", RouteKind::Error),
    ("global-error", RouteKind::Error),
    ("not-found", RouteKind::NotFound),
    ("template", RouteKind::Template),
    ("default", RouteKind::Default),
    ("route", RouteKind::Handler),
];

impl RouteKind {
    /// Classifies `path` (relative or absolute).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = file_stem(path)?;
        if in_directory(path, "app") {
            return APP_ROUTE_FILES
                .iter()
                .find(|(name, _)| *name == stem)
                .map(|(_, kind)| *kind);
        }
        if in_directory(path, "pages") && !in_directory(path, "api") && !stem.starts_with('_') {
            return Some(Self::LegacyPage);
        }
        None
    }

    /// For an `app/` file whose stem matches a routing file name only
    /// case-insensitively (`Page.tsx`), returns the kind and expected stem.
    #[must_use]
    pub fn misnamed(path: &Path) -> Option<(Self, &'static str)> {
        if !in_directory(path, "app") {
            return None;
        }
        let stem = file_stem(path)?;
        APP_ROUTE_FILES
            .iter()
            .find(|(name, _)| *name != stem && name.eq_ignore_ascii_case(stem))
            .map(|(name, kind)| (*kind, *name))
    }

    /// Whether the framework requires a default export.
    #[must_use]
    pub fn requires_default_export(self) -> bool {
        !matches!(self, Self::Handler)
    }

    /// Whether the framework requires a client boundary.
    #[must_use]
    pub fn requires_client(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Whether this is a page (either router).
    #[must_use]
    pub fn is_page(self) -> bool {
        matches!(self, Self::Page | Self::LegacyPage)
    }
}

fn file_stem(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    Some(name.split('.').next().unwrap_or(name))
}

/// Returns `true` if any parent directory of `path` is named `dir`.
fn in_directory(path: &Path, dir: &str) -> bool {
    path.parent().is_some_and(|parent| {
        parent
            .components()
            .any(|c| matches!(c, Component::Normal(s) if s == dir))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_app_router_files() {
        assert_eq!(
            RouteKind::from_path(Path::new("src/app/dashboard/page.tsx")),
            Some(RouteKind::Page)
        );
        assert_eq!(
            RouteKind::from_path(Path::new("app/layout.tsx")),
            Some(RouteKind::Layout)
        );
        assert_eq!(
            RouteKind::from_path(Path::new("app/api/users/route.ts")),
            Some(RouteKind::Handler)
        );
        assert_eq!(
            RouteKind::from_path(Path::new("app/global-error.tsx")),
            Some(RouteKind::Error)
        );
        assert_eq!(RouteKind::from_path(Path::new("app/widget.tsx")), None);
    }

    #[test]
    fn classifies_pages_router_files() {
        assert_eq!(
            RouteKind::from_path(Path::new("pages/about.tsx")),
            Some(RouteKind::LegacyPage)
        );
        assert_eq!(RouteKind::from_path(Path::new("pages/_app.tsx")), None);
        assert_eq!(RouteKind::from_path(Path::new("pages/api/hello.ts")), None);
    }

    #[test]
    fn components_outside_routing_dirs_are_not_routes() {
        assert_eq!(RouteKind::from_path(Path::new("src/components/page.tsx")), None);
    }

    #[test]
    fn detects_misnamed_route_files() {
        assert_eq!(
            RouteKind::misnamed(Path::new("app/blog/Page.tsx")),
            Some((RouteKind::Page, "page"))
        );
        assert_eq!(RouteKind::misnamed(Path::new("app/blog/page.tsx")), None);
        assert_eq!(RouteKind::misnamed(Path::new("components/Page.tsx")), None);
    }

    #[test]
    fn only_error_files_require_client() {
        assert!(RouteKind::Error.requires_client());
        assert!(!RouteKind::Page.requires_client());
        assert!(!RouteKind::Handler.requires_default_export());
    }
}
