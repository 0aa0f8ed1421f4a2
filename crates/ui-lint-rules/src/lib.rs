//! # ui-lint-rules
//!
//! Built-in convention rules for React/TSX projects.
//!
//! ## Available Rules
//!
//! | Code | Name | Area | Description |
//! |------|------|------|-------------|
//! | UL001-UL003 | `client-directive` | directive | `"use client"` present exactly when client-only constructs are |
//! | UL010 | `conditional-hook` | component-api | Hooks called inside conditions, loops or callbacks |
//! | UL011 | `hook-naming` | component-api | Custom hooks must be named `useX` |
//! | UL012 | `hook-return` | component-api | Custom hooks should return a value |
//! | UL013 | `prefer-destructured-props` | component-api | Destructure props in the signature |
//! | UL020 | `component-naming` | component-api | Components must be `PascalCase` |
//! | UL030 | `prefer-named-export` | component-api | Default export without named exports |
//! | UL040-UL041 | `typed-props` | typing | Props need an interface and an annotation |
//! | UL042 | `shared-props-type` | typing | Props types used across files belong in a shared module |
//! | UL050 | `route-default-export` | routing | Routing files need a default export |
//! | UL051 | `route-file-naming` | routing | Routing file names are lowercase |
//! | UL052 | `client-page` | routing | Pages marked as client boundaries |
//! | UL060 | `long-class-list` | utility-class | Overlong class strings |
//! | UL061 | `class-concatenation` | utility-class | Class lists built without a merge helper |
//! | UL062 | `missing-dark-variant` | utility-class | Colors without a `dark:` pair |
//! | UL070 | `required-directories` | architecture | Required groupings must exist |
//! | UL071 | `kebab-case-filename` | architecture | File names must be kebab-case |
//! | UL072 | `nesting-depth` | architecture | Directory nesting bound |
//! | UL073 | `misplaced-hook-file` | architecture | Hook modules belong in `hooks/` |
//! | UL080 | `missing-component-test` | test-coverage | Components without a test |
//!
//! ## Usage
//!
//! ```ignore
//! use ui_lint_core::{Analyzer, Config};
//! use ui_lint_rules::Preset;
//!
//! let config = Config::default();
//! let builder = Analyzer::builder().root("./web");
//! let analyzer = Preset::Recommended
//!     .rules(&config)
//!     .apply(builder.config(config.clone()))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod classes;
mod class_concatenation;
mod client_directive;
mod client_page;
mod component_naming;
mod conditional_hook;
pub mod fixes;
mod hook_naming;
mod hook_return;
mod kebab_case_filename;
mod long_class_list;
mod misplaced_hook_file;
mod missing_dark_variant;
mod nesting_depth;
mod prefer_destructured_props;
mod prefer_named_export;
mod presets;
mod required_directories;
mod route_default_export;
mod route_file_naming;
mod shared_props_type;
#[cfg(test)]
mod testing;
mod typed_props;

pub use class_concatenation::ClassConcatenation;
pub use client_directive::{ClientDirective, DIRECTIVE_LINE};
pub use client_page::ClientPage;
pub use component_naming::ComponentNaming;
pub use conditional_hook::ConditionalHook;
pub use hook_naming::HookNaming;
pub use hook_return::HookReturn;
pub use kebab_case_filename::KebabCaseFilename;
pub use long_class_list::LongClassList;
pub use misplaced_hook_file::MisplacedHookFile;
pub use missing_component_test::MissingComponentTest;
pub use missing_dark_variant::MissingDarkVariant;
pub use nesting_depth::NestingDepth;
pub use prefer_destructured_props::PreferDestructuredProps;
pub use prefer_named_export::PreferNamedExport;
pub use presets::{
    all_rules, minimal_rules, recommended_rules, rule_catalogue, rules_by_name, strict_rules,
    Preset, RuleInfo, RuleSet,
};
pub use required_directories::RequiredDirectories;
pub use route_default_export::RouteDefaultExport;
pub use route_file_naming::RouteFileNaming;
pub use shared_props_type::SharedPropsType;
pub use typed_props::TypedProps;

/// Re-export core types for convenience.
pub use ui_lint_core::{ProjectRule, Rule, Severity, ValidationIssue};
