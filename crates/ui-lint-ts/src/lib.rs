//! # ui-lint-ts
//!
//! Tree-sitter layer of ui-lint. Turns TSX/TypeScript source into
//! something rules can reason about:
//!
//! - [`SourceUnit`] owns a file's text and syntax tree, with line-level
//!   and byte-range mutations that re-parse incrementally
//! - [`extract_component_context`] builds the [`ComponentContext`]
//!   fingerprint of a unit (declaration, props, hooks, exports, classes)
//! - [`extract_hook_context`] recognizes custom hook declarations
//! - [`RouteKind`] classifies framework routing files by path
//! - [`IdentifierIndex`] answers cross-file "who references X" queries
//!
//! Nothing in this crate touches the filesystem except [`SourceUnit::load`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod component;
pub mod hook;
pub mod index;
pub mod query;
pub mod route;
pub mod syntax;

pub use component::{
    extract_component_context, is_hook_name, ClassAttribute, ClassValue, ComponentContext,
    ComponentDeclaration, DeclarationShape, DefaultExportShape, ExportSummary, HookCall,
    HookPlacement, LocalKind, PrimitiveKind, PropsParameter, PropsStyle, TypeDeclKind,
    TypeDeclaration,
};
pub use hook::{extract_hook_context, is_hook_module, HookContext};
pub use index::{IdentifierIndex, IdentifierOccurrences};
pub use route::RouteKind;
pub use syntax::{Dialect, Directive, LoadError, ParseFailure, SourceUnit, CLIENT_DIRECTIVE};
