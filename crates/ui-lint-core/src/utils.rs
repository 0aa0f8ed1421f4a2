//! Utility functions for rule implementations.

pub mod allowance;
pub mod naming;

#[doc(inline)]
pub use allowance::{check_allow_with_reason, parse_allow_directive, AllowCheck, Suppressions};
#[doc(inline)]
pub use naming::{is_kebab_case, is_pascal_case, to_hook_name, to_kebab_case, to_pascal_case};
