//! Utilities for db2struct
//!
//! Naming transformations and logging setup shared across the crate.

pub mod logging;
pub mod naming;

// Re-export key utility functions
pub use naming::{
    field_ident_name, fmt_field_name, lint_field_name, normalize_field_name,
    stringify_first_char, struct_name_for_table,
};
