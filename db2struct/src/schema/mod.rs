//! Schema module for db2struct
//!
//! This module reads column metadata and maps column types to Rust types.

pub mod introspector;
pub mod type_map;
pub mod types;

// Re-export key types
pub use introspector::{MySqlIntrospector, SchemaSource, StaticSchema};
pub use type_map::{map_column_type, NullConvention};
pub use types::{ColumnDescriptor, TableDescriptor};
