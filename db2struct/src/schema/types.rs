//! Type definitions for introspected schema objects

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// First parenthesised width in a declared column type, e.g. `int(11)`
static WIDTH_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*(\d+)").expect("valid regex"));

/// Metadata of one column, as read from the information schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Canonical type keyword (`DATA_TYPE`), e.g. `varchar`
    pub base_type: String,
    /// Full declared type (`COLUMN_TYPE`), e.g. `int(11) unsigned`
    pub column_type: String,
    pub nullable: bool,
    pub is_primary_key: bool,
    pub comment: Option<String>,
}

impl ColumnDescriptor {
    /// Create a non-null column whose declared type equals its base type
    pub fn new(name: &str, base_type: &str) -> Self {
        Self {
            name: name.to_string(),
            base_type: base_type.to_string(),
            column_type: base_type.to_string(),
            nullable: false,
            is_primary_key: false,
            comment: None,
        }
    }

    /// Set whether the column is nullable
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the full declared type
    pub fn column_type(mut self, column_type: &str) -> Self {
        self.column_type = column_type.to_string();
        self
    }

    /// Mark the column as part of the primary key
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Set the column comment; blank comments are dropped
    pub fn comment(mut self, comment: &str) -> Self {
        let comment = comment.trim();
        self.comment = (!comment.is_empty()).then(|| comment.to_string());
        self
    }

    /// Signedness comes from the declared type; no `unsigned` means signed.
    pub fn is_unsigned(&self) -> bool {
        self.column_type.to_lowercase().contains("unsigned")
    }

    /// Declared width, if the column type carries one
    pub fn width(&self) -> Option<u32> {
        WIDTH_PATTERN
            .captures(&self.column_type)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

/// A table and its columns in ordinal order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    /// Create a new table with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
        }
    }

    /// Append a column; order of calls is the ordinal order
    pub fn add_column(&mut self, column: ColumnDescriptor) {
        self.columns.push(column);
    }

    /// Builder form of [`TableDescriptor::add_column`]
    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        self.add_column(column);
        self
    }

    /// Primary key columns, in ordinal order
    pub fn primary_key(&self) -> Vec<&ColumnDescriptor> {
        self.columns.iter().filter(|c| c.is_primary_key).collect()
    }
}
