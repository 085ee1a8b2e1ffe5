//! Database module for db2struct
//!
//! This module handles the connection to the server being introspected.

pub mod connection;

// Re-export key types
pub use connection::DatabaseConnection;
