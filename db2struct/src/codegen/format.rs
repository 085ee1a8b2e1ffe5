//! Source formatting pass
//!
//! The only validation generated code gets: it must parse as a Rust file.

use crate::error::{Error, Result};

/// Parse and pretty-print a unit of Rust source.
///
/// On a parse failure the error carries the unformatted text so the broken
/// template output can be inspected.
pub fn format_source(src: &str) -> Result<String> {
    let file = syn::parse_file(src).map_err(|e| Error::FormatError {
        message: e.to_string(),
        text: src.to_string(),
    })?;

    Ok(prettyplease::unparse(&file))
}
