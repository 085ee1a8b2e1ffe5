//! Error types for db2struct

use thiserror::Error;

/// Result type for db2struct operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for db2struct
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// The table does not exist or has no columns.
    #[error("No results returned for table `{table}`")]
    NoRows { table: String },

    #[error("Unsupported type `{base_type}` for column `{column}`")]
    UnsupportedType { column: String, base_type: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Template error: {0}")]
    TemplateError(String),

    /// The assembled text did not parse. `text` holds the unformatted source.
    #[error("error formatting: {message}, was formatting\n{text}")]
    FormatError { message: String, text: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl Error {
    /// Whether this error means the user must fix their input rather than a
    /// runtime failure.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::ConfigError(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SerializationError(error.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(error: serde_yaml::Error) -> Self {
        Error::ConfigError(error.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::ConfigError(error.to_string())
    }
}

impl From<handlebars::RenderError> for Error {
    fn from(error: handlebars::RenderError) -> Self {
        Error::TemplateError(error.to_string())
    }
}

impl From<handlebars::TemplateError> for Error {
    fn from(error: handlebars::TemplateError) -> Self {
        Error::TemplateError(error.to_string())
    }
}
