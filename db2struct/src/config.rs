//! Configuration handling for db2struct

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Load configuration from a TOML or YAML file, chosen by extension
pub fn load_from_file(path: &str) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| Error::ConfigError(format!("Failed to read config file: {}", e)))?;

    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_lowercase();

    let config: Config = match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&config_str)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?,
        _ => toml::from_str(&config_str)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?,
    };

    Ok(config)
}

/// Represents the complete db2struct configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub generation: GenerationConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub scaffold: Option<ScaffoldConfig>,
}

impl Config {
    /// Check that the inputs needed to run are present.
    ///
    /// The messages match what the command line reports before exiting.
    pub fn validate(&self) -> Result<()> {
        if self.database.user.as_deref().map_or(true, str::is_empty) {
            return Err(Error::ConfigError(
                "Username is required! Add it with --user=name".to_string(),
            ));
        }
        if self.database.database.as_deref().map_or(true, str::is_empty) {
            return Err(Error::ConfigError("Database can not be null".to_string()));
        }
        if let Some(scaffold) = &self.scaffold {
            if self.database.table.is_none() {
                return Err(Error::ConfigError(
                    "Table can not be null when rendering a scaffold".to_string(),
                ));
            }
            if scaffold.template.is_empty() {
                return Err(Error::ConfigError(
                    "Scaffold template path can not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The schema to introspect. Only meaningful after [`Config::validate`].
    pub fn schema(&self) -> &str {
        self.database.database.as_deref().unwrap_or_default()
    }
}

/// Database connection configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    /// Single table to generate; all tables of the schema when unset
    pub table: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: None,
            password: None,
            database: None,
            table: None,
            timeout_seconds: None,
        }
    }
}

/// Code generation switches
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    pub struct_name: Option<String>,
    pub package: String,
    pub json_annotations: bool,
    pub db_annotations: bool,
    /// Type path used for nullable columns instead of `Option`
    pub null_wrapper: Option<String>,
    pub crud: bool,
    pub objects: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            struct_name: None,
            package: "newpackage".to_string(),
            json_annotations: true,
            db_annotations: false,
            null_wrapper: None,
            crud: false,
            objects: false,
        }
    }
}

/// Where generated code goes
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Print to stdout when unset
    pub target: Option<String>,
    /// Write `mod.rs` for the package; always on when generating all tables
    pub aggregate: bool,
    pub backup: bool,
    /// Continue with the next table when one fails
    pub keep_going: bool,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub format: String,
    pub stdout: bool,
    /// Log every information schema query before it runs
    pub log_queries: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            format: "text".to_string(),
            stdout: true,
            log_queries: false,
        }
    }
}

/// Handler scaffold rendering
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Handlebars template file
    pub template: String,
    pub project: String,
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid() -> Config {
        let mut config = Config::default();
        config.database.user = Some("root".to_string());
        config.database.database = Some("shop".to_string());
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.generation.package, "newpackage");
        assert!(config.generation.json_annotations);
        assert!(!config.generation.crud);
        assert!(config.output.target.is_none());
    }

    #[test]
    fn test_validate_requires_user() {
        let mut config = valid();
        config.database.user = None;
        let err = config.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("Username is required"));
    }

    #[test]
    fn test_validate_requires_database() {
        let mut config = valid();
        config.database.database = Some(String::new());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Database can not be null"));
    }

    #[test]
    fn test_validate_scaffold_needs_table() {
        let mut config = valid();
        config.scaffold = Some(ScaffoldConfig {
            template: "handler.hbs".to_string(),
            ..Default::default()
        });
        assert!(config.validate().is_err());

        config.database.table = Some("users".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [database]
            user = "root"
            database = "shop"

            [generation]
            crud = true
            null_wrapper = "crate::nullable::Nullable"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.schema(), "shop");
        assert!(config.generation.crud);
        assert!(config.generation.json_annotations);
        assert_eq!(
            config.generation.null_wrapper.as_deref(),
            Some("crate::nullable::Nullable")
        );
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db2struct.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "database:\n  user: app\n  database: shop\n  port: 3307").unwrap();

        let config = load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.user.as_deref(), Some("app"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.is_config());
    }
}
