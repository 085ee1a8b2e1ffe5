//! Database connection handling
//!
//! This module provides functionality to establish the MySQL connection used
//! for introspection.

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

/// A connection pool to the server being introspected
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pool: MySqlPool,
}

impl DatabaseConnection {
    /// Connect using the configured host, port, credentials and schema
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = connect_options(config)?;
        let timeout_seconds = config.timeout_seconds.unwrap_or(30);

        tracing::debug!(host = %config.host, port = config.port, "Connecting to mysql server");

        // Introspection runs queries one after another, one connection is enough
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                Error::DatabaseError(format!(
                    "Error opening mysql db {}:{}: {}",
                    config.host, config.port, e
                ))
            })?;

        Ok(Self { pool })
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Close all connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Build connect options; the password is only set when non-empty
pub fn connect_options(config: &DatabaseConfig) -> Result<MySqlConnectOptions> {
    let user = config
        .user
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::ConfigError("Username is required! Add it with --user=name".to_string()))?;

    let mut options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(user);

    if let Some(password) = config.password.as_deref().filter(|p| !p.is_empty()) {
        options = options.password(password);
    }
    if let Some(database) = config.database.as_deref().filter(|d| !d.is_empty()) {
        options = options.database(database);
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options_requires_user() {
        let config = DatabaseConfig::default();
        assert!(connect_options(&config).unwrap_err().is_config());
    }

    #[test]
    fn test_connect_options_with_user() {
        let config = DatabaseConfig {
            user: Some("root".to_string()),
            database: Some("shop".to_string()),
            ..Default::default()
        };
        assert!(connect_options(&config).is_ok());
    }
}
