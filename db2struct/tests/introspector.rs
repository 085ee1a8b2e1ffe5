//! Introspection against a live server
//!
//! Only built with the `integration_tests` feature. Connection settings come
//! from `MYSQL_HOST`, `MYSQL_USERNAME`, `MYSQL_PASSWORD` and `MYSQL_DATABASE`.
#![cfg(feature = "integration_tests")]

use pretty_assertions::assert_eq;

use db2struct::config::DatabaseConfig;
use db2struct::schema::{MySqlIntrospector, SchemaSource};
use db2struct::{DatabaseConnection, Error};

const TABLE: &str = "db2struct_ordinal";

fn database_config() -> DatabaseConfig {
    DatabaseConfig {
        host: std::env::var("MYSQL_HOST").unwrap_or_else(|_| "localhost".to_string()),
        user: Some(std::env::var("MYSQL_USERNAME").unwrap_or_else(|_| "root".to_string())),
        password: std::env::var("MYSQL_PASSWORD").ok(),
        database: Some(std::env::var("MYSQL_DATABASE").unwrap_or_else(|_| "test".to_string())),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_reads_columns_in_ordinal_order() {
    let config = database_config();
    let schema = config.database.clone().unwrap();
    let connection = DatabaseConnection::connect(&config).await.unwrap();

    sqlx::query(&format!("DROP TABLE IF EXISTS {}", TABLE))
        .execute(connection.pool())
        .await
        .unwrap();
    sqlx::query(&format!(
        "CREATE TABLE {} (
            zeta BIGINT UNSIGNED NOT NULL PRIMARY KEY,
            alpha VARCHAR(32) NULL COMMENT 'first letter',
            mid BINARY(16) NOT NULL
        )",
        TABLE
    ))
    .execute(connection.pool())
    .await
    .unwrap();

    let introspector = MySqlIntrospector::new(&connection, true);
    assert!(introspector
        .list_tables(&schema)
        .await
        .unwrap()
        .contains(&TABLE.to_string()));

    let table = introspector.table_columns(&schema, TABLE).await.unwrap();
    let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    assert!(table.columns[0].is_primary_key);
    assert!(table.columns[0].is_unsigned());
    assert!(table.columns[1].nullable);
    assert_eq!(table.columns[1].comment.as_deref(), Some("first letter"));
    assert_eq!(table.columns[2].width(), Some(16));

    let missing = introspector.table_columns(&schema, "db2struct_missing").await;
    assert!(matches!(missing, Err(Error::NoRows { .. })));

    sqlx::query(&format!("DROP TABLE {}", TABLE))
        .execute(connection.pool())
        .await
        .unwrap();
    connection.close().await;
}
