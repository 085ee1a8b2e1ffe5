//! Information schema introspection
//!
//! This module reads table names and column metadata. It only ever runs the
//! two read-only queries below.

use async_trait::async_trait;
use sqlx::{FromRow, MySqlPool};
use std::collections::BTreeMap;

use crate::db::connection::DatabaseConnection;
use crate::error::{Error, Result};
use crate::schema::types::{ColumnDescriptor, TableDescriptor};

const TABLES_QUERY: &str = r#"
    SELECT CAST(table_name AS CHAR) AS table_name
    FROM information_schema.tables
    WHERE table_schema = ?
    ORDER BY table_name
"#;

const COLUMNS_QUERY: &str = r#"
    SELECT
        CAST(column_name AS CHAR) AS column_name,
        CAST(column_key AS CHAR) AS column_key,
        CAST(column_type AS CHAR) AS column_type,
        CAST(data_type AS CHAR) AS data_type,
        CAST(is_nullable AS CHAR) AS is_nullable,
        CAST(column_comment AS CHAR) AS column_comment
    FROM information_schema.columns
    WHERE table_schema = ? AND table_name = ?
    ORDER BY ordinal_position
"#;

/// Source of schema metadata
#[async_trait]
pub trait SchemaSource {
    /// All table names of a schema, in lexicographic order
    async fn list_tables(&self, schema: &str) -> Result<Vec<String>>;

    /// Columns of one table in ordinal order.
    ///
    /// A table without columns (or one that does not exist) is
    /// [`Error::NoRows`], never an empty table.
    async fn table_columns(&self, schema: &str, table: &str) -> Result<TableDescriptor>;
}

#[derive(FromRow)]
struct TableRow {
    table_name: String,
}

#[derive(Debug, FromRow)]
pub(crate) struct ColumnRow {
    pub column_name: String,
    pub column_key: Option<String>,
    pub column_type: String,
    pub data_type: String,
    pub is_nullable: String,
    pub column_comment: Option<String>,
}

impl From<ColumnRow> for ColumnDescriptor {
    fn from(row: ColumnRow) -> Self {
        let mut column = ColumnDescriptor::new(&row.column_name, &row.data_type)
            .column_type(&row.column_type)
            .nullable(row.is_nullable.eq_ignore_ascii_case("YES"))
            .comment(row.column_comment.as_deref().unwrap_or_default());
        column.is_primary_key = row.column_key.as_deref() == Some("PRI");
        column
    }
}

/// Build a table from rows, rejecting an empty result
pub(crate) fn table_from_rows(table: &str, rows: Vec<ColumnRow>) -> Result<TableDescriptor> {
    if rows.is_empty() {
        return Err(Error::NoRows {
            table: table.to_string(),
        });
    }

    let mut descriptor = TableDescriptor::new(table);
    for row in rows {
        descriptor.add_column(row.into());
    }
    Ok(descriptor)
}

/// Introspector for MySQL and MariaDB
pub struct MySqlIntrospector {
    pool: MySqlPool,
    log_queries: bool,
}

impl MySqlIntrospector {
    /// Create a new introspector over an open connection
    pub fn new(connection: &DatabaseConnection, log_queries: bool) -> Self {
        Self {
            pool: connection.pool().clone(),
            log_queries,
        }
    }

    fn log_query(&self, sql: &str) {
        if self.log_queries {
            tracing::info!(sql = sql.trim(), "running");
        } else {
            tracing::debug!(sql = sql.trim(), "running");
        }
    }
}

#[async_trait]
impl SchemaSource for MySqlIntrospector {
    async fn list_tables(&self, schema: &str) -> Result<Vec<String>> {
        self.log_query(TABLES_QUERY);

        let rows = sqlx::query_as::<_, TableRow>(TABLES_QUERY)
            .bind(schema)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|row| row.table_name).collect())
    }

    async fn table_columns(&self, schema: &str, table: &str) -> Result<TableDescriptor> {
        self.log_query(COLUMNS_QUERY);

        let rows = sqlx::query_as::<_, ColumnRow>(COLUMNS_QUERY)
            .bind(schema)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(table, columns = rows.len(), "Read column metadata");
        table_from_rows(table, rows)
    }
}

/// In-memory schema, for dry runs and tests
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    tables: BTreeMap<String, TableDescriptor>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table
    pub fn add_table(&mut self, table: TableDescriptor) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn with_table(mut self, table: TableDescriptor) -> Self {
        self.add_table(table);
        self
    }
}

#[async_trait]
impl SchemaSource for StaticSchema {
    async fn list_tables(&self, _schema: &str) -> Result<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }

    async fn table_columns(&self, _schema: &str, table: &str) -> Result<TableDescriptor> {
        match self.tables.get(table) {
            Some(descriptor) if !descriptor.columns.is_empty() => Ok(descriptor.clone()),
            _ => Err(Error::NoRows {
                table: table.to_string(),
            }),
        }
    }
}
