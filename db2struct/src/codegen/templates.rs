//! Accessor and conversion templates
//!
//! Function bodies are fixed handlebars templates; only the named slots vary
//! per table. The rendered text is not formatted here, the assembler runs
//! the whole unit through the formatter afterwards.

use handlebars::Handlebars;
use serde_json::{json, Value};

use crate::codegen::fields::FieldSpec;
use crate::error::Result;
use crate::schema::types::TableDescriptor;

const CRUD_TEMPLATE_NAME: &str = "crud";
const OBJECT_TEMPLATE_NAME: &str = "object";

/// CRUD accessors over a `sqlx` MySQL pool
pub const CRUD_TEMPLATE: &str = r#"
impl {{struct_name}} {
    /// Name of the backing table.
    pub const TABLE: &'static str = "{{table_name}}";

    /// Fetch every row of `{{table_name}}`.
    pub async fn fetch_all(pool: &sqlx::MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>({{select_all_sql}})
            .fetch_all(pool)
            .await
    }

    /// Insert this row and return the last insert id.
    pub async fn insert(&self, pool: &sqlx::MySqlPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query({{insert_sql}})
            {{#each columns}}
            .bind(&self.{{field}})
            {{/each}}
            .execute(pool)
            .await?;
        Ok(result.last_insert_id())
    }
{{#if has_key}}

    /// Fetch the row with the given key.
    pub async fn fetch_by_{{key_suffix}}(pool: &sqlx::MySqlPool, {{key_params}}) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>({{select_by_key_sql}})
            {{#each keys}}
            .bind({{field}})
            {{/each}}
            .fetch_optional(pool)
            .await
    }
{{#if has_values}}

    /// Write every non-key column of this row, returning the affected row count.
    pub async fn update(&self, pool: &sqlx::MySqlPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query({{update_sql}})
            {{#each values}}
            .bind(&self.{{field}})
            {{/each}}
            {{#each keys}}
            .bind(&self.{{field}})
            {{/each}}
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
{{/if}}

    /// Delete the row with the given key, returning the affected row count.
    pub async fn delete_by_{{key_suffix}}(pool: &sqlx::MySqlPool, {{key_params}}) -> Result<u64, sqlx::Error> {
        let result = sqlx::query({{delete_sql}})
            {{#each keys}}
            .bind({{field}})
            {{/each}}
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
{{/if}}
}
"#;

/// Conversions between the row struct and its plain object
pub const OBJECT_TEMPLATE: &str = r#"
impl From<{{struct_name}}> for {{object_name}} {
    fn from(value: {{struct_name}}) -> Self {
        Self {
            {{#each columns}}
            {{#if convert}}
            {{field}}: value.{{field}}.into(),
            {{else}}
            {{field}}: value.{{field}},
            {{/if}}
            {{/each}}
        }
    }
}

impl From<{{object_name}}> for {{struct_name}} {
    fn from(value: {{object_name}}) -> Self {
        Self {
            {{#each columns}}
            {{#if convert}}
            {{field}}: value.{{field}}.into(),
            {{else}}
            {{field}}: value.{{field}},
            {{/if}}
            {{/each}}
        }
    }
}
"#;

/// Renders the fixed templates
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Register the built-in templates
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Generating code, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);
        handlebars.register_template_string(CRUD_TEMPLATE_NAME, CRUD_TEMPLATE)?;
        handlebars.register_template_string(OBJECT_TEMPLATE_NAME, OBJECT_TEMPLATE)?;

        Ok(Self { handlebars })
    }

    /// Render the CRUD `impl` block for a table
    pub fn render_crud(
        &self,
        table: &TableDescriptor,
        struct_name: &str,
        fields: &[FieldSpec<'_>],
    ) -> Result<String> {
        let context = crud_context(table, struct_name, fields);
        Ok(self.handlebars.render(CRUD_TEMPLATE_NAME, &context)?)
    }

    /// Render the `From` impls between a row struct and its object
    pub fn render_object(
        &self,
        struct_name: &str,
        object_name: &str,
        fields: &[FieldSpec<'_>],
    ) -> Result<String> {
        let columns: Vec<Value> = fields
            .iter()
            .map(|f| {
                json!({
                    "field": f.ident.to_string(),
                    "convert": f.needs_conversion(),
                })
            })
            .collect();

        let context = json!({
            "struct_name": struct_name,
            "object_name": object_name,
            "columns": columns,
        });
        Ok(self.handlebars.render(OBJECT_TEMPLATE_NAME, &context)?)
    }
}

/// MySQL identifier quoting
fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// A Rust string literal holding `sql`
fn sql_literal(sql: &str) -> String {
    format!("{:?}", sql)
}

fn crud_context(table: &TableDescriptor, struct_name: &str, fields: &[FieldSpec<'_>]) -> Value {
    let table_sql = quote_identifier(&table.name);
    let (keys, values): (Vec<&FieldSpec<'_>>, Vec<&FieldSpec<'_>>) =
        fields.iter().partition(|f| f.column.is_primary_key);

    let column_list = fields
        .iter()
        .map(|f| quote_identifier(&f.column.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; fields.len()].join(", ");
    let key_where = keys
        .iter()
        .map(|f| format!("{} = ?", quote_identifier(&f.column.name)))
        .collect::<Vec<_>>()
        .join(" AND ");
    let set_list = values
        .iter()
        .map(|f| format!("{} = ?", quote_identifier(&f.column.name)))
        .collect::<Vec<_>>()
        .join(", ");

    let key_params = keys
        .iter()
        .map(|f| format!("{}: {}", f.ident, quote::ToTokens::to_token_stream(&f.ty)))
        .collect::<Vec<_>>()
        .join(", ");
    let key_suffix = keys
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join("_and_");

    let field_entry = |f: &&FieldSpec<'_>| json!({ "field": f.ident.to_string() });

    json!({
        "struct_name": struct_name,
        "table_name": table.name.escape_default().to_string(),
        "columns": fields.iter().map(|f| json!({ "field": f.ident.to_string() })).collect::<Vec<_>>(),
        "keys": keys.iter().map(field_entry).collect::<Vec<_>>(),
        "values": values.iter().map(field_entry).collect::<Vec<_>>(),
        "has_key": !keys.is_empty(),
        "has_values": !values.is_empty(),
        "key_params": key_params,
        "key_suffix": key_suffix,
        "select_all_sql": sql_literal(&format!("SELECT {} FROM {}", column_list, table_sql)),
        "select_by_key_sql": sql_literal(&format!(
            "SELECT {} FROM {} WHERE {}",
            column_list, table_sql, key_where
        )),
        "insert_sql": sql_literal(&format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table_sql, column_list, placeholders
        )),
        "update_sql": sql_literal(&format!(
            "UPDATE {} SET {} WHERE {}",
            table_sql, set_list, key_where
        )),
        "delete_sql": sql_literal(&format!("DELETE FROM {} WHERE {}", table_sql, key_where)),
    })
}
