//! db2struct: generate Rust structs from MySQL table definitions
//!
//! The column metadata of one table (or every table of a schema) is read
//! from `information_schema`, each column name is normalized into a Rust
//! identifier, each column type is mapped to a Rust type, and one formatted
//! source unit is produced per table.

pub mod cli;
pub mod codegen;
pub mod config;
pub mod db;
pub mod error;
pub mod output;
pub mod schema;
pub mod utils;

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

// Re-export main types for easier access
pub use codegen::{CodeGenerator, GeneratedUnit, GenerationOptions};
pub use config::Config;
pub use db::connection::DatabaseConnection;
pub use error::{Error, Result};
pub use output::{OutputWriter, ScaffoldContext};
pub use schema::{MySqlIntrospector, SchemaSource, StaticSchema, TableDescriptor};

/// Connect to the configured server and build a client over it
pub async fn init(config: Config) -> Result<Db2StructClient<MySqlIntrospector>> {
    config.validate()?;
    let connection = DatabaseConnection::connect(&config.database).await?;
    let introspector = MySqlIntrospector::new(&connection, config.logging.log_queries);

    let mut client = Db2StructClient::new(config, introspector)?;
    client.connection = Some(connection);
    Ok(client)
}

/// A table that could not be generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFailure {
    pub table: String,
    pub error: String,
}

/// Outcome of [`Db2StructClient::run`]
#[derive(Debug, Default)]
pub struct RunReport {
    pub units: Vec<GeneratedUnit>,
    /// Files written, in order
    pub written: Vec<PathBuf>,
    pub failed: Vec<TableFailure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Module and struct names taken by earlier tables of a run
#[derive(Debug, Default)]
struct NameClaims {
    modules: HashMap<String, String>,
    structs: HashMap<String, String>,
}

impl NameClaims {
    /// Tables whose names collide would overwrite each other's file or
    /// declare the same item twice in `mod.rs`
    fn check(&self, unit: &GeneratedUnit) -> Result<()> {
        let module = output::writer::module_name(&unit.table_name);
        if let Some(owner) = self.modules.get(&module) {
            return Err(Error::ValidationError(format!(
                "tables `{}` and `{}` both map to module `{}`",
                owner, unit.table_name, module
            )));
        }

        for name in unit_struct_names(unit) {
            if let Some(owner) = self.structs.get(name) {
                return Err(Error::ValidationError(format!(
                    "tables `{}` and `{}` both map to struct `{}`",
                    owner, unit.table_name, name
                )));
            }
        }
        Ok(())
    }

    fn record(&mut self, unit: &GeneratedUnit) {
        self.modules.insert(
            output::writer::module_name(&unit.table_name),
            unit.table_name.clone(),
        );
        for name in unit_struct_names(unit) {
            self.structs.insert(name.to_string(), unit.table_name.clone());
        }
    }
}

fn unit_struct_names(unit: &GeneratedUnit) -> impl Iterator<Item = &str> {
    std::iter::once(unit.struct_name.as_str()).chain(unit.object_name.as_deref())
}

/// The main client: reads the schema and generates code from it
pub struct Db2StructClient<S: SchemaSource> {
    config: Config,
    source: S,
    generator: CodeGenerator,
    connection: Option<DatabaseConnection>,
}

impl<S: SchemaSource + Sync> Db2StructClient<S> {
    /// Create a new client over any schema source
    pub fn new(config: Config, source: S) -> Result<Self> {
        config.validate()?;

        let mut options = GenerationOptions::from(&config.generation);
        if config.database.table.is_none() && options.struct_name.is_some() {
            tracing::warn!("--struct only applies to a single table, using table names instead");
            options.struct_name = None;
        }

        Ok(Self {
            config,
            source,
            generator: CodeGenerator::new(options)?,
            connection: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The requested table, or every table of the schema
    pub async fn tables_to_generate(&self) -> Result<Vec<String>> {
        if let Some(table) = &self.config.database.table {
            return Ok(vec![table.clone()]);
        }

        let tables = self.source.list_tables(self.config.schema()).await?;
        tracing::info!(
            schema = self.config.schema(),
            tables = ?tables,
            "--table flag missing, processing every table of the schema"
        );
        Ok(tables)
    }

    /// Read one table and generate its unit
    pub async fn generate_table(&self, table: &str) -> Result<GeneratedUnit> {
        let descriptor = self.source.table_columns(self.config.schema(), table).await?;
        self.generator.generate(&descriptor)
    }

    /// Generate every requested table in order.
    ///
    /// Units go to `out` unless an output directory is configured. The first
    /// failing table stops the run, unless `keep_going` is set, in which case
    /// failures are collected in the report. A table fails when it cannot be
    /// read or generated, when its module or struct name is already taken by
    /// an earlier table, or when its output cannot be written.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<RunReport> {
        let all_tables = self.config.database.table.is_none();
        let tables = self.tables_to_generate().await?;
        if tables.is_empty() {
            tracing::warn!(schema = self.config.schema(), "No tables found");
        }

        let writer = self.writer();
        let mut report = RunReport::default();

        let mut claims = NameClaims::default();

        for table in &tables {
            let generated = self.generate_table(table).await;
            let outcome = generated.and_then(|unit| {
                claims.check(&unit)?;
                let path = match &writer {
                    Some(writer) => Some(writer.write_unit(&unit)?),
                    None => {
                        writeln!(out, "{}\n\n{}", output::GENERATED_HEADER, unit.source)?;
                        None
                    }
                };
                claims.record(&unit);
                Ok((unit, path))
            });

            match outcome {
                Ok((unit, path)) => {
                    report.written.extend(path);
                    report.units.push(unit);
                }
                Err(e) if self.config.output.keep_going => {
                    tracing::error!(table = %table, error = %e, "Failed to generate table");
                    report.failed.push(TableFailure {
                        table: table.clone(),
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(writer) = &writer {
            if (all_tables || self.config.output.aggregate) && !report.units.is_empty() {
                report.written.push(writer.write_aggregate(&report.units)?);
            }
        }

        if let (Some(scaffold), Some(unit)) = (&self.config.scaffold, report.units.first()) {
            let project: &str = if scaffold.project.is_empty() {
                self.config.schema()
            } else {
                &scaffold.project
            };
            let context = ScaffoldContext::new(
                project,
                &self.config.generation.package,
                &unit.struct_name,
                &unit.table_name,
                &scaffold.note,
            );
            let template = Path::new(&scaffold.template);

            match &self.config.output.target {
                Some(target) => report.written.push(output::write_scaffold(
                    template,
                    Path::new(target),
                    &context,
                )?),
                None => {
                    let text = std::fs::read_to_string(template)?;
                    writeln!(out, "{}", output::render_scaffold(&text, &context)?)?;
                }
            }
        }

        for failure in &report.failed {
            tracing::warn!(table = %failure.table, error = %failure.error, "Table skipped");
        }

        Ok(report)
    }

    /// Close the database connection, if this client opened one
    pub async fn close(&self) {
        if let Some(connection) = &self.connection {
            connection.close().await;
        }
    }

    fn writer(&self) -> Option<OutputWriter> {
        self.config.output.target.as_ref().map(|target| {
            OutputWriter::new(
                Path::new(target),
                &self.config.generation.package,
                self.config.output.backup,
            )
        })
    }
}
