//! Command line interface
//!
//! Flags override values loaded from `--config`; anything left unset keeps
//! the file (or default) value.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{self, Config, ScaffoldConfig};
use crate::error::Result;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "db2struct")]
#[command(version)]
#[command(about = "Generate Rust structs from MySQL table definitions", long_about = None)]
pub struct Cli {
    /// Host to check mariadb status of
    #[arg(short = 'H', long, env = "MYSQL_HOST")]
    pub host: Option<String>,

    /// Port to check mariadb status of
    #[arg(long = "mysql-port", alias = "mysql_port")]
    pub mysql_port: Option<u16>,

    /// Table to build struct from; every table of the database when omitted
    #[arg(short, long)]
    pub table: Option<String>,

    /// Database to for connection
    #[arg(short, long)]
    pub database: Option<String>,

    /// User to connect to database
    #[arg(short, long, env = "MYSQL_USERNAME")]
    pub user: Option<String>,

    /// Password to connect to database; prompts when given without a value
    #[arg(
        short,
        long,
        env = "MYSQL_PASSWORD",
        hide_env_values = true,
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub password: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Module name the generated files are placed in
    #[arg(long)]
    pub package: Option<String>,

    /// Name to set for the struct (single table only)
    #[arg(long = "struct")]
    pub struct_name: Option<String>,

    /// Add serde derives and renames
    #[arg(long, overrides_with = "no_json")]
    pub json: bool,

    /// Leave out serde derives
    #[arg(long)]
    pub no_json: bool,

    /// Add `sqlx::FromRow` and column renames
    #[arg(long)]
    pub db: bool,

    /// Wrap nullable columns in this type instead of `Option`
    #[arg(long, value_name = "PATH")]
    pub null_wrapper: Option<String>,

    /// Emit CRUD accessors
    #[arg(long)]
    pub crud: bool,

    /// Emit `<Struct>Object` and conversions
    #[arg(long)]
    pub objects: bool,

    /// Directory to write files to; stdout when omitted
    #[arg(long, value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// Write `mod.rs` for the package
    #[arg(long)]
    pub aggregate: bool,

    /// Keep a `.bak` copy of files being overwritten
    #[arg(long)]
    pub backup: bool,

    /// Continue with the remaining tables when one fails
    #[arg(long)]
    pub keep_going: bool,

    /// TOML or YAML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Handlebars template for a handler scaffold
    #[arg(long, value_name = "FILE")]
    pub scaffold_template: Option<PathBuf>,

    /// Project name used in the scaffold
    #[arg(long)]
    pub project: Option<String>,

    /// Table note used in the scaffold
    #[arg(long)]
    pub note: Option<String>,
}

impl Cli {
    /// `-p` was given without a value
    pub fn prompt_password(&self) -> bool {
        self.password.as_deref() == Some("")
    }

    /// Load the config file (if any) and apply the flags on top
    pub fn load_config(&self) -> Result<Config> {
        let base = match &self.config {
            Some(path) => config::load_from_file(&path.to_string_lossy())?,
            None => Config::default(),
        };
        Ok(self.apply(base))
    }

    /// Apply the flags to `config`
    pub fn apply(&self, mut config: Config) -> Config {
        let db = &mut config.database;
        if let Some(host) = &self.host {
            db.host = host.clone();
        }
        if let Some(port) = self.mysql_port {
            db.port = port;
        }
        set(&mut db.table, &self.table);
        set(&mut db.database, &self.database);
        set(&mut db.user, &self.user);
        if !self.prompt_password() {
            set(&mut db.password, &self.password);
        }

        let generation = &mut config.generation;
        if let Some(package) = &self.package {
            generation.package = package.clone();
        }
        set(&mut generation.struct_name, &self.struct_name);
        if self.no_json {
            generation.json_annotations = false;
        } else if self.json {
            generation.json_annotations = true;
        }
        generation.db_annotations |= self.db;
        set(&mut generation.null_wrapper, &self.null_wrapper);
        generation.crud |= self.crud;
        generation.objects |= self.objects;

        let output = &mut config.output;
        if let Some(target) = &self.target {
            output.target = Some(target.to_string_lossy().into_owned());
        }
        output.aggregate |= self.aggregate;
        output.backup |= self.backup;
        output.keep_going |= self.keep_going;

        if self.verbose {
            config.logging.level = "debug".to_string();
            config.logging.log_queries = true;
        }

        if let Some(template) = &self.scaffold_template {
            let scaffold = config.scaffold.get_or_insert_with(ScaffoldConfig::default);
            scaffold.template = template.to_string_lossy().into_owned();
        }
        if let Some(scaffold) = config.scaffold.as_mut() {
            if let Some(project) = &self.project {
                scaffold.project = project.clone();
            }
            if let Some(note) = &self.note {
                scaffold.note = note.clone();
            }
        }

        config
    }
}

fn set(slot: &mut Option<String>, value: &Option<String>) {
    if value.is_some() {
        *slot = value.clone();
    }
}
