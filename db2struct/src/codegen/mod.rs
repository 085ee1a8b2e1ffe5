//! Code generation
//!
//! Turns a [`TableDescriptor`] into one formatted unit of Rust source: the
//! row struct, then optionally the CRUD accessors and the conversion object.

pub mod fields;
pub mod format;
pub mod model;
pub mod templates;

use crate::config::GenerationConfig;
use crate::error::Result;
use crate::schema::type_map::NullConvention;
use crate::schema::types::TableDescriptor;
use crate::utils::naming::struct_name_for_table;

use self::fields::{build_fields, rust_ident};
use self::format::format_source;
use self::model::{object_struct, row_struct, Annotations};
use self::templates::TemplateRenderer;

/// Options for one generation run
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Struct name override; the normalized table name otherwise
    pub struct_name: Option<String>,
    pub package: String,
    pub json_annotations: bool,
    pub db_annotations: bool,
    pub null_convention: NullConvention,
    pub crud: bool,
    pub objects: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

impl From<&GenerationConfig> for GenerationOptions {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            struct_name: config.struct_name.clone().filter(|s| !s.is_empty()),
            package: config.package.clone(),
            json_annotations: config.json_annotations,
            db_annotations: config.db_annotations,
            null_convention: NullConvention::from_wrapper(config.null_wrapper.as_deref()),
            crud: config.crud,
            objects: config.objects,
        }
    }
}

impl GenerationOptions {
    /// CRUD accessors decode rows with `FromRow`, so they need the column
    /// renames too.
    pub fn annotations(&self) -> Annotations {
        Annotations {
            json: self.json_annotations,
            db: self.db_annotations || self.crud,
        }
    }

    /// Struct name used for `table`
    pub fn struct_name_for(&self, table: &str) -> String {
        self.struct_name
            .clone()
            .unwrap_or_else(|| struct_name_for_table(table))
    }
}

/// Formatted output for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub table_name: String,
    pub struct_name: String,
    pub object_name: Option<String>,
    pub source: String,
}

/// Generates source units from table descriptors
pub struct CodeGenerator {
    options: GenerationOptions,
    templates: TemplateRenderer,
}

impl CodeGenerator {
    /// Create a new code generator
    pub fn new(options: GenerationOptions) -> Result<Self> {
        Ok(Self {
            options,
            templates: TemplateRenderer::new()?,
        })
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Generate the source unit for one table
    pub fn generate(&self, table: &TableDescriptor) -> Result<GeneratedUnit> {
        let struct_name = self.options.struct_name_for(&table.name);
        let struct_ident = rust_ident(&struct_name)?;
        let fields = build_fields(table, &self.options.null_convention)?;
        let annotations = self.options.annotations();

        let mut src = row_struct(&struct_ident, &table.name, &fields, annotations).to_string();

        // templates get the identifier as declared, `r#match` for `match`
        let struct_path = struct_ident.to_string();
        if self.options.crud {
            src.push_str(&self.templates.render_crud(table, &struct_path, &fields)?);
        }

        let object_name = if self.options.objects {
            let object_name = format!("{}Object", struct_name);
            let object_ident = rust_ident(&object_name)?;
            src.push_str(&object_struct(&object_ident, &struct_ident, &fields, annotations).to_string());
            src.push_str(&self.templates.render_object(
                &struct_path,
                &object_ident.to_string(),
                &fields,
            )?);
            Some(object_name)
        } else {
            None
        };

        let source = format_source(&src)?;
        tracing::debug!(table = %table.name, struct_name = %struct_name, "Generated struct");

        Ok(GeneratedUnit {
            table_name: table.name.clone(),
            struct_name,
            object_name,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::ColumnDescriptor;

    #[test]
    fn test_options_from_config() {
        let config = GenerationConfig {
            struct_name: Some(String::new()),
            null_wrapper: Some("Nullable".to_string()),
            crud: true,
            ..Default::default()
        };
        let options = GenerationOptions::from(&config);
        assert!(options.struct_name.is_none());
        assert!(options.annotations().db);
        assert_eq!(
            options.null_convention,
            NullConvention::Wrapper {
                path: "Nullable".to_string()
            }
        );
    }

    #[test]
    fn test_struct_name_defaults_to_table() {
        let options = GenerationOptions::default();
        assert_eq!(options.struct_name_for("order_items"), "OrderItems");

        let options = GenerationOptions {
            struct_name: Some("LineItem".to_string()),
            ..Default::default()
        };
        assert_eq!(options.struct_name_for("order_items"), "LineItem");
    }

    #[test]
    fn test_keyword_struct_name_in_templates() {
        let generator = CodeGenerator::new(GenerationOptions {
            struct_name: Some("match".to_string()),
            crud: true,
            objects: true,
            ..Default::default()
        })
        .unwrap();
        let table = TableDescriptor::new("games")
            .with_column(ColumnDescriptor::new("id", "int").primary_key())
            .with_column(ColumnDescriptor::new("score", "int").nullable(true));

        let unit = generator.generate(&table).unwrap();
        assert_eq!(unit.struct_name, "match");
        assert!(unit.source.contains("pub struct r#match {"));
        assert!(unit.source.contains("impl r#match {"));
        assert!(unit.source.contains("impl From<r#match> for matchObject {"));
    }

    #[test]
    fn test_invalid_struct_name() {
        let generator = CodeGenerator::new(GenerationOptions {
            struct_name: Some("Self".to_string()),
            ..Default::default()
        })
        .unwrap();
        let table = TableDescriptor::new("t").with_column(ColumnDescriptor::new("id", "int"));
        assert!(generator.generate(&table).is_err());
    }
}
