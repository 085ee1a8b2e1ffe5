//! Per-column field resolution
//!
//! Joins the name normalizer and the type mapper: every column becomes a
//! Rust identifier plus the type it has in the row struct and in the
//! conversion object.

use proc_macro2::{Ident, Span};

use crate::error::{Error, Result};
use crate::schema::type_map::{map_column_type, plain_option_type, NullConvention};
use crate::schema::types::{ColumnDescriptor, TableDescriptor};
use crate::utils::naming::{
    check_identifier_conflicts, field_ident_name, is_rust_keyword, normalize_field_name,
};

/// A resolved struct field
#[derive(Debug, Clone)]
pub struct FieldSpec<'a> {
    pub column: &'a ColumnDescriptor,
    /// Normalized exported name, e.g. `FooID`
    pub exported_name: String,
    /// Field name without any `r#` prefix
    pub name: String,
    pub ident: Ident,
    pub ty: syn::Type,
    /// Type of the field in the conversion object
    pub object_ty: syn::Type,
}

impl FieldSpec<'_> {
    /// Whether converting between row struct and object needs `.into()`
    pub fn needs_conversion(&self) -> bool {
        self.ty != self.object_ty
    }
}

/// Resolve every column of a table, in ordinal order
pub fn build_fields<'a>(
    table: &'a TableDescriptor,
    convention: &NullConvention,
) -> Result<Vec<FieldSpec<'a>>> {
    let fields = table
        .columns
        .iter()
        .map(|column| build_field(column, convention))
        .collect::<Result<Vec<_>>>()?;

    let names: Vec<String> = fields.iter().map(|f| f.name.clone()).collect();
    if let Some((name, _)) = check_identifier_conflicts(&names, false) {
        let columns: Vec<&str> = fields
            .iter()
            .filter(|f| f.name == name)
            .map(|f| f.column.name.as_str())
            .collect();
        return Err(Error::ValidationError(format!(
            "columns {} of table `{}` all map to field `{}`",
            columns.join(", "),
            table.name,
            name
        )));
    }

    Ok(fields)
}

fn build_field<'a>(column: &'a ColumnDescriptor, convention: &NullConvention) -> Result<FieldSpec<'a>> {
    let exported_name = normalize_field_name(&column.name);
    let name = field_ident_name(&exported_name);
    let ident = rust_ident(&name)?;

    let ty = parse_type(&map_column_type(column, convention)?)?;
    let object_ty = parse_type(&plain_option_type(column)?)?;

    Ok(FieldSpec {
        column,
        exported_name,
        name,
        ident,
        ty,
        object_ty,
    })
}

/// Identifier for a field or struct, raw for keywords
pub fn rust_ident(name: &str) -> Result<Ident> {
    if is_rust_keyword(name) {
        return Ok(Ident::new_raw(name, Span::call_site()));
    }
    syn::parse_str::<Ident>(name)
        .map_err(|e| Error::ValidationError(format!("`{}` is not a valid identifier: {}", name, e)))
}

fn parse_type(ty: &str) -> Result<syn::Type> {
    syn::parse_str::<syn::Type>(ty)
        .map_err(|e| Error::ValidationError(format!("`{}` is not a valid type: {}", ty, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::ToTokens;

    fn type_string(ty: &syn::Type) -> String {
        ty.to_token_stream().to_string().replace(' ', "")
    }

    #[test]
    fn test_fields_in_ordinal_order() {
        let table = TableDescriptor::new("t")
            .with_column(ColumnDescriptor::new("gamma", "int"))
            .with_column(ColumnDescriptor::new("alpha", "varchar").nullable(true))
            .with_column(ColumnDescriptor::new("beta", "datetime"));

        let fields = build_fields(&table, &NullConvention::Option).unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["gamma", "alpha", "beta"]);
        assert_eq!(type_string(&fields[1].ty), "Option<String>");
    }

    #[test]
    fn test_keyword_column_is_raw() {
        let table = TableDescriptor::new("t").with_column(ColumnDescriptor::new("type", "varchar"));
        let fields = build_fields(&table, &NullConvention::Option).unwrap();
        assert_eq!(fields[0].name, "type");
        assert_eq!(fields[0].ident.to_string(), "r#type");
    }

    #[test]
    fn test_object_type_unwraps_wrapper() {
        let convention = NullConvention::Wrapper {
            path: "crate::nullable::Nullable".to_string(),
        };
        let table = TableDescriptor::new("t")
            .with_column(ColumnDescriptor::new("name", "varchar").nullable(true))
            .with_column(ColumnDescriptor::new("id", "int"));

        let fields = build_fields(&table, &convention).unwrap();
        assert_eq!(type_string(&fields[0].ty), "crate::nullable::Nullable<String>");
        assert_eq!(type_string(&fields[0].object_ty), "Option<String>");
        assert!(fields[0].needs_conversion());
        assert!(!fields[1].needs_conversion());
    }

    #[test]
    fn test_conflicting_columns() {
        let table = TableDescriptor::new("t")
            .with_column(ColumnDescriptor::new("foo_id", "int"))
            .with_column(ColumnDescriptor::new("fooId", "int"));

        let err = build_fields(&table, &NullConvention::Option).unwrap_err();
        assert!(matches!(err, Error::ValidationError(ref msg) if msg.contains("foo_id, fooId")));
    }

    #[test]
    fn test_unsupported_column_stops_the_table() {
        let table = TableDescriptor::new("t")
            .with_column(ColumnDescriptor::new("id", "int"))
            .with_column(ColumnDescriptor::new("shape", "geometry"));

        let err = build_fields(&table, &NullConvention::Option).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { ref column, .. } if column == "shape"));
    }

    #[test]
    fn test_bad_wrapper_path() {
        let convention = NullConvention::Wrapper {
            path: "not a path".to_string(),
        };
        let table =
            TableDescriptor::new("t").with_column(ColumnDescriptor::new("n", "int").nullable(true));
        assert!(build_fields(&table, &convention).is_err());
    }

    #[test]
    fn test_rust_ident() {
        assert_eq!(rust_ident("match").unwrap().to_string(), "r#match");
        assert_eq!(rust_ident("UserRoles").unwrap().to_string(), "UserRoles");
        assert!(rust_ident("Self").is_err());
        assert!(rust_ident("1abc").is_err());
    }
}
