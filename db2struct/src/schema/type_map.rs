//! Column type to Rust type mapping
//!
//! The dispatch is plain data: a base type keyword selects a [`TypeFamily`],
//! and the family together with nullability and the [`NullConvention`]
//! selects the concrete type path.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::schema::types::ColumnDescriptor;

/// How nullable columns are represented
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NullConvention {
    /// `Option<T>` everywhere
    #[default]
    Option,
    /// A user supplied wrapper, e.g. `crate::nullable::Nullable<T>`, for the
    /// families that have one
    Wrapper { path: String },
}

impl NullConvention {
    /// `None` selects the default convention
    pub fn from_wrapper(path: Option<&str>) -> Self {
        match path.map(str::trim) {
            Some(path) if !path.is_empty() => NullConvention::Wrapper {
                path: path.to_string(),
            },
            _ => NullConvention::Option,
        }
    }
}

/// Groups of base types that map the same way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    /// tinyint, smallint, mediumint, int
    Integer,
    BigInt,
    Text,
    Date,
    Time,
    DateTime,
    Float,
    Binary,
    /// `binary(16)`
    Uuid,
    Point,
}

static BASE_TYPES: Lazy<HashMap<&'static str, TypeFamily>> = Lazy::new(|| {
    use TypeFamily::*;
    HashMap::from([
        ("tinyint", Integer),
        ("smallint", Integer),
        ("mediumint", Integer),
        ("int", Integer),
        ("integer", Integer),
        ("bigint", BigInt),
        ("char", Text),
        ("varchar", Text),
        ("enum", Text),
        ("set", Text),
        ("tinytext", Text),
        ("text", Text),
        ("mediumtext", Text),
        ("longtext", Text),
        ("json", Text),
        ("date", Date),
        ("time", Time),
        ("datetime", DateTime),
        ("timestamp", DateTime),
        ("decimal", Float),
        ("double", Float),
        ("float", Float),
        ("binary", Binary),
        ("varbinary", Binary),
        ("tinyblob", Binary),
        ("blob", Binary),
        ("mediumblob", Binary),
        ("longblob", Binary),
        ("point", Point),
    ])
});

/// Width of a `binary` column holding a UUID
const UUID_WIDTH: u32 = 16;

/// Family of a column, or `None` for base types with no mapping
pub fn type_family(column: &ColumnDescriptor) -> Option<TypeFamily> {
    let family = *BASE_TYPES.get(column.base_type.to_lowercase().as_str())?;
    if family == TypeFamily::Binary
        && column.base_type.eq_ignore_ascii_case("binary")
        && column.width() == Some(UUID_WIDTH)
    {
        return Some(TypeFamily::Uuid);
    }
    Some(family)
}

/// Rust type for a column
///
/// Unmapped base types are an error; an empty type would produce a struct
/// that does not compile.
pub fn map_column_type(column: &ColumnDescriptor, convention: &NullConvention) -> Result<String> {
    let family = type_family(column).ok_or_else(|| Error::UnsupportedType {
        column: column.name.clone(),
        base_type: column.base_type.clone(),
    })?;

    Ok(rust_type(family, column.is_unsigned(), column.nullable, convention))
}

/// The mapping table proper
pub fn rust_type(
    family: TypeFamily,
    unsigned: bool,
    nullable: bool,
    convention: &NullConvention,
) -> String {
    use TypeFamily::*;

    // (non-null type, type inside the nullable wrapper, wrapper may differ from Option)
    let (plain, inner, wrappable) = match family {
        Integer => ("i32", "i64", true),
        BigInt if unsigned => ("u64", "u64", false),
        BigInt => ("i64", "i64", true),
        Text => ("String", "String", true),
        Date => ("chrono::NaiveDate", "chrono::NaiveDate", true),
        Time => ("chrono::NaiveTime", "chrono::NaiveTime", true),
        DateTime => ("chrono::NaiveDateTime", "chrono::NaiveDateTime", true),
        Float => ("f64", "f64", true),
        Binary => ("Vec<u8>", "Vec<u8>", false),
        Uuid => ("uuid::Uuid", "uuid::Uuid", false),
        Point => ("geo_types::Point<f64>", "geo_types::Point<f64>", false),
    };

    if !nullable {
        return plain.to_string();
    }

    match convention {
        NullConvention::Wrapper { path } if wrappable => format!("{}<{}>", path, inner),
        _ => format!("Option<{}>", inner),
    }
}

/// The type a nullable column takes in conversion objects: always `Option`
pub fn plain_option_type(column: &ColumnDescriptor) -> Result<String> {
    map_column_type(column, &NullConvention::Option)
}
