use proptest::prelude::*;

use db2struct::utils::naming::{field_ident_name, normalize_field_name};

proptest! {
    #[test]
    fn normalize_is_idempotent(name in "[a-z][a-z0-9_]{0,24}") {
        let once = normalize_field_name(&name);
        prop_assert_eq!(normalize_field_name(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_on_any_identifier(name in "[a-zA-Z0-9_$ Üïßé-]{0,24}") {
        let once = normalize_field_name(&name);
        prop_assert_eq!(normalize_field_name(&once), once);
    }

    #[test]
    fn normalized_names_are_identifiers(name in "[a-zA-Z0-9_$-]{1,24}") {
        let normalized = normalize_field_name(&name);
        prop_assert!(normalized.chars().all(|c| c.is_alphanumeric() || c == '_'));
        prop_assert!(!normalized.starts_with(|c: char| c.is_numeric()));
    }

    #[test]
    fn field_names_parse(name in "[a-z][a-z0-9_]{0,24}") {
        let field = field_ident_name(&normalize_field_name(&name));
        prop_assert!(db2struct::codegen::fields::rust_ident(&field).is_ok(), "{}", field);
    }
}
