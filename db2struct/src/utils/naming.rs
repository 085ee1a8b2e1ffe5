//! Naming utilities for db2struct
//!
//! Turns raw column and table identifiers into exported Rust names.
//! [`normalize_field_name`] is the entry point; the individual steps are
//! public so they can be tested and reused on their own.

use inflector::Inflector;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Common initialisms kept fully upper-case in generated names.
///
/// Only entries that are highly unlikely to be ordinary words belong here:
/// "ID" is fine, "AND" is not.
pub static COMMON_INITIALISMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID", "IP",
        "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SSH", "TLS", "TTL", "UI",
        "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML",
    ]
    .into_iter()
    .collect()
});

const DIGIT_WORDS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// Keywords that can be used as raw identifiers (`r#type`)
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers
const RESERVED_PATH_KEYWORDS: &[&str] = &["self", "Self", "super", "crate"];

/// Whether `word` is a recognized initialism
pub fn is_initialism(word: &str) -> bool {
    COMMON_INITIALISMS.contains(word)
}

/// Normalize a database identifier into an exported field name
///
/// Example:
///     normalize_field_name("foo_id") == "FooID"
///
/// The lint pass is repeated until the name is stable, so a few inputs
/// differ from a single pass: `"user-name"` gives `"UserName"` (not
/// `"User_name"`) and `"a_pi"` gives `"API"` (not `"APi"`).
pub fn normalize_field_name(name: &str) -> String {
    let mut current = fmt_field_name(&stringify_first_char(name));

    // Joining words can expose a new initialism ("a_pi" -> "APi" -> "API").
    // Every pass only drops characters or upper-cases letters, so this settles.
    loop {
        let next = fmt_field_name(&stringify_first_char(&current));
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Lint the name, then force it into a valid identifier shape: the first
/// character must be a letter, the rest letters or digits. Anything else
/// becomes `_`.
pub fn fmt_field_name(name: &str) -> String {
    lint_field_name(name)
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let ok = if i == 0 {
                c.is_alphabetic()
            } else {
                c.is_alphabetic() || c.is_numeric()
            };
            if ok {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Spell out a leading digit: `"1stringColumn"` becomes `"one_stringColumn"`.
/// Digits after the first character are left alone.
pub fn stringify_first_char(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next().and_then(|c| c.to_digit(10)) {
        Some(digit) => format!("{}_{}", DIGIT_WORDS[digit as usize], chars.as_str()),
        None => name.to_string(),
    }
}

/// Split a name into words on lower->non-lower transitions and underscore
/// runs, re-casing each word.
///
/// Underscore runs are dropped except between two digits, where a single
/// underscore survives (`"1__2"` becomes `"1_2"`).
pub fn lint_field_name(name: &str) -> String {
    if name == "_" {
        return name.to_string();
    }

    let name = name.trim_start_matches('_');
    if name.is_empty() {
        return String::new();
    }

    if name.chars().all(char::is_lowercase) {
        let upper = name.to_uppercase();
        if is_initialism(&upper) {
            return upper;
        }
        let mut runes: Vec<char> = name.chars().collect();
        upper_first(&mut runes, 0);
        return runes.into_iter().collect();
    }

    let mut runes: Vec<char> = name.chars().collect();
    // start of the current word, scan position
    let (mut w, mut i) = (0, 0);
    while i < runes.len() {
        let mut end_of_word = false;

        if i + 1 == runes.len() {
            end_of_word = true;
        } else if runes[i + 1] == '_' {
            end_of_word = true;
            let mut n = 1;
            while i + n + 1 < runes.len() && runes[i + n + 1] == '_' {
                n += 1;
            }

            if i + n + 1 < runes.len() && runes[i].is_numeric() && runes[i + n + 1].is_numeric() {
                n -= 1;
            }

            runes.drain(i + 1..i + 1 + n);
        } else if runes[i].is_lowercase() && !runes[i + 1].is_lowercase() {
            end_of_word = true;
        }
        i += 1;
        if !end_of_word {
            continue;
        }

        let word: String = runes[w..i].iter().collect();
        let upper = word.to_uppercase();
        if is_initialism(&upper) {
            let replacement: Vec<char> = upper.chars().collect();
            let len = replacement.len();
            runes.splice(w..i, replacement);
            i = w + len;
        } else if word.to_lowercase() == word {
            upper_first(&mut runes, w);
        }
        w = i;
    }

    runes.into_iter().collect()
}

/// Upper-case `runes[at]` when it maps to exactly one character
fn upper_first(runes: &mut [char], at: usize) {
    let mut upper = runes[at].to_uppercase();
    if let (Some(c), None) = (upper.next(), upper.next()) {
        runes[at] = c;
    }
}

/// Snake-case form of a normalized name, usable as a Rust field name.
///
/// Keywords are not escaped here; see [`is_rust_keyword`].
pub fn field_ident_name(normalized: &str) -> String {
    let mut name = normalized.to_snake_case();

    if name.trim_matches('_').is_empty() {
        name = "field_".to_string();
    } else if !name.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        name.insert_str(0, "field_");
    }
    if RESERVED_PATH_KEYWORDS.contains(&name.as_str()) {
        name.push('_');
    }

    name
}

/// Whether `name` must be written as a raw identifier
pub fn is_rust_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

/// Default struct name for a table
pub fn struct_name_for_table(table: &str) -> String {
    normalize_field_name(table)
}

/// Table name as used in URLs and file names: `user_roles` -> `user-roles`
pub fn table_kebab(table: &str) -> String {
    table.replace('_', "-")
}

/// Receiver name for methods on a struct: first letter, lower-cased
pub fn receiver_name(struct_name: &str) -> String {
    struct_name
        .chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_default()
}

/// Check for name conflicts in a list of identifiers
///
/// Returns the first pair of distinct inputs that map to the same key.
pub fn check_identifier_conflicts(names: &[String], ignore_case: bool) -> Option<(String, String)> {
    let mut seen = HashMap::<String, String>::new();

    for name in names {
        let key = if ignore_case {
            name.to_lowercase()
        } else {
            name.clone()
        };

        if let Some(existing) = seen.get(&key) {
            return Some((existing.clone(), name.clone()));
        }
        seen.insert(key, name.clone());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("_", "_")]
    #[case("foo_id", "FooID")]
    #[case("foo__id", "FooID")]
    #[case("1__2", "1_2")]
    #[case("_id", "ID")]
    #[case("foo", "Foo")]
    #[case("id", "ID")]
    #[case("url", "URL")]
    #[case("userId", "UserID")]
    #[case("HTTPServer", "HTTPServer")]
    #[case("api_key", "APIKey")]
    #[case("stringColumn", "StringColumn")]
    #[case("__", "")]
    fn test_lint_field_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(lint_field_name(input), expected);
    }

    #[rstest]
    #[case("foo_id", "FooID")]
    #[case("foo__id", "FooID")]
    #[case("_id", "ID")]
    #[case("API", "API")]
    #[case("1stringColumn", "OneStringColumn")]
    #[case("nullStringColumn", "NullStringColumn")]
    #[case("created_at", "CreatedAt")]
    #[case("user-name", "UserName")]
    #[case("a_pi", "API")]
    #[case("_", "_")]
    fn test_normalize_field_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_field_name(input), expected);
    }

    #[test]
    fn test_stringify_first_char() {
        assert_eq!(stringify_first_char("1stringColumn"), "one_stringColumn");
        assert_eq!(stringify_first_char("0x"), "zero_x");
        assert_eq!(stringify_first_char("9"), "nine_");
        assert_eq!(stringify_first_char("a1"), "a1");
        assert_eq!(stringify_first_char("12"), "one_2");
        assert_eq!(stringify_first_char(""), "");
    }

    #[test]
    fn test_fmt_replaces_invalid_characters() {
        assert_eq!(fmt_field_name("price$"), "Price_");
        assert_eq!(fmt_field_name("1__2"), "__2");
    }

    #[test]
    fn test_normalize_is_idempotent_on_examples() {
        for input in ["foo_id", "1stringColumn", "API", "_id", "a1_2", "user_roles", "ui_d", "a_pi", "price$"] {
            let once = normalize_field_name(input);
            assert_eq!(normalize_field_name(&once), once, "input {input}");
        }
    }

    #[rstest]
    #[case("FooID", "foo_id")]
    #[case("StringColumn", "string_column")]
    #[case("OneStringColumn", "one_string_column")]
    #[case("Type", "type")]
    #[case("Self", "self_")]
    #[case("_", "field_")]
    #[case("", "field_")]
    fn test_field_ident_name(#[case] normalized: &str, #[case] expected: &str) {
        assert_eq!(field_ident_name(normalized), expected);
    }

    #[test]
    fn test_keywords() {
        assert!(is_rust_keyword("type"));
        assert!(is_rust_keyword("match"));
        assert!(!is_rust_keyword("self"));
        assert!(!is_rust_keyword("name"));
    }

    #[test]
    fn test_table_helpers() {
        assert_eq!(struct_name_for_table("user_roles"), "UserRoles");
        assert_eq!(struct_name_for_table("api_keys"), "APIKeys");
        assert_eq!(table_kebab("user_roles"), "user-roles");
        assert_eq!(receiver_name("UserRoles"), "u");
        assert_eq!(receiver_name(""), "");
    }

    #[test]
    fn test_identifier_conflicts() {
        let names = vec!["foo_id".to_string(), "bar".to_string(), "foo_id".to_string()];
        assert_eq!(
            check_identifier_conflicts(&names, false),
            Some(("foo_id".to_string(), "foo_id".to_string()))
        );

        let names = vec!["User".to_string(), "user".to_string()];
        assert!(check_identifier_conflicts(&names, false).is_none());
        assert!(check_identifier_conflicts(&names, true).is_some());
    }
}
