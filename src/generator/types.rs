//! Fixed mapping from column type tags to record field and SQL types.
//!
//! The registry is closed: schemas cannot add tags. A tag that is not in
//! the table maps to an empty pair on both sides rather than an error, and
//! the generator renders whatever that produces. Callers that want to reject
//! such schemas use [`is_known`] (see `GeneratorOptions::strict_types`).

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Field type and SQL type for one tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeMapping {
    /// Rust type of the generated record field
    pub field_type: &'static str,
    /// PostgreSQL column type
    pub sql_type: &'static str,
}

impl TypeMapping {
    pub fn is_empty(&self) -> bool {
        self.field_type.is_empty() && self.sql_type.is_empty()
    }
}

/// Tag used for identifier columns
pub const UUID_TAG: &str = "UUID";

/// Every tag the registry knows, in a stable order
pub const TAGS: [&str; 10] = [
    "TEXT", UUID_TAG, "INTEGER", "SMALL", "BIG", "FLOAT", "DOUBLE", "POINT", "BOOL", "TIME",
];

static REGISTRY: Lazy<HashMap<&'static str, TypeMapping>> = Lazy::new(|| {
    let entries = [
        ("TEXT", "String", "TEXT"),
        (UUID_TAG, "String", "UUID"),
        ("INTEGER", "i32", "INTEGER"),
        ("SMALL", "i16", "SMALLINT"),
        ("BIG", "i64", "BIGINT"),
        ("FLOAT", "f32", "REAL"),
        ("DOUBLE", "f64", "DOUBLE PRECISION"),
        ("POINT", "String", "POINT"),
        ("BOOL", "bool", "BOOLEAN"),
        ("TIME", "i64", "TIMESTAMP WITH TIME ZONE"),
    ];
    entries
        .into_iter()
        .map(|(tag, field_type, sql_type)| {
            (
                tag,
                TypeMapping {
                    field_type,
                    sql_type,
                },
            )
        })
        .collect()
});

/// Look up a tag. Unknown tags yield an empty mapping.
pub fn lookup(tag: &str) -> TypeMapping {
    REGISTRY.get(tag).copied().unwrap_or_default()
}

pub fn field_type(tag: &str) -> &'static str {
    lookup(tag).field_type
}

pub fn sql_type(tag: &str) -> &'static str {
    lookup(tag).sql_type
}

pub fn is_known(tag: &str) -> bool {
    REGISTRY.contains_key(tag)
}

/// Whether columns with this tag hold identifiers and need the nil-UUID
/// default. Unlike [`lookup`] this ignores case.
pub fn is_identifier(tag: &str) -> bool {
    tag.eq_ignore_ascii_case(UUID_TAG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tag_is_mapped() {
        for tag in TAGS {
            let m = lookup(tag);
            assert!(!m.field_type.is_empty(), "{tag} has no field type");
            assert!(!m.sql_type.is_empty(), "{tag} has no SQL type");
            assert!(is_known(tag));
        }
    }

    #[test]
    fn test_unknown_tag_is_empty_pair() {
        for tag in ["VARCHAR", "text", "", "JSONB"] {
            let m = lookup(tag);
            assert_eq!(m, TypeMapping::default());
            assert!(m.is_empty());
            assert!(!is_known(tag));
        }
    }

    #[test]
    fn test_field_and_sql_agree() {
        assert_eq!(field_type("SMALL"), "i16");
        assert_eq!(sql_type("SMALL"), "SMALLINT");
        assert_eq!(field_type("TIME"), "i64");
        assert_eq!(sql_type("TIME"), "TIMESTAMP WITH TIME ZONE");
    }

    #[test]
    fn test_identifier_tag_ignores_case() {
        assert!(is_identifier("UUID"));
        assert!(is_identifier("uuid"));
        assert!(!is_identifier("TEXT"));
    }
}
