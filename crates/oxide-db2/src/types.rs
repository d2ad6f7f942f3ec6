//! Column type resolution for DB2.
//!
//! Rules are tried in order and the first match wins:
//!
//! 1. an explicit `TYPE` hint is used verbatim;
//! 2. otherwise the value kind picks the type, with integer kinds gaining an
//!    identity clause when the field can auto-increment;
//! 3. the NOT NULL/UNIQUE suffix is appended when present.
//!
//! A kind no rule covers is a configuration error.

use oxide_dialect::field::AUTO_INCREMENT;
use oxide_dialect::{DialectError, FieldDescriptor, ResolvedType, Result, ValueKind};

use crate::config::Db2Config;

/// Identity clause appended to auto-increment integer columns.
pub const IDENTITY_CLAUSE: &str = "GENERATED ALWAYS AS IDENTITY (START WITH 1 INCREMENT BY 1)";

/// Returns whether a field's column should be generated by the server.
///
/// An `AUTO_INCREMENT` hint decides when present: any value other than
/// `false` (case-insensitive) enables it. Without the hint, primary keys
/// auto-increment.
#[must_use]
pub fn can_auto_increment(field: &FieldDescriptor) -> bool {
    match field.tag_settings.get(AUTO_INCREMENT) {
        Some(value) => !value.trim().eq_ignore_ascii_case("false"),
        None => field.is_primary_key,
    }
}

/// Resolves the DB2 column type of a field.
pub fn resolve(field: &FieldDescriptor, config: &Db2Config) -> Result<ResolvedType> {
    let (base, auto_increment) = match field.sql_type_override() {
        Some(sql_type) => (sql_type.to_string(), false),
        None => infer(field, config).ok_or_else(|| DialectError::UnresolvedType {
            field: field.name.clone(),
            kind: field.value_kind.to_string(),
        })?,
    };

    let additional = field.additional_type();
    let decl = if additional.is_empty() {
        base
    } else {
        format!("{base} {additional}")
    };

    Ok(ResolvedType {
        decl,
        auto_increment,
    })
}

fn infer(field: &FieldDescriptor, config: &Db2Config) -> Option<(String, bool)> {
    let inline = |size: usize| size > 0 && size < config.max_inline_size;

    let resolved = match &field.value_kind {
        ValueKind::Bool => plain("boolean"),
        ValueKind::I8 | ValueKind::I16 | ValueKind::U8 => integer("smallint", field),
        ValueKind::I32 | ValueKind::U16 => integer("integer", field),
        ValueKind::I64 | ValueKind::Isize | ValueKind::U32 | ValueKind::U64 | ValueKind::Usize => {
            integer("bigint", field)
        }
        ValueKind::F32 => plain("real"),
        ValueKind::F64 => plain("double"),
        ValueKind::String => {
            let size = if field.has_explicit_size() || field.declared_size > 0 {
                field.declared_size
            } else {
                config.text_default_size
            };
            if inline(size) {
                plain(&format!("varchar({size})"))
            } else if size >= config.max_inline_size {
                plain("clob")
            } else {
                return None;
            }
        }
        ValueKind::Timestamp => plain("timestamp"),
        ValueKind::Bytes | ValueKind::ByteArray(_) => {
            let size = match field.value_kind {
                ValueKind::ByteArray(len) if field.declared_size == 0 => len,
                _ => field.declared_size,
            };
            if inline(size) {
                plain(&format!("varbinary({size})"))
            } else {
                plain("blob")
            }
        }
        ValueKind::Struct(_) => return None,
    };
    Some(resolved)
}

fn plain(sql_type: &str) -> (String, bool) {
    (sql_type.to_string(), false)
}

fn integer(sql_type: &str, field: &FieldDescriptor) -> (String, bool) {
    if can_auto_increment(field) {
        (format!("{sql_type} {IDENTITY_CLAUSE}"), true)
    } else {
        plain(sql_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_dialect::field::{NOT_NULL, TYPE, UNIQUE};

    fn resolve_default(field: &FieldDescriptor) -> Result<ResolvedType> {
        resolve(field, &Db2Config::default())
    }

    fn decl(field: &FieldDescriptor) -> String {
        resolve_default(field).expect("resolvable field").decl
    }

    #[test]
    fn test_scalar_types() {
        assert_eq!(decl(&FieldDescriptor::new("Active", ValueKind::Bool)), "boolean");
        assert_eq!(decl(&FieldDescriptor::new("Ratio", ValueKind::F32)), "real");
        assert_eq!(decl(&FieldDescriptor::new("Latitude", ValueKind::F64)), "double");
        assert_eq!(
            decl(&FieldDescriptor::new("CreatedAt", ValueKind::Timestamp)),
            "timestamp"
        );
    }

    #[test]
    fn test_integer_widths() {
        for kind in [ValueKind::I8, ValueKind::I16, ValueKind::U8] {
            assert_eq!(decl(&FieldDescriptor::new("N", kind)), "smallint");
        }
        for kind in [ValueKind::I32, ValueKind::U16] {
            assert_eq!(decl(&FieldDescriptor::new("N", kind)), "integer");
        }
        for kind in [
            ValueKind::I64,
            ValueKind::Isize,
            ValueKind::U32,
            ValueKind::U64,
            ValueKind::Usize,
        ] {
            assert_eq!(decl(&FieldDescriptor::new("N", kind)), "bigint");
        }
    }

    #[test]
    fn test_primary_key_gets_identity() {
        let field = FieldDescriptor::new("Id", ValueKind::I64).primary_key();
        let resolved = resolve_default(&field).expect("resolvable");
        assert_eq!(
            resolved.decl,
            "bigint GENERATED ALWAYS AS IDENTITY (START WITH 1 INCREMENT BY 1)"
        );
        assert!(resolved.auto_increment);

        let field = FieldDescriptor::new("Id", ValueKind::I16).primary_key();
        assert_eq!(decl(&field), format!("smallint {IDENTITY_CLAUSE}"));
    }

    #[test]
    fn test_auto_increment_hint_overrides_primary_key() {
        let field = FieldDescriptor::new("Id", ValueKind::I32)
            .primary_key()
            .tag(AUTO_INCREMENT, "FALSE");
        let resolved = resolve_default(&field).expect("resolvable");
        assert_eq!(resolved.decl, "integer");
        assert!(!resolved.auto_increment);

        let field = FieldDescriptor::new("Seq", ValueKind::I32).tag(AUTO_INCREMENT, "yes");
        let resolved = resolve_default(&field).expect("resolvable");
        assert_eq!(resolved.decl, format!("integer {IDENTITY_CLAUSE}"));
        assert!(resolved.auto_increment);
    }

    #[test]
    fn test_auto_increment_ignored_for_non_integers() {
        let field = FieldDescriptor::new("Id", ValueKind::String).primary_key();
        let resolved = resolve_default(&field).expect("resolvable");
        assert_eq!(resolved.decl, "varchar(64)");
        assert!(!resolved.auto_increment);
    }

    #[test]
    fn test_text_sizing_boundary() {
        assert_eq!(decl(&FieldDescriptor::new("Name", ValueKind::String)), "varchar(64)");
        assert_eq!(
            decl(&FieldDescriptor::new("Body", ValueKind::String).size(32673)),
            "clob"
        );
        assert_eq!(
            decl(&FieldDescriptor::new("Body", ValueKind::String).size(32672)),
            "varchar(32672)"
        );
    }

    #[test]
    fn test_text_explicit_zero_size_is_unresolved() {
        let field = FieldDescriptor::new("Name", ValueKind::String).size(0);
        let err = resolve_default(&field).unwrap_err();
        assert!(matches!(err, DialectError::UnresolvedType { .. }));
    }

    #[test]
    fn test_text_default_size_from_config() {
        let config = Db2Config {
            text_default_size: 255,
            ..Db2Config::default()
        };
        let field = FieldDescriptor::new("Name", ValueKind::String);
        let resolved = resolve(&field, &config).expect("resolvable");
        assert_eq!(resolved.decl, "varchar(255)");
    }

    #[test]
    fn test_byte_sequences() {
        assert_eq!(decl(&FieldDescriptor::new("Data", ValueKind::Bytes)), "blob");
        assert_eq!(
            decl(&FieldDescriptor::new("Data", ValueKind::Bytes).size(16)),
            "varbinary(16)"
        );
        assert_eq!(
            decl(&FieldDescriptor::new("Data", ValueKind::Bytes).size(40000)),
            "blob"
        );
        assert_eq!(
            decl(&FieldDescriptor::new("Hash", ValueKind::ByteArray(32))),
            "varbinary(32)"
        );
    }

    #[test]
    fn test_type_override() {
        let field = FieldDescriptor::new("Price", ValueKind::Struct("Decimal".into()))
            .tag(TYPE, "decimal(10,2)")
            .tag(NOT_NULL, "NOT NULL");
        let resolved = resolve_default(&field).expect("resolvable");
        assert_eq!(resolved.decl, "decimal(10,2) NOT NULL");
        assert!(!resolved.auto_increment);
    }

    #[test]
    fn test_type_override_skips_identity() {
        let field = FieldDescriptor::new("Id", ValueKind::I64)
            .primary_key()
            .tag(TYPE, "decimal(31,0)");
        let resolved = resolve_default(&field).expect("resolvable");
        assert_eq!(resolved.decl, "decimal(31,0)");
        assert!(!resolved.auto_increment);
    }

    #[test]
    fn test_suffix_composition() {
        let field = FieldDescriptor::new("Age", ValueKind::I32).tag(NOT_NULL, "not null");
        assert_eq!(decl(&field), "integer not null");

        let field = FieldDescriptor::new("Age", ValueKind::I32).tag(NOT_NULL, "   ");
        assert_eq!(decl(&field), "integer");

        let field = FieldDescriptor::new("Email", ValueKind::String)
            .tag(NOT_NULL, "NOT NULL")
            .tag(UNIQUE, "UNIQUE");
        assert_eq!(decl(&field), "varchar(64) NOT NULL UNIQUE");
    }

    #[test]
    fn test_struct_is_unresolved() {
        let field = FieldDescriptor::new("Location", ValueKind::Struct("Point".into()));
        let err = resolve_default(&field).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "invalid sql type for field 'Location' (struct Point)"
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let fields = [
            FieldDescriptor::new("Id", ValueKind::I64).primary_key(),
            FieldDescriptor::new("Name", ValueKind::String).size(128),
            FieldDescriptor::new("Data", ValueKind::Bytes),
        ];
        for field in &fields {
            assert_eq!(resolve_default(field).ok(), resolve_default(field).ok());
        }
    }
}
