//! JSON model descriptions used by the `oxide-db2` command-line tool.
//!
//! ```json
//! {
//!   "table": "users",
//!   "fields": [
//!     { "name": "Id", "kind": "i64", "tag": "PRIMARY_KEY;column:ID" },
//!     { "name": "Name", "kind": "string", "tag": "column:NAME;size:128" }
//!   ]
//! }
//! ```

use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use serde_json::{Map, Value};

use oxide_dialect::{
    DialectError, Field, FieldDescriptor, Result, Scope, SqlValue, ValueKind,
};

/// One field of a model description.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    /// Field name.
    pub name: String,
    /// Value kind.
    pub kind: ValueKind,
    /// Struct tag, e.g. `PRIMARY_KEY;column:ID`.
    #[serde(default)]
    pub tag: String,
    /// Whether the database supplies a default for this column.
    #[serde(default)]
    pub has_default: bool,
}

/// A table and its fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelFile {
    /// Table name.
    pub table: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldSpec>,
}

impl ModelFile {
    /// Loads a model description from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parses a model description from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the field descriptors used for type resolution.
    pub fn descriptors(&self) -> Result<Vec<FieldDescriptor>> {
        self.fields
            .iter()
            .map(|spec| FieldDescriptor::from_tag(&spec.name, spec.kind.clone(), &spec.tag))
            .collect()
    }

    /// Builds the write scope for one row.
    ///
    /// Row keys may be field or column names; missing fields are NULL.
    pub fn scope(&self, row: &Map<String, Value>) -> Result<Scope> {
        let mut scope = Scope::new(&self.table);
        for (spec, descriptor) in self.fields.iter().zip(self.descriptors()?) {
            let value = row
                .get(&descriptor.db_name)
                .or_else(|| row.get(&descriptor.name))
                .map_or(Ok(SqlValue::Null), |v| json_to_sql_value(v, &descriptor))?;

            let mut field = Field::new(&descriptor.name, value).column(&descriptor.db_name);
            if descriptor.is_primary_key {
                field = field.primary_key();
            }
            if spec.has_default {
                field = field.with_default();
            }
            scope = scope.field(field);
        }
        Ok(scope)
    }
}

fn json_to_sql_value(value: &Value, field: &FieldDescriptor) -> Result<SqlValue> {
    let invalid = || {
        DialectError::InvalidValue(format!(
            "{value} for field '{}' ({})",
            field.name, field.value_kind
        ))
    };

    let converted = match (&field.value_kind, value) {
        (_, Value::Null) => SqlValue::Null,
        (ValueKind::Bool, Value::Bool(b)) => SqlValue::Bool(*b),
        (ValueKind::F32 | ValueKind::F64, Value::Number(n)) => {
            SqlValue::Float(n.as_f64().ok_or_else(invalid)?)
        }
        (ValueKind::String, Value::String(s)) => SqlValue::Text(s.clone()),
        (ValueKind::Timestamp, Value::String(s)) => {
            SqlValue::Timestamp(parse_timestamp(s).ok_or_else(invalid)?)
        }
        (ValueKind::Bytes, Value::String(s)) => SqlValue::Blob(s.as_bytes().to_vec()),
        (ValueKind::ByteArray(len), Value::String(s)) if s.len() == *len => {
            SqlValue::Blob(s.as_bytes().to_vec())
        }
        (ValueKind::Struct(_), Value::String(s)) => SqlValue::Text(s.clone()),
        (kind, Value::Number(n)) => SqlValue::Int(fit_integer(kind, n).ok_or_else(invalid)?),
        _ => return Err(invalid()),
    };
    Ok(converted)
}

/// Returns the number as `i64` if it is an integer within the range of `kind`.
fn fit_integer(kind: &ValueKind, n: &serde_json::Number) -> Option<i64> {
    if let Some(u) = n.as_u64() {
        if matches!(kind, ValueKind::U64 | ValueKind::Usize) {
            return i64::try_from(u).ok();
        }
    }
    let n = n.as_i64()?;
    let fits = match kind {
        ValueKind::I8 => i8::try_from(n).is_ok(),
        ValueKind::I16 => i16::try_from(n).is_ok(),
        ValueKind::I32 => i32::try_from(n).is_ok(),
        ValueKind::I64 => true,
        ValueKind::Isize => isize::try_from(n).is_ok(),
        ValueKind::U8 => u8::try_from(n).is_ok(),
        ValueKind::U16 => u16::try_from(n).is_ok(),
        ValueKind::U32 => u32::try_from(n).is_ok(),
        ValueKind::U64 | ValueKind::Usize => u64::try_from(n).is_ok(),
        _ => false,
    };
    fits.then_some(n)
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
}
