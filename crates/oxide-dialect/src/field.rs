//! Field descriptors consumed by column type resolution.
//!
//! A [`FieldDescriptor`] is a snapshot of one persisted attribute: its value
//! kind, declared size, primary-key flag and the hints parsed from its struct
//! tag. Dialects read descriptors; they never write to them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DialectError, Result};

/// Hint naming an explicit SQL type that bypasses inference.
pub const TYPE: &str = "TYPE";
/// Hint carrying an explicit column size.
pub const SIZE: &str = "SIZE";
/// Hint forcing auto-increment on or off.
pub const AUTO_INCREMENT: &str = "AUTO_INCREMENT";
/// Hint adding a NOT NULL clause after the column type.
pub const NOT_NULL: &str = "NOT NULL";
/// Hint adding a UNIQUE clause after the column type.
pub const UNIQUE: &str = "UNIQUE";
/// Hint marking the field as part of the primary key.
pub const PRIMARY_KEY: &str = "PRIMARY_KEY";
/// Hint overriding the column name.
pub const COLUMN: &str = "COLUMN";

/// The semantic kind of a field's runtime value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    /// Date and time value.
    Timestamp,
    /// Variable-length byte sequence.
    Bytes,
    /// Fixed-length byte array.
    ByteArray(usize),
    /// Any other nested structure, by type name.
    Struct(String),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::I8 => f.write_str("i8"),
            Self::I16 => f.write_str("i16"),
            Self::I32 => f.write_str("i32"),
            Self::I64 => f.write_str("i64"),
            Self::Isize => f.write_str("isize"),
            Self::U8 => f.write_str("u8"),
            Self::U16 => f.write_str("u16"),
            Self::U32 => f.write_str("u32"),
            Self::U64 => f.write_str("u64"),
            Self::Usize => f.write_str("usize"),
            Self::F32 => f.write_str("f32"),
            Self::F64 => f.write_str("f64"),
            Self::String => f.write_str("string"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::Bytes => f.write_str("bytes"),
            Self::ByteArray(n) => write!(f, "[u8; {n}]"),
            Self::Struct(name) => write!(f, "struct {name}"),
        }
    }
}

/// Ordered hint-name to hint-value mapping parsed from a struct tag.
///
/// Names are stored upper-cased, so lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSettings {
    entries: Vec<(String, String)>,
}

impl TagSettings {
    /// Creates an empty set of hints.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parses a tag such as `PRIMARY_KEY;column:ID;not null`.
    ///
    /// Entries are separated by `;`. The name ends at the first `:`; a bare
    /// name maps to itself.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        let mut settings = Self::new();
        for entry in tag.split(';') {
            let (name, value) = match entry.split_once(':') {
                Some((name, value)) => (name.trim().to_uppercase(), value.to_string()),
                None => {
                    let name = entry.trim().to_uppercase();
                    (name.clone(), name)
                }
            };
            if !name.is_empty() {
                settings.insert(name, value);
            }
        }
        settings
    }

    /// Returns the value of a hint.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_uppercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns whether a hint is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets a hint, keeping the position of an existing entry.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref().to_uppercase();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Iterates over hints in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of hints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there are no hints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A snapshot of one persisted attribute, as seen by type resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name in the model.
    pub name: String,
    /// Column name in the database.
    pub db_name: String,
    /// Kind of the runtime value.
    pub value_kind: ValueKind,
    /// Explicit maximum length or precision (0 = unset).
    pub declared_size: usize,
    /// Whether this field is part of the primary key.
    pub is_primary_key: bool,
    /// Hints parsed from the struct tag.
    pub tag_settings: TagSettings,
}

impl FieldDescriptor {
    /// Creates a descriptor whose column name equals the field name.
    #[must_use]
    pub fn new(name: impl Into<String>, value_kind: ValueKind) -> Self {
        let name = name.into();
        Self {
            db_name: name.clone(),
            name,
            value_kind,
            declared_size: 0,
            is_primary_key: false,
            tag_settings: TagSettings::new(),
        }
    }

    /// Creates a descriptor from a struct tag.
    ///
    /// `COLUMN` sets the column name, `PRIMARY_KEY` the key flag and `SIZE`
    /// the declared size.
    pub fn from_tag(name: impl Into<String>, value_kind: ValueKind, tag: &str) -> Result<Self> {
        let mut field = Self::new(name, value_kind);
        field.tag_settings = TagSettings::parse(tag);

        if let Some(column) = field.tag_settings.get(COLUMN) {
            field.db_name = column.trim().to_string();
        }
        field.is_primary_key = field.tag_settings.contains(PRIMARY_KEY);
        if let Some(size) = field.tag_settings.get(SIZE) {
            field.declared_size = size.trim().parse().map_err(|_| {
                DialectError::InvalidTag(format!("size '{size}' of field '{}'", field.name))
            })?;
        }
        Ok(field)
    }

    /// Sets the column name.
    #[must_use]
    pub fn column(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self
    }

    /// Marks the field as primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Sets an explicit size.
    #[must_use]
    pub fn size(mut self, size: usize) -> Self {
        self.declared_size = size;
        self.tag_settings.insert(SIZE, size.to_string());
        self
    }

    /// Adds a hint.
    #[must_use]
    pub fn tag(mut self, name: &str, value: impl Into<String>) -> Self {
        self.tag_settings.insert(name, value);
        self
    }

    /// Returns the explicit SQL type, if the tag overrides inference.
    #[must_use]
    pub fn sql_type_override(&self) -> Option<&str> {
        self.tag_settings
            .get(TYPE)
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Returns whether the size came from an explicit hint.
    #[must_use]
    pub fn has_explicit_size(&self) -> bool {
        self.tag_settings.contains(SIZE)
    }

    /// Returns the clause appended after the column type (NOT NULL, UNIQUE).
    #[must_use]
    pub fn additional_type(&self) -> String {
        let not_null = self.tag_settings.get(NOT_NULL).unwrap_or_default();
        let unique = self.tag_settings.get(UNIQUE).unwrap_or_default();
        format!("{not_null} {unique}").trim().to_string()
    }
}
