//! Per-row write state handed to a dialect by the persistence runtime.
//!
//! A [`Scope`] holds the field values of one record together with the
//! caller's select/omit filters. Dialects turn it into an [`InsertRequest`]
//! and write the generated primary key back into it.

use tracing::debug;

use crate::dialect::Dialect;
use crate::schema::TableSchema;
use crate::value::SqlValue;

/// Kind of association a non-scalar field represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    BelongsTo,
    HasOne,
    HasMany,
    ManyToMany,
}

/// An association to another model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Association kind.
    pub kind: RelationshipKind,
    /// Foreign key columns held by this record.
    pub foreign_db_names: Vec<String>,
}

impl Relationship {
    /// Creates a belongs-to association over the given foreign key columns.
    #[must_use]
    pub fn belongs_to(foreign_db_names: &[&str]) -> Self {
        Self {
            kind: RelationshipKind::BelongsTo,
            foreign_db_names: foreign_db_names.iter().map(ToString::to_string).collect(),
        }
    }
}

/// One field of a record being written.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name in the model.
    pub name: String,
    /// Column name in the database.
    pub db_name: String,
    /// Current value.
    pub value: SqlValue,
    /// Whether this field is part of the primary key.
    pub is_primary_key: bool,
    /// Whether this is a persisted scalar (as opposed to an association).
    pub is_normal: bool,
    /// Whether the value is the zero value of its kind.
    pub is_blank: bool,
    /// Whether the column has a database-side default.
    pub has_default_value: bool,
    /// Association, for non-scalar fields.
    pub relationship: Option<Relationship>,
}

impl Field {
    /// Creates a scalar field whose column name equals the field name.
    #[must_use]
    pub fn new(name: impl Into<String>, value: SqlValue) -> Self {
        let name = name.into();
        Self {
            db_name: name.clone(),
            name,
            is_blank: value.is_blank(),
            value,
            is_primary_key: false,
            is_normal: true,
            has_default_value: false,
            relationship: None,
        }
    }

    /// Creates an association field.
    #[must_use]
    pub fn relation(name: impl Into<String>, relationship: Relationship) -> Self {
        Self {
            is_normal: false,
            relationship: Some(relationship),
            ..Self::new(name, SqlValue::Null)
        }
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

    /// Marks the column as having a database-side default.
    #[must_use]
    pub fn with_default(mut self) -> Self {
        self.has_default_value = true;
        self
    }

    /// Replaces the value, recomputing blankness.
    pub fn set_value(&mut self, value: SqlValue) {
        self.is_blank = value.is_blank();
        self.value = value;
    }

    fn matches(&self, attr: &str) -> bool {
        self.name == attr || self.db_name == attr
    }
}

/// An INSERT of one row, ready for composition.
///
/// Columns and values are stored as pairs so they always line up.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertRequest {
    /// Quoted table name.
    pub table: String,
    /// Quoted column names and their bound values, in order.
    pub columns: Vec<(String, SqlValue)>,
    /// Quoted primary key column whose generated value is retrieved.
    pub primary_key: Option<String>,
    /// Extra option appended after the VALUES clause.
    pub insert_option: Option<String>,
}

impl InsertRequest {
    /// Creates an empty request for a table.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            primary_key: None,
            insert_option: None,
        }
    }

    /// Adds a column and its value.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>, value: SqlValue) -> Self {
        self.columns.push((name.into(), value));
        self
    }

    /// Sets the primary key column to retrieve.
    #[must_use]
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    /// Sets the extra insert option.
    #[must_use]
    pub fn insert_option(mut self, option: impl Into<String>) -> Self {
        self.insert_option = Some(option.into());
        self
    }

    /// Returns the column names.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the bound values in column order.
    #[must_use]
    pub fn values(&self) -> Vec<SqlValue> {
        self.columns.iter().map(|(_, value)| value.clone()).collect()
    }
}

/// The write state of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    table: String,
    fields: Vec<Field>,
    select_attrs: Vec<String>,
    omit_attrs: Vec<String>,
    insert_option: Option<String>,
    blank_columns_with_default_value: Vec<String>,
    rows_affected: u64,
}

impl Scope {
    /// Creates a scope for a table.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            fields: Vec::new(),
            select_attrs: Vec::new(),
            omit_attrs: Vec::new(),
            insert_option: None,
            blank_columns_with_default_value: Vec::new(),
            rows_affected: 0,
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Restricts writes to the given field or column names.
    #[must_use]
    pub fn select(mut self, attrs: &[&str]) -> Self {
        self.select_attrs = attrs.iter().map(ToString::to_string).collect();
        self
    }

    /// Excludes the given field or column names from writes.
    #[must_use]
    pub fn omit(mut self, attrs: &[&str]) -> Self {
        self.omit_attrs = attrs.iter().map(ToString::to_string).collect();
        self
    }

    /// Sets an option appended to the INSERT statement.
    #[must_use]
    pub fn insert_option(mut self, option: impl Into<String>) -> Self {
        self.insert_option = Some(option.into());
        self
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns a field by field or column name.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.matches(name))
    }

    /// Returns the first primary key field.
    #[must_use]
    pub fn primary_field(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_primary_key)
    }

    /// Returns the first primary key field mutably.
    pub fn primary_field_mut(&mut self) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.is_primary_key)
    }

    /// Returns the rows affected by the last write.
    #[must_use]
    pub const fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    /// Records the rows affected by a write.
    pub fn set_rows_affected(&mut self, rows: u64) {
        self.rows_affected = rows;
    }

    /// Returns the blank columns skipped because the database has a default for them.
    #[must_use]
    pub fn blank_columns_with_default_value(&self) -> &[String] {
        &self.blank_columns_with_default_value
    }

    /// Returns whether a field passes the select/omit filters.
    ///
    /// A non-empty select list wins over the omit list.
    #[must_use]
    pub fn changeable_field(&self, field: &Field) -> bool {
        if !self.select_attrs.is_empty() {
            return self.select_attrs.iter().any(|attr| field.matches(attr));
        }
        !self.omit_attrs.iter().any(|attr| field.matches(attr))
    }

    /// Builds the INSERT request for this record.
    ///
    /// Blank auto-increment columns are left out so the server generates
    /// them; blank columns with a database default are recorded in
    /// [`Self::blank_columns_with_default_value`] instead of being inserted.
    /// Belongs-to foreign keys filtered out of the normal pass are still
    /// written.
    pub fn insert_request<D: Dialect>(&mut self, schema: &TableSchema, dialect: &D) -> InsertRequest {
        let mut request = InsertRequest::new(dialect.quote(&self.table));
        let mut blank_with_default = Vec::new();

        for field in &self.fields {
            if !self.changeable_field(field) {
                continue;
            }
            if field.is_normal {
                let auto_increment = schema
                    .column(&field.db_name)
                    .map_or(field.is_primary_key, |c| c.auto_increment);
                if field.is_blank && field.has_default_value {
                    blank_with_default.push(dialect.quote(&field.db_name));
                } else if !(field.is_blank && auto_increment) {
                    request
                        .columns
                        .push((dialect.quote(&field.db_name), field.value.clone()));
                }
            } else if let Some(relationship) = &field.relationship {
                if relationship.kind != RelationshipKind::BelongsTo {
                    continue;
                }
                for foreign_key in &relationship.foreign_db_names {
                    if let Some(foreign) = self.field_by_name(foreign_key) {
                        if !self.changeable_field(foreign) {
                            request
                                .columns
                                .push((dialect.quote(&foreign.db_name), foreign.value.clone()));
                        }
                    }
                }
            }
        }

        if !blank_with_default.is_empty() {
            debug!(
                table = %self.table,
                columns = ?blank_with_default,
                "Skipping blank columns with default value"
            );
        }
        self.blank_columns_with_default_value = blank_with_default;

        request.primary_key = self
            .primary_field()
            .map(|f| dialect.quote(&f.db_name));
        request.insert_option = self.insert_option.clone();
        request
    }
}
