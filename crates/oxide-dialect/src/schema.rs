//! Table schemas resolved against a dialect.
//!
//! The schema layer owns the auto-increment determination for each column.
//! Dialects report it from [`Dialect::resolve_column`]; [`TableSchema`]
//! records it once and insert construction reads it back.

use tracing::debug;

use crate::dialect::Dialect;
use crate::error::Result;
use crate::field::FieldDescriptor;

/// A resolved column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    /// The field this column persists.
    pub field: FieldDescriptor,
    /// Column type declaration.
    pub sql_type: String,
    /// Whether the server generates this column's value.
    pub auto_increment: bool,
}

impl ColumnSchema {
    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.field.db_name
    }
}

/// A table whose columns have been resolved by a dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    /// Resolves every field of a table.
    ///
    /// Fails on the first field whose type cannot be resolved.
    pub fn build<D: Dialect>(
        name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
        dialect: &D,
    ) -> Result<Self> {
        let mut schema = Self {
            name: name.into(),
            columns: Vec::with_capacity(fields.len()),
        };
        for field in fields {
            let resolved = dialect.resolve_column(&field)?;
            debug!(
                table = %schema.name,
                column = %field.db_name,
                sql_type = %resolved.decl,
                auto_increment = resolved.auto_increment,
                "Resolved column type"
            );
            schema.columns.push(ColumnSchema {
                field,
                sql_type: resolved.decl,
                auto_increment: resolved.auto_increment,
            });
        }
        Ok(schema)
    }

    /// Re-resolves every column.
    ///
    /// The auto-increment flag is only ever set, never cleared, so running
    /// this repeatedly leaves the schema unchanged.
    pub fn refresh<D: Dialect>(&mut self, dialect: &D) -> Result<()> {
        for column in &mut self.columns {
            let resolved = dialect.resolve_column(&column.field)?;
            column.sql_type = resolved.decl;
            if resolved.auto_increment && !column.auto_increment {
                column.auto_increment = true;
            }
        }
        Ok(())
    }

    /// Returns a column by column or field name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns
            .iter()
            .find(|c| c.field.db_name == name || c.field.name == name)
    }

    /// Returns the primary key columns in declaration order.
    pub fn primary_keys(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter().filter(|c| c.field.is_primary_key)
    }

    /// Returns the first primary key column.
    #[must_use]
    pub fn primary_key(&self) -> Option<&ColumnSchema> {
        self.primary_keys().next()
    }

    /// Returns whether a column was resolved as auto-increment.
    #[must_use]
    pub fn is_auto_increment(&self, name: &str) -> bool {
        self.column(name).is_some_and(|c| c.auto_increment)
    }
}
