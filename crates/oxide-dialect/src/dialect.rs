//! The dialect capability trait.
//!
//! A persistence runtime talks to every database engine through [`Dialect`].
//! Each engine is one implementation, selected by configuration.

use crate::connection::Connection;
use crate::error::Result;
use crate::field::FieldDescriptor;

/// The outcome of resolving a field's column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Column type declaration, including any suffix clause.
    pub decl: String,
    /// Whether the column is generated by the server.
    pub auto_increment: bool,
}

/// Trait for engine-specific SQL behavior.
#[allow(async_fn_in_trait)]
pub trait Dialect {
    /// Returns the driver name this dialect registers under.
    fn name(&self) -> &'static str;

    /// Returns the placeholder for the bind variable at `index` (1-based).
    fn bind_var(&self, _index: usize) -> String {
        String::from("?")
    }

    /// Quotes an identifier.
    fn quote(&self, key: &str) -> String {
        format!("\"{key}\"")
    }

    /// Resolves the column type of a field.
    ///
    /// Never mutates the descriptor; the caller records
    /// [`ResolvedType::auto_increment`] in its own schema.
    fn resolve_column(&self, field: &FieldDescriptor) -> Result<ResolvedType>;

    /// Returns the column type declaration of a field.
    fn data_type_of(&self, field: &FieldDescriptor) -> Result<String> {
        self.resolve_column(field).map(|resolved| resolved.decl)
    }

    /// Returns the LIMIT/OFFSET clause, with a leading space when non-empty.
    fn limit_and_offset_sql(&self, limit: Option<i64>, offset: Option<i64>) -> String;

    /// Returns whether the driver reports the last inserted id.
    fn supports_last_insert_id(&self) -> bool {
        true
    }

    /// Returns the clause appended to INSERT to return the generated key.
    fn last_insert_id_returning_suffix(&self, _table: &str, _key: &str) -> String {
        String::new()
    }

    /// Returns the FROM clause used for table-less SELECTs.
    fn select_from_dummy_table(&self) -> &'static str {
        ""
    }

    /// Returns the clause inserting a row made only of default values.
    fn default_value_str(&self) -> Result<&'static str>;

    /// Returns whether writes are wrapped in a transaction by the runtime.
    fn implicit_transactions(&self) -> bool {
        true
    }

    /// Builds a constraint or index name.
    fn build_key_name(&self, kind: &str, table: &str, fields: &[&str]) -> Result<String>;

    /// Returns the schema the connection works in.
    async fn current_database<C: Connection>(&self, conn: &C) -> Result<String>;

    /// Returns whether a table exists.
    async fn has_table<C: Connection>(&self, conn: &C, table: &str) -> Result<bool>;

    /// Returns whether a column exists.
    async fn has_column<C: Connection>(&self, conn: &C, table: &str, column: &str)
        -> Result<bool>;

    /// Returns whether a foreign key exists.
    async fn has_foreign_key<C: Connection>(
        &self,
        conn: &C,
        table: &str,
        foreign_key: &str,
    ) -> Result<bool>;

    /// Returns whether an index exists.
    async fn has_index<C: Connection>(&self, conn: &C, table: &str, index: &str) -> Result<bool>;

    /// Drops an index.
    async fn remove_index<C: Connection>(&self, conn: &C, table: &str, index: &str)
        -> Result<()>;

    /// Changes a column's type.
    async fn modify_column<C: Connection>(
        &self,
        conn: &C,
        table: &str,
        column: &str,
        sql_type: &str,
    ) -> Result<()>;
}
