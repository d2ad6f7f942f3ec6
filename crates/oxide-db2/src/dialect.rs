//! The DB2 dialect.

use std::sync::OnceLock;

use oxide_dialect::{
    Connection, Dialect, DialectError, FieldDescriptor, ResolvedType, Result, SqlValue,
};
use tracing::debug;

use crate::config::Db2Config;
use crate::introspect;
use crate::types;

/// DB2 dialect, registered under the `cli` driver name.
///
/// DB2 has no way to report the last inserted id, so inserts go through
/// [`Db2Dialect::create`], which retrieves generated keys with
/// `SELECT ... FROM FINAL TABLE (INSERT ...)`.
///
/// Writes are never wrapped in an implicit transaction; transaction
/// boundaries are left to the application.
#[derive(Debug, Default)]
pub struct Db2Dialect {
    config: Db2Config,
    current_schema: OnceLock<String>,
}

impl Db2Dialect {
    /// Creates a DB2 dialect with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a DB2 dialect from a configuration.
    #[must_use]
    pub fn with_config(config: Db2Config) -> Self {
        let current_schema = config
            .schema
            .clone()
            .map_or_else(OnceLock::new, OnceLock::from);
        Self {
            config,
            current_schema,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &Db2Config {
        &self.config
    }
}

impl Dialect for Db2Dialect {
    fn name(&self) -> &'static str {
        "cli"
    }

    // DB2 identifiers are passed through unquoted.
    fn quote(&self, key: &str) -> String {
        key.to_string()
    }

    fn resolve_column(&self, field: &FieldDescriptor) -> Result<ResolvedType> {
        types::resolve(field, &self.config)
    }

    // OFFSET is only valid after LIMIT.
    fn limit_and_offset_sql(&self, limit: Option<i64>, offset: Option<i64>) -> String {
        let mut sql = String::new();
        let Some(limit) = limit.filter(|l| *l >= 0) else {
            return sql;
        };
        sql.push_str(&format!(" LIMIT {limit}"));
        if let Some(offset) = offset.filter(|o| *o >= 0) {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
        sql
    }

    fn supports_last_insert_id(&self) -> bool {
        false
    }

    fn select_from_dummy_table(&self) -> &'static str {
        "FROM DUAL"
    }

    fn default_value_str(&self) -> Result<&'static str> {
        Err(DialectError::Unsupported("default value"))
    }

    fn implicit_transactions(&self) -> bool {
        false
    }

    fn build_key_name(&self, _kind: &str, _table: &str, _fields: &[&str]) -> Result<String> {
        Err(DialectError::Unsupported("build key name"))
    }

    async fn current_database<C: Connection>(&self, conn: &C) -> Result<String> {
        if let Some(schema) = self.current_schema.get() {
            return Ok(schema.clone());
        }
        let schema = introspect::current_schema(conn).await?;
        debug!(schema = %schema, "Resolved current schema");
        Ok(self.current_schema.get_or_init(|| schema).clone())
    }

    async fn has_table<C: Connection>(&self, conn: &C, table: &str) -> Result<bool> {
        let schema = self.current_database(conn).await?;
        introspect::exists(
            conn,
            introspect::HAS_TABLE_SQL,
            &[SqlValue::Text(table.to_string()), SqlValue::Text(schema)],
        )
        .await
    }

    async fn has_column<C: Connection>(
        &self,
        conn: &C,
        table: &str,
        column: &str,
    ) -> Result<bool> {
        let schema = self.current_database(conn).await?;
        introspect::exists(
            conn,
            introspect::HAS_COLUMN_SQL,
            &[
                SqlValue::Text(table.to_string()),
                SqlValue::Text(column.to_string()),
                SqlValue::Text(schema),
            ],
        )
        .await
    }

    async fn has_foreign_key<C: Connection>(
        &self,
        conn: &C,
        table: &str,
        foreign_key: &str,
    ) -> Result<bool> {
        let schema = self.current_database(conn).await?;
        introspect::exists(
            conn,
            introspect::HAS_FOREIGN_KEY_SQL,
            &[
                SqlValue::Text(table.to_string()),
                SqlValue::Text(foreign_key.to_string()),
                SqlValue::Text(schema),
            ],
        )
        .await
    }

    async fn has_index<C: Connection>(&self, _conn: &C, _table: &str, _index: &str) -> Result<bool> {
        Err(DialectError::Unsupported("has index"))
    }

    async fn remove_index<C: Connection>(&self, _conn: &C, _table: &str, _index: &str) -> Result<()> {
        Err(DialectError::Unsupported("remove index"))
    }

    async fn modify_column<C: Connection>(
        &self,
        _conn: &C,
        _table: &str,
        _column: &str,
        _sql_type: &str,
    ) -> Result<()> {
        Err(DialectError::Unsupported("modify column"))
    }
}
