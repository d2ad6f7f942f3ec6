//! Single-round-trip INSERT with generated key retrieval.
//!
//! DB2 has neither a session-level "last inserted id" nor a RETURNING
//! clause, so the INSERT is nested inside a query over the inserted row:
//!
//! ```text
//! SELECT ID FROM FINAL TABLE (INSERT INTO users (NAME) VALUES (?))
//! ```
//!
//! `FINAL TABLE` is resolved against the row produced by the nested
//! statement, so the key returned belongs to this insert even with
//! concurrent writers.

use oxide_dialect::{
    Connection, Dialect, DialectError, InsertRequest, Scope, Result, SqlValue, TableSchema,
};
use tracing::debug;

use crate::dialect::Db2Dialect;

/// The result of a successful insert.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOutcome {
    /// The server-generated primary key, when the table has one.
    pub generated_key: Option<SqlValue>,
    /// Rows written.
    pub rows_affected: u64,
}

fn add_extra_space_if_exist(s: &str) -> String {
    if s.is_empty() {
        String::new()
    } else {
        format!(" {s}")
    }
}

/// Wraps an INSERT so that it returns the generated primary key.
#[must_use]
pub fn wrap_for_key_retrieval(primary_key: &str, insert_sql: &str) -> String {
    format!("SELECT {primary_key} FROM FINAL TABLE ({insert_sql})")
}

impl Db2Dialect {
    /// Composes the bare INSERT statement for a request.
    ///
    /// A request without columns needs the default-values clause, which DB2
    /// does not support.
    pub fn compose_insert(&self, request: &InsertRequest) -> Result<String> {
        let option = add_extra_space_if_exist(request.insert_option.as_deref().unwrap_or_default());
        let suffix = add_extra_space_if_exist(&self.last_insert_id_returning_suffix(
            &request.table,
            request.primary_key.as_deref().unwrap_or("*"),
        ));

        if request.columns.is_empty() {
            return Ok(format!(
                "INSERT INTO {} {}{option}{suffix}",
                request.table,
                self.default_value_str()?,
            ));
        }

        let columns: Vec<&str> = request.column_names().collect();
        let placeholders: Vec<String> = (1..=request.columns.len())
            .map(|i| self.bind_var(i))
            .collect();
        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({}){option}{suffix}",
            request.table,
            columns.join(","),
            placeholders.join(","),
        ))
    }

    /// Builds the statement sent to the server and its bound values.
    ///
    /// With a primary key the INSERT is wrapped in a `FINAL TABLE` query.
    pub fn insert_statement(&self, request: &InsertRequest) -> Result<(String, Vec<SqlValue>)> {
        let insert = self.compose_insert(request)?;
        let sql = match &request.primary_key {
            Some(pk) => wrap_for_key_retrieval(pk, &insert),
            None => insert,
        };
        Ok((sql, request.values()))
    }

    /// Executes an insert and retrieves the generated key in one round trip.
    ///
    /// A key query that returns no row fails with [`DialectError::NoRows`];
    /// driver errors are returned unchanged.
    pub async fn execute_insert<C: Connection>(
        &self,
        conn: &C,
        request: &InsertRequest,
    ) -> Result<InsertOutcome> {
        let (sql, params) = self.insert_statement(request)?;
        debug!(sql = %sql, ?params, "Executing insert");

        if request.primary_key.is_none() {
            let rows_affected = conn.execute(&sql, &params).await?;
            return Ok(InsertOutcome {
                generated_key: None,
                rows_affected,
            });
        }

        let row = conn
            .query_row(&sql, &params)
            .await?
            .ok_or(DialectError::NoRows)?;
        let key = row.into_values().into_iter().next().ok_or(DialectError::NoRows)?;
        Ok(InsertOutcome {
            generated_key: Some(key),
            rows_affected: 1,
        })
    }

    /// Inserts the record held by a scope.
    ///
    /// On success the generated key is written into the scope's primary key
    /// field and rows-affected becomes 1. On failure the scope is left as it
    /// was: the key stays blank and rows-affected keeps its previous value.
    pub async fn create<C: Connection>(
        &self,
        conn: &C,
        scope: &mut Scope,
        schema: &TableSchema,
    ) -> Result<()> {
        let request = scope.insert_request(schema, self);
        let outcome = self.execute_insert(conn, &request).await?;

        if let Some(key) = outcome.generated_key {
            if let Some(primary) = scope.primary_field_mut() {
                primary.set_value(key);
                primary.is_blank = false;
            }
        }
        scope.set_rows_affected(outcome.rows_affected);
        Ok(())
    }
}
