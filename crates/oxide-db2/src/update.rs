//! Single-row UPDATE by primary key.

use oxide_dialect::{Connection, Dialect, DialectError, Result, Scope, SqlValue};
use tracing::debug;

use crate::dialect::Db2Dialect;

impl Db2Dialect {
    /// Builds `UPDATE <t> SET <c> = ?,... WHERE <pk> = ?` for a scope.
    ///
    /// Every changeable scalar field except the primary key is assigned; the
    /// primary key value is bound last.
    pub fn update_statement(&self, scope: &Scope) -> Result<(String, Vec<SqlValue>)> {
        let primary = scope
            .primary_field()
            .filter(|f| !f.is_blank)
            .ok_or_else(|| DialectError::MissingPrimaryKey(scope.table().to_string()))?;

        let mut assignments = Vec::new();
        let mut params = Vec::new();
        for field in scope.fields() {
            if !field.is_normal || field.is_primary_key || !scope.changeable_field(field) {
                continue;
            }
            params.push(field.value.clone());
            assignments.push(format!(
                "{} = {}",
                self.quote(&field.db_name),
                self.bind_var(params.len())
            ));
        }
        if assignments.is_empty() {
            return Err(DialectError::EmptyUpdate(scope.table().to_string()));
        }

        params.push(primary.value.clone());
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = {}",
            self.quote(scope.table()),
            assignments.join(","),
            self.quote(&primary.db_name),
            self.bind_var(params.len())
        );
        Ok((sql, params))
    }

    /// Updates the record held by a scope, storing the driver's row count.
    ///
    /// No transaction is opened around the statement.
    pub async fn execute_update<C: Connection>(&self, conn: &C, scope: &mut Scope) -> Result<()> {
        let (sql, params) = self.update_statement(scope)?;
        debug!(sql = %sql, ?params, "Executing update");
        let rows_affected = conn.execute(&sql, &params).await?;
        scope.set_rows_affected(rows_affected);
        Ok(())
    }
}
