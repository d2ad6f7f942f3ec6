//! Catalog queries against the DB2 system tables.

use oxide_dialect::{Connection, DialectError, Result, SqlValue};
use tracing::debug;

/// Returns the session's current schema.
pub const CURRENT_SCHEMA_SQL: &str = "select current schema as name from sysibm.sysdummy1";

/// Counts tables of a given name in a schema.
pub const HAS_TABLE_SQL: &str =
    "SELECT count(*) FROM sysibm.systables WHERE name = ? AND type = 'T' AND tabspace = ?";

/// Counts columns of a given name in a table.
pub const HAS_COLUMN_SQL: &str =
    "SELECT count(*) FROM syscat.columns WHERE tabname = ? AND colname = ? AND tabschema = ?";

/// Counts foreign keys over the given column list.
pub const HAS_FOREIGN_KEY_SQL: &str =
    "select count(*) from sysibm.sysrels where tbname = ? and strip(fkcolnames) = ? and creator = ?";

/// Queries the current schema name.
pub async fn current_schema<C: Connection>(conn: &C) -> Result<String> {
    let row = conn
        .query_row(CURRENT_SCHEMA_SQL, &[])
        .await?
        .ok_or(DialectError::NoRows)?;
    match row.get(0) {
        Some(SqlValue::Text(name)) => Ok(name.trim().to_string()),
        _ => Err(DialectError::NoRows),
    }
}

/// Runs a `count(*)` query and reports whether the count is positive.
pub async fn exists<C: Connection>(conn: &C, sql: &str, params: &[SqlValue]) -> Result<bool> {
    debug!(sql, ?params, "Catalog lookup");
    let row = conn
        .query_row(sql, params)
        .await?
        .ok_or(DialectError::NoRows)?;
    let count = match row.get(0) {
        Some(SqlValue::Int(n)) => *n,
        Some(SqlValue::Text(text)) => text
            .trim()
            .parse()
            .map_err(|_| DialectError::InvalidValue(format!("count '{text}' from catalog")))?,
        Some(other) => {
            return Err(DialectError::InvalidValue(format!(
                "count {other:?} from catalog"
            )))
        }
        None => return Err(DialectError::NoRows),
    };
    Ok(count > 0)
}
