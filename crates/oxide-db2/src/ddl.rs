//! CREATE/DROP TABLE rendering from a resolved schema.

use oxide_dialect::{Dialect, TableSchema};

use crate::dialect::Db2Dialect;

impl Db2Dialect {
    /// Generates SQL for creating a table.
    ///
    /// Column types come from the schema as resolved, so identity clauses
    /// and NOT NULL/UNIQUE suffixes are already part of each type.
    #[must_use]
    pub fn create_table_sql(&self, schema: &TableSchema) -> String {
        let mut sql = String::from("CREATE TABLE ");
        sql.push_str(&self.quote(&schema.name));
        sql.push_str(" (");

        let col_defs: Vec<String> = schema
            .columns
            .iter()
            .map(|c| format!("{} {}", self.quote(c.name()), c.sql_type))
            .collect();
        sql.push_str(&col_defs.join(","));

        let primary_keys: Vec<String> = schema.primary_keys().map(|c| self.quote(c.name())).collect();
        if !primary_keys.is_empty() {
            sql.push_str(&format!(" , PRIMARY KEY ({})", primary_keys.join(",")));
        }

        sql.push(')');
        sql
    }

    /// Generates SQL for dropping a table.
    #[must_use]
    pub fn drop_table_sql(&self, table: &str) -> String {
        format!("DROP TABLE {}", self.quote(table))
    }
}
