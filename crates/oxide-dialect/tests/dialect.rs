//! Tests for the dialect contract through a minimal engine: default trait
//! methods, schema resolution and insert request building.

use std::cell::Cell;

use oxide_dialect::{
    Connection, Dialect, DialectError, Field, FieldDescriptor, ResolvedType, Result, Row, Scope,
    SqlValue, TableSchema, ValueKind,
};

/// Resolves every field as `int`; primary keys auto-increment only while
/// `generate_keys` is set.
struct PlainDialect {
    generate_keys: Cell<bool>,
}

impl PlainDialect {
    fn new() -> Self {
        Self {
            generate_keys: Cell::new(true),
        }
    }
}

impl Dialect for PlainDialect {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn resolve_column(&self, field: &FieldDescriptor) -> Result<ResolvedType> {
        if let ValueKind::Struct(_) = field.value_kind {
            return Err(DialectError::UnresolvedType {
                field: field.name.clone(),
                kind: field.value_kind.to_string(),
            });
        }
        Ok(ResolvedType {
            decl: "int".to_string(),
            auto_increment: field.is_primary_key && self.generate_keys.get(),
        })
    }

    fn limit_and_offset_sql(&self, limit: Option<i64>, _offset: Option<i64>) -> String {
        limit.map(|n| format!(" LIMIT {n}")).unwrap_or_default()
    }

    fn default_value_str(&self) -> Result<&'static str> {
        Ok("DEFAULT VALUES")
    }

    fn build_key_name(&self, kind: &str, table: &str, fields: &[&str]) -> Result<String> {
        Ok(format!("{kind}_{table}_{}", fields.join("_")))
    }

    async fn current_database<C: Connection>(&self, conn: &C) -> Result<String> {
        let row = conn.query_row("SELECT db()", &[]).await?.ok_or(DialectError::NoRows)?;
        match row.get(0) {
            Some(SqlValue::Text(name)) => Ok(name.clone()),
            _ => Err(DialectError::NoRows),
        }
    }

    async fn has_table<C: Connection>(&self, _conn: &C, _table: &str) -> Result<bool> {
        Ok(true)
    }

    async fn has_column<C: Connection>(
        &self,
        _conn: &C,
        _table: &str,
        _column: &str,
    ) -> Result<bool> {
        Ok(true)
    }

    async fn has_foreign_key<C: Connection>(
        &self,
        _conn: &C,
        _table: &str,
        _foreign_key: &str,
    ) -> Result<bool> {
        Ok(false)
    }

    async fn has_index<C: Connection>(&self, _conn: &C, _table: &str, _index: &str) -> Result<bool> {
        Ok(false)
    }

    async fn remove_index<C: Connection>(&self, _conn: &C, _table: &str, _index: &str) -> Result<()> {
        Ok(())
    }

    async fn modify_column<C: Connection>(
        &self,
        _conn: &C,
        _table: &str,
        _column: &str,
        _sql_type: &str,
    ) -> Result<()> {
        Ok(())
    }
}

struct NamedDatabase(&'static str);

impl Connection for NamedDatabase {
    async fn query_row(&self, _sql: &str, _params: &[SqlValue]) -> Result<Option<Row>> {
        Ok(Some(Row::new(vec![SqlValue::Text(self.0.to_string())])))
    }

    async fn execute(&self, _sql: &str, _params: &[SqlValue]) -> Result<u64> {
        Ok(0)
    }
}

fn users_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("Id", ValueKind::I64).column("ID").primary_key(),
        FieldDescriptor::new("Age", ValueKind::I32).column("AGE"),
    ]
}

#[test]
fn default_trait_methods() {
    let dialect = PlainDialect::new();
    assert_eq!(dialect.bind_var(3), "?");
    assert_eq!(dialect.quote("users"), "\"users\"");
    assert!(dialect.supports_last_insert_id());
    assert_eq!(dialect.last_insert_id_returning_suffix("users", "id"), "");
    assert_eq!(dialect.select_from_dummy_table(), "");
    assert!(dialect.implicit_transactions());

    let age = FieldDescriptor::new("Age", ValueKind::I32);
    assert_eq!(dialect.data_type_of(&age).expect("resolves"), "int");
}

#[test]
fn schema_build_records_resolution() {
    let dialect = PlainDialect::new();
    let schema = TableSchema::build("users", users_fields(), &dialect).expect("resolves");

    assert_eq!(schema.columns.len(), 2);
    assert_eq!(schema.primary_key().map(|c| c.name()), Some("ID"));
    assert!(schema.is_auto_increment("ID"));
    assert!(schema.is_auto_increment("Id"));
    assert!(!schema.is_auto_increment("AGE"));
    assert!(!schema.is_auto_increment("MISSING"));
}

#[test]
fn schema_refresh_never_clears_auto_increment() {
    let dialect = PlainDialect::new();
    let mut schema = TableSchema::build("users", users_fields(), &dialect).expect("resolves");

    dialect.generate_keys.set(false);
    schema.refresh(&dialect).expect("resolves");
    assert!(schema.is_auto_increment("ID"));
}

#[test]
fn schema_build_stops_at_unresolved_field() {
    let dialect = PlainDialect::new();
    let mut fields = users_fields();
    fields.push(FieldDescriptor::new("Home", ValueKind::Struct("Address".into())));

    let err = TableSchema::build("users", fields, &dialect).unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(err, DialectError::UnresolvedType { field, .. } if field == "Home"));
}

#[test]
fn insert_request_uses_schema_and_quoting() {
    let dialect = PlainDialect::new();
    let schema = TableSchema::build("users", users_fields(), &dialect).expect("resolves");
    let mut scope = Scope::new("users")
        .field(Field::new("Id", SqlValue::Int(0)).column("ID").primary_key())
        .field(Field::new("Age", SqlValue::Int(30)).column("AGE"));

    let request = scope.insert_request(&schema, &dialect);

    assert_eq!(request.table, "\"users\"");
    assert_eq!(request.column_names().collect::<Vec<_>>(), vec!["\"AGE\""]);
    assert_eq!(request.values(), vec![SqlValue::Int(30)]);
    assert_eq!(request.primary_key.as_deref(), Some("\"ID\""));
}

#[test]
fn insert_request_falls_back_to_primary_key_flag() {
    let dialect = PlainDialect::new();
    let schema = TableSchema::build("users", Vec::new(), &dialect).expect("resolves");
    let mut scope = Scope::new("users")
        .field(Field::new("Id", SqlValue::Int(0)).column("ID").primary_key())
        .field(Field::new("Age", SqlValue::Int(0)).column("AGE"));

    let request = scope.insert_request(&schema, &dialect);

    assert_eq!(request.column_names().collect::<Vec<_>>(), vec!["\"AGE\""]);
}

#[tokio::test]
async fn current_database_through_connection() {
    let dialect = PlainDialect::new();
    let conn = NamedDatabase("main");
    assert_eq!(dialect.current_database(&conn).await.expect("query"), "main");
}
