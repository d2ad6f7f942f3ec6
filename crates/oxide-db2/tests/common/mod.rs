#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use oxide_db2::Db2Dialect;
use oxide_dialect::{
    Connection, DialectError, FieldDescriptor, Result, Row, SqlValue, TableSchema, ValueKind,
};

/// A scripted reply to the next statement.
pub enum Reply {
    Row(Vec<SqlValue>),
    Empty,
    Affected(u64),
    Fail(&'static str),
}

/// Records every statement and answers from a script.
///
/// When the script runs dry, queries return no row and executes report
/// zero rows.
#[derive(Default)]
pub struct MockConnection {
    statements: Mutex<Vec<(String, Vec<SqlValue>)>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, reply: Reply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn statements(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.statements.lock().unwrap().clone()
    }

    pub fn sql(&self) -> Vec<String> {
        self.statements().into_iter().map(|(sql, _)| sql).collect()
    }

    fn record(&self, sql: &str, params: &[SqlValue]) -> Option<Reply> {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        self.replies.lock().unwrap().pop_front()
    }
}

fn driver_error(message: &'static str) -> DialectError {
    DialectError::driver(std::io::Error::new(std::io::ErrorKind::Other, message))
}

impl Connection for MockConnection {
    async fn query_row(&self, sql: &str, params: &[SqlValue]) -> Result<Option<Row>> {
        match self.record(sql, params) {
            Some(Reply::Row(values)) => Ok(Some(Row::new(values))),
            Some(Reply::Fail(message)) => Err(driver_error(message)),
            Some(Reply::Empty | Reply::Affected(_)) | None => Ok(None),
        }
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        match self.record(sql, params) {
            Some(Reply::Affected(rows)) => Ok(rows),
            Some(Reply::Fail(message)) => Err(driver_error(message)),
            Some(Reply::Row(_) | Reply::Empty) | None => Ok(0),
        }
    }
}

/// `users (ID i64 primary key, NAME string)`.
pub fn users_schema(dialect: &Db2Dialect) -> TableSchema {
    TableSchema::build(
        "users",
        vec![
            FieldDescriptor::new("Id", ValueKind::I64)
                .column("ID")
                .primary_key(),
            FieldDescriptor::new("Name", ValueKind::String).column("NAME"),
        ],
        dialect,
    )
    .expect("users schema resolves")
}
