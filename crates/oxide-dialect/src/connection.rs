//! The database connection contract dialects execute statements through.

use crate::error::Result;
use crate::value::SqlValue;

/// One result row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<SqlValue>,
}

impl Row {
    /// Creates a row from its column values.
    #[must_use]
    pub const fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    /// Returns the value at a column index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Consumes the row, returning its values.
    #[must_use]
    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<SqlValue>> for Row {
    fn from(values: Vec<SqlValue>) -> Self {
        Self::new(values)
    }
}

/// A database connection supplied by the driver layer.
///
/// Implementations wrap driver failures with [`DialectError::driver`] so the
/// original error stays reachable through `source()`. Timeouts and
/// cancellation belong to the implementation.
///
/// [`DialectError::driver`]: crate::DialectError::driver
#[allow(async_fn_in_trait)]
pub trait Connection {
    /// Runs a statement and returns its first row, or `None` if it produced no rows.
    async fn query_row(&self, sql: &str, params: &[SqlValue]) -> Result<Option<Row>>;

    /// Runs a statement without a result set and returns the rows affected.
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_access() {
        let row = Row::from(vec![SqlValue::Int(42), SqlValue::Text("x".into())]);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get(0), Some(&SqlValue::Int(42)));
        assert_eq!(row.get(2), None);
        assert!(!row.is_empty());
        assert!(Row::default().is_empty());
    }
}
