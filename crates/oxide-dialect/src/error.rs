//! Error types for dialect operations.

use thiserror::Error;

/// Errors raised while resolving types or executing statements through a dialect.
#[derive(Debug, Error)]
pub enum DialectError {
    /// No column type rule matched the field and no `TYPE` override was given.
    #[error("invalid sql type for field '{field}' ({kind})")]
    UnresolvedType {
        /// The field name.
        field: String,
        /// The value kind that could not be mapped.
        kind: String,
    },

    /// The dialect does not implement the requested operation.
    #[error("{0} not implemented")]
    Unsupported(&'static str),

    /// Error reported by the underlying database driver.
    #[error("driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A statement that must return a row returned none.
    #[error("no rows in result set")]
    NoRows,

    /// The operation needs a primary key value that the table or row lacks.
    #[error("missing primary key for table '{0}'")]
    MissingPrimaryKey(String),

    /// An UPDATE was requested with no assignable columns.
    #[error("nothing to update in table '{0}'")]
    EmptyUpdate(String),

    /// A struct tag could not be parsed.
    #[error("invalid tag: {0}")]
    InvalidTag(String),

    /// A value does not fit the kind of the field it is assigned to.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (reading config or model files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DialectError {
    /// Wraps a driver error, keeping it as the error source.
    pub fn driver(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Driver(Box::new(err))
    }

    /// Returns whether this error is a configuration error that retrying cannot fix.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedType { .. } | Self::Unsupported(_) | Self::InvalidTag(_)
        )
    }
}

/// Result type alias for dialect operations.
pub type Result<T> = std::result::Result<T, DialectError>;
