//! Dialect configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use oxide_dialect::Result;

/// Size given to text columns that carry no explicit `SIZE` hint.
pub const DEFAULT_TEXT_SIZE: usize = 64;

/// First size that no longer fits an inline VARCHAR/VARBINARY column.
pub const MAX_INLINE_SIZE: usize = 32673;

/// Settings for [`Db2Dialect`](crate::Db2Dialect).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Db2Config {
    /// Size used for text columns without a `SIZE` hint.
    pub text_default_size: usize,
    /// Sizes at or above this become CLOB/BLOB.
    pub max_inline_size: usize,
    /// Schema to use instead of asking the server for `CURRENT SCHEMA`.
    pub schema: Option<String>,
}

impl Default for Db2Config {
    fn default() -> Self {
        Self {
            text_default_size: DEFAULT_TEXT_SIZE,
            max_inline_size: MAX_INLINE_SIZE,
            schema: None,
        }
    }
}

impl Db2Config {
    /// Loads a configuration from a JSON file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replaces the fixed schema when one is given.
    #[must_use]
    pub fn with_schema(mut self, schema: Option<String>) -> Self {
        if let Some(schema) = schema {
            self.schema = Some(schema);
        }
        self
    }
}
