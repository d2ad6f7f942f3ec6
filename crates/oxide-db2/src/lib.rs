//! IBM DB2 dialect for the oxide persistence runtime.
//!
//! `oxide-db2` plugs DB2 beneath [`oxide_dialect`]:
//! - Column types are derived from each field's value kind and tag hints
//! - Generated keys are read back in the same round trip as the insert,
//!   with `SELECT <pk> FROM FINAL TABLE (INSERT ...)`
//! - Catalog introspection goes through `sysibm`/`syscat`
//! - Writes never open implicit transactions
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_db2::Db2Dialect;
//! use oxide_dialect::{Field, FieldDescriptor, Scope, SqlValue, TableSchema, ValueKind};
//!
//! let dialect = Db2Dialect::new();
//! let schema = TableSchema::build(
//!     "users",
//!     vec![
//!         FieldDescriptor::from_tag("Id", ValueKind::I64, "PRIMARY_KEY;column:ID")?,
//!         FieldDescriptor::from_tag("Name", ValueKind::String, "column:NAME")?,
//!     ],
//!     &dialect,
//! )?;
//!
//! let mut scope = Scope::new("users")
//!     .field(Field::new("Id", SqlValue::Int(0)).column("ID").primary_key())
//!     .field(Field::new("Name", SqlValue::Text("x".into())).column("NAME"));
//!
//! // SELECT ID FROM FINAL TABLE (INSERT INTO users (NAME) VALUES (?))
//! dialect.create(&conn, &mut scope, &schema).await?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Print CREATE TABLE for a model
//! oxide-db2 ddl user.json
//!
//! # Print the key-returning insert for one row
//! oxide-db2 insert user.json row.json
//! ```

pub mod config;
mod ddl;
pub mod dialect;
mod insert;
pub mod introspect;
pub mod model;
pub mod types;
mod update;

pub use config::Db2Config;
pub use dialect::Db2Dialect;
pub use insert::{wrap_for_key_retrieval, InsertOutcome};
pub use model::ModelFile;
pub use types::IDENTITY_CLAUSE;
