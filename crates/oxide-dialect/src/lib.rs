//! # oxide-dialect
//!
//! The engine-neutral contract between a persistence runtime and the SQL
//! dialects plugged beneath it.
//!
//! This crate provides:
//! - [`Dialect`], the capability trait each engine implements
//! - [`FieldDescriptor`] and [`TagSettings`] describing persisted attributes
//! - [`TableSchema`], which owns the resolved column types of a table
//! - [`Scope`] and [`InsertRequest`] for single-row writes
//! - [`Connection`], the statement execution primitives a driver supplies
//!
//! ## Resolving a schema
//!
//! ```ignore
//! use oxide_dialect::{FieldDescriptor, TableSchema, ValueKind};
//!
//! let fields = vec![
//!     FieldDescriptor::from_tag("Id", ValueKind::I64, "PRIMARY_KEY;column:ID")?,
//!     FieldDescriptor::from_tag("Name", ValueKind::String, "column:NAME;size:128")?,
//! ];
//! let schema = TableSchema::build("users", fields, &dialect)?;
//! assert!(schema.is_auto_increment("ID"));
//! ```

mod connection;
mod dialect;
mod error;
pub mod field;
mod schema;
mod scope;
mod value;

pub use connection::{Connection, Row};
pub use dialect::{Dialect, ResolvedType};
pub use error::{DialectError, Result};
pub use field::{FieldDescriptor, TagSettings, ValueKind};
pub use schema::{ColumnSchema, TableSchema};
pub use scope::{Field, InsertRequest, Relationship, RelationshipKind, Scope};
pub use value::{SqlValue, ToSqlValue};
