//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - item(id, name, class, desc, use_it, type)
//! - reference(id_current, id_refer)
//!
//! A load writes through a [`LoadTransaction`]; inspection commands read
//! through [`SqliteStore`] directly.

pub mod schema;
pub mod sqlite;

pub use schema::{SchemaScript, DEFAULT_SCHEMA};
pub use sqlite::{SqliteStore, LoadTransaction, DbStats};
