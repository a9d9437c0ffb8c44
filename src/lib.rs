//! # styledb - Writing-style vocabulary loader
//!
//! Builds a relational database from a YAML style guide: every vocabulary
//! entry becomes an `item` row and every cross-reference between entries
//! becomes a `reference` row pointing at real item identifiers.
//!
//! styledb provides:
//! - A record source reading the style-guide document into typed records
//! - A schema provisioner that rebuilds the database from a DDL script
//! - A two-phase loader: insert every entry first, link references second
//! - Read-only inspection queries over a finished database

pub mod entry;
pub mod source;
pub mod storage;
pub mod linker;
pub mod loader;
pub mod pipeline;
pub mod config;
pub mod output;
pub mod ui;

use std::path::PathBuf;

// Re-exports for convenient access
pub use entry::{Entry, EntryId, NewEntry, UsageRecommendation};
pub use source::{RecordAttributes, SourceRecord};
pub use storage::{SchemaScript, SqliteStore};
pub use linker::{LinkStats, ReferenceLinker, ResolutionMode};
pub use loader::{LoadSummary, Loader};
pub use pipeline::{LoadOptions, LoadPaths};

/// Result type alias for styledb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for styledb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot read source document {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed source document: {0}")]
    SourceFormat(#[from] serde_yaml::Error),

    #[error("Malformed record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("Cannot read schema script {path}: {source}")]
    SchemaUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to apply schema: {0}")]
    SchemaApply(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Unresolved reference: '{from}' refers to unknown entry '{target}'")]
    UnresolvedReference { from: String, target: String },

    #[error("Ambiguous reference: '{from}' refers to '{target}', which matches {matches} entries")]
    AmbiguousReference {
        from: String,
        target: String,
        matches: usize,
    },

    #[error("Invalid usage recommendation: {0}")]
    InvalidUsage(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error belongs to reference resolution rather than to
    /// reading or storing entries.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Error::UnresolvedReference { .. } | Error::AmbiguousReference { .. }
        )
    }
}
