//! Schema provisioning
//!
//! The schema is a DDL script applied verbatim to a brand new database. The
//! loader only relies on the tables and columns listed in
//! [`REQUIRED_COLUMNS`]; anything else the script creates (indexes, extra
//! columns with defaults, views) is left alone.

use std::fs;
use std::path::Path;
use rusqlite::Connection;
use crate::{Error, Result};

/// The DDL shipped with the crate, identical to `db_schema.sql`
pub const DEFAULT_SCHEMA: &str = include_str!("../../db_schema.sql");

/// Columns the loader reads or writes, per table
pub const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("item", &["id", "name", "class", "desc", "use_it", "type"]),
    ("reference", &["id_current", "id_refer"]),
];

/// A schema definition script and where it came from
#[derive(Debug, Clone)]
pub struct SchemaScript {
    sql: String,
    origin: String,
}

impl SchemaScript {
    /// Read the script from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let sql = fs::read_to_string(path).map_err(|source| Error::SchemaUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            sql,
            origin: path.display().to_string(),
        })
    }

    /// The schema bundled with the crate
    pub fn bundled() -> Self {
        Self {
            sql: DEFAULT_SCHEMA.to_string(),
            origin: "bundled schema".to_string(),
        }
    }

    pub fn from_sql(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            origin: "inline schema".to_string(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// Apply the script and check that it produced every required column.
pub fn provision(conn: &Connection, script: &SchemaScript) -> Result<()> {
    conn.execute_batch(script.sql())
        .map_err(|e| Error::SchemaApply(format!("{}: {}", script.origin(), e)))?;

    for (table, columns) in REQUIRED_COLUMNS {
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
        let present = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if present.is_empty() {
            return Err(Error::SchemaApply(format!(
                "{} does not create table '{}'",
                script.origin(),
                table
            )));
        }

        if let Some(missing) = columns.iter().find(|c| !present.iter().any(|p| p == *c)) {
            return Err(Error::SchemaApply(format!(
                "{} does not create column '{}.{}'",
                script.origin(),
                table,
                missing
            )));
        }
    }

    tracing::debug!("Applied {}", script.origin());
    Ok(())
}

/// Delete a database file left by an earlier run.
///
/// Returns whether a file was removed.
pub fn discard_database(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    tracing::debug!("Removed previous database {}", path.display());
    Ok(true)
}
