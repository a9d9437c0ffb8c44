//! The whole conversion: style-guide document in, database file out.

use crate::config::{DEFAULT_DATABASE_FILE, DEFAULT_SCHEMA_FILE, DEFAULT_SOURCE_FILE};
use crate::linker::ResolutionMode;
use crate::loader::{LoadSummary, Loader};
use crate::source::{self, SourceRecord};
use crate::storage::{schema, SchemaScript, SqliteStore};
use crate::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Files taking part in one load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadPaths {
    pub source: PathBuf,
    pub schema: PathBuf,
    pub database: PathBuf,
}

impl Default for LoadPaths {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE_FILE),
            schema: PathBuf::from(DEFAULT_SCHEMA_FILE),
            database: PathBuf::from(DEFAULT_DATABASE_FILE),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub mode: ResolutionMode,
}

/// Read the document and the schema, then rebuild the database.
///
/// Both inputs are read before the old database is touched, so an
/// unreadable document or schema leaves it as it was.
pub fn run(paths: &LoadPaths, options: &LoadOptions) -> Result<LoadSummary> {
    let records = source::read_records(&paths.source)?;
    let schema = SchemaScript::from_file(&paths.schema)?;
    run_with(records, &schema, &paths.database, options)
}

/// Rebuild the database at `database` from already parsed records.
///
/// A failed load removes the database file instead of leaving a half-built one.
pub fn run_with(
    records: Vec<SourceRecord>,
    schema: &SchemaScript,
    database: &Path,
    options: &LoadOptions,
) -> Result<LoadSummary> {
    let result = load_database(records, schema, database, options);

    if let Err(e) = &result {
        tracing::error!("Load into {} failed: {}", database.display(), e);
        match schema::discard_database(database) {
            Ok(true) => tracing::warn!("Removed incomplete database {}", database.display()),
            Ok(false) => {}
            Err(cleanup) => tracing::warn!(
                "Could not remove incomplete database {}: {}",
                database.display(),
                cleanup
            ),
        }
    }

    result
}

fn load_database(
    records: Vec<SourceRecord>,
    schema: &SchemaScript,
    database: &Path,
    options: &LoadOptions,
) -> Result<LoadSummary> {
    ensure_parent_dir(database)?;
    // The connection is closed when `store` drops, before any cleanup runs.
    let mut store = SqliteStore::create(database)?;
    Loader::new(options.mode).load(&mut store, schema, records)
}

fn ensure_parent_dir(database: &Path) -> Result<()> {
    if let Some(parent) = database.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            tracing::debug!("Created {}", parent.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::TempDir;

    const GUIDE: &str = r#"
- utilize:
    class: verb
    desc: Wordy.
    use_it: avoid
    type: word
    refers: [use]
- use:
    class: verb
    desc: Plain.
    use_it: true
    type: word
    refers: []
- whilst:
    class: conjunction
    desc: Undecided.
    type: word
    refers: [while]
"#;

    fn workspace(guide: &str) -> (TempDir, LoadPaths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = LoadPaths {
            source: dir.path().join("style-guide.yaml"),
            schema: dir.path().join("db_schema.sql"),
            database: dir.path().join("writing_style.db"),
        };
        fs::write(&paths.source, guide).unwrap();
        fs::write(&paths.schema, schema::DEFAULT_SCHEMA).unwrap();
        (dir, paths)
    }

    #[test]
    fn test_full_run() {
        let (_dir, paths) = workspace(GUIDE);

        let summary = run(&paths, &LoadOptions::default()).unwrap();
        assert_eq!(summary.entries_loaded, 3);
        assert_eq!(summary.sources_with_references, 2);
        assert_eq!(summary.links.edges, 1);
        assert_eq!(summary.links.unresolved, 1);

        let store = SqliteStore::open(&paths.database).unwrap();
        assert_eq!(store.count_entries().unwrap(), 3);
        assert_eq!(store.count_references().unwrap(), 1);
    }

    #[test]
    fn test_rerun_rebuilds_from_scratch() {
        let (_dir, paths) = workspace(GUIDE);

        run(&paths, &LoadOptions::default()).unwrap();
        run(&paths, &LoadOptions::default()).unwrap();

        let store = SqliteStore::open(&paths.database).unwrap();
        assert_eq!(store.count_entries().unwrap(), 3);
    }

    #[test]
    fn test_unreadable_source_leaves_old_database() {
        let (_dir, paths) = workspace(GUIDE);
        run(&paths, &LoadOptions::default()).unwrap();

        fs::remove_file(&paths.source).unwrap();
        let err = run(&paths, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::SourceUnreadable { .. }));

        let store = SqliteStore::open(&paths.database).unwrap();
        assert_eq!(store.count_entries().unwrap(), 3);
    }

    #[test]
    fn test_creates_missing_database_dir() {
        let (dir, mut paths) = workspace(GUIDE);
        paths.database = dir.path().join("out").join("writing_style.db");

        run(&paths, &LoadOptions::default()).unwrap();
        assert!(paths.database.is_file());
    }

    #[test]
    fn test_unreadable_source_creates_nothing() {
        let (dir, mut paths) = workspace(GUIDE);
        paths.database = dir.path().join("out").join("writing_style.db");
        fs::remove_file(&paths.source).unwrap();

        let err = run(&paths, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::SourceUnreadable { .. }));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_broken_schema_removes_database() {
        let (_dir, paths) = workspace(GUIDE);
        fs::write(&paths.schema, "CREATE TABLE item (id INTEGER PRIMARY KEY);").unwrap();

        let err = run(&paths, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::SchemaApply(_)));
        assert!(!paths.database.exists());
    }

    #[test]
    fn test_strict_failure_removes_database() {
        let (_dir, paths) = workspace(GUIDE);
        let options = LoadOptions {
            mode: ResolutionMode::Strict,
        };

        let err = run(&paths, &options).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { ref target, .. } if target == "while"));
        assert!(!paths.database.exists());
    }

    #[test]
    fn test_default_paths() {
        let paths = LoadPaths::default();
        assert_eq!(paths.source, PathBuf::from("style-guide.yaml"));
        assert_eq!(paths.schema, PathBuf::from("db_schema.sql"));
        assert_eq!(paths.database, PathBuf::from("writing_style.db"));
    }
}
