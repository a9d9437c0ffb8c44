//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Transaction, params};
use crate::entry::{Entry, EntryId, NewEntry, UsageRecommendation};
use crate::{Error, Result};
use super::schema::{self, SchemaScript};

const ENTRY_COLUMNS: &str = r#"id, name, class, "desc", use_it, type"#;

/// SQLite-backed storage for the vocabulary
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a fresh database file, replacing whatever was at `path`
    pub fn create(path: &Path) -> Result<Self> {
        schema::discard_database(path)?;
        Self::with_connection(Connection::open(path)?)
    }

    /// Open an existing database read-only (for inspection)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        // Must be set outside of any transaction to take effect.
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn })
    }

    /// Apply the schema script to this connection, outside any transaction.
    ///
    /// The script runs verbatim, so it may carry its own `BEGIN`/`COMMIT`
    /// (as `sqlite3 .dump` output does) but must not leave one open.
    pub fn provision(&self, script: &SchemaScript) -> Result<()> {
        schema::provision(&self.conn, script)?;
        if !self.conn.is_autocommit() {
            return Err(Error::SchemaApply(format!(
                "{} leaves a transaction open",
                script.origin()
            )));
        }
        // Scripts may switch enforcement off (dumps start with foreign_keys=OFF).
        self.conn.pragma_update(None, "foreign_keys", true)?;
        Ok(())
    }

    /// Start the transaction both load phases run in.
    ///
    /// Dropping the returned value without calling
    /// [`LoadTransaction::commit`] rolls back every entry and reference.
    pub fn begin_load(&mut self) -> Result<LoadTransaction<'_>> {
        let tx = self.conn.transaction()?;
        Ok(LoadTransaction { tx })
    }

    // ========== Entry Queries ==========

    /// Get an entry by identifier
    pub fn get_entry(&self, id: EntryId) -> Result<Option<Entry>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM item WHERE id = ?1", ENTRY_COLUMNS),
                [id.get()],
                row_to_entry,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Find entries by exact name, in identifier order
    pub fn find_entries_by_name(&self, name: &str) -> Result<Vec<Entry>> {
        self.query_entries(
            &format!("SELECT {} FROM item WHERE name = ?1 ORDER BY id", ENTRY_COLUMNS),
            name,
        )
    }

    /// Find entries by name pattern (LIKE query)
    pub fn find_entries_by_name_pattern(&self, pattern: &str) -> Result<Vec<Entry>> {
        self.query_entries(
            &format!("SELECT {} FROM item WHERE name LIKE ?1 ORDER BY id", ENTRY_COLUMNS),
            pattern,
        )
    }

    /// Count all entries
    pub fn count_entries(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM item", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count entries per usage recommendation, in [`UsageRecommendation::all`] order
    pub fn count_by_usage(&self) -> Result<Vec<(UsageRecommendation, usize)>> {
        let mut stmt = self.conn.prepare("SELECT use_it, COUNT(*) FROM item GROUP BY use_it")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut counts: Vec<(UsageRecommendation, usize)> =
            UsageRecommendation::all().iter().map(|u| (*u, 0)).collect();
        for (usage, count) in rows {
            let usage: UsageRecommendation = usage.parse()?;
            if let Some(slot) = counts.iter_mut().find(|(u, _)| *u == usage) {
                slot.1 = count as usize;
            }
        }
        Ok(counts)
    }

    // ========== Reference Queries ==========

    /// Entries that `id` refers to
    pub fn references_from(&self, id: EntryId) -> Result<Vec<Entry>> {
        self.query_entries(
            r#"SELECT i.id, i.name, i.class, i."desc", i.use_it, i.type
               FROM reference r JOIN item i ON i.id = r.id_refer
               WHERE r.id_current = ?1 ORDER BY r.rowid"#,
            id.get(),
        )
    }

    /// Entries that refer to `id`
    pub fn references_to(&self, id: EntryId) -> Result<Vec<Entry>> {
        self.query_entries(
            r#"SELECT i.id, i.name, i.class, i."desc", i.use_it, i.type
               FROM reference r JOIN item i ON i.id = r.id_current
               WHERE r.id_refer = ?1 ORDER BY r.rowid"#,
            id.get(),
        )
    }

    /// Every stored edge as `(source, target)`, in insertion order
    pub fn all_references(&self) -> Result<Vec<(EntryId, EntryId)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id_current, id_refer FROM reference ORDER BY rowid")?;
        let edges = stmt
            .query_map([], |row| Ok((EntryId(row.get(0)?), EntryId(row.get(1)?))))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(edges)
    }

    /// Count all references
    pub fn count_references(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM reference", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            entries: self.count_entries()?,
            references: self.count_references()?,
            by_usage: self.count_by_usage()?,
        })
    }

    fn query_entries(&self, sql: &str, param: impl rusqlite::ToSql) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let entries = stmt
            .query_map([param], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}

/// Write access for one load. Everything done through it becomes visible
/// at once on [`commit`](Self::commit).
pub struct LoadTransaction<'conn> {
    tx: Transaction<'conn>,
}

impl LoadTransaction<'_> {
    /// Insert one entry and return its new identifier
    pub fn insert_entry(&self, entry: &NewEntry) -> Result<EntryId> {
        let mut stmt = self.tx.prepare_cached(
            r#"INSERT INTO item (name, class, "desc", use_it, type) VALUES (?1, ?2, ?3, ?4, ?5)"#,
        )?;
        stmt.execute(params![
            entry.name,
            entry.class,
            entry.desc,
            entry.use_it.as_str(),
            entry.kind,
        ])?;
        Ok(EntryId(self.tx.last_insert_rowid()))
    }

    /// Identifiers of every entry stored under `name`, in storage order
    pub fn find_ids_by_name(&self, name: &str) -> Result<Vec<EntryId>> {
        let mut stmt = self
            .tx
            .prepare_cached("SELECT id FROM item WHERE name = ?1 ORDER BY id")?;
        let ids = stmt
            .query_map([name], |row| row.get(0).map(EntryId))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
    }

    /// Store one `source -> target` edge per target. Returns the number of edges written.
    pub fn insert_references(&self, source: EntryId, targets: &[EntryId]) -> Result<usize> {
        if targets.is_empty() {
            return Ok(0);
        }

        let mut stmt = self
            .tx
            .prepare_cached("INSERT INTO reference (id_current, id_refer) VALUES (?1, ?2)")?;
        for target in targets {
            stmt.execute(params![source.get(), target.get()])?;
        }
        Ok(targets.len())
    }

    /// Make the whole load visible
    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<Entry> {
    let use_it: String = row.get(4)?;
    let use_it: UsageRecommendation = use_it.parse().map_err(|e: Error| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Entry {
        id: EntryId(row.get(0)?),
        name: row.get(1)?,
        class: row.get(2)?,
        desc: row.get(3)?,
        use_it,
        kind: row.get(5)?,
    })
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub entries: usize,
    pub references: usize,
    pub by_usage: Vec<(UsageRecommendation, usize)>,
}
