//! Load orchestration - the two-phase algorithm
//!
//! Phase 1 inserts every record and parks its reference names in a
//! [`DeferredReferences`] map keyed by the new identifier. Phase 2 runs once
//! all entries exist, so a record may refer to one that appears later in the
//! document. The schema is applied to the fresh database first; both phases
//! then share one transaction, so either the whole vocabulary lands or none
//! of it does.

use crate::linker::{DeferredReferences, LinkStats, ReferenceLinker, ResolutionMode};
use crate::source::SourceRecord;
use crate::storage::{LoadTransaction, SchemaScript, SqliteStore};
use crate::Result;
use serde::Serialize;
use std::fmt;

/// Counts produced by one load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Records inserted as entries
    pub entries_loaded: usize,
    /// Records whose reference list was non-empty, resolved or not
    pub sources_with_references: usize,
    pub links: LinkStats,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} items added.", self.entries_loaded)?;
        writeln!(f, "{} references added.", self.sources_with_references)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Loader {
    mode: ResolutionMode,
}

impl Loader {
    pub fn new(mode: ResolutionMode) -> Self {
        Self { mode }
    }

    /// Provision `store` with `schema` and load `records` into it.
    pub fn load(
        &self,
        store: &mut SqliteStore,
        schema: &SchemaScript,
        records: Vec<SourceRecord>,
    ) -> Result<LoadSummary> {
        store.provision(schema)?;
        let tx = store.begin_load()?;

        let (entries_loaded, deferred) = self.insert_entries(&tx, records)?;
        tracing::info!(
            "Inserted {} entries; {} of them refer to {} names",
            entries_loaded,
            deferred.len(),
            deferred.total_names()
        );

        let links = ReferenceLinker::new(&tx, self.mode).run(&deferred)?;
        tracing::info!(
            "Linked {} names into {} references ({} unresolved, {} ambiguous)",
            links.names,
            links.edges,
            links.unresolved,
            links.ambiguous
        );

        tx.commit()?;

        Ok(LoadSummary {
            entries_loaded,
            sources_with_references: deferred.len(),
            links,
        })
    }

    fn insert_entries(
        &self,
        tx: &LoadTransaction<'_>,
        records: Vec<SourceRecord>,
    ) -> Result<(usize, DeferredReferences)> {
        let mut deferred = DeferredReferences::new();
        let mut inserted = 0;

        for record in records {
            let (entry, refers) = record.into_entry();
            let id = tx.insert_entry(&entry)?;
            tracing::debug!("Inserted '{}' as {}", entry.name, id);

            deferred.defer(id, &entry.name, refers);
            inserted += 1;
        }

        Ok((inserted, deferred))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::UsageRecommendation;
    use crate::source::parse_records;
    use crate::Error;

    fn load(document: &str) -> (SqliteStore, LoadSummary) {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let summary = Loader::default()
            .load(&mut store, &SchemaScript::bundled(), parse_records(document).unwrap())
            .unwrap();
        (store, summary)
    }

    #[test]
    fn test_single_entry_without_references() {
        let (store, summary) =
            load("- foo: {class: c, desc: d, use_it: true, type: t, refers: []}");

        assert_eq!(summary.entries_loaded, 1);
        assert_eq!(summary.sources_with_references, 0);
        assert_eq!(store.count_references().unwrap(), 0);

        let foo = &store.find_entries_by_name("foo").unwrap()[0];
        assert_eq!(foo.use_it, UsageRecommendation::Use);
        assert_eq!(foo.class, "c");
    }

    #[test]
    fn test_forward_reference_is_linked() {
        let (store, summary) = load(
            "- foo: {class: c, desc: d, use_it: true, type: t, refers: [bar]}\n\
             - bar: {class: c, desc: d, use_it: false, type: t, refers: []}",
        );

        let foo = store.find_entries_by_name("foo").unwrap()[0].id;
        let bar = store.find_entries_by_name("bar").unwrap()[0].id;
        assert!(foo < bar);
        assert_eq!(store.all_references().unwrap(), vec![(foo, bar)]);
        assert_eq!(summary.sources_with_references, 1);
        assert_eq!(summary.links.edges, 1);
    }

    #[test]
    fn test_avoid_is_stored_verbatim() {
        let (store, _) = load("- utilize: {class: c, desc: d, use_it: avoid, type: t, refers: []}");
        let entry = &store.find_entries_by_name("utilize").unwrap()[0];
        assert_eq!(entry.use_it, UsageRecommendation::Avoid);
    }

    #[test]
    fn test_ghost_reference_counts_but_creates_no_edge() {
        let (store, summary) =
            load("- foo: {class: c, desc: d, use_it: true, type: t, refers: [ghost]}");

        assert_eq!(summary.entries_loaded, 1);
        assert_eq!(summary.sources_with_references, 1);
        assert_eq!(summary.links.unresolved, 1);
        assert_eq!(store.count_references().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_names_fan_out() {
        let (store, summary) = load(
            "- dup: {class: a, desc: d, use_it: true, type: t, refers: []}\n\
             - dup: {class: b, desc: d, use_it: true, type: t, refers: []}\n\
             - third: {class: c, desc: d, use_it: true, type: t, refers: [dup]}",
        );

        let third = store.find_entries_by_name("third").unwrap()[0].id;
        let edges = store.all_references().unwrap();
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|(from, _)| *from == third));
        assert_eq!(summary.links.ambiguous, 1);
    }

    #[test]
    fn test_counts_match_input() {
        let (store, summary) = load(
            "- a: {class: c, desc: d, type: t, refers: [b, c]}\n\
             - b: {class: c, desc: d, type: t, refers: []}\n\
             - c: {class: c, desc: d, type: t, refers: [nowhere]}\n\
             - d: {class: c, desc: d, type: t}",
        );

        assert_eq!(summary.entries_loaded, 4);
        assert_eq!(summary.sources_with_references, 2);
        assert_eq!(store.count_entries().unwrap(), 4);

        // Every edge points at a stored entry.
        for (from, to) in store.all_references().unwrap() {
            assert!(store.get_entry(from).unwrap().is_some());
            assert!(store.get_entry(to).unwrap().is_some());
        }
    }

    #[test]
    fn test_empty_input_still_provisions() {
        let (store, summary) = load("[]");
        assert_eq!(summary, LoadSummary::default());
        assert_eq!(store.count_entries().unwrap(), 0);
        assert_eq!(store.count_references().unwrap(), 0);
    }

    #[test]
    fn test_strict_failure_rolls_back_everything() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let records =
            parse_records("- foo: {class: c, desc: d, type: t, refers: [ghost]}").unwrap();

        let err = Loader::new(ResolutionMode::Strict)
            .load(&mut store, &SchemaScript::bundled(), records)
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { .. }));
        assert_eq!(store.count_entries().unwrap(), 0);
        assert_eq!(store.count_references().unwrap(), 0);
    }

    #[test]
    fn test_schema_with_own_transaction_loads() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let schema = SchemaScript::from_sql(format!(
            "BEGIN TRANSACTION;\n{}\nCOMMIT;",
            crate::storage::DEFAULT_SCHEMA
        ));
        let records = parse_records(
            "- foo: {class: c, desc: d, type: t, refers: [bar]}\n\
             - bar: {class: c, desc: d, type: t}",
        )
        .unwrap();

        let summary = Loader::default().load(&mut store, &schema, records).unwrap();
        assert_eq!(summary.entries_loaded, 2);
        assert_eq!(summary.links.edges, 1);
        assert_eq!(store.count_references().unwrap(), 1);
    }

    #[test]
    fn test_schema_failure_aborts_before_inserts() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let records = parse_records("- foo: {class: c, desc: d, type: t}").unwrap();

        let err = Loader::default()
            .load(&mut store, &SchemaScript::from_sql("CREATE TABLE nothing (x);"), records)
            .unwrap_err();
        assert!(matches!(err, Error::SchemaApply(_)));
    }

    #[test]
    fn test_summary_display() {
        let summary = LoadSummary {
            entries_loaded: 3,
            sources_with_references: 1,
            links: LinkStats::default(),
        };
        assert_eq!(summary.to_string(), "3 items added.\n1 references added.\n");
    }
}
