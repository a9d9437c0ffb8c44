use crate::entry::EntryId;
use crate::linker::DeferredReferences;
use crate::storage::LoadTransaction;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// What to do with names that match no entry, or more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Drop unresolved names, link every match of ambiguous ones
    #[default]
    Lenient,
    /// Fail the load on the first unresolved or ambiguous name
    Strict,
}

impl ResolutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionMode::Lenient => "lenient",
            ResolutionMode::Strict => "strict",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    /// Entries with a non-empty reference list
    pub sources: usize,
    /// Referenced names looked up
    pub names: usize,
    /// Names matching exactly one entry
    pub resolved: usize,
    /// Names matching several entries (all of them linked)
    pub ambiguous: usize,
    /// Names matching nothing (no edge)
    pub unresolved: usize,
    /// Rows written to the reference table
    pub edges: usize,
}

/// Second phase of a load: turns deferred reference names into edges.
pub struct ReferenceLinker<'a> {
    tx: &'a LoadTransaction<'a>,
    mode: ResolutionMode,
}

impl<'a> ReferenceLinker<'a> {
    pub fn new(tx: &'a LoadTransaction<'a>, mode: ResolutionMode) -> Self {
        Self { tx, mode }
    }

    /// Every identifier stored under `name`, in storage order.
    pub fn resolve(&self, name: &str) -> Result<Vec<EntryId>> {
        self.tx.find_ids_by_name(name)
    }

    /// Persist one `source -> target` edge per target.
    pub fn link(&self, source: EntryId, targets: &[EntryId]) -> Result<usize> {
        self.tx.insert_references(source, targets)
    }

    pub fn run(&self, deferred: &DeferredReferences) -> Result<LinkStats> {
        let mut stats = LinkStats::default();

        for (source, pending) in deferred.iter() {
            stats.sources += 1;
            let mut targets = Vec::new();

            for name in &pending.names {
                stats.names += 1;
                let matches = self.resolve(name)?;

                match matches.len() {
                    0 => {
                        stats.unresolved += 1;
                        if self.mode == ResolutionMode::Strict {
                            return Err(Error::UnresolvedReference {
                                from: pending.source_name.clone(),
                                target: name.clone(),
                            });
                        }
                        tracing::warn!(
                            "'{}' refers to '{}', which is not defined; skipping",
                            pending.source_name,
                            name
                        );
                    }
                    1 => stats.resolved += 1,
                    count => {
                        stats.ambiguous += 1;
                        if self.mode == ResolutionMode::Strict {
                            return Err(Error::AmbiguousReference {
                                from: pending.source_name.clone(),
                                target: name.clone(),
                                matches: count,
                            });
                        }
                        tracing::debug!(
                            "'{}' refers to '{}', which matches {} entries; linking all",
                            pending.source_name,
                            name,
                            count
                        );
                    }
                }

                targets.extend(matches);
            }

            let written = self.link(source, &targets)?;
            tracing::debug!(
                "Linked '{}' ({}) to {} entries",
                pending.source_name,
                source,
                written
            );
            stats.edges += written;
        }

        Ok(stats)
    }
}
