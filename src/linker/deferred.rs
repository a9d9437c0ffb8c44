use crate::entry::EntryId;
use std::collections::BTreeMap;

/// Reference names of one inserted entry, waiting for phase 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReferences {
    pub source_name: String,
    pub names: Vec<String>,
}

/// Map from a newly inserted entry to the names it refers to.
///
/// Filled while entries are inserted and drained only after every entry has
/// an identifier, so a name may refer to an entry that comes later in the
/// document. Iteration follows identifier order.
#[derive(Debug, Default)]
pub struct DeferredReferences {
    pending: BTreeMap<EntryId, PendingReferences>,
}

impl DeferredReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the names `source` refers to. Empty lists are not recorded.
    ///
    /// Returns whether anything was deferred.
    pub fn defer(&mut self, source: EntryId, source_name: &str, names: Vec<String>) -> bool {
        if names.is_empty() {
            return false;
        }
        self.pending.insert(
            source,
            PendingReferences {
                source_name: source_name.to_string(),
                names,
            },
        );
        true
    }

    /// Number of sources with at least one referenced name
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Total referenced names across all sources
    pub fn total_names(&self) -> usize {
        self.pending.values().map(|p| p.names.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &PendingReferences)> {
        self.pending.iter().map(|(id, pending)| (*id, pending))
    }
}
