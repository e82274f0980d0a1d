//! Dedup ledger: the set of accepted record ids.

use std::collections::HashSet;

/// Ids accepted so far in this run, across every category.
///
/// Grows monotonically. Owned by the orchestrator, which is the only writer;
/// a parallel crawler would need an atomic check-and-set here instead.
#[derive(Debug, Clone, Default)]
pub struct DedupLedger {
    seen: HashSet<String>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` if unseen. Returns false, without mutating, for repeats.
    pub fn accept(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
