//! Verification cursor
//!
//! A read-only, ordered walk over a frozen copy of a table's chains, used to
//! diff the model against the engine after a workload.
//!
//! The cursor copies the chains when it is created (the same approach as a
//! cloned snapshot view), so later table mutations are never observed.
//! Creation is O(table size); verification runs are rare and exhaustive.

use std::collections::BTreeMap;

use kvmodel_core::{DataValue, Timestamp};

use crate::item::KvTableItem;

/// Ordered cursor over (key, version history) pairs
#[derive(Debug, Clone)]
pub struct KvTableVerifyCursor {
    entries: Vec<(DataValue, KvTableItem)>,
    position: usize,
}

impl KvTableVerifyCursor {
    pub(crate) fn new(data: &BTreeMap<DataValue, KvTableItem>) -> Self {
        KvTableVerifyCursor {
            entries: data.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            position: 0,
        }
    }

    /// Number of chains not yet visited
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.position
    }

    /// Skip chains whose latest state is deleted (the engine won't return them)
    fn skip_dead(&mut self) {
        while let Some((_, item)) = self.entries.get(self.position) {
            if !item.get(Timestamp::LATEST).is_none() {
                break;
            }
            self.position += 1;
        }
    }

    /// Check whether a live key remains
    pub fn has_next(&mut self) -> bool {
        self.peek_live_key().is_some()
    }

    /// Next key with a live latest value, without consuming it
    pub fn peek_live_key(&mut self) -> Option<&DataValue> {
        self.skip_dead();
        self.entries.get(self.position).map(|(k, _)| k)
    }

    /// Advance to the next live key and check it against the engine's entry
    ///
    /// Returns true if the keys match and `value` is among the latest
    /// versions. The cursor advances past the compared key either way.
    pub fn verify_next(&mut self, key: &DataValue, value: &DataValue) -> bool {
        self.skip_dead();
        let Some((expected_key, item)) = self.entries.get(self.position) else {
            return false;
        };
        self.position += 1;
        expected_key == key && item.contains_any(value, Timestamp::LATEST)
    }
}

impl Iterator for KvTableVerifyCursor {
    type Item = (DataValue, KvTableItem);

    /// Yields every chain, deleted ones included, with its full history
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.get(self.position).cloned()?;
        self.position += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}
