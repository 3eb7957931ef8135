//! Transaction snapshots
//!
//! A snapshot fixes which writers a transaction may see:
//!
//! **Always visible**:
//! - Non-transactional (autocommit) writes
//! - Transactions that finished before the snapshot was taken
//!
//! **Never visible**:
//! - Transactions that began after the snapshot was taken
//! - Transactions still in progress when the snapshot was taken, even if
//!   they commit later
//!
//! A snapshot is captured at begin and re-captured by `reset_snapshot`.

use std::collections::BTreeSet;

use kvmodel_core::TxnId;

/// Set of writers visible to a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSnapshot {
    /// Transactions with ids at or above this had not begun at capture time
    snapshot_max: TxnId,
    /// Transactions in progress at capture time
    concurrent: BTreeSet<TxnId>,
}

impl TransactionSnapshot {
    /// Create a snapshot from the id high-water mark and the in-progress set
    pub fn new(snapshot_max: TxnId, concurrent: BTreeSet<TxnId>) -> Self {
        TransactionSnapshot {
            snapshot_max,
            concurrent,
        }
    }

    /// Check whether writes of `txn_id` are visible
    pub fn contains(&self, txn_id: TxnId) -> bool {
        txn_id.is_none() || (txn_id < self.snapshot_max && !self.concurrent.contains(&txn_id))
    }

    /// Id high-water mark
    pub fn snapshot_max(&self) -> TxnId {
        self.snapshot_max
    }

    /// Transactions that were in progress at capture time
    pub fn concurrent(&self) -> &BTreeSet<TxnId> {
        &self.concurrent
    }
}
