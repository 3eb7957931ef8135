//! Transaction manager
//!
//! Owns the state that spans transactions:
//! - Transaction id allocation (monotonic, starting at 1)
//! - The set of in-progress transactions, from which snapshots are built
//! - The misuse policy applied to every transaction it creates
//!
//! The manager is owned by the database container and handed to each
//! transaction at creation; there are no global counters.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use kvmodel_core::{ModelError, Timestamp, TxnId};

use crate::snapshot::TransactionSnapshot;
use crate::transaction::KvTransaction;

/// How misuse of a transaction is reported
///
/// Misuse means acting on a committed or rolled-back transaction, or
/// committing without a commit timestamp. It is a bug in the caller, not a
/// database outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MisusePolicy {
    /// Return `ModelError::InvalidState`
    #[default]
    Error,
    /// Panic with the same message
    Panic,
}

/// Allocates transactions and tracks which are in progress
#[derive(Debug)]
pub struct TransactionManager {
    /// Next transaction ID
    next_txn_id: AtomicU64,
    /// In-progress transactions
    active: Mutex<BTreeSet<TxnId>>,
    misuse: MisusePolicy,
}

impl TransactionManager {
    /// Create a new transaction manager
    pub fn new(misuse: MisusePolicy) -> Self {
        TransactionManager {
            next_txn_id: AtomicU64::new(1),
            active: Mutex::new(BTreeSet::new()),
            misuse,
        }
    }

    /// Misuse policy for transactions of this manager
    pub fn misuse_policy(&self) -> MisusePolicy {
        self.misuse
    }

    /// Begin a transaction reading at `read_timestamp`
    ///
    /// Pass `Timestamp::LATEST` to read the latest committed state within the
    /// snapshot.
    pub fn begin(self: &Arc<Self>, read_timestamp: Timestamp) -> Arc<KvTransaction> {
        let (id, snapshot) = {
            let mut active = self.active.lock();
            let id = TxnId::new(self.next_txn_id.fetch_add(1, Ordering::SeqCst));
            active.insert(id);
            (id, self.snapshot_locked(&active))
        };
        debug!(txn_id = %id, read_timestamp = %read_timestamp, "begin transaction");
        Arc::new(KvTransaction::new(
            id,
            Arc::clone(self),
            read_timestamp,
            snapshot,
        ))
    }

    /// Capture a snapshot of the current transaction state
    pub fn snapshot(&self) -> TransactionSnapshot {
        let active = self.active.lock();
        self.snapshot_locked(&active)
    }

    fn snapshot_locked(&self, active: &BTreeSet<TxnId>) -> TransactionSnapshot {
        TransactionSnapshot::new(
            TxnId::new(self.next_txn_id.load(Ordering::SeqCst)),
            active.clone(),
        )
    }

    /// Remove a finished transaction from the in-progress set
    pub(crate) fn finish(&self, txn_id: TxnId) {
        self.active.lock().remove(&txn_id);
    }

    /// Number of in-progress transactions
    pub fn active_count(&self) -> usize {
        self.active.lock().len()
    }

    /// Build the error for a misuse, or panic under `MisusePolicy::Panic`
    pub(crate) fn misuse(&self, msg: String) -> ModelError {
        match self.misuse {
            MisusePolicy::Error => ModelError::InvalidState(msg),
            MisusePolicy::Panic => panic!("transaction misuse: {}", msg),
        }
    }
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new(MisusePolicy::default())
    }
}
