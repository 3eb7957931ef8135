//! Transaction object
//!
//! A `KvTransaction` tracks its snapshot, its pending commit timestamp and
//! the (table, key) pairs it has written. Writes go straight into the table
//! chains as in-flight records; the transaction only remembers where they
//! are so that commit can timestamp them and rollback can remove them.
//!
//! # Lifecycle
//!
//! ```text
//! InProgress ──commit()───▶ Committed   (terminal)
//!      └──────rollback()──▶ RolledBack  (terminal)
//! ```
//!
//! The commit timestamp is supplied after the writes, via `set_timestamp`.
//! Commit refuses to run without one.
//!
//! # Write set
//!
//! Entries hold a `Weak` reference to the table plus the key. The table owns
//! the records; if a table is dropped before commit, its entries are skipped.
//! Entries keep first-write order. A side set keyed on (table address, key)
//! makes repeated writes of the same key a constant-time no-op; the `Weak`
//! keeps the table's allocation alive, so an address is never reused while
//! the transaction holds it.

use std::collections::HashSet;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, warn};

use kvmodel_core::{DataValue, ModelResult, Timestamp, TransactionView, TxnId, WriteSetTarget};

use crate::manager::TransactionManager;
use crate::snapshot::TransactionSnapshot;

/// Status of a transaction in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Transaction is executing, can read/write
    InProgress,
    /// Transaction committed
    Committed,
    /// Transaction was rolled back
    RolledBack,
}

/// One write of the transaction: where its in-flight record lives
#[derive(Debug, Clone)]
pub struct WriteSetEntry {
    table: Weak<dyn WriteSetTarget>,
    key: DataValue,
}

impl WriteSetEntry {
    /// Key written
    pub fn key(&self) -> &DataValue {
        &self.key
    }

    /// Name of the table written, if it still exists
    pub fn table_name(&self) -> Option<String> {
        self.table.upgrade().map(|t| t.name().to_string())
    }
}

#[derive(Debug)]
struct TxnState {
    status: TransactionStatus,
    read_timestamp: Timestamp,
    commit_timestamp: Timestamp,
    snapshot: TransactionSnapshot,
    write_set: Vec<WriteSetEntry>,
    /// (table address, key) of every entry in `write_set`
    written: HashSet<(usize, DataValue)>,
}

/// A transaction over any number of tables
#[derive(Debug)]
pub struct KvTransaction {
    id: TxnId,
    manager: Arc<TransactionManager>,
    state: Mutex<TxnState>,
}

impl KvTransaction {
    pub(crate) fn new(
        id: TxnId,
        manager: Arc<TransactionManager>,
        read_timestamp: Timestamp,
        snapshot: TransactionSnapshot,
    ) -> Self {
        KvTransaction {
            id,
            manager,
            state: Mutex::new(TxnState {
                status: TransactionStatus::InProgress,
                read_timestamp,
                commit_timestamp: Timestamp::NONE,
                snapshot,
                write_set: Vec::new(),
                written: HashSet::new(),
            }),
        }
    }

    /// Transaction identifier
    pub fn id(&self) -> TxnId {
        self.id
    }

    /// Current status
    pub fn status(&self) -> TransactionStatus {
        self.state.lock().status
    }

    /// Check whether the transaction is still in progress
    pub fn is_active(&self) -> bool {
        self.status() == TransactionStatus::InProgress
    }

    /// Timestamp that commit will apply (`Timestamp::NONE` if unset)
    pub fn commit_timestamp(&self) -> Timestamp {
        self.state.lock().commit_timestamp
    }

    /// Number of (table, key) pairs written
    pub fn write_set_len(&self) -> usize {
        self.state.lock().write_set.len()
    }

    /// Copy of the write set
    pub fn write_set(&self) -> Vec<WriteSetEntry> {
        self.state.lock().write_set.clone()
    }

    /// Copy of the current snapshot
    pub fn snapshot(&self) -> TransactionSnapshot {
        self.state.lock().snapshot.clone()
    }

    fn check_in_progress(&self, state: &TxnState, action: &str) -> ModelResult<()> {
        if state.status == TransactionStatus::InProgress {
            Ok(())
        } else {
            Err(self.manager.misuse(format!(
                "cannot {} transaction {}: it is {:?}",
                action, self.id, state.status
            )))
        }
    }

    /// Set the timestamp to apply at commit; the last call before commit wins
    pub fn set_timestamp(&self, commit_timestamp: Timestamp) -> ModelResult<()> {
        let mut state = self.state.lock();
        self.check_in_progress(&state, "set timestamp of")?;
        state.commit_timestamp = commit_timestamp;
        Ok(())
    }

    /// Re-capture the snapshot for subsequent reads
    ///
    /// In-flight writes of this transaction are unaffected.
    pub fn reset_snapshot(&self) -> ModelResult<()> {
        let mut state = self.state.lock();
        self.check_in_progress(&state, "reset snapshot of")?;
        state.snapshot = self.manager.snapshot();
        debug!(txn_id = %self.id, "reset snapshot");
        Ok(())
    }

    /// Commit: timestamp every in-flight record of this transaction
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the transaction is terminal or no commit
    /// timestamp was set. In the latter case the transaction stays in
    /// progress.
    pub fn commit(&self) -> ModelResult<()> {
        let (entries, commit_timestamp) = {
            let state = self.state.lock();
            self.check_in_progress(&state, "commit")?;
            if state.commit_timestamp.is_none() {
                return Err(self.manager.misuse(format!(
                    "cannot commit transaction {}: commit timestamp not set",
                    self.id
                )));
            }
            (state.write_set.clone(), state.commit_timestamp)
        };

        for entry in &entries {
            match entry.table.upgrade() {
                Some(table) => table.fix_commit_timestamp(&entry.key, self.id, commit_timestamp),
                None => warn!(txn_id = %self.id, key = %entry.key, "table dropped before commit"),
            }
        }

        self.finish(TransactionStatus::Committed);
        debug!(
            txn_id = %self.id,
            commit_timestamp = %commit_timestamp,
            writes = entries.len(),
            "commit transaction"
        );
        Ok(())
    }

    /// Set the commit timestamp and commit
    pub fn commit_at(&self, commit_timestamp: Timestamp) -> ModelResult<()> {
        self.set_timestamp(commit_timestamp)?;
        self.commit()
    }

    /// Roll back: remove every in-flight record of this transaction
    ///
    /// Keys whose records are already gone are skipped without error.
    pub fn rollback(&self) -> ModelResult<()> {
        let entries = {
            let state = self.state.lock();
            self.check_in_progress(&state, "roll back")?;
            state.write_set.clone()
        };

        self.undo(&entries);
        self.finish(TransactionStatus::RolledBack);
        debug!(txn_id = %self.id, writes = entries.len(), "rollback transaction");
        Ok(())
    }

    fn undo(&self, entries: &[WriteSetEntry]) {
        for entry in entries {
            if let Some(table) = entry.table.upgrade() {
                table.rollback_updates(&entry.key, self.id);
            }
        }
    }

    fn finish(&self, status: TransactionStatus) {
        {
            let mut state = self.state.lock();
            state.status = status;
            state.write_set.clear();
            state.written.clear();
        }
        self.manager.finish(self.id);
    }
}

impl TransactionView for KvTransaction {
    fn id(&self) -> TxnId {
        self.id
    }

    fn ensure_active(&self) -> ModelResult<()> {
        let state = self.state.lock();
        self.check_in_progress(&state, "use")
    }

    fn read_timestamp(&self) -> Timestamp {
        self.state.lock().read_timestamp
    }

    fn snapshot_contains(&self, txn_id: TxnId) -> bool {
        self.state.lock().snapshot.contains(txn_id)
    }

    fn add_update(&self, table: Weak<dyn WriteSetTarget>, key: DataValue) {
        let addr = Weak::as_ptr(&table) as *const () as usize;
        let mut state = self.state.lock();
        if state.written.insert((addr, key.clone())) {
            state.write_set.push(WriteSetEntry { table, key });
        }
    }
}

impl Drop for KvTransaction {
    /// A transaction abandoned while in progress is rolled back
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if state.status != TransactionStatus::InProgress {
            return;
        }
        let entries = std::mem::take(&mut state.write_set);
        state.written.clear();
        state.status = TransactionStatus::RolledBack;
        self.undo(&entries);
        self.manager.finish(self.id);
        debug!(txn_id = %self.id, writes = entries.len(), "rollback abandoned transaction");
    }
}
