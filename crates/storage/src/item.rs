//! Update chain for a single key
//!
//! Records are kept in append order. Nothing is ever reordered: commit fixes
//! a timestamp in place and rollback removes records, so the position of a
//! record is the tie-break between records with equal commit timestamps.
//!
//! # Visibility rule
//!
//! Given a read timestamp `R` and a filter on writers:
//! - `R == LATEST`: the last committed record in chain order
//! - otherwise: the committed record with the greatest timestamp `<= R`,
//!   later records winning ties
//!
//! A transaction additionally sees its own in-flight record first.

use kvmodel_core::{
    ConflictKind, DataValue, ModelError, ModelResult, Timestamp, TransactionView, TxnId, NONE,
};

use crate::update::KvUpdate;

/// Existence precondition carried by every write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Precondition {
    /// Fail unless a live value is visible (update semantics)
    pub must_exist: bool,
    /// Fail if a live value is visible (insert semantics)
    pub must_not_exist: bool,
}

impl Precondition {
    /// Insert: the key must be absent unless `overwrite`
    pub fn insert(overwrite: bool) -> Self {
        Precondition {
            must_exist: false,
            must_not_exist: !overwrite,
        }
    }

    /// Update: the key must be present unless `overwrite`
    pub fn update(overwrite: bool) -> Self {
        Precondition {
            must_exist: !overwrite,
            must_not_exist: false,
        }
    }

    /// Remove: the key must be present
    pub fn remove() -> Self {
        Precondition {
            must_exist: true,
            must_not_exist: false,
        }
    }
}

/// Ordered update records of one key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KvTableItem {
    updates: Vec<KvUpdate>,
}

impl KvTableItem {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in append order
    pub fn updates(&self) -> &[KvUpdate] {
        &self.updates
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Check whether the chain has no records
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Index of the committed record visible at `read_ts` among writers accepted by `filter`
    fn visible_index<F>(&self, read_ts: Timestamp, filter: F) -> Option<usize>
    where
        F: Fn(&KvUpdate) -> bool,
    {
        let candidates = self
            .updates
            .iter()
            .enumerate()
            .filter_map(|(i, u)| u.timestamp().map(|ts| (i, ts, u)))
            .filter(|&(_, _, u)| filter(u));

        if read_ts.is_latest() {
            return candidates.map(|(i, _, _)| i).last();
        }
        // max_by_key returns the last maximum, so later records win ties
        candidates
            .filter(|(_, ts, _)| *ts <= read_ts)
            .max_by_key(|(_, ts, _)| *ts)
            .map(|(i, _, _)| i)
    }

    /// Value visible at a timestamp
    ///
    /// Tombstones and the absence of any qualifying record yield `NONE`.
    pub fn get(&self, timestamp: Timestamp) -> DataValue {
        self.visible_index(timestamp, |_| true)
            .map(|i| self.updates[i].value().clone())
            .unwrap_or(NONE)
    }

    /// Value visible to a transaction
    ///
    /// The transaction's own in-flight record takes precedence over anything
    /// committed.
    pub fn get_txn(&self, txn: &dyn TransactionView) -> DataValue {
        let txn_id = txn.id();
        if let Some(own) = self.updates.iter().find(|u| u.is_pending_for(txn_id)) {
            return own.value().clone();
        }
        self.visible_index(txn.read_timestamp(), |u| txn.snapshot_contains(u.txn_id()))
            .map(|i| self.updates[i].value().clone())
            .unwrap_or(NONE)
    }

    /// Check whether `value` is among the versions visible at `timestamp`
    ///
    /// Several records may share the visible commit timestamp; any of them
    /// matching counts.
    pub fn contains_any(&self, value: &DataValue, timestamp: Timestamp) -> bool {
        let Some(visible) = self.visible_index(timestamp, |_| true) else {
            return false;
        };
        let visible_ts = self.updates[visible].timestamp();
        self.updates
            .iter()
            .filter(|u| u.is_committed() && u.timestamp() == visible_ts)
            .any(|u| u.value() == value)
    }

    /// Fail if the writer would overwrite an update it cannot see
    ///
    /// For a transactional writer, a committed record is unseen if its
    /// owner is outside the snapshot or it was committed after the read
    /// timestamp.
    fn check_write_conflict(
        &self,
        writer: TxnId,
        txn: Option<&dyn TransactionView>,
    ) -> ModelResult<()> {
        for u in &self.updates {
            let owner = u.txn_id();
            let conflicting = match (u.timestamp(), txn) {
                (Some(committed_at), Some(txn)) => {
                    let read_ts = txn.read_timestamp();
                    (!owner.is_none() && !txn.snapshot_contains(owner))
                        || (!read_ts.is_latest() && committed_at > read_ts)
                }
                (Some(_), None) => false,
                (None, _) => owner != writer,
            };
            if conflicting {
                return Err(ModelError::Conflict(ConflictKind::WriteConflict));
            }
        }
        Ok(())
    }

    /// Add an update under existence checks
    ///
    /// Existence is judged as of now: against the latest committed state for
    /// an autocommit write, against the writer's own view for a transactional
    /// one. On failure the chain is left untouched.
    ///
    /// A second write by the same transaction replaces its in-flight record,
    /// so at most one in-flight record per transaction exists on the chain.
    pub fn add_update(
        &mut self,
        update: KvUpdate,
        txn: Option<&dyn TransactionView>,
        precondition: Precondition,
        detect_conflicts: bool,
    ) -> ModelResult<()> {
        let writer = update.txn_id();
        debug_assert_eq!(
            txn.map(|t| t.id()).unwrap_or(TxnId::NONE),
            writer,
            "update must be tagged with its writer"
        );

        if detect_conflicts {
            self.check_write_conflict(writer, txn)?;
        }

        if precondition.must_exist || precondition.must_not_exist {
            let current = match txn {
                Some(txn) => self.get_txn(txn),
                None => self.get(Timestamp::LATEST),
            };
            let exists = !current.is_none();
            if precondition.must_not_exist && exists {
                return Err(ModelError::Conflict(ConflictKind::DuplicateKey));
            }
            if precondition.must_exist && !exists {
                return Err(ModelError::Conflict(ConflictKind::KeyMissing));
            }
        }

        if !writer.is_none() {
            if let Some(own) = self.updates.iter_mut().find(|u| u.is_pending_for(writer)) {
                own.set_value(update.value().clone());
                return Ok(());
            }
        }
        self.updates.push(update);
        Ok(())
    }

    /// Commit the in-flight record of `txn_id`
    ///
    /// Returns false if the transaction has no in-flight record here.
    pub fn fix_commit_timestamp(&mut self, txn_id: TxnId, timestamp: Timestamp) -> bool {
        let mut found = false;
        for u in self.updates.iter_mut().filter(|u| u.is_pending_for(txn_id)) {
            found |= u.commit(timestamp);
        }
        found
    }

    /// Remove every in-flight record of `txn_id`
    ///
    /// Committed records are never removed. Returns the number removed.
    pub fn rollback_updates(&mut self, txn_id: TxnId) -> usize {
        let before = self.updates.len();
        self.updates.retain(|u| !u.is_pending_for(txn_id));
        before - self.updates.len()
    }
}
