//! KvTable: key to update-chain map with the CRUD surface
//!
//! This module implements the table using:
//! - `BTreeMap<DataValue, KvTableItem>` so the verification cursor walks keys in order
//! - `parking_lot::RwLock` so tables can be shared with the transactions that write them
//!
//! # Design Notes
//!
//! - **Sequential oracle**: the lock only keeps memory safe. Callers must
//!   serialize mutating calls and must not mutate while a verification pass
//!   is comparing against the engine.
//! - **Lazy chains**: a chain is created by the first insert or update of a
//!   key. Reads of a never-written key yield `NONE`; removes of it yield
//!   `NotFound`.
//! - **Two addressing modes**: every operation exists timestamp-addressed
//!   (autocommit) and transaction-addressed (`*_txn`). Transactional writes
//!   register the key in the transaction's write set.

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::trace;

use kvmodel_core::{
    ConflictKind, DataValue, ModelError, ModelResult, Timestamp, TransactionView, TxnId,
    WriteSetTarget, NONE,
};

use crate::item::{KvTableItem, Precondition};
use crate::update::KvUpdate;
use crate::verify::KvTableVerifyCursor;

/// Per-table behavior switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    /// Reject writes that would overwrite another transaction's update
    pub detect_write_conflicts: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            detect_write_conflicts: true,
        }
    }
}

/// A named key-value table of update chains
#[derive(Debug)]
pub struct KvTable {
    name: String,
    options: TableOptions,
    data: RwLock<BTreeMap<DataValue, KvTableItem>>,
}

impl KvTable {
    /// Create an empty table with default options
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, TableOptions::default())
    }

    /// Create an empty table
    pub fn with_options(name: impl Into<String>, options: TableOptions) -> Self {
        KvTable {
            name: name.into(),
            options,
            data: RwLock::new(BTreeMap::new()),
        }
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Options this table was created with
    pub fn options(&self) -> TableOptions {
        self.options
    }

    /// Number of chains (keys ever written)
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Check whether no key was ever written
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Value of `key` visible at `timestamp`
    pub fn get(&self, key: &DataValue, timestamp: Timestamp) -> DataValue {
        self.data
            .read()
            .get(key)
            .map(|item| item.get(timestamp))
            .unwrap_or(NONE)
    }

    /// Value of `key` visible to `txn`
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the transaction is no longer in progress.
    pub fn get_txn(&self, txn: &dyn TransactionView, key: &DataValue) -> ModelResult<DataValue> {
        txn.ensure_active()?;
        Ok(self
            .data
            .read()
            .get(key)
            .map(|item| item.get_txn(txn))
            .unwrap_or(NONE))
    }

    /// Check whether `value` is among the versions of `key` visible at `timestamp`
    pub fn contains_any(&self, key: &DataValue, value: &DataValue, timestamp: Timestamp) -> bool {
        self.data
            .read()
            .get(key)
            .is_some_and(|item| item.contains_any(value, timestamp))
    }

    // ========================================================================
    // Timestamp-addressed writes
    // ========================================================================

    /// Insert `key`; fails with `DuplicateKey` if it exists unless `overwrite`
    ///
    /// `value` must not be `NONE` (`InvalidOperation`); use `remove` to delete.
    pub fn insert(
        &self,
        key: DataValue,
        value: DataValue,
        timestamp: Timestamp,
        overwrite: bool,
    ) -> ModelResult<()> {
        self.write(key, KvUpdate::committed(value, timestamp), None, Precondition::insert(overwrite))
    }

    /// Update `key`; fails with `KeyMissing` if it does not exist unless `overwrite`
    pub fn update(
        &self,
        key: DataValue,
        value: DataValue,
        timestamp: Timestamp,
        overwrite: bool,
    ) -> ModelResult<()> {
        self.write(key, KvUpdate::committed(value, timestamp), None, Precondition::update(overwrite))
    }

    /// Delete `key` by appending a tombstone
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key was never written or is already deleted.
    pub fn remove(&self, key: &DataValue, timestamp: Timestamp) -> ModelResult<()> {
        self.delete(key, KvUpdate::committed(NONE, timestamp), None)
    }

    // ========================================================================
    // Transaction-addressed writes
    // ========================================================================

    /// Insert `key` within `txn`
    pub fn insert_txn(
        self: &Arc<Self>,
        txn: &dyn TransactionView,
        key: DataValue,
        value: DataValue,
        overwrite: bool,
    ) -> ModelResult<()> {
        txn.ensure_active()?;
        let update = KvUpdate::pending(value, txn.id());
        self.write(key.clone(), update, Some(txn), Precondition::insert(overwrite))?;
        self.register(txn, key);
        Ok(())
    }

    /// Update `key` within `txn`
    pub fn update_txn(
        self: &Arc<Self>,
        txn: &dyn TransactionView,
        key: DataValue,
        value: DataValue,
        overwrite: bool,
    ) -> ModelResult<()> {
        txn.ensure_active()?;
        let update = KvUpdate::pending(value, txn.id());
        self.write(key.clone(), update, Some(txn), Precondition::update(overwrite))?;
        self.register(txn, key);
        Ok(())
    }

    /// Delete `key` within `txn`
    pub fn remove_txn(self: &Arc<Self>, txn: &dyn TransactionView, key: &DataValue) -> ModelResult<()> {
        txn.ensure_active()?;
        self.delete(key, KvUpdate::pending(NONE, txn.id()), Some(txn))?;
        self.register(txn, key.clone());
        Ok(())
    }

    fn register(self: &Arc<Self>, txn: &dyn TransactionView, key: DataValue) {
        let weak: Weak<Self> = Arc::downgrade(self);
        let table: Weak<dyn WriteSetTarget> = weak;
        txn.add_update(table, key);
    }

    fn write(
        &self,
        key: DataValue,
        update: KvUpdate,
        txn: Option<&dyn TransactionView>,
        precondition: Precondition,
    ) -> ModelResult<()> {
        // NONE is the tombstone; deletes go through `delete`
        if update.is_tombstone() {
            return Err(ModelError::InvalidOperation(format!(
                "table {}: cannot write NONE as the value of {}",
                self.name, key
            )));
        }
        let mut data = self.data.write();
        let created = !data.contains_key(&key);
        let item = data.entry(key.clone()).or_default();
        let result = item.add_update(
            update,
            txn,
            precondition,
            self.options.detect_write_conflicts,
        );
        if result.is_err() && created {
            data.remove(&key);
        }
        trace!(table = %self.name, key = %key, ok = result.is_ok(), "write");
        result
    }

    fn delete(
        &self,
        key: &DataValue,
        tombstone: KvUpdate,
        txn: Option<&dyn TransactionView>,
    ) -> ModelResult<()> {
        let mut data = self.data.write();
        let item = data.get_mut(key).ok_or(ModelError::NotFound)?;
        let result = item
            .add_update(
                tombstone,
                txn,
                Precondition::remove(),
                self.options.detect_write_conflicts,
            )
            .map_err(|e| match e {
                ModelError::Conflict(ConflictKind::KeyMissing) => ModelError::NotFound,
                other => other,
            });
        trace!(table = %self.name, key = %key, ok = result.is_ok(), "remove");
        result
    }

    // ========================================================================
    // Commit and rollback support
    // ========================================================================

    /// Commit the in-flight record of `txn_id` on `key`
    ///
    /// Silently does nothing if there is no such record.
    pub fn fix_commit_timestamp(&self, key: &DataValue, txn_id: TxnId, timestamp: Timestamp) {
        let fixed = self
            .data
            .write()
            .get_mut(key)
            .is_some_and(|item| item.fix_commit_timestamp(txn_id, timestamp));
        if !fixed {
            trace!(table = %self.name, key = %key, txn_id = %txn_id, "no in-flight update to commit");
        }
    }

    /// Remove the in-flight records of `txn_id` on `key`
    pub fn rollback_updates(&self, key: &DataValue, txn_id: TxnId) {
        if let Some(item) = self.data.write().get_mut(key) {
            let removed = item.rollback_updates(txn_id);
            trace!(table = %self.name, key = %key, txn_id = %txn_id, removed, "rollback");
        }
    }

    // ========================================================================
    // Verification
    // ========================================================================

    /// Cursor over a frozen copy of the table's chains
    ///
    /// Not thread-safe with respect to the comparison: the caller must not
    /// mutate this table while the cursor is being used to diff against the
    /// engine, or the two sides will be describing different moments.
    pub fn verify_cursor(&self) -> KvTableVerifyCursor {
        KvTableVerifyCursor::new(&self.data.read())
    }

    /// Compare the table's latest state against the engine's full scan
    ///
    /// `actual` must yield the engine's live (key, value) pairs in key order.
    ///
    /// # Errors
    ///
    /// Returns `Verification` describing the first disagreement.
    pub fn verify<I>(&self, actual: I) -> ModelResult<()>
    where
        I: IntoIterator<Item = (DataValue, DataValue)>,
    {
        let mut cursor = self.verify_cursor();
        for (key, value) in actual {
            if !cursor.verify_next(&key, &value) {
                return Err(ModelError::Verification(format!(
                    "table {}: engine returned {} => {} that the model does not have",
                    self.name, key, value
                )));
            }
        }
        if let Some(key) = cursor.peek_live_key() {
            return Err(ModelError::Verification(format!(
                "table {}: model has key {} that the engine does not return",
                self.name, key
            )));
        }
        Ok(())
    }
}

impl WriteSetTarget for KvTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn fix_commit_timestamp(&self, key: &DataValue, txn_id: TxnId, timestamp: Timestamp) {
        KvTable::fix_commit_timestamp(self, key, txn_id, timestamp)
    }

    fn rollback_updates(&self, key: &DataValue, txn_id: TxnId) {
        KvTable::rollback_updates(self, key, txn_id)
    }
}
