//! Traits joining tables and transactions
//!
//! Tables and transactions live in separate crates but reference each other:
//! a transactional write asks the transaction what it can see and registers
//! itself in the transaction's write set, and commit/rollback calls back into
//! every table the transaction wrote to. These two traits are the seam.

use std::sync::Weak;

use crate::error::ModelResult;
use crate::types::{Timestamp, TxnId};
use crate::value::DataValue;

/// What a table needs from a transaction
pub trait TransactionView: Send + Sync {
    /// Transaction identifier
    fn id(&self) -> TxnId;

    /// Fail unless the transaction is still in progress
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidState` if the transaction is terminal.
    fn ensure_active(&self) -> ModelResult<()>;

    /// Read timestamp (`Timestamp::LATEST` for "no read timestamp")
    fn read_timestamp(&self) -> Timestamp;

    /// Check whether the writer `txn_id` belongs to this transaction's snapshot
    ///
    /// Non-transactional writes (`TxnId::NONE`) are always in the snapshot.
    fn snapshot_contains(&self, txn_id: TxnId) -> bool;

    /// Register a write in the transaction's write set
    fn add_update(&self, table: Weak<dyn WriteSetTarget>, key: DataValue);
}

/// What a transaction needs from a table at commit or rollback
pub trait WriteSetTarget: Send + Sync {
    /// Table name (for logging)
    fn name(&self) -> &str;

    /// Convert the in-flight record of `txn_id` on `key` into a committed one
    fn fix_commit_timestamp(&self, key: &DataValue, txn_id: TxnId, timestamp: Timestamp);

    /// Remove the in-flight records of `txn_id` on `key`
    fn rollback_updates(&self, key: &DataValue, txn_id: TxnId);
}

