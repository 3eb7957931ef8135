//! Update record
//!
//! One versioned write (or tombstone) for a key. The visibility tag is a
//! tagged variant, so a record always has exactly one of a commit timestamp
//! or a pending owner:
//!
//! - `Committed`: durable and visible at or after `timestamp`
//! - `Pending`: written by an in-flight transaction, not yet timestamped
//!
//! Commit converts `Pending` to `Committed` in place. Rollback removes the
//! record from its chain. The owning transaction id survives commit so a
//! snapshot can still decide whether the writer is visible.

use kvmodel_core::{DataValue, Timestamp, TxnId};

/// Visibility tag of an update record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTag {
    /// Finalized write
    Committed {
        /// Commit timestamp
        timestamp: Timestamp,
        /// Writer (`TxnId::NONE` for autocommit writes)
        txn_id: TxnId,
    },
    /// In-flight write of a live transaction
    Pending {
        /// Owning transaction
        txn_id: TxnId,
    },
}

/// A single update in a key's chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvUpdate {
    value: DataValue,
    tag: UpdateTag,
}

impl KvUpdate {
    /// Create a committed, non-transactional update
    pub fn committed(value: DataValue, timestamp: Timestamp) -> Self {
        KvUpdate {
            value,
            tag: UpdateTag::Committed {
                timestamp,
                txn_id: TxnId::NONE,
            },
        }
    }

    /// Create an in-flight update owned by `txn_id`
    pub fn pending(value: DataValue, txn_id: TxnId) -> Self {
        KvUpdate {
            value,
            tag: UpdateTag::Pending { txn_id },
        }
    }

    /// The value (`NONE` for a tombstone)
    #[inline]
    pub fn value(&self) -> &DataValue {
        &self.value
    }

    /// The visibility tag
    #[inline]
    pub fn tag(&self) -> UpdateTag {
        self.tag
    }

    /// Check whether this record is a deletion
    #[inline]
    pub fn is_tombstone(&self) -> bool {
        self.value.is_none()
    }

    /// Check whether this record has a commit timestamp
    #[inline]
    pub fn is_committed(&self) -> bool {
        matches!(self.tag, UpdateTag::Committed { .. })
    }

    /// Commit timestamp, or `None` while in flight
    #[inline]
    pub fn timestamp(&self) -> Option<Timestamp> {
        match self.tag {
            UpdateTag::Committed { timestamp, .. } => Some(timestamp),
            UpdateTag::Pending { .. } => None,
        }
    }

    /// Writer of this record, committed or not
    #[inline]
    pub fn txn_id(&self) -> TxnId {
        match self.tag {
            UpdateTag::Committed { txn_id, .. } | UpdateTag::Pending { txn_id } => txn_id,
        }
    }

    /// Check whether this record is in flight for `txn_id`
    #[inline]
    pub fn is_pending_for(&self, txn_id: TxnId) -> bool {
        matches!(self.tag, UpdateTag::Pending { txn_id: owner } if owner == txn_id)
    }

    /// Convert an in-flight record into a committed one
    ///
    /// Returns false if the record was already committed.
    pub fn commit(&mut self, timestamp: Timestamp) -> bool {
        match self.tag {
            UpdateTag::Pending { txn_id } => {
                self.tag = UpdateTag::Committed { timestamp, txn_id };
                true
            }
            UpdateTag::Committed { .. } => false,
        }
    }

    /// Replace the value of an in-flight record
    pub(crate) fn set_value(&mut self, value: DataValue) {
        debug_assert!(!self.is_committed(), "committed records are immutable");
        self.value = value;
    }
}
