//! Identity and time types
//!
//! - `Timestamp`: logical commit/read time
//! - `TxnId`: transaction identity
//!
//! Both are plain `u64` newtypes. Never do arithmetic on the raw values
//! outside this module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical timestamp
///
/// ## Sentinels
///
/// - `Timestamp::NONE` (0): no timestamp assigned yet. A record committed at
///   0 is visible at every read timestamp.
/// - `Timestamp::LATEST` (`u64::MAX`): read as of now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// No timestamp assigned
    pub const NONE: Timestamp = Timestamp(0);

    /// Read-as-of-now marker
    pub const LATEST: Timestamp = Timestamp(u64::MAX);

    /// Create a timestamp from a raw value
    #[inline]
    pub const fn new(ts: u64) -> Self {
        Timestamp(ts)
    }

    /// Raw value
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Check whether this is `Timestamp::NONE`
    #[inline]
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// Check whether this is `Timestamp::LATEST`
    #[inline]
    pub const fn is_latest(&self) -> bool {
        self.0 == u64::MAX
    }
}

impl From<u64> for Timestamp {
    fn from(ts: u64) -> Self {
        Timestamp(ts)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_latest() {
            write!(f, "latest")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Transaction identifier
///
/// Allocated monotonically by the transaction manager starting at 1.
/// `TxnId::NONE` tags non-transactional (autocommit) writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct TxnId(u64);

impl TxnId {
    /// Non-transactional writer
    pub const NONE: TxnId = TxnId(0);

    /// Create a transaction id from a raw value
    #[inline]
    pub const fn new(id: u64) -> Self {
        TxnId(id)
    }

    /// Raw value
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Check whether this is `TxnId::NONE`
    #[inline]
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
