//! Value type for the reference model
//!
//! This module defines `DataValue`, the opaque value stored under every key
//! and used as the key itself. The model never interprets values beyond
//! equality and ordering.
//!
//! ## Sentinel
//!
//! `DataValue::None` (exported as [`NONE`]) means "no value". A read of a
//! missing or deleted key returns it, and an update record carrying it is a
//! tombstone.
//!
//! ## Ordering
//!
//! Variants order by discriminant first, then by payload, so keys of mixed
//! types still have a total order for the verification cursor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The "no value" sentinel
pub const NONE: DataValue = DataValue::None;

/// A key or value in the model
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum DataValue {
    /// No value (absent key or tombstone)
    #[default]
    None,
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit unsigned integer
    UInt(u64),
    /// UTF-8 string
    String(String),
}

impl DataValue {
    /// Check whether this is the `NONE` sentinel
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, DataValue::None)
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::None => write!(f, "(none)"),
            DataValue::Int(v) => write!(f, "{}", v),
            DataValue::UInt(v) => write!(f, "{}", v),
            DataValue::String(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Int(v)
    }
}

impl From<u64> for DataValue {
    fn from(v: u64) -> Self {
        DataValue::UInt(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        DataValue::String(v.to_string())
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        DataValue::String(v)
    }
}
