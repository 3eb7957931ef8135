//! Core types and traits for the kvmodel reference model
//!
//! This crate defines the foundational types used throughout the system:
//! - DataValue: opaque, totally ordered key/value type with a `NONE` sentinel
//! - Timestamp: logical commit/read time with `NONE` and `LATEST` sentinels
//! - TxnId: transaction identity
//! - Error: `ModelError` taxonomy and payload-free `ErrorCode`
//! - Traits: `TransactionView` and `WriteSetTarget`, the table/transaction seam

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;
pub mod value;

pub use error::{ConflictKind, ErrorCode, ModelError, ModelResult};
pub use traits::{TransactionView, WriteSetTarget};
pub use types::{Timestamp, TxnId};
pub use value::{DataValue, NONE};
