//! Concurrency layer for the kvmodel reference model
//!
//! This crate implements the transaction side of the model:
//! - TransactionSnapshot: which writers a transaction may see
//! - TransactionManager: id allocation and the in-progress registry
//! - KvTransaction: begin/set-timestamp/reset-snapshot/commit/rollback
//!
//! The model is a sequential oracle. Locks here only make the types
//! shareable; callers serialize all mutating calls.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod snapshot;
pub mod transaction;

pub use manager::{MisusePolicy, TransactionManager};
pub use snapshot::TransactionSnapshot;
pub use transaction::{KvTransaction, TransactionStatus, WriteSetEntry};
