//! Storage layer for the kvmodel reference model
//!
//! This crate implements the multi-version data model:
//! - KvUpdate: one versioned write or tombstone, committed or in flight
//! - KvTableItem: per-key update chain with the visibility rule
//! - KvTable: key to chain map with timestamp- and transaction-addressed CRUD
//! - KvTableVerifyCursor: frozen, ordered walk for diffing against the engine

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod item;
pub mod table;
pub mod update;
pub mod verify;

pub use item::{KvTableItem, Precondition};
pub use table::{KvTable, TableOptions};
pub use update::{KvUpdate, UpdateTag};
pub use verify::KvTableVerifyCursor;
