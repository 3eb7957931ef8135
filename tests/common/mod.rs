//! Shared test utilities for the scenario suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::sync::Arc;

pub use kvmodel::{
    ConflictKind, DataValue, KvDatabase, KvTable, KvTransaction, ModelError, Timestamp, NONE,
};

// ============================================================================
// Initialization
// ============================================================================

/// Route model logs to the captured test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// ============================================================================
// Value helpers
// ============================================================================

pub fn ts(t: u64) -> Timestamp {
    Timestamp::new(t)
}

pub fn key(k: &str) -> DataValue {
    DataValue::from(k)
}

pub fn int(v: i64) -> DataValue {
    DataValue::Int(v)
}

pub fn latest() -> Timestamp {
    Timestamp::LATEST
}

// ============================================================================
// Database helpers
// ============================================================================

/// Fresh database with one table named "t".
pub fn db_with_table() -> (KvDatabase, Arc<KvTable>) {
    init_tracing();
    let db = KvDatabase::new();
    let table = db
        .create_table("t")
        .expect("fresh database has no tables");
    (db, table)
}

/// Read `k` through `txn`, panicking on misuse.
pub fn read(table: &KvTable, txn: &KvTransaction, k: &DataValue) -> DataValue {
    table.get_txn(txn, k).expect("transaction is active")
}
