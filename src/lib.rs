//! kvmodel - reference model of a transactional multi-version key-value engine
//!
//! kvmodel is an in-memory oracle for differential testing. A harness
//! mirrors every operation it sends to the engine under test onto the model
//! and compares results: read values, write statuses, and finally the full
//! table contents via the verification cursor.
//!
//! # Quick Start
//!
//! ```ignore
//! use kvmodel::{DataValue, KvDatabase, Timestamp};
//!
//! let db = KvDatabase::new();
//! let table = db.create_table("t")?;
//!
//! table.insert(DataValue::from("a"), DataValue::Int(1), Timestamp::new(5), true)?;
//!
//! let txn = db.begin_latest();
//! table.insert_txn(&*txn, DataValue::from("b"), DataValue::Int(2), false)?;
//! txn.commit_at(Timestamp::new(20))?;
//! ```
//!
//! # Layers
//!
//! - `kvmodel-core`: values, timestamps, errors, the table/transaction seam
//! - `kvmodel-storage`: update records, update chains, tables, cursors
//! - `kvmodel-concurrency`: snapshots, the transaction manager, transactions
//! - `kvmodel-engine`: the database container and its configuration

pub use kvmodel_concurrency::{
    KvTransaction, MisusePolicy, TransactionManager, TransactionSnapshot, TransactionStatus,
    WriteSetEntry,
};
pub use kvmodel_core::{
    ConflictKind, DataValue, ErrorCode, ModelError, ModelResult, Timestamp, TransactionView, TxnId,
    WriteSetTarget, NONE,
};
pub use kvmodel_engine::{KvDatabase, MisuseMode, ModelConfig, CONFIG_FILE_NAME};
pub use kvmodel_storage::{
    KvTable, KvTableItem, KvTableVerifyCursor, KvUpdate, Precondition, TableOptions, UpdateTag,
};
