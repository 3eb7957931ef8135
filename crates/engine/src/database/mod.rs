//! Database container
//!
//! `KvDatabase` owns the table catalog and the transaction manager. It is the
//! object a test harness keeps alongside the engine under test: every table
//! the engine creates gets a model table here, and every engine transaction
//! gets a model transaction from `begin_transaction`.
//!
//! ## Transaction API
//!
//! 1. **Closure API**: `db.transaction(read_ts, commit_ts, |txn| { ... })`
//!    - Commits at `commit_ts` on success, rolls back on error
//!    - Returns the closure's return value
//!
//! 2. **Manual API**: `begin_transaction()` then `set_timestamp()` and
//!    `commit()` / `rollback()` on the returned transaction
//!    - For harnesses that drive commit timing from the engine's side

pub mod config;

pub use config::{ModelConfig, MisuseMode, CONFIG_FILE_NAME};

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use kvmodel_concurrency::{KvTransaction, TransactionManager};
use kvmodel_core::{ModelError, ModelResult, Timestamp};
use kvmodel_storage::KvTable;

/// Table catalog plus transaction factory
#[derive(Debug)]
pub struct KvDatabase {
    config: ModelConfig,
    tables: RwLock<BTreeMap<String, Arc<KvTable>>>,
    manager: Arc<TransactionManager>,
}

impl KvDatabase {
    /// Create an empty database with the default configuration
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    /// Create an empty database with the given configuration
    pub fn with_config(config: ModelConfig) -> Self {
        let manager = Arc::new(TransactionManager::new(config.misuse_policy()));
        KvDatabase {
            config,
            tables: RwLock::new(BTreeMap::new()),
            manager,
        }
    }

    /// Configuration this database was created with
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Transaction manager shared by every transaction of this database
    pub fn transaction_manager(&self) -> &Arc<TransactionManager> {
        &self.manager
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Create a table named `name`
    ///
    /// # Errors
    ///
    /// Returns `ModelError::TableExists` if the name is taken.
    pub fn create_table(&self, name: &str) -> ModelResult<Arc<KvTable>> {
        let mut tables = self.tables.write();
        if tables.contains_key(name) {
            return Err(ModelError::TableExists(name.to_string()));
        }
        let table = Arc::new(KvTable::with_options(name, self.config.table_options()));
        tables.insert(name.to_string(), Arc::clone(&table));
        debug!(table = name, "create table");
        Ok(table)
    }

    /// Look up a table by name
    ///
    /// # Errors
    ///
    /// Returns `ModelError::TableNotFound` if no such table exists.
    pub fn table(&self, name: &str) -> ModelResult<Arc<KvTable>> {
        self.tables
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ModelError::TableNotFound(name.to_string()))
    }

    /// Remove a table from the catalog
    ///
    /// Transactions that wrote to the table skip it at commit or rollback
    /// once the last handle is gone.
    pub fn drop_table(&self, name: &str) -> ModelResult<()> {
        match self.tables.write().remove(name) {
            Some(_) => {
                debug!(table = name, "drop table");
                Ok(())
            }
            None => Err(ModelError::TableNotFound(name.to_string())),
        }
    }

    /// Names of all tables, in order
    pub fn table_names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Begin a transaction reading at `read_timestamp`
    pub fn begin_transaction(&self, read_timestamp: Timestamp) -> Arc<KvTransaction> {
        self.manager.begin(read_timestamp)
    }

    /// Begin a transaction reading the latest committed state
    pub fn begin_latest(&self) -> Arc<KvTransaction> {
        self.begin_transaction(Timestamp::LATEST)
    }

    /// Run `f` inside a transaction
    ///
    /// Commits at `commit_timestamp` if `f` succeeds; rolls back if it fails
    /// and returns its error. A transaction that `f` already finished is left
    /// alone.
    pub fn transaction<F, T>(
        &self,
        read_timestamp: Timestamp,
        commit_timestamp: Timestamp,
        f: F,
    ) -> ModelResult<T>
    where
        F: FnOnce(&Arc<KvTransaction>) -> ModelResult<T>,
    {
        let txn = self.begin_transaction(read_timestamp);
        match f(&txn) {
            Ok(value) => {
                if txn.is_active() {
                    txn.commit_at(commit_timestamp)?;
                }
                Ok(value)
            }
            Err(e) => {
                if txn.is_active() {
                    txn.rollback()?;
                }
                Err(e)
            }
        }
    }
}

impl Default for KvDatabase {
    fn default() -> Self {
        Self::new()
    }
}
