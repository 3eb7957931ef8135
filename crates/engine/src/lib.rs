//! Database container for the kvmodel reference model
//!
//! This crate ties the lower layers together:
//! - KvDatabase: table catalog and transaction factory
//! - ModelConfig: `kvmodel.toml` loading, turned into table options and the
//!   transaction misuse policy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;

pub use database::{KvDatabase, MisuseMode, ModelConfig, CONFIG_FILE_NAME};
