//! Model configuration via `kvmodel.toml`
//!
//! The harness may drop a `kvmodel.toml` next to the engine's own
//! configuration so both sides agree on conflict detection. Every field has a
//! default, so an empty document is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use kvmodel_concurrency::MisusePolicy;
use kvmodel_core::{ModelError, ModelResult};
use kvmodel_storage::TableOptions;

/// Config file name conventionally used by the harness.
pub const CONFIG_FILE_NAME: &str = "kvmodel.toml";

/// How transaction misuse is reported, as spelled in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MisuseMode {
    /// Return an `InvalidState` error
    #[default]
    Error,
    /// Panic
    Panic,
}

impl From<MisuseMode> for MisusePolicy {
    fn from(mode: MisuseMode) -> Self {
        match mode {
            MisuseMode::Error => MisusePolicy::Error,
            MisuseMode::Panic => MisusePolicy::Panic,
        }
    }
}

/// Model configuration loaded from `kvmodel.toml`.
///
/// # Example
///
/// ```toml
/// write_conflicts = true
/// on_misuse = "error"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Detect write-write conflicts between transactions.
    #[serde(default = "default_write_conflicts")]
    pub write_conflicts: bool,
    /// How acting on a finished transaction is reported: `"error"` or `"panic"`.
    #[serde(default)]
    pub on_misuse: MisuseMode,
}

fn default_write_conflicts() -> bool {
    true
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            write_conflicts: default_write_conflicts(),
            on_misuse: MisuseMode::default(),
        }
    }
}

impl ModelConfig {
    /// Options applied to every table created under this config.
    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            detect_write_conflicts: self.write_conflicts,
        }
    }

    /// Misuse policy handed to the transaction manager.
    pub fn misuse_policy(&self) -> MisusePolicy {
        self.on_misuse.into()
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# kvmodel configuration
#
# Detect write-write conflicts between concurrent transactions (default: true).
# Disable to model an engine that lets the last writer win.
write_conflicts = true

# What happens when a finished transaction is used, or a transaction is
# committed without a commit timestamp: "error" (default) or "panic".
on_misuse = "error"
"#
    }

    /// Parse config from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Config` if the document does not parse.
    pub fn from_toml_str(content: &str) -> ModelResult<Self> {
        toml::from_str(content)
            .map_err(|e| ModelError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Config` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> ModelResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ModelError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            ModelError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> ModelResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                ModelError::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}
