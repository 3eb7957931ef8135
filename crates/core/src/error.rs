//! Error types for the reference model
//!
//! Every table and transaction operation reports its outcome as a
//! `ModelResult`. The harness compares these against the statuses returned by
//! the engine under test, so errors are values, never panics.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type alias for model operations
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Which existence or ownership check a write failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictKind {
    /// The write required the key to be absent, but a live value is visible
    DuplicateKey,
    /// The write required a live value, but none is visible
    KeyMissing,
    /// Another transaction owns an update the writer cannot see
    WriteConflict,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictKind::DuplicateKey => write!(f, "key already exists"),
            ConflictKind::KeyMissing => write!(f, "key does not exist"),
            ConflictKind::WriteConflict => write!(f, "write conflict"),
        }
    }
}

/// Error types for the model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Key (or its chain) does not exist for a read or a remove
    #[error("Key not found")]
    NotFound,

    /// Existence precondition or write-write check failed
    #[error("Conflict: {0}")]
    Conflict(ConflictKind),

    /// Transaction is terminal, or commit was attempted without a timestamp
    #[error("Invalid transaction state: {0}")]
    InvalidState(String),

    /// The call itself is malformed, e.g. writing the `NONE` sentinel as a value
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A table with this name already exists
    #[error("Table already exists: {0}")]
    TableExists(String),

    /// No table with this name
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model state disagrees with the engine's
    #[error("Verification failed: {0}")]
    Verification(String),
}

/// Payload-free status code, directly comparable with the engine's status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// See [`ModelError::NotFound`]
    NotFound,
    /// See [`ModelError::Conflict`]
    Conflict(ConflictKind),
    /// See [`ModelError::InvalidState`]
    InvalidState,
    /// See [`ModelError::InvalidOperation`]
    InvalidOperation,
    /// Catalog errors: [`ModelError::TableExists`], [`ModelError::TableNotFound`]
    Catalog,
    /// See [`ModelError::Config`]
    Config,
    /// See [`ModelError::Verification`]
    Verification,
}

impl ModelError {
    /// Create an `InvalidState` error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        ModelError::InvalidState(msg.into())
    }

    /// Status code with messages stripped
    pub fn code(&self) -> ErrorCode {
        match self {
            ModelError::NotFound => ErrorCode::NotFound,
            ModelError::Conflict(kind) => ErrorCode::Conflict(*kind),
            ModelError::InvalidState(_) => ErrorCode::InvalidState,
            ModelError::InvalidOperation(_) => ErrorCode::InvalidOperation,
            ModelError::TableExists(_) | ModelError::TableNotFound(_) => ErrorCode::Catalog,
            ModelError::Config(_) => ErrorCode::Config,
            ModelError::Verification(_) => ErrorCode::Verification,
        }
    }

    /// Check whether this is a conflict of the given kind
    pub fn is_conflict(&self, kind: ConflictKind) -> bool {
        matches!(self, ModelError::Conflict(k) if *k == kind)
    }
}
