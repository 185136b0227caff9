//! Error types for jsonvault operations.

use thiserror::Error;

/// Result type alias for jsonvault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Main error type for all jsonvault operations.
///
/// There is deliberately no not-found variant: reading or deleting an absent
/// path yields an empty result or a no-op, never an error.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Input was not well-formed JSON. Detected before the store is touched,
    /// so stored state is unchanged.
    #[error("invalid JSON: {0}")]
    Validation(String),

    /// Failure from the underlying storage engine, surfaced verbatim.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}
