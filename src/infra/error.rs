//! Error types for the consent ledger core
//!
//! Routine business outcomes (unknown consent id on revoke, unknown insight
//! id on acknowledge, denied access) are values, not errors. Errors here mean
//! infrastructure faults the caller cannot recover from locally.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// Backing store unavailable or corrupted; fatal, never retried here
    #[error("storage unavailable: {0}")]
    Storage(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
