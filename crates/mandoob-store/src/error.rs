//! # Store Error Types
//!
//! Errors for local-slot, remote-store, and backup-file operations.
//!
//! ## Error Flow
//! ```text
//! sqlx::Error ──────────┐
//! serde_json::Error ────┼──► StoreError ──► EngineError ──► caller
//! reqwest::Error ───────┤
//! std::io::Error ───────┘
//! ```
//! The engine decides which of these are fatal: local write failures
//! surface to the user, network failures degrade silently to offline mode,
//! and corrupt documents are rejected wholesale with the prior working
//! document retained.

use thiserror::Error;

/// Persistence and transport errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The local database could not be opened or the pool is unusable.
    #[error("local storage connection failed: {0}")]
    ConnectionFailed(String),

    /// A local read or write failed after the connection was established.
    #[error("local storage query failed: {0}")]
    QueryFailed(String),

    /// A stored or fetched document could not be decoded.
    #[error("document is corrupt: {0}")]
    Corrupt(String),

    /// A decodable document failed structural validation.
    #[error("document rejected: {0}")]
    Invalid(String),

    /// The remote store could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// Backup file I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::ConnectionFailed(err.to_string())
            }
            other => StoreError::QueryFailed(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Network(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
