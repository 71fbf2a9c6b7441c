//! # Engine Error Types
//!
//! What callers of the engine can see go wrong.
//!
//! ## Propagation Policy
//! ```text
//! validation / auth failures  ──► surfaced synchronously at the call site
//! local storage write failure ──► surfaced (durability is not guaranteed)
//! remote fetch / push failure ──► swallowed inside the engine, warn-logged;
//!                                 the caller sees offline degradation, not
//!                                 an error
//! ```

use thiserror::Error;

use mandoob_core::CoreError;
use mandoob_store::StoreError;

/// Errors surfaced by the reconciliation engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A mutation was attempted with no authenticated session. Nothing was
    /// changed and nothing was written.
    #[error("no active session")]
    NoActiveSession,

    /// Credentials matched no profile. Deliberately silent about which
    /// field was wrong.
    #[error("invalid username or password")]
    AuthFailed,

    /// The operation requires an admin profile.
    #[error("operation requires an admin profile")]
    NotAuthorized,

    /// The active profile cannot delete itself.
    #[error("cannot delete the active profile")]
    ActiveProfile,

    /// A document offered for adoption has no profiles.
    #[error("document has no profiles")]
    InvalidDocument,

    /// A business rule rejected the mutation; the ledger is unchanged.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Persistence failed. When this comes out of a mutation it means the
    /// new document may not be durable and the user must be told.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
