//! # Domain Error Types
//!
//! Errors raised by ledger and document transforms.
//!
//! ## Design
//! Every operation checks its precondition before touching the ledger, so a
//! `CoreError` always means the input state is unchanged. Variants carry the
//! context a caller needs to build a user-facing message (variant, counts).

use thiserror::Error;

use crate::types::SimType;

/// Business rule violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Not enough sellable stock to complete the operation.
    #[error("insufficient {sim_type} stock: available {available}, requested {requested}")]
    InsufficientStock {
        sim_type: SimType,
        available: u32,
        requested: u32,
    },

    /// Not enough damaged stock to recover or dispose.
    #[error("insufficient damaged {sim_type} stock: available {available}, requested {requested}")]
    InsufficientDamaged {
        sim_type: SimType,
        available: u32,
        requested: u32,
    },

    /// A stock operation was attempted on the failure marker, which has no
    /// inventory counters.
    #[error("{sim_type} is not an inventory-tracked product")]
    NotStocked { sim_type: SimType },

    /// Quantity must be positive.
    #[error("quantity must be positive, got {qty}")]
    InvalidQuantity { qty: u32 },

    /// A completed sale of a stocked variant must convey at least one card.
    #[error("unit count must be positive for a {sim_type} sale")]
    InvalidUnitCount { sim_type: SimType },

    /// Amount must be a non-negative finite number.
    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    /// Odometer delta must be a non-negative finite number.
    #[error("invalid distance: {km}")]
    InvalidDistance { km: f64 },

    /// Weekly target must be a positive finite number.
    #[error("invalid weekly target: {target}")]
    InvalidTarget { target: f64 },

    /// No transaction with the given identifier.
    #[error("transaction not found: {id}")]
    TransactionNotFound { id: i64 },

    /// No profile with the given identifier.
    #[error("profile not found: {id}")]
    ProfileNotFound { id: String },

    /// Usernames are unique within a document.
    #[error("username '{username}' already exists")]
    DuplicateUsername { username: String },

    /// A document must always keep at least one profile.
    #[error("cannot remove the last profile")]
    LastProfile,

    /// A required field was empty.
    #[error("{field} is required")]
    Required { field: &'static str },
}

/// Convenience alias for Results with [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_context() {
        let err = CoreError::InsufficientStock {
            sim_type: SimType::Sawa,
            available: 1,
            requested: 2,
        };
        assert_eq!(
            err.to_string(),
            "insufficient sawa stock: available 1, requested 2"
        );

        let err = CoreError::DuplicateUsername { username: "talal".into() };
        assert_eq!(err.to_string(), "username 'talal' already exists");
    }
}
