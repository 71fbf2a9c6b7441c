//! # Business Operations
//!
//! Every mutation in the system is one of these pure transforms, applied
//! through the reconciliation engine's single entry point.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │   fn op(&Ledger, args…) -> Result<Ledger, CoreError>                │
//! │                                                                     │
//! │   • precondition checked BEFORE any mutation                        │
//! │   • Err ⇒ the input ledger is untouched (caller keeps the old one)  │
//! │   • Ok  ⇒ a brand-new ledger value; the old one is discarded        │
//! │   • no clock, no randomness: timestamps arrive as arguments, and    │
//! │     entry identifiers derive from them (epoch milliseconds)         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//! The same contract applies to the document-level transforms at the bottom
//! of this module, with `SystemDocument` in place of `Ledger`.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::types::{
    FuelGrade, FuelLogEntry, Ledger, SimType, StockAction, StockLogEntry, SystemDocument, Theme,
    Transaction, UserProfile, UserRole,
};
use crate::ISSUE_SALE_AMOUNT;

// =============================================================================
// Sales
// =============================================================================

/// Confirms a sale (or records a delivery failure) and debits stock.
///
/// For a stocked variant the unit count must be positive and covered by the
/// current stock level. For the failure marker the caller-supplied amount is
/// ignored: the transaction always stores the fixed compensation constant
/// with zero cards, and stock is untouched.
pub fn confirm_sale(
    ledger: &Ledger,
    sim_type: SimType,
    amount: f64,
    sims: u32,
    at: DateTime<Utc>,
) -> CoreResult<Ledger> {
    let mut next = ledger.clone();

    let (amt, sims) = if sim_type.is_stocked() {
        if sims == 0 {
            return Err(CoreError::InvalidUnitCount { sim_type });
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(CoreError::InvalidAmount { amount });
        }
        let slot = next
            .stock
            .get_mut(sim_type)
            .ok_or(CoreError::NotStocked { sim_type })?;
        if *slot < sims {
            return Err(CoreError::InsufficientStock {
                sim_type,
                available: *slot,
                requested: sims,
            });
        }
        *slot -= sims;
        (amount, sims)
    } else {
        (ISSUE_SALE_AMOUNT, 0)
    };

    next.tx.insert(
        0,
        Transaction {
            id: at.timestamp_millis(),
            date: at,
            sim_type,
            amt,
            sims,
        },
    );
    Ok(next)
}

/// Deletes a transaction and reverses its stock effect.
///
/// The cards a stocked-variant sale took out of inventory go back in;
/// deleting a failure marker moves nothing.
pub fn delete_transaction(ledger: &Ledger, id: i64) -> CoreResult<Ledger> {
    let mut next = ledger.clone();
    let pos = next
        .tx
        .iter()
        .position(|t| t.id == id)
        .ok_or(CoreError::TransactionNotFound { id })?;
    let removed = next.tx.remove(pos);

    if let Some(slot) = next.stock.get_mut(removed.sim_type) {
        *slot += removed.sims;
    }
    Ok(next)
}

// =============================================================================
// Inventory
// =============================================================================

/// Receives new stock from the company.
pub fn receive_stock(
    ledger: &Ledger,
    sim_type: SimType,
    qty: u32,
    at: DateTime<Utc>,
) -> CoreResult<Ledger> {
    require_positive(qty)?;
    let mut next = ledger.clone();
    let slot = next
        .stock
        .get_mut(sim_type)
        .ok_or(CoreError::NotStocked { sim_type })?;
    *slot += qty;
    push_log(&mut next, sim_type, qty, StockAction::Add, at);
    Ok(next)
}

/// Returns stock to the supplier.
pub fn return_stock(
    ledger: &Ledger,
    sim_type: SimType,
    qty: u32,
    at: DateTime<Utc>,
) -> CoreResult<Ledger> {
    require_positive(qty)?;
    let mut next = ledger.clone();
    debit_stock(&mut next, sim_type, qty)?;
    push_log(&mut next, sim_type, qty, StockAction::ReturnCompany, at);
    Ok(next)
}

/// Moves sellable stock into the damaged bucket.
pub fn transfer_to_damaged(
    ledger: &Ledger,
    sim_type: SimType,
    qty: u32,
    at: DateTime<Utc>,
) -> CoreResult<Ledger> {
    require_positive(qty)?;
    let mut next = ledger.clone();
    debit_stock(&mut next, sim_type, qty)?;
    let damaged = next
        .damaged
        .get_mut(sim_type)
        .ok_or(CoreError::NotStocked { sim_type })?;
    *damaged += qty;
    push_log(&mut next, sim_type, qty, StockAction::ToDamaged, at);
    Ok(next)
}

/// Recovers damaged stock back into sellable inventory.
pub fn recover_damaged(
    ledger: &Ledger,
    sim_type: SimType,
    qty: u32,
    at: DateTime<Utc>,
) -> CoreResult<Ledger> {
    require_positive(qty)?;
    let mut next = ledger.clone();
    debit_damaged(&mut next, sim_type, qty)?;
    let slot = next
        .stock
        .get_mut(sim_type)
        .ok_or(CoreError::NotStocked { sim_type })?;
    *slot += qty;
    push_log(&mut next, sim_type, qty, StockAction::Recover, at);
    Ok(next)
}

/// Disposes of damaged stock permanently.
pub fn dispose_damaged(
    ledger: &Ledger,
    sim_type: SimType,
    qty: u32,
    at: DateTime<Utc>,
) -> CoreResult<Ledger> {
    require_positive(qty)?;
    let mut next = ledger.clone();
    debit_damaged(&mut next, sim_type, qty)?;
    push_log(&mut next, sim_type, qty, StockAction::Flush, at);
    Ok(next)
}

fn require_positive(qty: u32) -> CoreResult<()> {
    if qty == 0 {
        return Err(CoreError::InvalidQuantity { qty });
    }
    Ok(())
}

fn debit_stock(ledger: &mut Ledger, sim_type: SimType, qty: u32) -> CoreResult<()> {
    let slot = ledger
        .stock
        .get_mut(sim_type)
        .ok_or(CoreError::NotStocked { sim_type })?;
    if *slot < qty {
        return Err(CoreError::InsufficientStock {
            sim_type,
            available: *slot,
            requested: qty,
        });
    }
    *slot -= qty;
    Ok(())
}

fn debit_damaged(ledger: &mut Ledger, sim_type: SimType, qty: u32) -> CoreResult<()> {
    let slot = ledger
        .damaged
        .get_mut(sim_type)
        .ok_or(CoreError::NotStocked { sim_type })?;
    if *slot < qty {
        return Err(CoreError::InsufficientDamaged {
            sim_type,
            available: *slot,
            requested: qty,
        });
    }
    *slot -= qty;
    Ok(())
}

fn push_log(ledger: &mut Ledger, sim_type: SimType, qty: u32, action: StockAction, at: DateTime<Utc>) {
    ledger.stock_log.insert(
        0,
        StockLogEntry {
            date: at,
            sim_type,
            qty,
            action,
        },
    );
}

// =============================================================================
// Fuel
// =============================================================================

/// Records a fuel purchase. Liters are derived from the amount paid and the
/// grade's unit price at creation time and never edited afterwards.
pub fn record_fuel(
    ledger: &Ledger,
    grade: FuelGrade,
    amount: f64,
    km: f64,
    at: DateTime<Utc>,
) -> CoreResult<Ledger> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::InvalidAmount { amount });
    }
    if !km.is_finite() || km < 0.0 {
        return Err(CoreError::InvalidDistance { km });
    }
    let mut next = ledger.clone();
    next.fuel_log.insert(
        0,
        FuelLogEntry {
            id: at.timestamp_millis(),
            date: at,
            grade,
            amount,
            liters: amount / grade.unit_price(),
            km,
        },
    );
    Ok(next)
}

// =============================================================================
// Settings
// =============================================================================

/// Replaces the weekly sales target.
pub fn set_weekly_target(ledger: &Ledger, target: f64) -> CoreResult<Ledger> {
    if !target.is_finite() || target <= 0.0 {
        return Err(CoreError::InvalidTarget { target });
    }
    let mut next = ledger.clone();
    next.settings.weekly_target = target;
    Ok(next)
}

/// Replaces the preselected fuel grade.
pub fn set_preferred_fuel(ledger: &Ledger, grade: FuelGrade) -> CoreResult<Ledger> {
    let mut next = ledger.clone();
    next.settings.preferred_fuel = grade;
    Ok(next)
}

/// Shows or hides the weekly-target widget.
pub fn set_show_weekly_target(ledger: &Ledger, show: bool) -> CoreResult<Ledger> {
    let mut next = ledger.clone();
    next.settings.show_weekly_target = show;
    Ok(next)
}

// =============================================================================
// Document Operations
// =============================================================================
// Profile management and global preferences live on the SystemDocument
// rather than inside a ledger; the engine routes them through the same
// persist-then-propagate path as ledger updates.

/// Switches the global display theme.
pub fn set_theme(document: &SystemDocument, theme: Theme) -> CoreResult<SystemDocument> {
    let mut next = document.clone();
    next.global_theme = theme;
    Ok(next)
}

/// Replaces a profile's display name.
pub fn set_display_name(
    document: &SystemDocument,
    user_id: &str,
    name: &str,
) -> CoreResult<SystemDocument> {
    if name.trim().is_empty() {
        return Err(CoreError::Required { field: "name" });
    }
    let mut next = document.clone();
    let profile = next
        .find_user_mut(user_id)
        .ok_or_else(|| CoreError::ProfileNotFound { id: user_id.to_string() })?;
    profile.name = name.trim().to_string();
    Ok(next)
}

/// Replaces a profile's password.
pub fn change_password(
    document: &SystemDocument,
    user_id: &str,
    password: &str,
) -> CoreResult<SystemDocument> {
    if password.is_empty() {
        return Err(CoreError::Required { field: "password" });
    }
    let mut next = document.clone();
    let profile = next
        .find_user_mut(user_id)
        .ok_or_else(|| CoreError::ProfileNotFound { id: user_id.to_string() })?;
    profile.password = password.to_string();
    Ok(next)
}

/// Adds a new agent profile with an empty ledger.
///
/// The identifier is caller-supplied (the engine generates a UUID) so this
/// transform stays deterministic.
pub fn add_profile(
    document: &SystemDocument,
    id: &str,
    username: &str,
    password: &str,
    role: UserRole,
    name: &str,
) -> CoreResult<SystemDocument> {
    if username.trim().is_empty() {
        return Err(CoreError::Required { field: "username" });
    }
    if password.is_empty() {
        return Err(CoreError::Required { field: "password" });
    }
    if name.trim().is_empty() {
        return Err(CoreError::Required { field: "name" });
    }
    if document.users.iter().any(|u| u.username == username) {
        return Err(CoreError::DuplicateUsername {
            username: username.to_string(),
        });
    }

    let mut next = document.clone();
    next.users.push(UserProfile {
        id: id.to_string(),
        username: username.trim().to_string(),
        password: password.to_string(),
        role,
        name: name.trim().to_string(),
        ledger: Ledger::default(),
    });
    Ok(next)
}

/// Removes a profile and the ledger it owns.
///
/// A document must keep at least one profile to stay structurally valid.
pub fn remove_profile(document: &SystemDocument, user_id: &str) -> CoreResult<SystemDocument> {
    if document.users.len() == 1 {
        return Err(CoreError::LastProfile);
    }
    let mut next = document.clone();
    let pos = next
        .users
        .iter()
        .position(|u| u.id == user_id)
        .ok_or_else(|| CoreError::ProfileNotFound { id: user_id.to_string() })?;
    next.users.remove(pos);
    Ok(next)
}

// =============================================================================
// Unit Tests
// =============================================================================
