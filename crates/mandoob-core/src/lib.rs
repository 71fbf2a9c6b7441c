//! # mandoob-core: Pure Business Logic for Mandoob
//!
//! Everything a SIM delivery agent's day produces (sales, inventory
//! movements, fuel purchases, target progress) modeled as pure data and
//! pure functions, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Mandoob Architecture                           │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                 mandoob-engine (reconciliation)               │  │
//! │  │   applies ops::* transforms, persists, propagates             │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │               ★ mandoob-core (THIS CRATE) ★                   │  │
//! │  │                                                               │  │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌──────────┐  │  │
//! │  │   │   types   │  │    ops    │  │  metrics  │  │  error   │  │  │
//! │  │   │  Ledger   │  │ sale/stock│  │ day/week  │  │CoreError │  │  │
//! │  │   │ SystemDoc │  │ fuel/admin│  │ fuel proj │  │          │  │  │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └──────────┘  │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO CLOCK • NO NETWORK • PURE FUNCTIONS             │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure transforms**: every operation maps an input ledger (or
//!    document) to a fresh output value; nothing mutates in place, so a
//!    transform can be retried or replayed safely.
//! 2. **Preconditions first**: an `Err` always means the input state is
//!    untouched. Stock and damaged-stock counters can never go negative.
//! 3. **No clock access**: timestamps are arguments; identifiers derive
//!    from them.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod metrics;
pub mod ops;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult};
pub use types::{
    FuelGrade, FuelLogEntry, Ledger, Settings, SimType, StockAction, StockLevels, StockLogEntry,
    SystemDocument, Theme, Transaction, UserProfile, UserRole,
};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Fixed amount recorded for a delivery-failure transaction, regardless of
/// caller input. Canonical across every client that writes the document.
pub const ISSUE_SALE_AMOUNT: f64 = 10.0;

/// Weekly sales target used when a ledger has none stored (or stores a
/// non-positive / non-finite value).
pub const DEFAULT_WEEKLY_TARGET: f64 = 3000.0;

/// Next-week fuel spend projection used when there is no spend history to
/// average.
pub const FUEL_ESTIMATE_FLOOR: f64 = 150.0;

/// Local-storage slot holding the serialized system document.
///
/// The key (and the companion below) is shared with the web client that
/// first wrote these documents; both implementations must read the same
/// slots for side-by-side use on one device to work.
pub const SYSTEM_SLOT_KEY: &str = "stc_pro_v14_system";

/// Local-storage slot holding the remembered profile identifier.
/// Absence means no remembered session.
pub const AUTH_SLOT_KEY: &str = "stc_pro_v14_auth_user";
