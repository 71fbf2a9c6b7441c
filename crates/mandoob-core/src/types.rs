//! # Domain Types
//!
//! Core domain types for the Mandoob system document.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        SystemDocument                               │
//! │                                                                     │
//! │   users: Vec<UserProfile>            globalTheme: Theme             │
//! │             │                                                       │
//! │             ▼ (1:1, exclusively owned)                              │
//! │          Ledger                                                     │
//! │   ┌─────────────────┬───────────────┬──────────────┬────────────┐  │
//! │   │ tx              │ stock/damaged │ stockLog     │ fuelLog    │  │
//! │   │ Vec<Transaction>│ StockLevels   │ Vec<StockLog │ Vec<FuelLog│  │
//! │   │ (newest first)  │ (per SimType) │    Entry>    │    Entry>  │  │
//! │   └─────────────────┴───────────────┴──────────────┴────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire-Format Contract
//! The serde field and tag names are shared with the JSON documents already
//! sitting in the remote store and in devices' local slots: `tx`, `db`,
//! `stockLog`, `fuelLog`, `globalTheme`, `weeklyTarget`, and the lowercase
//! enum tags. Renaming any of them is a breaking protocol change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_WEEKLY_TARGET;

// =============================================================================
// SIM Product Types
// =============================================================================

/// A SIM product variant, or the delivery-failure marker.
///
/// `Issue` records a visit where the sale could not be completed. It is not
/// inventory-tracked: no stock moves, and the transaction amount is a fixed
/// compensation constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimType {
    /// Jawwy prepaid SIM.
    Jawwy,
    /// Sawa prepaid SIM.
    Sawa,
    /// Multi-SIM customer order.
    Multi,
    /// Delivery-failure marker (no inventory).
    Issue,
}

impl SimType {
    /// The three inventory-tracked variants, in display order.
    pub const STOCKED: [SimType; 3] = [SimType::Jawwy, SimType::Sawa, SimType::Multi];

    /// Whether this variant has stock and damaged-stock counters.
    #[inline]
    pub const fn is_stocked(&self) -> bool {
        !matches!(self, SimType::Issue)
    }
}

impl std::fmt::Display for SimType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimType::Jawwy => write!(f, "jawwy"),
            SimType::Sawa => write!(f, "sawa"),
            SimType::Multi => write!(f, "multi"),
            SimType::Issue => write!(f, "issue"),
        }
    }
}

// =============================================================================
// Stock Audit Actions
// =============================================================================

/// The kind of inventory movement recorded in a [`StockLogEntry`].
///
/// Tags match the documents written by existing clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockAction {
    /// Received new stock from the company.
    #[serde(rename = "add")]
    Add,
    /// Returned stock to the supplier.
    #[serde(rename = "return_company")]
    ReturnCompany,
    /// Moved stock into the damaged bucket.
    #[serde(rename = "to_damaged")]
    ToDamaged,
    /// Recovered damaged stock back into sellable stock.
    #[serde(rename = "recover")]
    Recover,
    /// Disposed of damaged stock.
    #[serde(rename = "flush")]
    Flush,
}

impl std::fmt::Display for StockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockAction::Add => write!(f, "add"),
            StockAction::ReturnCompany => write!(f, "return_company"),
            StockAction::ToDamaged => write!(f, "to_damaged"),
            StockAction::Recover => write!(f, "recover"),
            StockAction::Flush => write!(f, "flush"),
        }
    }
}

// =============================================================================
// Fuel Grades
// =============================================================================

/// Fuel grade, with its fixed unit price in currency units per liter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FuelGrade {
    /// Octane 91 gasoline.
    #[default]
    #[serde(rename = "91")]
    Octane91,
    /// Octane 95 gasoline.
    #[serde(rename = "95")]
    Octane95,
    /// Diesel.
    #[serde(rename = "diesel")]
    Diesel,
}

impl FuelGrade {
    /// Pump price per liter. Liters on a [`FuelLogEntry`] are always derived
    /// from the amount paid and this price at entry-creation time.
    #[inline]
    pub const fn unit_price(&self) -> f64 {
        match self {
            FuelGrade::Octane91 => 2.18,
            FuelGrade::Octane95 => 2.33,
            FuelGrade::Diesel => 1.15,
        }
    }
}

impl std::fmt::Display for FuelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FuelGrade::Octane91 => write!(f, "91"),
            FuelGrade::Octane95 => write!(f, "95"),
            FuelGrade::Diesel => write!(f, "diesel"),
        }
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// One sale or delivery-failure event.
///
/// Immutable once created; deletion is the only mutation, and it reverses
/// the stock effect (see `ops::delete_transaction`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Epoch-millisecond identifier, derived from the creation timestamp.
    pub id: i64,

    /// When the sale happened.
    pub date: DateTime<Utc>,

    /// Product variant sold, or the failure marker.
    #[serde(rename = "type")]
    pub sim_type: SimType,

    /// Amount collected, in currency units.
    pub amt: f64,

    /// Number of SIM cards conveyed. Zero for the failure marker.
    pub sims: u32,
}

// =============================================================================
// Stock Log
// =============================================================================

/// Audit record of one inventory-quantity change. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLogEntry {
    /// When the movement happened.
    pub date: DateTime<Utc>,

    /// Product variant moved. Never the failure marker.
    #[serde(rename = "type")]
    pub sim_type: SimType,

    /// Quantity moved. Always positive.
    pub qty: u32,

    /// What kind of movement this was.
    pub action: StockAction,
}

// =============================================================================
// Fuel Log
// =============================================================================

/// One fuel purchase.
///
/// `grade`, `liters` and `km` default when absent so entries written by
/// older clients (which stored only id/date/amount) still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelLogEntry {
    /// Epoch-millisecond identifier, derived from the creation timestamp.
    pub id: i64,

    /// When the purchase happened.
    pub date: DateTime<Utc>,

    /// Fuel grade purchased.
    #[serde(rename = "type", default)]
    pub grade: FuelGrade,

    /// Amount paid, in currency units.
    pub amount: f64,

    /// Liters purchased: always `amount / grade.unit_price()` at creation
    /// time, never edited independently.
    #[serde(default)]
    pub liters: f64,

    /// Odometer delta since the previous fill-up, in kilometers.
    /// User-supplied; zero when unknown.
    #[serde(default)]
    pub km: f64,
}

// =============================================================================
// Stock Levels
// =============================================================================

/// Per-variant inventory counters for the three stocked SIM types.
///
/// ## Invariant
/// Counters are unsigned and every operation checks availability before
/// debiting, so a level can never go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StockLevels {
    #[serde(default)]
    pub jawwy: u32,
    #[serde(default)]
    pub sawa: u32,
    #[serde(default)]
    pub multi: u32,
}

impl StockLevels {
    /// Returns the counter for a stocked variant, or `None` for the
    /// failure marker.
    pub fn get(&self, sim_type: SimType) -> Option<u32> {
        match sim_type {
            SimType::Jawwy => Some(self.jawwy),
            SimType::Sawa => Some(self.sawa),
            SimType::Multi => Some(self.multi),
            SimType::Issue => None,
        }
    }

    /// Mutable access to the counter for a stocked variant.
    pub fn get_mut(&mut self, sim_type: SimType) -> Option<&mut u32> {
        match sim_type {
            SimType::Jawwy => Some(&mut self.jawwy),
            SimType::Sawa => Some(&mut self.sawa),
            SimType::Multi => Some(&mut self.multi),
            SimType::Issue => None,
        }
    }

    /// Total units across all stocked variants.
    pub fn total(&self) -> u32 {
        self.jawwy + self.sawa + self.multi
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Per-user preferences carried inside the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Weekly sales target in currency units.
    #[serde(rename = "weeklyTarget", default = "default_weekly_target")]
    pub weekly_target: f64,

    /// Whether the home screen shows the weekly-target widget.
    #[serde(rename = "showWeeklyTarget", default = "default_true")]
    pub show_weekly_target: bool,

    /// Fuel grade preselected on the fuel form.
    #[serde(rename = "preferredFuel", default)]
    pub preferred_fuel: FuelGrade,
}

fn default_weekly_target() -> f64 {
    DEFAULT_WEEKLY_TARGET
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            weekly_target: DEFAULT_WEEKLY_TARGET,
            show_weekly_target: true,
            preferred_fuel: FuelGrade::default(),
        }
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// One user's complete business state.
///
/// All collections are newest-first; `tx` is the only one whose entries can
/// be removed, and only wholesale (no in-place edits).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// Sales and failure events, newest first.
    #[serde(default)]
    pub tx: Vec<Transaction>,

    /// Sellable inventory.
    #[serde(default)]
    pub stock: StockLevels,

    /// Damaged inventory, awaiting recovery or disposal.
    #[serde(default)]
    pub damaged: StockLevels,

    /// Inventory movement audit trail, newest first. Append-only.
    #[serde(rename = "stockLog", default)]
    pub stock_log: Vec<StockLogEntry>,

    /// Fuel purchases, newest first. Append-only.
    #[serde(rename = "fuelLog", default)]
    pub fuel_log: Vec<FuelLogEntry>,

    /// User preferences.
    #[serde(default)]
    pub settings: Settings,
}

impl Ledger {
    /// Looks up a transaction by identifier.
    pub fn find_transaction(&self, id: i64) -> Option<&Transaction> {
        self.tx.iter().find(|t| t.id == id)
    }
}

// =============================================================================
// User Profiles
// =============================================================================

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Can manage other profiles.
    Admin,
    /// Regular delivery agent.
    User,
}

/// One agent account. Exclusively owns its [`Ledger`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable identifier; profiles are unique by this within a document.
    pub id: String,

    /// Login name, matched case-sensitively.
    pub username: String,

    /// Plaintext credential, matched by exact equality. This is the
    /// specified contract for this single-tenant tool; a production-grade
    /// deployment would hash it.
    pub password: String,

    /// Account role.
    pub role: UserRole,

    /// Display name shown in the header.
    pub name: String,

    /// The profile's business state.
    #[serde(rename = "db", default)]
    pub ledger: Ledger,
}

// =============================================================================
// System Document
// =============================================================================

/// Global display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// The root aggregate: every profile plus global preferences.
///
/// ## Lifecycle
/// Seeded once on first run, then read wholesale from the local slot or the
/// remote store, and rewritten wholesale on every mutation. There are no
/// partial or delta updates anywhere in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemDocument {
    /// All agent accounts, unique by `id`.
    pub users: Vec<UserProfile>,

    /// Display theme shared by every profile on this device.
    #[serde(rename = "globalTheme", default)]
    pub global_theme: Theme,
}

impl SystemDocument {
    /// Structural validity: a document with no profiles is rejected
    /// wholesale wherever it arrives from (local slot, remote fetch,
    /// backup import) and the prior working document is retained.
    pub fn is_valid(&self) -> bool {
        !self.users.is_empty()
    }

    /// The first-run document: a single admin profile with an empty ledger.
    pub fn seeded() -> Self {
        SystemDocument {
            users: vec![UserProfile {
                id: "talal-admin".to_string(),
                username: "talal".to_string(),
                password: "00966".to_string(),
                role: UserRole::Admin,
                name: "طلال المندوب".to_string(),
                ledger: Ledger::default(),
            }],
            global_theme: Theme::default(),
        }
    }

    /// Looks up a profile by identifier.
    pub fn find_user(&self, id: &str) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Mutable lookup by identifier.
    pub fn find_user_mut(&mut self, id: &str) -> Option<&mut UserProfile> {
        self.users.iter_mut().find(|u| u.id == id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_type_stocked() {
        assert!(SimType::Jawwy.is_stocked());
        assert!(SimType::Sawa.is_stocked());
        assert!(SimType::Multi.is_stocked());
        assert!(!SimType::Issue.is_stocked());
    }

    #[test]
    fn fuel_grade_prices() {
        assert_eq!(FuelGrade::Octane91.unit_price(), 2.18);
        assert_eq!(FuelGrade::Octane95.unit_price(), 2.33);
        assert_eq!(FuelGrade::Diesel.unit_price(), 1.15);
    }

    #[test]
    fn stock_levels_get() {
        let levels = StockLevels { jawwy: 5, sawa: 2, multi: 0 };
        assert_eq!(levels.get(SimType::Jawwy), Some(5));
        assert_eq!(levels.get(SimType::Sawa), Some(2));
        assert_eq!(levels.get(SimType::Multi), Some(0));
        assert_eq!(levels.get(SimType::Issue), None);
        assert_eq!(levels.total(), 7);
    }

    #[test]
    fn seeded_document_is_valid() {
        let doc = SystemDocument::seeded();
        assert!(doc.is_valid());
        assert_eq!(doc.users.len(), 1);
        assert_eq!(doc.users[0].username, "talal");
        assert_eq!(doc.users[0].role, UserRole::Admin);
        assert!(doc.users[0].ledger.tx.is_empty());
    }

    #[test]
    fn empty_document_is_invalid() {
        let doc = SystemDocument { users: vec![], global_theme: Theme::Light };
        assert!(!doc.is_valid());
    }

    #[test]
    fn wire_format_enum_tags() {
        assert_eq!(serde_json::to_string(&SimType::Jawwy).unwrap(), "\"jawwy\"");
        assert_eq!(serde_json::to_string(&SimType::Issue).unwrap(), "\"issue\"");
        assert_eq!(
            serde_json::to_string(&StockAction::ReturnCompany).unwrap(),
            "\"return_company\""
        );
        assert_eq!(serde_json::to_string(&StockAction::Flush).unwrap(), "\"flush\"");
        assert_eq!(serde_json::to_string(&FuelGrade::Octane91).unwrap(), "\"91\"");
        assert_eq!(serde_json::to_string(&FuelGrade::Diesel).unwrap(), "\"diesel\"");
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    }

    #[test]
    fn wire_format_field_names() {
        let doc = SystemDocument::seeded();
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("users").is_some());
        assert!(json.get("globalTheme").is_some());

        let user = &json["users"][0];
        assert!(user.get("db").is_some());
        let db = &user["db"];
        assert!(db.get("tx").is_some());
        assert!(db.get("stockLog").is_some());
        assert!(db.get("fuelLog").is_some());
        assert!(db["settings"].get("weeklyTarget").is_some());
        assert!(db["settings"].get("preferredFuel").is_some());
    }

    #[test]
    fn legacy_document_fields_default() {
        // A ledger written before settings/log fields existed still parses.
        let json = r#"{
            "users": [{
                "id": "u1", "username": "a", "password": "b",
                "role": "user", "name": "Agent",
                "db": { "tx": [], "stock": { "jawwy": 3 } }
            }]
        }"#;
        let doc: SystemDocument = serde_json::from_str(json).unwrap();
        let ledger = &doc.users[0].ledger;
        assert_eq!(ledger.stock.jawwy, 3);
        assert_eq!(ledger.stock.sawa, 0);
        assert_eq!(ledger.settings.weekly_target, DEFAULT_WEEKLY_TARGET);
        assert!(ledger.settings.show_weekly_target);
        assert_eq!(ledger.settings.preferred_fuel, FuelGrade::Octane91);
        assert_eq!(doc.global_theme, Theme::Light);
    }

    #[test]
    fn legacy_fuel_entry_defaults() {
        // Older clients stored only id/date/amount on fuel entries.
        let json = r#"{ "id": 1, "date": "2024-01-10T09:00:00.000Z", "amount": 50 }"#;
        let entry: FuelLogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.grade, FuelGrade::Octane91);
        assert_eq!(entry.liters, 0.0);
        assert_eq!(entry.km, 0.0);
    }
}
