//! # mandoob-store: Persistence Layer for Mandoob
//!
//! Three ways a system document leaves or enters the process, behind one
//! crate boundary:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        mandoob-store                                │
//! │                                                                     │
//! │   ┌────────────────┐   ┌────────────────┐   ┌──────────────────┐   │
//! │   │   LocalStore   │   │  RemoteStore   │   │     backup       │   │
//! │   │   (local.rs)   │   │  (remote.rs)   │   │   (backup.rs)    │   │
//! │   │                │   │                │   │                  │   │
//! │   │ SQLite slots:  │   │ One endpoint:  │   │ Portable JSON    │   │
//! │   │ document +     │   │ GET fetch /    │   │ file export and  │   │
//! │   │ remembered id  │   │ POST push      │   │ validated import │   │
//! │   └────────────────┘   └────────────────┘   └──────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every write anywhere in this crate is a whole-document replacement;
//! there are no deltas and no merges, by design.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backup;
pub mod error;
pub mod local;
pub mod remote;

// =============================================================================
// Re-exports
// =============================================================================

pub use backup::{read_backup, write_backup};
pub use error::{StoreError, StoreResult};
pub use local::{LocalStore, LocalStoreConfig};
pub use remote::RemoteStore;
