//! # mandoob-engine: Reconciliation Engine for Mandoob
//!
//! The sole authority for mutating the system document, and the component
//! that keeps its three copies eventually consistent:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Engine                                     │
//! │                                                                     │
//! │   in-memory working document ◄──── single lock, short sections      │
//! │        │                                                            │
//! │        ├── persist ──► local SQLite slot   (synchronous, must land) │
//! │        │                                                            │
//! │        └── push ─────► remote document URL (async, best-effort)     │
//! │                                                                     │
//! │   sync fetch ──► valid document replaces ALL of the above           │
//! │                  (last writer wins, whole-document granularity)     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The presentation layer sees exactly: read snapshots ([`Engine::document`],
//! [`Engine::active_profile`], [`Engine::active_ledger`],
//! [`Engine::is_syncing`]), the mutation entry point
//! ([`Engine::apply_ledger_update`] plus the document-level operations),
//! [`Engine::login`] / [`Engine::logout`], [`Engine::sync_with_remote`],
//! and backup import/export. There are no raw setters.

pub mod engine;
pub mod error;

pub use engine::Engine;
pub use error::{EngineError, EngineResult};
