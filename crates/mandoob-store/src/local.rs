//! # Local Durable Storage
//!
//! The device-local half of the persistence story: a SQLite database
//! holding two key-value slots.
//!
//! ## Slot Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  slots                                                              │
//! │  ┌──────────────────────────┬─────────────────────────┬──────────┐  │
//! │  │ key                      │ value                   │ updated  │  │
//! │  ├──────────────────────────┼─────────────────────────┼──────────┤  │
//! │  │ stc_pro_v14_system       │ <SystemDocument JSON>   │ rfc3339  │  │
//! │  │ stc_pro_v14_auth_user    │ <profile id string>     │ rfc3339  │  │
//! │  └──────────────────────────┴─────────────────────────┴──────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//! Every document write replaces the entire serialized document. There
//! are no partial updates, so a reader always sees a complete snapshot.
//!
//! ## WAL Mode
//! WAL journaling is enabled so the fire-and-forget propagation task can
//! read while a mutation writes, without either blocking the other.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use mandoob_core::{SystemDocument, AUTH_SLOT_KEY, SYSTEM_SLOT_KEY};

use crate::error::{StoreError, StoreResult};

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS slots (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

// =============================================================================
// Configuration
// =============================================================================

/// Local store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = LocalStoreConfig::new("/path/to/mandoob.db").max_connections(2);
/// let store = LocalStore::connect(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct LocalStoreConfig {
    /// Path to the SQLite database file. Created if it doesn't exist.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    pub max_connections: u32,

    /// Connection acquire timeout.
    pub connect_timeout: Duration,
}

impl LocalStoreConfig {
    /// Creates a configuration pointing at the given database file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalStoreConfig {
            database_path: path.into(),
            max_connections: 4,
            connect_timeout: Duration::from_secs(30),
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the connection acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// In-memory database configuration for tests.
    ///
    /// In-memory SQLite gives each connection its own database, so the
    /// pool is pinned to a single connection.
    pub fn in_memory() -> Self {
        LocalStoreConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

// =============================================================================
// Local Store
// =============================================================================

/// Handle to the local durable slots.
#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    /// Opens (and if needed creates) the local database and its schema.
    pub async fn connect(config: LocalStoreConfig) -> StoreResult<Self> {
        info!(path = %config.database_path.display(), "Opening local store");

        let options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        sqlx::query(SCHEMA).execute(&pool).await?;
        debug!("Local store schema ready");

        Ok(LocalStore { pool })
    }

    /// Loads the persisted system document, if any.
    ///
    /// `Ok(None)` means the slot is empty (first run). A slot whose
    /// contents no longer decode is reported as [`StoreError::Corrupt`];
    /// the caller decides what to fall back to.
    pub async fn load_system(&self) -> StoreResult<Option<SystemDocument>> {
        match self.get_slot(SYSTEM_SLOT_KEY).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Persists the full system document, replacing any previous snapshot.
    pub async fn save_system(&self, document: &SystemDocument) -> StoreResult<()> {
        let json = serde_json::to_string(document)?;
        self.set_slot(SYSTEM_SLOT_KEY, &json).await?;
        debug!(bytes = json.len(), "System document persisted");
        Ok(())
    }

    /// The remembered profile identifier, if a session was saved.
    pub async fn remembered_user(&self) -> StoreResult<Option<String>> {
        self.get_slot(AUTH_SLOT_KEY).await
    }

    /// Remembers the given profile identifier across restarts.
    pub async fn remember_user(&self, user_id: &str) -> StoreResult<()> {
        self.set_slot(AUTH_SLOT_KEY, user_id).await
    }

    /// Clears the remembered profile identifier.
    pub async fn forget_user(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM slots WHERE key = ?1")
            .bind(AUTH_SLOT_KEY)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Closes the connection pool. Call on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn get_slot(&self, key: &str) -> StoreResult<Option<String>> {
        let row = sqlx::query("SELECT value FROM slots WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(row.try_get::<String, _>("value")?)),
            None => Ok(None),
        }
    }

    async fn set_slot(&self, key: &str, value: &str) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> LocalStore {
        LocalStore::connect(LocalStoreConfig::in_memory())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn empty_store_has_no_document_or_session() {
        let store = store().await;
        assert!(store.load_system().await.unwrap().is_none());
        assert!(store.remembered_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn document_round_trip() {
        let store = store().await;
        let doc = SystemDocument::seeded();

        store.save_system(&doc).await.unwrap();
        let loaded = store.load_system().await.unwrap().unwrap();
        assert_eq!(loaded, doc);
    }

    #[tokio::test]
    async fn save_replaces_previous_snapshot() {
        let store = store().await;
        let mut doc = SystemDocument::seeded();
        store.save_system(&doc).await.unwrap();

        doc.users[0].ledger.stock.jawwy = 12;
        store.save_system(&doc).await.unwrap();

        let loaded = store.load_system().await.unwrap().unwrap();
        assert_eq!(loaded.users[0].ledger.stock.jawwy, 12);
    }

    #[tokio::test]
    async fn remembered_user_set_and_forget() {
        let store = store().await;

        store.remember_user("talal-admin").await.unwrap();
        assert_eq!(
            store.remembered_user().await.unwrap().as_deref(),
            Some("talal-admin")
        );

        store.forget_user().await.unwrap();
        assert!(store.remembered_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_slot_reported_not_swallowed() {
        let store = store().await;
        store.set_slot(SYSTEM_SLOT_KEY, "{not json").await.unwrap();

        let err = store.load_system().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
