//! # Reconciliation Engine
//!
//! Owns the working system document and keeps its three copies
//! (in-memory, local durable slot, remote store) eventually consistent
//! under an offline-tolerant, last-writer-wins model.
//!
//! ## The Two Writer Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │  BUSINESS MUTATION (apply_ledger_update / document ops)             │
//! │      transform ──► persist local (must succeed) ──► swap memory     │
//! │                                        │                            │
//! │                                        └──► spawn push to remote    │
//! │                                             (best-effort, logged)   │
//! │                                                                     │
//! │  WHOLE-DOCUMENT ADOPTION (sync fetch / backup import)               │
//! │      validate ──► persist local ──► swap memory, re-resolve session │
//! │                                                                     │
//! │  The two paths are not coordinated beyond "last write observed      │
//! │  wins": a sync resolving after a local mutation overwrites it       │
//! │  unless the mutation's push reached the remote first.               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Protocol
//! 1. Adopt the locally persisted document if it is structurally valid,
//!    otherwise keep the seeded default. Unreadable slots degrade to the
//!    seeded default with a warning, never a crash.
//! 2. Resolve a remembered profile identifier against the adopted
//!    document and restore the session if it still exists.
//! 3. `spawn_background_sync` fires the remote fetch without blocking;
//!    the UI is usable immediately from local state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};
use uuid::Uuid;

use mandoob_core::{ops, CoreError, Ledger, SystemDocument, Theme, UserProfile, UserRole};
use mandoob_store::{LocalStore, RemoteStore};

use crate::error::{EngineError, EngineResult};

const POISONED: &str = "engine state lock poisoned";

/// In-memory working state behind the engine's lock.
#[derive(Debug)]
struct SessionState {
    /// The working document. Replaced wholesale on every write; never
    /// mutated in place.
    document: SystemDocument,

    /// Identifier of the authenticated profile, if any.
    active_user_id: Option<String>,
}

/// The reconciliation engine. Cheap to clone; clones share state.
///
/// Mutations hold the lock only for short synchronous sections; all
/// awaits (persistence, network) happen outside it.
#[derive(Clone)]
pub struct Engine {
    local: LocalStore,
    remote: RemoteStore,
    state: Arc<RwLock<SessionState>>,
    syncing: Arc<AtomicBool>,
}

impl Engine {
    // =========================================================================
    // Startup
    // =========================================================================

    /// Runs the startup protocol (local adoption + session restore) and
    /// returns a ready engine. Never touches the network.
    pub async fn start(local: LocalStore, remote: RemoteStore) -> EngineResult<Engine> {
        let document = match local.load_system().await {
            Ok(Some(doc)) if doc.is_valid() => {
                info!(users = doc.users.len(), "Adopted local document");
                doc
            }
            Ok(Some(_)) => {
                warn!("Local document has no profiles, keeping seeded default");
                SystemDocument::seeded()
            }
            Ok(None) => {
                info!("No local document, starting from seeded default");
                SystemDocument::seeded()
            }
            Err(e) => {
                warn!(error = %e, "Local document unreadable, starting from seeded default");
                SystemDocument::seeded()
            }
        };

        let active_user_id = match local.remembered_user().await {
            Ok(Some(id)) if document.find_user(&id).is_some() => {
                info!(user = %id, "Restored remembered session");
                Some(id)
            }
            Ok(Some(id)) => {
                warn!(user = %id, "Remembered profile not in document, starting signed out");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Could not read remembered session");
                None
            }
        };

        Ok(Engine {
            local,
            remote,
            state: Arc::new(RwLock::new(SessionState {
                document,
                active_user_id,
            })),
            syncing: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Fires the startup remote fetch without blocking the caller.
    pub fn spawn_background_sync(&self) {
        let engine = self.clone();
        tokio::spawn(async move {
            if let Err(e) = engine.sync_with_remote().await {
                warn!(error = %e, "Background sync failed");
            }
        });
    }

    // =========================================================================
    // Read Access (presentation-layer contract)
    // =========================================================================

    /// Snapshot of the working document.
    pub fn document(&self) -> SystemDocument {
        self.state.read().expect(POISONED).document.clone()
    }

    /// The authenticated profile, resolved from the working document.
    pub fn active_profile(&self) -> Option<UserProfile> {
        let state = self.state.read().expect(POISONED);
        state
            .active_user_id
            .as_ref()
            .and_then(|id| state.document.find_user(id))
            .cloned()
    }

    /// The authenticated profile's ledger.
    pub fn active_ledger(&self) -> Option<Ledger> {
        self.active_profile().map(|p| p.ledger)
    }

    /// Whether a sync fetch is in flight (drives the loading indicator).
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Authenticates by exact, case-sensitive match of both fields.
    ///
    /// With `remember`, the profile identifier is persisted so the next
    /// startup restores the session; otherwise the session is memory-only
    /// and dies with the process.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> EngineResult<UserProfile> {
        let profile = {
            let state = self.state.read().expect(POISONED);
            state
                .document
                .users
                .iter()
                .find(|u| u.username == username && u.password == password)
                .cloned()
        }
        .ok_or(EngineError::AuthFailed)?;

        self.state.write().expect(POISONED).active_user_id = Some(profile.id.clone());
        if remember {
            self.local.remember_user(&profile.id).await?;
        }
        info!(user = %profile.id, remember, "Session started");
        Ok(profile)
    }

    /// Ends the session and clears the remembered identifier. The system
    /// document is untouched.
    pub async fn logout(&self) -> EngineResult<()> {
        self.state.write().expect(POISONED).active_user_id = None;
        self.local.forget_user().await?;
        info!("Session ended");
        Ok(())
    }

    // =========================================================================
    // Mutation Protocol
    // =========================================================================

    /// The single entry point for ledger mutations.
    ///
    /// Applies a pure transform to the active profile's ledger, producing
    /// a new document that is persisted locally (a failure here surfaces:
    /// the mutation cannot be guaranteed durable), swapped into memory,
    /// and then pushed to the remote store without awaiting the result.
    ///
    /// With no active session this is a guaranteed no-op: the document is
    /// unchanged and nothing is written anywhere.
    pub async fn apply_ledger_update<F>(&self, transform: F) -> EngineResult<Ledger>
    where
        F: FnOnce(&Ledger) -> Result<Ledger, CoreError>,
    {
        let (mut document, user_id) = {
            let state = self.state.read().expect(POISONED);
            let id = state
                .active_user_id
                .clone()
                .ok_or(EngineError::NoActiveSession)?;
            (state.document.clone(), id)
        };

        let profile = document
            .find_user_mut(&user_id)
            .ok_or(EngineError::NoActiveSession)?;
        let next = transform(&profile.ledger)?;
        profile.ledger = next.clone();

        self.local.save_system(&document).await?;
        self.state.write().expect(POISONED).document = document.clone();
        debug!(user = %user_id, "Ledger update applied");

        self.propagate(document);
        Ok(next)
    }

    /// Document-level counterpart of [`Engine::apply_ledger_update`]:
    /// same persist-then-propagate path, same no-write guarantee on error.
    async fn apply_document_update<F>(&self, transform: F) -> EngineResult<SystemDocument>
    where
        F: FnOnce(&SystemDocument) -> Result<SystemDocument, CoreError>,
    {
        let document = self.state.read().expect(POISONED).document.clone();
        let next = transform(&document)?;

        self.local.save_system(&next).await?;
        {
            let mut state = self.state.write().expect(POISONED);
            state.document = next.clone();
            // The transform may have removed the active profile.
            if let Some(id) = state.active_user_id.clone() {
                if state.document.find_user(&id).is_none() {
                    state.active_user_id = None;
                }
            }
        }

        self.propagate(next.clone());
        Ok(next)
    }

    fn propagate(&self, document: SystemDocument) {
        let remote = self.remote.clone();
        tokio::spawn(async move {
            match remote.push(&document).await {
                Ok(()) => debug!("Document propagated to remote"),
                Err(e) => warn!(error = %e, "Remote propagation failed, continuing offline"),
            }
        });
    }

    // =========================================================================
    // Sync Protocol
    // =========================================================================

    /// Fetches the remote document and, if it is structurally valid,
    /// adopts it wholesale (last-writer-wins). Returns whether a remote
    /// document was adopted.
    ///
    /// Network failures and undecodable or invalid bodies leave the
    /// working document untouched: silent degradation to offline mode.
    /// An `Err` here only ever means the adopted document could not be
    /// persisted locally.
    pub async fn sync_with_remote(&self) -> EngineResult<bool> {
        self.syncing.store(true, Ordering::SeqCst);
        let outcome = self.run_sync().await;
        self.syncing.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run_sync(&self) -> EngineResult<bool> {
        match self.remote.fetch().await {
            Ok(document) if document.is_valid() => {
                self.adopt_document(document).await?;
                info!("Remote document adopted");
                Ok(true)
            }
            Ok(_) => {
                warn!("Remote document has no profiles, ignoring");
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "Remote fetch failed, staying offline");
                Ok(false)
            }
        }
    }

    /// Replaces the working document wholesale: persist first, then swap
    /// memory and re-resolve the session. If the active profile no longer
    /// exists in the adopted document the in-memory session ends (the
    /// remembered identifier stays on disk so a later document that
    /// restores the profile lets the next startup resolve it again).
    async fn adopt_document(&self, document: SystemDocument) -> EngineResult<()> {
        self.local.save_system(&document).await?;

        let mut state = self.state.write().expect(POISONED);
        if let Some(id) = state.active_user_id.clone() {
            if document.find_user(&id).is_none() {
                warn!(user = %id, "Active profile missing from adopted document, ending session");
                state.active_user_id = None;
            }
        }
        state.document = document;
        Ok(())
    }

    // =========================================================================
    // Backup Import/Export
    // =========================================================================

    /// Wholesale-replaces the working document from a backup, with the
    /// same validity rule as sync adoption, then propagates so other
    /// devices converge on the restored state.
    pub async fn import_document(&self, document: SystemDocument) -> EngineResult<()> {
        if !document.is_valid() {
            return Err(EngineError::InvalidDocument);
        }
        self.adopt_document(document.clone()).await?;
        info!(users = document.users.len(), "Document imported");
        self.propagate(document);
        Ok(())
    }

    /// Snapshot for export. Identical to [`Engine::document`]; named for
    /// the backup flow.
    pub fn export_document(&self) -> SystemDocument {
        self.document()
    }

    // =========================================================================
    // Profile & Preference Operations
    // =========================================================================

    /// Switches the global display theme.
    pub async fn set_theme(&self, theme: Theme) -> EngineResult<()> {
        self.apply_document_update(|d| ops::set_theme(d, theme))
            .await
            .map(|_| ())
    }

    /// Replaces the active profile's display name.
    pub async fn update_display_name(&self, name: &str) -> EngineResult<()> {
        let user_id = self.require_session()?;
        self.apply_document_update(|d| ops::set_display_name(d, &user_id, name))
            .await
            .map(|_| ())
    }

    /// Replaces the active profile's password.
    pub async fn change_password(&self, new_password: &str) -> EngineResult<()> {
        let user_id = self.require_session()?;
        self.apply_document_update(|d| ops::change_password(d, &user_id, new_password))
            .await
            .map(|_| ())
    }

    /// Creates a new agent profile (admin only). Returns the new
    /// profile's identifier.
    pub async fn create_profile(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
        name: &str,
    ) -> EngineResult<String> {
        self.require_admin()?;
        let id = Uuid::new_v4().to_string();
        self.apply_document_update(|d| ops::add_profile(d, &id, username, password, role, name))
            .await?;
        info!(user = %id, username, "Profile created");
        Ok(id)
    }

    /// Deletes a profile and its ledger (admin only, never the active
    /// profile).
    pub async fn delete_profile(&self, user_id: &str) -> EngineResult<()> {
        self.require_admin()?;
        if self.require_session()? == user_id {
            return Err(EngineError::ActiveProfile);
        }
        self.apply_document_update(|d| ops::remove_profile(d, user_id))
            .await?;
        info!(user = %user_id, "Profile deleted");
        Ok(())
    }

    fn require_session(&self) -> EngineResult<String> {
        self.state
            .read()
            .expect(POISONED)
            .active_user_id
            .clone()
            .ok_or(EngineError::NoActiveSession)
    }

    fn require_admin(&self) -> EngineResult<()> {
        match self.active_profile() {
            Some(profile) if profile.role == UserRole::Admin => Ok(()),
            Some(_) => Err(EngineError::NotAuthorized),
            None => Err(EngineError::NoActiveSession),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mandoob_core::SimType;
    use mandoob_store::LocalStoreConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Nothing listens here: every push/fetch fails, i.e. permanent offline.
    const DEAD_URL: &str = "http://127.0.0.1:1/doc";

    fn sale_at() -> chrono::DateTime<chrono::Utc> {
        use chrono::TimeZone;
        chrono::Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap()
    }

    async fn offline_engine() -> (Engine, LocalStore) {
        let local = LocalStore::connect(LocalStoreConfig::in_memory())
            .await
            .unwrap();
        let remote = RemoteStore::new(DEAD_URL).unwrap();
        let engine = Engine::start(local.clone(), remote).await.unwrap();
        (engine, local)
    }

    /// Serves the given body to every HTTP request on an ephemeral port.
    async fn serve_json(body: String) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let body = body.clone();
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                         content-length: {}\r\nconnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{}/doc", addr)
    }

    #[tokio::test]
    async fn startup_seeds_default_document() {
        let (engine, _local) = offline_engine().await;
        assert_eq!(engine.document(), SystemDocument::seeded());
        assert!(engine.active_profile().is_none());
        assert!(!engine.is_syncing());
    }

    #[tokio::test]
    async fn login_requires_exact_credentials() {
        let (engine, _local) = offline_engine().await;

        assert!(matches!(
            engine.login("talal", "wrong", false).await.unwrap_err(),
            EngineError::AuthFailed
        ));
        assert!(matches!(
            engine.login("TALAL", "00966", false).await.unwrap_err(),
            EngineError::AuthFailed
        ));

        let profile = engine.login("talal", "00966", false).await.unwrap();
        assert_eq!(profile.id, "talal-admin");
        assert!(engine.active_profile().is_some());
    }

    // Scenario F: remember=false leaves nothing behind for the next start.
    #[tokio::test]
    async fn unremembered_session_does_not_survive_restart() {
        let (engine, local) = offline_engine().await;
        engine.login("talal", "00966", false).await.unwrap();

        let restarted = Engine::start(local, RemoteStore::new(DEAD_URL).unwrap())
            .await
            .unwrap();
        assert!(restarted.active_profile().is_none());
    }

    #[tokio::test]
    async fn remembered_session_survives_restart_until_logout() {
        let (engine, local) = offline_engine().await;
        engine.login("talal", "00966", true).await.unwrap();

        let restarted = Engine::start(local.clone(), RemoteStore::new(DEAD_URL).unwrap())
            .await
            .unwrap();
        assert_eq!(restarted.active_profile().unwrap().id, "talal-admin");

        restarted.logout().await.unwrap();
        let after_logout = Engine::start(local, RemoteStore::new(DEAD_URL).unwrap())
            .await
            .unwrap();
        assert!(after_logout.active_profile().is_none());
    }

    #[tokio::test]
    async fn apply_without_session_is_a_true_noop() {
        let (engine, local) = offline_engine().await;
        let before = engine.document();

        let err = engine
            .apply_ledger_update(|l| ops::receive_stock(l, SimType::Jawwy, 5, sale_at()))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::NoActiveSession));
        assert_eq!(engine.document(), before);
        // No storage write happened either.
        assert!(local.load_system().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mutation_persists_locally_and_updates_memory() {
        let (engine, local) = offline_engine().await;
        engine.login("talal", "00966", false).await.unwrap();

        let ledger = engine
            .apply_ledger_update(|l| ops::receive_stock(l, SimType::Jawwy, 5, sale_at()))
            .await
            .unwrap();
        assert_eq!(ledger.stock.jawwy, 5);

        let ledger = engine
            .apply_ledger_update(|l| ops::confirm_sale(l, SimType::Jawwy, 30.0, 1, sale_at()))
            .await
            .unwrap();
        assert_eq!(ledger.stock.jawwy, 4);
        assert_eq!(ledger.tx.len(), 1);

        // The caller's view, the working document, and the local slot agree.
        assert_eq!(engine.active_ledger().unwrap(), ledger);
        let persisted = local.load_system().await.unwrap().unwrap();
        assert_eq!(persisted.find_user("talal-admin").unwrap().ledger, ledger);
    }

    #[tokio::test]
    async fn failed_precondition_surfaces_and_changes_nothing() {
        let (engine, local) = offline_engine().await;
        engine.login("talal", "00966", false).await.unwrap();
        engine
            .apply_ledger_update(|l| ops::receive_stock(l, SimType::Sawa, 1, sale_at()))
            .await
            .unwrap();
        let before = engine.document();

        let err = engine
            .apply_ledger_update(|l| ops::confirm_sale(l, SimType::Sawa, 28.0, 2, sale_at()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Domain(CoreError::InsufficientStock { .. })
        ));
        assert_eq!(engine.document(), before);
        assert_eq!(local.load_system().await.unwrap().unwrap(), before);
    }

    #[tokio::test]
    async fn sync_against_unreachable_remote_degrades_silently() {
        let (engine, _local) = offline_engine().await;
        let before = engine.document();

        let adopted = engine.sync_with_remote().await.unwrap();
        assert!(!adopted);
        assert_eq!(engine.document(), before);
        assert!(!engine.is_syncing());
    }

    #[tokio::test]
    async fn sync_adopts_valid_remote_document() {
        let mut remote_doc = SystemDocument::seeded();
        remote_doc.users[0].ledger.stock.jawwy = 99;
        let url = serve_json(serde_json::to_string(&remote_doc).unwrap()).await;

        let local = LocalStore::connect(LocalStoreConfig::in_memory())
            .await
            .unwrap();
        let engine = Engine::start(local.clone(), RemoteStore::new(url).unwrap())
            .await
            .unwrap();
        engine.login("talal", "00966", false).await.unwrap();

        let adopted = engine.sync_with_remote().await.unwrap();
        assert!(adopted);
        // Last writer wins: memory, session view, and local slot all follow.
        assert_eq!(engine.active_ledger().unwrap().stock.jawwy, 99);
        assert_eq!(
            local.load_system().await.unwrap().unwrap(),
            engine.document()
        );
    }

    // Scenario E: a remote document with no profiles is rejected wholesale.
    #[tokio::test]
    async fn sync_rejects_empty_profile_collection() {
        let url = serve_json(r#"{"users": [], "globalTheme": "dark"}"#.to_string()).await;

        let local = LocalStore::connect(LocalStoreConfig::in_memory())
            .await
            .unwrap();
        let engine = Engine::start(local, RemoteStore::new(url).unwrap())
            .await
            .unwrap();
        let before = engine.document();

        let adopted = engine.sync_with_remote().await.unwrap();
        assert!(!adopted);
        assert_eq!(engine.document(), before);
    }

    #[tokio::test]
    async fn background_sync_adopts_without_blocking_startup() {
        let mut remote_doc = SystemDocument::seeded();
        remote_doc.users[0].ledger.stock.jawwy = 42;
        let url = serve_json(serde_json::to_string(&remote_doc).unwrap()).await;

        let local = LocalStore::connect(LocalStoreConfig::in_memory())
            .await
            .unwrap();
        let engine = Engine::start(local, RemoteStore::new(url).unwrap())
            .await
            .unwrap();

        // Startup itself never touched the network.
        assert_eq!(engine.document(), SystemDocument::seeded());

        engine.spawn_background_sync();
        for _ in 0..50 {
            if engine.document().users[0].ledger.stock.jawwy == 42 {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        panic!("background sync never adopted the remote document");
    }

    #[tokio::test]
    async fn sync_rejects_undecodable_body() {
        let url = serve_json("<html>quota exceeded</html>".to_string()).await;

        let local = LocalStore::connect(LocalStoreConfig::in_memory())
            .await
            .unwrap();
        let engine = Engine::start(local, RemoteStore::new(url).unwrap())
            .await
            .unwrap();
        let before = engine.document();

        assert!(!engine.sync_with_remote().await.unwrap());
        assert_eq!(engine.document(), before);
    }

    #[tokio::test]
    async fn adoption_ends_session_when_profile_vanishes() {
        let mut remote_doc = SystemDocument::seeded();
        remote_doc.users[0].id = "someone-else".to_string();
        remote_doc.users[0].username = "other".to_string();
        let url = serve_json(serde_json::to_string(&remote_doc).unwrap()).await;

        let local = LocalStore::connect(LocalStoreConfig::in_memory())
            .await
            .unwrap();
        let engine = Engine::start(local, RemoteStore::new(url).unwrap())
            .await
            .unwrap();
        engine.login("talal", "00966", false).await.unwrap();

        assert!(engine.sync_with_remote().await.unwrap());
        assert!(engine.active_profile().is_none());
    }

    #[tokio::test]
    async fn import_validates_and_replaces() {
        let (engine, _local) = offline_engine().await;

        let empty = SystemDocument {
            users: vec![],
            global_theme: Theme::Light,
        };
        assert!(matches!(
            engine.import_document(empty).await.unwrap_err(),
            EngineError::InvalidDocument
        ));

        let mut restored = SystemDocument::seeded();
        restored.users[0].ledger.stock.multi = 3;
        engine.import_document(restored.clone()).await.unwrap();
        assert_eq!(engine.document(), restored);
    }

    #[tokio::test]
    async fn profile_management_requires_admin() {
        let (engine, _local) = offline_engine().await;
        engine.login("talal", "00966", true).await.unwrap();

        let id = engine
            .create_profile("sara", "pw123", UserRole::User, "Sara")
            .await
            .unwrap();
        assert_eq!(engine.document().users.len(), 2);

        // A non-admin cannot manage profiles.
        engine.login("sara", "pw123", false).await.unwrap();
        assert!(matches!(
            engine
                .create_profile("x", "x", UserRole::User, "x")
                .await
                .unwrap_err(),
            EngineError::NotAuthorized
        ));

        // Admins cannot delete the profile they are signed in as.
        engine.login("talal", "00966", false).await.unwrap();
        assert!(matches!(
            engine.delete_profile("talal-admin").await.unwrap_err(),
            EngineError::ActiveProfile
        ));

        engine.delete_profile(&id).await.unwrap();
        assert_eq!(engine.document().users.len(), 1);
    }

    #[tokio::test]
    async fn preference_updates_flow_through_document_path() {
        let (engine, local) = offline_engine().await;
        engine.login("talal", "00966", false).await.unwrap();

        engine.set_theme(Theme::Dark).await.unwrap();
        engine.update_display_name("طلال").await.unwrap();
        engine.change_password("new-pass").await.unwrap();

        let doc = engine.document();
        assert_eq!(doc.global_theme, Theme::Dark);
        let profile = doc.find_user("talal-admin").unwrap();
        assert_eq!(profile.name, "طلال");
        assert_eq!(profile.password, "new-pass");

        // All of it durably persisted.
        assert_eq!(local.load_system().await.unwrap().unwrap(), doc);
    }
}
