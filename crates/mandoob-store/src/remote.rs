//! # Remote Document Store
//!
//! Client for the spreadsheet-backed document endpoint: one URL, two verbs.
//!
//! ```text
//! GET  url            → full SystemDocument as JSON (or garbage / nothing)
//! POST url  body=JSON → fire-and-forget; the response is never inspected
//! ```
//!
//! The endpoint is an opaque proxy (an Apps Script web app in the original
//! deployment): a POST may answer with an empty body, a redirect, or an
//! HTML error page, none of which mean anything to us. `push` therefore
//! treats "the bytes left the machine" as success, and the engine treats
//! every failure here as a cue to stay in offline mode, never as fatal.
//!
//! No request timeout is configured: a hung fetch leaves the sync
//! indicator spinning, which is the documented degraded state. The only
//! retry is the next explicit or startup-driven sync.

use reqwest::Client;
use tracing::debug;

use mandoob_core::SystemDocument;

use crate::error::{StoreError, StoreResult};

/// Client for the remote document endpoint.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    url: String,
}

impl RemoteStore {
    /// Creates a client for the given endpoint URL.
    pub fn new(url: impl Into<String>) -> StoreResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Ok(RemoteStore {
            client,
            url: url.into(),
        })
    }

    /// The endpoint URL this client talks to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches the remote system document.
    ///
    /// Transport failures come back as [`StoreError::Network`]; a body
    /// that is not a decodable document comes back as
    /// [`StoreError::Corrupt`]. Structural validation (non-empty profile
    /// collection) is the engine's call, not ours.
    pub async fn fetch(&self) -> StoreResult<SystemDocument> {
        debug!(url = %self.url, "Fetching remote document");
        let body = self.client.get(&self.url).send().await?.text().await?;
        let document = serde_json::from_str(&body)?;
        Ok(document)
    }

    /// Pushes the full system document, best-effort.
    ///
    /// The response status and body are intentionally ignored; an `Err`
    /// only means the request never left (or the connection dropped).
    pub async fn push(&self, document: &SystemDocument) -> StoreResult<()> {
        let body = serde_json::to_string(document)?;
        debug!(url = %self.url, bytes = body.len(), "Pushing document to remote");
        self.client.post(&self.url).body(body).send().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens on this port; both verbs must fail as Network errors,
    // which is exactly the offline-mode path the engine exercises.
    const DEAD_URL: &str = "http://127.0.0.1:1/doc";

    #[tokio::test]
    async fn fetch_from_unreachable_endpoint_is_network_error() {
        let remote = RemoteStore::new(DEAD_URL).unwrap();
        let err = remote.fetch().await.unwrap_err();
        assert!(matches!(err, StoreError::Network(_)));
    }

    #[tokio::test]
    async fn push_to_unreachable_endpoint_is_network_error() {
        let remote = RemoteStore::new(DEAD_URL).unwrap();
        let err = remote.push(&SystemDocument::seeded()).await.unwrap_err();
        assert!(matches!(err, StoreError::Network(_)));
    }
}
