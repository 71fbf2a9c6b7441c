//! # Backup Files
//!
//! Whole-document export to (and import from) a portable JSON file.
//!
//! An imported file goes through the same structural validation as a
//! remote fetch: a document with no profiles is rejected and the working
//! document stays as it was.

use std::path::Path;

use tracing::info;

use mandoob_core::SystemDocument;

use crate::error::{StoreError, StoreResult};

/// Writes the full system document to `path` as pretty-printed JSON.
pub fn write_backup(document: &SystemDocument, path: &Path) -> StoreResult<()> {
    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "Backup written");
    Ok(())
}

/// Reads a system document back from a backup file.
///
/// Rejects files that decode but contain no profiles.
pub fn read_backup(path: &Path) -> StoreResult<SystemDocument> {
    let contents = std::fs::read_to_string(path)?;
    let document: SystemDocument = serde_json::from_str(&contents)?;
    if !document.is_valid() {
        return Err(StoreError::Invalid(
            "backup contains no profiles".to_string(),
        ));
    }
    info!(path = %path.display(), users = document.users.len(), "Backup loaded");
    Ok(document)
}

// =============================================================================
// Unit Tests
// =============================================================================
