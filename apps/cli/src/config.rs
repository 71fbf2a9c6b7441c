//! # Application Configuration
//!
//! Configuration for the CLI bootstrap.
//!
//! ## Configuration Sources
//! ```text
//! 1. Default values (lowest priority)
//! 2. TOML config file
//!    ~/.config/mandoob/mandoob.toml (Linux)
//!    ~/Library/Application Support/app.mandoob.mandoob/mandoob.toml (macOS)
//! 3. Environment variables (highest priority)
//!    MANDOOB_DB_PATH, MANDOOB_REMOTE_URL
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # mandoob.toml
//! database_path = "/home/agent/mandoob.db"
//! remote_url = "https://script.google.com/macros/s/XXXX/exec"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// The deployed spreadsheet-backed document endpoint.
const DEFAULT_REMOTE_URL: &str = "https://script.google.com/macros/s/AKfycbygAwOcqosMpmUokaaZZVrgPRRt__AZO8jVqW4koRAg4VB7fwPvrgOGC8OPSf2UEyLPxQ/exec";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("remote_url must start with http:// or https://, got: {0}")]
    InvalidRemoteUrl(String),

    #[error("could not determine an application data directory")]
    NoDataDir,
}

/// CLI application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the local SQLite database. Defaults to the platform data
    /// directory when unset.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Remote document endpoint URL.
    #[serde(default = "default_remote_url")]
    pub remote_url: String,
}

fn default_remote_url() -> String {
    DEFAULT_REMOTE_URL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: None,
            remote_url: default_remote_url(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (mandoob.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Resolves the local database path, creating the parent directory if
    /// needed.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            return Ok(path.clone());
        }

        let dirs = directories::ProjectDirs::from("app", "mandoob", "mandoob")
            .ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join("mandoob.db"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.remote_url.starts_with("http://") && !self.remote_url.starts_with("https://") {
            return Err(ConfigError::InvalidRemoteUrl(self.remote_url.clone()));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("MANDOOB_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }
        if let Ok(url) = std::env::var("MANDOOB_REMOTE_URL") {
            debug!(url = %url, "Overriding remote URL from environment");
            self.remote_url = url;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("app", "mandoob", "mandoob")
            .map(|dirs| dirs.config_dir().join("mandoob.toml"))
    }
}
