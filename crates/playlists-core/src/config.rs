//! Client configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! holds the API base URL and the session storage backend.
//!
//! Configuration is stored at `~/.config/playlists/config.json`. The
//! `PUBLIC_API_URL` and `PLAYLISTS_STORE` environment variables override it.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::{FileStore, KeyringStore, SessionStore};

/// Application name used for config/data directory paths
const APP_NAME: &str = "playlists";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Base URL of the backend when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Environment variable overriding `api_url`
pub const API_URL_ENV: &str = "PUBLIC_API_URL";

/// Environment variable overriding `store`
pub const STORE_ENV: &str = "PLAYLISTS_STORE";

/// Persistent backend holding the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    File,
    Keyring,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "keyring" | "keychain" => Ok(Self::Keyring),
            other => Err(anyhow::anyhow!("Unknown session store '{}' (expected file or keyring)", other)),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Keyring => write!(f, "keyring"),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_keyring_service() -> String {
    APP_NAME.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub store: StoreKind,
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            store: StoreKind::default(),
            keyring_service: default_keyring_service(),
        }
    }
}

impl Config {
    /// Load from the config file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.apply_env()?;
        debug!(api_url = %config.api_url, store = %config.store, "Config loaded");
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(STORE_ENV).ok(),
        )
    }

    fn apply_overrides(&mut self, api_url: Option<String>, store: Option<String>) -> Result<()> {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(store) = store.filter(|s| !s.trim().is_empty()) {
            self.store = store
                .parse()
                .with_context(|| format!("Invalid {}", STORE_ENV))?;
        }
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the file-backed session
    pub fn data_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Build the configured session store
    pub fn open_store(&self) -> Result<Arc<dyn SessionStore>> {
        Ok(match self.store {
            StoreKind::File => Arc::new(FileStore::in_dir(self.data_dir()?)),
            StoreKind::Keyring => Arc::new(KeyringStore::new(self.keyring_service.clone())),
        })
    }
}
