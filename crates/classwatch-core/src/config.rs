//! ClassWatch configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, WatchError};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// How often the background checker runs (minutes).
    #[serde(default = "default_check_interval")]
    pub check_interval_minutes: u64,
    /// Courtesy delay between two provider checks within a tick (ms).
    #[serde(default = "default_check_delay")]
    pub check_delay_ms: u64,
    /// Maximum live tracking requests per user.
    #[serde(default = "default_max_requests")]
    pub max_requests_per_user: usize,
    /// Term used when a command omits one.
    #[serde(default = "default_term")]
    pub default_term: String,
    /// Renotify on every tick while seats stay open. When false, only
    /// a closed-to-open transition notifies.
    #[serde(default = "bool_true")]
    pub renotify_every_tick: bool,
    /// Where the request document lives.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,
    #[serde(default = "default_class_list_url")]
    pub class_list_url: String,
    /// Discord bot token for the notification channel.
    #[serde(default)]
    pub discord_token: String,
}

fn default_check_interval() -> u64 {
    5
}
fn default_check_delay() -> u64 {
    500
}
fn default_max_requests() -> usize {
    10
}
fn default_term() -> String {
    "2261".into()
}
fn bool_true() -> bool {
    true
}
fn default_store_path() -> PathBuf {
    WatchConfig::home_dir().join("class_requests.json")
}
fn default_catalog_api_url() -> String {
    "https://eadvs-cscc-catalog-api.apps.asu.edu/catalog-microservices/api/v1/search/classes".into()
}
fn default_class_list_url() -> String {
    "https://catalog.apps.asu.edu/catalog/classes/classlist".into()
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            check_interval_minutes: default_check_interval(),
            check_delay_ms: default_check_delay(),
            max_requests_per_user: default_max_requests(),
            default_term: default_term(),
            renotify_every_tick: bool_true(),
            store_path: default_store_path(),
            catalog_api_url: default_catalog_api_url(),
            class_list_url: default_class_list_url(),
            discord_token: String::new(),
        }
    }
}

impl WatchConfig {
    /// Load config from the default path (~/.classwatch/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WatchError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| WatchError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| WatchError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the ClassWatch home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".classwatch")
    }
}
