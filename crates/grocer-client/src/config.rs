//! # Storefront Configuration
//!
//! Configuration for the storefront client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GROCER_API_URL=https://api.grocer.example                          │
//! │     GROCER_API_TIMEOUT_SECS=30                                         │
//! │     GROCER_THEME_DEBOUNCE_MS=500                                       │
//! │     GROCER_ORDER_SORT=price-desc                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.grocer.storefront/... (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8080, 500 ms debounce, newest orders first        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [api]
//! base_url = "https://api.grocer.example"
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [theme]
//! debounce_ms = 500
//! storage_path = "/home/asha/.local/share/storefront/theme.json"
//!
//! [orders]
//! default_sort = "date-desc"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use grocer_core::SortKey;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

/// Where the REST backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Parsed base URL.
    pub fn base_url(&self) -> ClientResult<Url> {
        let url = Url::parse(&self.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        Ok(url)
    }
}

// =============================================================================
// Theme Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSettings {
    /// Quiet period before a theme change is pushed to the server.
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Local preference file. Defaults to `theme.json` in the data directory.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

fn default_debounce() -> u64 {
    500
}

/// Upper bound for the debounce window.
const MAX_DEBOUNCE_MS: u64 = 10_000;

impl Default for ThemeSettings {
    fn default() -> Self {
        ThemeSettings {
            debounce_ms: default_debounce(),
            storage_path: None,
        }
    }
}

impl ThemeSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Resolved path of the local theme file.
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage_path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "grocer", "storefront")
                .map(|dirs| dirs.data_dir().join("theme.json"))
        })
    }
}

// =============================================================================
// Order List Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSettings {
    /// Sort applied when the order list opens (`date-desc`, `price-asc`, ...).
    #[serde(default = "default_sort")]
    pub default_sort: String,
}

fn default_sort() -> String {
    SortKey::default().to_string()
}

impl Default for OrderSettings {
    fn default() -> Self {
        OrderSettings {
            default_sort: default_sort(),
        }
    }
}

impl OrderSettings {
    pub fn sort_key(&self) -> ClientResult<SortKey> {
        Ok(self.default_sort.parse::<SortKey>()?)
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub theme: ThemeSettings,

    #[serde(default)]
    pub orders: OrderSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
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

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    pub fn validate(&self) -> ClientResult<()> {
        self.api.base_url()?;

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.api.connect_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "connect_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.theme.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ClientError::InvalidConfig(format!(
                "debounce_ms must be at most {}",
                MAX_DEBOUNCE_MS
            )));
        }

        self.orders
            .sort_key()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("GROCER_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Ok(secs) = std::env::var("GROCER_API_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid GROCER_API_TIMEOUT_SECS"),
            }
        }

        if let Ok(ms) = std::env::var("GROCER_THEME_DEBOUNCE_MS") {
            match ms.parse::<u64>() {
                Ok(m) => self.theme.debounce_ms = m,
                Err(_) => warn!(value = %ms, "Ignoring invalid GROCER_THEME_DEBOUNCE_MS"),
            }
        }

        if let Ok(sort) = std::env::var("GROCER_ORDER_SORT") {
            self.orders.default_sort = sort;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "grocer", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }
}
