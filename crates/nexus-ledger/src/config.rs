//! # Ledger Configuration
//!
//! Configuration management for the session services.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     NEXUS_OWNER_ID=user-123                                            │
//! │     NEXUS_DB_PATH=/tmp/nexus.db                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/invoicing/nexus.toml (Linux)                             │
//! │     ~/Library/Application Support/com.nexus.invoicing/nexus.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     30s invoice cache, 60s dashboard cache, usd                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "./nexus.db"
//! max_connections = 5
//!
//! [cache]
//! invoice_ttl_secs = 30
//! dashboard_ttl_secs = 60
//!
//! [payments]
//! currency = "usd"
//! checkout_base_url = "http://localhost:8080"
//!
//! [drafts]
//! dir = "./drafts"
//!
//! [session]
//! owner_id = "demo-user"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use nexus_core::charge::{ChargeOptions, DEFAULT_CANCEL_PATH, DEFAULT_CURRENCY, DEFAULT_SUCCESS_PATH};
use nexus_db::DbConfig;

use crate::error::{LedgerError, LedgerResult};

// =============================================================================
// Database Settings
// =============================================================================

/// Where the store lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file path. `:memory:` opens a throwaway database.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./nexus.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseSettings {
    /// Builds the pool configuration.
    pub fn db_config(&self) -> DbConfig {
        if self.path.as_os_str() == ":memory:" {
            return DbConfig::in_memory();
        }
        DbConfig::new(self.path.clone()).max_connections(self.max_connections)
    }
}

// =============================================================================
// Cache Settings
// =============================================================================

/// Time-to-live of the session caches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Per-invoice payment totals.
    #[serde(default = "default_invoice_ttl")]
    pub invoice_ttl_secs: u64,

    /// Dashboard rollup.
    #[serde(default = "default_dashboard_ttl")]
    pub dashboard_ttl_secs: u64,
}

fn default_invoice_ttl() -> u64 {
    30
}

fn default_dashboard_ttl() -> u64 {
    60
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            invoice_ttl_secs: default_invoice_ttl(),
            dashboard_ttl_secs: default_dashboard_ttl(),
        }
    }
}

impl CacheSettings {
    pub fn invoice_ttl(&self) -> Duration {
        Duration::from_secs(self.invoice_ttl_secs)
    }

    pub fn dashboard_ttl(&self) -> Duration {
        Duration::from_secs(self.dashboard_ttl_secs)
    }
}

// =============================================================================
// Payment Settings
// =============================================================================

/// Charge request defaults and the mock checkout base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSettings {
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_success_path")]
    pub success_path: String,

    #[serde(default = "default_cancel_path")]
    pub cancel_path: String,

    /// Origin the mock checkout redirects back to.
    #[serde(default = "default_checkout_base_url")]
    pub checkout_base_url: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_success_path() -> String {
    DEFAULT_SUCCESS_PATH.to_string()
}

fn default_cancel_path() -> String {
    DEFAULT_CANCEL_PATH.to_string()
}

fn default_checkout_base_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for PaymentSettings {
    fn default() -> Self {
        PaymentSettings {
            currency: default_currency(),
            success_path: default_success_path(),
            cancel_path: default_cancel_path(),
            checkout_base_url: default_checkout_base_url(),
        }
    }
}

impl PaymentSettings {
    pub fn charge_options(&self) -> ChargeOptions {
        ChargeOptions {
            currency: self.currency.clone(),
            success_path: self.success_path.clone(),
            cancel_path: self.cancel_path.clone(),
        }
    }
}

// =============================================================================
// Draft & Session Settings
// =============================================================================

/// Where invoice drafts are kept between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSettings {
    #[serde(default = "default_draft_dir")]
    pub dir: PathBuf,
}

fn default_draft_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "nexus", "invoicing")
        .map(|dirs| dirs.data_dir().join("drafts"))
        .unwrap_or_else(|| PathBuf::from("./drafts"))
}

impl Default for DraftSettings {
    fn default() -> Self {
        DraftSettings {
            dir: default_draft_dir(),
        }
    }
}

/// The signed-in user every query is scoped to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_owner_id")]
    pub owner_id: String,
}

fn default_owner_id() -> String {
    "demo-user".to_string()
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            owner_id: default_owner_id(),
        }
    }
}

// =============================================================================
// Main Ledger Configuration
// =============================================================================

/// Complete ledger configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub payments: PaymentSettings,

    #[serde(default)]
    pub drafts: DraftSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl LedgerConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (nexus.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> LedgerResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading ledger config from file");
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
            warn!("Failed to load ledger config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> LedgerResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| LedgerError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Ledger config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.session.owner_id.trim().is_empty() {
            return Err(LedgerError::InvalidConfig("owner_id must not be empty".into()));
        }

        if self.cache.invoice_ttl_secs == 0 || self.cache.dashboard_ttl_secs == 0 {
            return Err(LedgerError::InvalidConfig(
                "cache TTLs must be greater than 0".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(LedgerError::InvalidConfig(
                "max_connections must be greater than 0".into(),
            ));
        }

        let currency = &self.payments.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(LedgerError::InvalidConfig(format!(
                "currency must be a lowercase ISO code, got: {}",
                currency
            )));
        }

        for path in [&self.payments.success_path, &self.payments.cancel_path] {
            if !path.starts_with('/') {
                return Err(LedgerError::InvalidConfig(format!(
                    "redirect paths must start with '/', got: {}",
                    path
                )));
            }
        }

        let base = &self.payments.checkout_base_url;
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(LedgerError::InvalidConfig(format!(
                "checkout_base_url must start with http:// or https://, got: {}",
                base
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("NEXUS_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(owner) = lookup("NEXUS_OWNER_ID") {
            debug!(owner_id = %owner, "Overriding owner from environment");
            self.session.owner_id = owner;
        }

        if let Some(currency) = lookup("NEXUS_CURRENCY") {
            self.payments.currency = currency.to_lowercase();
        }

        if let Some(dir) = lookup("NEXUS_DRAFT_DIR") {
            self.drafts.dir = PathBuf::from(dir);
        }

        if let Some(ttl) = lookup("NEXUS_INVOICE_CACHE_TTL_SECS") {
            match ttl.parse::<u64>() {
                Ok(secs) => self.cache.invoice_ttl_secs = secs,
                Err(_) => warn!(value = %ttl, "Ignoring non-numeric invoice cache TTL"),
            }
        }

        if let Some(ttl) = lookup("NEXUS_DASHBOARD_CACHE_TTL_SECS") {
            match ttl.parse::<u64>() {
                Ok(secs) => self.cache.dashboard_ttl_secs = secs,
                Err(_) => warn!(value = %ttl, "Ignoring non-numeric dashboard cache TTL"),
            }
        }

        if let Some(url) = lookup("NEXUS_CHECKOUT_BASE_URL") {
            self.payments.checkout_base_url = url.trim_end_matches('/').to_string();
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "nexus", "invoicing")
            .map(|dirs| dirs.config_dir().join("nexus.toml"))
    }

    /// Returns the configured owner.
    pub fn owner_id(&self) -> &str {
        &self.session.owner_id
    }
}
