//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use govlens_client::DEFAULT_LCD_ENDPOINT;
use govlens_types::TallyParams;

use crate::ServiceError;

/// Configuration for the govlens service.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the LCD REST gateway.
    #[serde(default = "default_lcd_endpoint")]
    pub lcd_endpoint: String,

    /// Whole-request timeout for LCD calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// `pagination.limit` used when walking the proposal listing.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Lifetime of cached gov params, staked pool and proposal list.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Lifetime of the proposal page snapshot.
    #[serde(default = "default_stale_ttl_secs")]
    pub stale_ttl_secs: u64,

    /// Directory of the LMDB cache environment.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Thresholds used when the chain reports unusable tally params.
    #[serde(default)]
    pub default_thresholds: TallyParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_lcd_endpoint() -> String {
    DEFAULT_LCD_ENDPOINT.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_page_limit() -> u32 {
    100
}

fn default_cache_ttl_secs() -> u64 {
    5 * 60
}

fn default_stale_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./govlens_cache")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ServiceError::Config(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ServiceError> {
        let config: Self = toml::from_str(s).map_err(|e| ServiceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ServiceError> {
        toml::to_string_pretty(self).map_err(|e| ServiceError::Config(e.to_string()))
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.page_limit == 0 {
            return Err(ServiceError::Config("page_limit must be positive".into()));
        }
        if self.cache_ttl_secs == 0 || self.stale_ttl_secs == 0 {
            return Err(ServiceError::Config("cache lifetimes must be positive".into()));
        }
        TallyParams::new(
            self.default_thresholds.quorum,
            self.default_thresholds.threshold,
            self.default_thresholds.veto_threshold,
        )
        .map_err(|e| ServiceError::Config(format!("default_thresholds: {e}")))?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn stale_ttl(&self) -> Duration {
        Duration::from_secs(self.stale_ttl_secs)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            lcd_endpoint: default_lcd_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            page_limit: default_page_limit(),
            cache_ttl_secs: default_cache_ttl_secs(),
            stale_ttl_secs: default_stale_ttl_secs(),
            cache_dir: default_cache_dir(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            default_thresholds: TallyParams::default(),
        }
    }
}
