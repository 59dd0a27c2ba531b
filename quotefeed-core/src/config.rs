//! Provider configuration.
//!
//! Every field has a default, so an empty TOML document is a valid configuration. Values are
//! resolved in order: built-in defaults, then the TOML file named by `QUOTEFEED_CONFIG`, then the
//! `QUOTEFEED_TIMEOUT_SECS` override.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_ENV: &str = "QUOTEFEED_CONFIG";

/// Environment variable overriding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "QUOTEFEED_TIMEOUT_SECS";

pub const DEFAULT_CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
pub const DEFAULT_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
pub const DEFAULT_COOKIE_URL: &str = "https://fc.yahoo.com";
pub const DEFAULT_CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Summary modules requested for extended info, flattened into one metadata map per symbol.
pub const DEFAULT_MODULES: &[&str] = &[
    "quoteType",
    "assetProfile",
    "summaryProfile",
    "summaryDetail",
    "financialData",
    "defaultKeyStatistics",
    "price",
];

/// Settings for the Yahoo Finance provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Base URL of the v8 chart endpoint (symbol is appended as a path segment).
    pub chart_url: String,

    /// Base URL of the v10 quote summary endpoint.
    pub summary_url: String,

    /// URL hit once to obtain the session cookie.
    pub cookie_url: String,

    /// URL returning the crumb token for the current session.
    pub crumb_url: String,

    pub user_agent: String,

    /// Per-request timeout.
    pub timeout_secs: u64,

    /// Retries for transient failures (connect errors, timeouts, 429, 5xx).
    pub max_retries: u32,

    /// Backoff base; attempt `n` waits `base * 2^(n-1)`.
    pub retry_base_delay_ms: u64,

    /// Scale open/high/low by `adjclose / close` and report the adjusted close.
    pub auto_adjust: bool,

    pub modules: Vec<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            chart_url: DEFAULT_CHART_URL.into(),
            summary_url: DEFAULT_SUMMARY_URL.into(),
            cookie_url: DEFAULT_COOKIE_URL.into(),
            crumb_url: DEFAULT_CRUMB_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            timeout_secs: 30,
            max_retries: 2,
            retry_base_delay_ms: 500,
            auto_adjust: true,
            modules: DEFAULT_MODULES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl ProviderConfig {
    /// Parse a configuration from a TOML string. The path is only used for error reporting.
    pub fn from_toml(toml_str: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let timeout = std::env::var(TIMEOUT_ENV).ok();
        Self::resolve(path.as_deref(), timeout.as_deref())
    }

    /// Apply the file layer and the timeout override on top of the defaults.
    pub fn resolve(path: Option<&Path>, timeout_override: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(raw) = timeout_override {
            config.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: TIMEOUT_ENV,
                value: raw.to_string(),
            })?;
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Comma-joined module list as sent in the `modules` query parameter.
    pub fn modules_param(&self) -> String {
        self.modules.join(",")
    }
}
