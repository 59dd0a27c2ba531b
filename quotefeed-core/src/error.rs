//! Structured error types.
//!
//! Provider failures are never caught by the dispatcher or the data shaper. They travel up to the
//! binary unchanged so the calling process can detect delisted symbols from the exit status.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a quote provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol} (possibly delisted)")]
    SymbolNotFound { symbol: String },

    #[error("invalid date '{value}': expected YYYY-MM-DD or RFC 3339")]
    InvalidDate { value: String },

    #[error("provider error: {0}")]
    Other(String),
}

/// Wrong number of positional arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid arguments")]
pub struct UsageError {
    pub count: usize,
}

/// Failure while resolving provider configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },
}
