//! quotefeed core: turns positional arguments into one JSON document of market data.
//!
//! - Argument dispatch (extended info vs. historical bars)
//! - Data shaping on top of a `QuoteProvider`
//! - JSON output with 4-space indentation
//! - Yahoo Finance provider with cookie/crumb session and retry policy
//! - Provider configuration (defaults, TOML file, environment)

pub mod config;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod provider;
pub mod shape;

pub use config::ProviderConfig;
pub use dispatch::{execute, Output, Request};
pub use error::{ConfigError, ProviderError, UsageError};
pub use provider::{QuoteProvider, YahooProvider};
pub use shape::{get_extended_info, get_historical_bars, ExtendedInfo, HistoricalBars};
