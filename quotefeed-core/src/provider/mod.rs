//! Quote provider trait and raw response types.
//!
//! The `QuoteProvider` trait abstracts over data sources so the data shaper can run against
//! Yahoo Finance in production and against in-memory stubs in tests.

pub mod yahoo;

pub use yahoo::YahooProvider;

use crate::error::ProviderError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Provider-defined bag of metadata fields for one symbol.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// One ticker of a metadata batch, as the provider exposes it.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerEntry {
    /// Symbol as echoed back by the provider (may differ in case from the request).
    pub symbol: String,
    pub info: Metadata,
}

/// Raw daily OHLCV bar from a provider.
///
/// Prices stay optional: a trading day can carry a partial row. Volume has no gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    /// Start of the bar in exchange-local time.
    pub date: NaiveDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: u64,
}

/// Daily bars for one symbol, ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    /// Provider's canonical form of the symbol.
    pub symbol: String,
    pub bars: Vec<RawBar>,
}

/// Trait for quote providers.
///
/// Implementations own transport, authentication, and any retry policy. Callers get either data or
/// a `ProviderError` and never retry on their own.
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch metadata for a whitespace-delimited list of symbols in one batch.
    fn fetch_info(&self, symbols: &str) -> Result<Vec<TickerEntry>, ProviderError>;

    /// Fetch daily bars for `symbol` over `[start, end)`. Dates are passed through as given.
    fn fetch_daily_history(
        &self,
        symbol: &str,
        start: &str,
        end: &str,
    ) -> Result<PriceHistory, ProviderError>;
}

/// Parse a provider date argument: `YYYY-MM-DD`, or an RFC 3339 timestamp truncated to its date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ProviderError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
        .map_err(|_| ProviderError::InvalidDate {
            value: value.to_string(),
        })
}
