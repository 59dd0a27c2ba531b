//! Data shaper: calls the provider and reshapes its responses into plain JSON-ready values.
//!
//! Blank input yields `Ok(None)` without touching the provider. Provider failures are returned
//! unchanged; nothing here retries or recovers.

use crate::error::ProviderError;
use crate::provider::{Metadata, QuoteProvider};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Format of every entry in `HistoricalBars::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Ticker symbol → metadata, keyed by the symbol as the provider echoes it.
pub type ExtendedInfo = BTreeMap<String, Metadata>;

/// Daily bars in column form. All six sequences have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBars {
    pub symbol: String,
    pub date: Vec<String>,
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
    pub volume: Vec<u64>,
}

impl HistoricalBars {
    fn with_capacity(symbol: &str, n: usize) -> Self {
        Self {
            symbol: symbol.to_string(),
            date: Vec::with_capacity(n),
            open: Vec::with_capacity(n),
            high: Vec::with_capacity(n),
            low: Vec::with_capacity(n),
            close: Vec::with_capacity(n),
            volume: Vec::with_capacity(n),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_empty()
    }
}

/// True when the input is empty or whitespace only.
pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}

/// Replace every comma with a single space. Nothing is collapsed or trimmed.
pub fn space_delimited(symbols: &str) -> String {
    symbols.replace(',', " ")
}

/// Metadata for one or more comma-separated symbols, fetched in a single batch.
pub fn get_extended_info(
    provider: &dyn QuoteProvider,
    symbols: &str,
) -> Result<Option<ExtendedInfo>, ProviderError> {
    if is_blank(symbols) {
        debug!("blank symbol list, returning no result");
        return Ok(None);
    }

    let spaced = space_delimited(symbols);
    let entries = provider.fetch_info(&spaced)?;

    let info: ExtendedInfo = entries
        .into_iter()
        .map(|entry| (entry.symbol, entry.info))
        .collect();
    Ok(Some(info))
}

/// Daily bars for `ticker` over `[start_date, end_date)` as the provider defines the range.
///
/// `symbol` echoes `ticker` exactly as given, not the provider's canonical form.
pub fn get_historical_bars(
    provider: &dyn QuoteProvider,
    ticker: &str,
    start_date: &str,
    end_date: &str,
) -> Result<Option<HistoricalBars>, ProviderError> {
    if is_blank(ticker) {
        debug!("blank ticker, returning no result");
        return Ok(None);
    }

    let history = provider.fetch_daily_history(ticker, start_date, end_date)?;

    let mut bars = HistoricalBars::with_capacity(ticker, history.bars.len());
    for bar in history.bars {
        bars.date.push(bar.date.format(DATE_FORMAT).to_string());
        bars.open.push(bar.open);
        bars.high.push(bar.high);
        bars.low.push(bar.low);
        bars.close.push(bar.close);
        bars.volume.push(bar.volume);
    }
    Ok(Some(bars))
}
