//! v8 chart endpoint: request parameters and response parsing.

use crate::error::ProviderError;
use crate::provider::{PriceHistory, RawBar};
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;

use super::ApiError;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
pub(super) struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    symbol: Option<String>,
    /// Exchange offset from UTC in seconds.
    gmtoffset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Query parameters for daily bars over `[start, end)`, both at 00:00 UTC.
pub(super) fn chart_query(start: NaiveDate, end: NaiveDate) -> Vec<(&'static str, String)> {
    let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
    let end_ts = end.and_time(NaiveTime::MIN).and_utc().timestamp();
    vec![
        ("period1", start_ts.to_string()),
        ("period2", end_ts.to_string()),
        ("interval", "1d".to_string()),
        ("includeAdjustedClose", "true".to_string()),
        ("events", "div,splits".to_string()),
    ]
}

/// Parse the chart body into a `PriceHistory`.
///
/// A result without timestamps is an empty range, not an error.
pub(super) fn parse_chart(
    symbol: &str,
    body: &str,
    auto_adjust: bool,
) -> Result<PriceHistory, ProviderError> {
    let resp: ChartResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::ResponseFormatChanged(format!("failed to parse chart for {symbol}: {e}"))
    })?;

    let result = match (resp.chart.result, resp.chart.error) {
        (_, Some(err)) => return Err(err.into_provider_error(symbol)),
        (Some(result), None) => result,
        (None, None) => {
            return Err(ProviderError::ResponseFormatChanged(
                "empty chart result with no error".into(),
            ))
        }
    };

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::ResponseFormatChanged("chart result array is empty".into()))?;

    let canonical = data
        .meta
        .symbol
        .clone()
        .unwrap_or_else(|| symbol.to_uppercase());
    let offset = data.meta.gmtoffset.unwrap_or(0);

    let timestamps = data.timestamp.unwrap_or_default();
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let adj_closes = data
        .indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose);

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (i, &ts) in timestamps.iter().enumerate() {
        let date = ts
            .checked_add(offset)
            .and_then(|local| DateTime::from_timestamp(local, 0))
            .map(|dt| dt.date_naive().and_time(NaiveTime::MIN))
            .ok_or_else(|| {
                ProviderError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;

        let mut open = quote.open.get(i).copied().flatten();
        let mut high = quote.high.get(i).copied().flatten();
        let mut low = quote.low.get(i).copied().flatten();
        let mut close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        // Placeholder rows for non-trading days carry no values at all
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() && volume.is_none()
        {
            skipped += 1;
            continue;
        }

        if auto_adjust {
            let adj = adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten());
            if let (Some(adj), Some(raw_close)) = (adj, close) {
                if raw_close != 0.0 {
                    let ratio = adj / raw_close;
                    open = open.map(|v| v * ratio);
                    high = high.map(|v| v * ratio);
                    low = low.map(|v| v * ratio);
                    close = Some(adj);
                }
            }
        }

        bars.push(RawBar {
            date,
            open,
            high,
            low,
            close,
            volume: volume.unwrap_or(0),
        });
    }

    if skipped > 0 {
        tracing::warn!(
            symbol,
            skipped,
            total = timestamps.len(),
            "dropped chart rows with no OHLCV values"
        );
    }

    Ok(PriceHistory {
        symbol: canonical,
        bars,
    })
}
