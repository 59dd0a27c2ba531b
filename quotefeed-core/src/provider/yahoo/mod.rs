//! Yahoo Finance data provider.
//!
//! Fetches symbol metadata from the v10 quote summary API and daily OHLCV bars from the v8 chart
//! API. Handles the cookie/crumb session, retries with exponential backoff, and response parsing.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes. Anything the
//! parsers cannot read surfaces as `ProviderError::ResponseFormatChanged`.

mod chart;
mod session;
mod summary;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::provider::{parse_date, PriceHistory, QuoteProvider, TickerEntry};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Upper bound on the sleep between two attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Error object embedded in chart and summary responses.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

impl ApiError {
    fn into_provider_error(self, symbol: &str) -> ProviderError {
        if self.code == "Not Found" {
            ProviderError::SymbolNotFound {
                symbol: symbol.to_string(),
            }
        } else {
            ProviderError::Other(format!(
                "{}: {}",
                self.code,
                self.description.unwrap_or_default()
            ))
        }
    }
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    config: ProviderConfig,
    crumb: Mutex<Option<String>>,
}

impl YahooProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .build()
            .map_err(|e| ProviderError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            crumb: Mutex::new(None),
        })
    }

    /// Send a GET request, retrying transient failures.
    ///
    /// Returns the final status and body for every response that is not retried; interpreting the
    /// status is left to the caller.
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<(StatusCode, String), ProviderError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.config.retry_base_delay(), attempt);
                warn!(url, attempt, delay_ms = delay.as_millis() as u64, "retrying request");
                std::thread::sleep(delay);
            }

            debug!(url, "sending request");
            match self.client.get(url).query(query).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(ProviderError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if status.is_server_error() {
                        last_error = Some(ProviderError::Other(format!("HTTP {status} from {url}")));
                        continue;
                    }

                    let body = resp.text().map_err(|e| {
                        ProviderError::NetworkUnreachable(format!("failed to read body from {url}: {e}"))
                    })?;
                    return Ok((status, body));
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(ProviderError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(ProviderError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::Other("max retries exceeded".into())))
    }
}

impl QuoteProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    #[instrument(skip(self))]
    fn fetch_info(&self, symbols: &str) -> Result<Vec<TickerEntry>, ProviderError> {
        let tickers = batch_symbols(symbols);
        if tickers.is_empty() {
            return Ok(Vec::new());
        }

        let crumb = self.crumb()?;
        let modules = self.config.modules_param();
        let mut entries = Vec::with_capacity(tickers.len());

        for symbol in tickers {
            let url = endpoint(&self.config.summary_url, &symbol);
            let query = [
                ("modules", modules.clone()),
                ("formatted", "false".to_string()),
                ("crumb", crumb.clone()),
            ];
            let (status, body) = self.get(&url, &query)?;
            check_status(&symbol, status, &body)?;

            let info = summary::parse_summary(&symbol, &body, &self.config.modules)?;
            debug!(symbol = %symbol, fields = info.len(), "parsed ticker metadata");
            entries.push(TickerEntry { symbol, info });
        }

        info!(tickers = entries.len(), "fetched ticker metadata");
        Ok(entries)
    }

    #[instrument(skip(self))]
    fn fetch_daily_history(
        &self,
        symbol: &str,
        start: &str,
        end: &str,
    ) -> Result<PriceHistory, ProviderError> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        let canonical = symbol.trim().to_uppercase();

        if start >= end {
            debug!(%start, %end, "empty date range, skipping request");
            return Ok(PriceHistory {
                symbol: canonical,
                bars: Vec::new(),
            });
        }

        let url = endpoint(&self.config.chart_url, &canonical);
        let (status, body) = self.get(&url, &chart::chart_query(start, end))?;
        check_status(&canonical, status, &body)?;

        let history = chart::parse_chart(&canonical, &body, self.config.auto_adjust)?;
        info!(bars = history.bars.len(), "fetched daily bars");
        Ok(history)
    }
}

/// Exponential backoff before retry number `attempt` (1-based), capped at `MAX_BACKOFF`.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    base.saturating_mul(factor).min(MAX_BACKOFF)
}

/// Split a whitespace-delimited symbol list into upper-cased, de-duplicated tickers.
fn batch_symbols(symbols: &str) -> Vec<String> {
    let mut tickers: Vec<String> = Vec::new();
    for token in symbols.split_whitespace() {
        let ticker = token.to_uppercase();
        if !tickers.contains(&ticker) {
            tickers.push(ticker);
        }
    }
    tickers
}

fn endpoint(base: &str, symbol: &str) -> String {
    format!("{}/{symbol}", base.trim_end_matches('/'))
}

/// Map statuses that carry no usable payload. Error bodies with a JSON envelope on a success or
/// 4xx status are left to the parsers.
fn check_status(symbol: &str, status: StatusCode, body: &str) -> Result<(), ProviderError> {
    match status {
        StatusCode::NOT_FOUND => Err(ProviderError::SymbolNotFound {
            symbol: symbol.to_string(),
        }),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
            ProviderError::AuthenticationRequired(format!("HTTP {status} for {symbol}")),
        ),
        s if s.is_success() => Ok(()),
        s if body.trim_start().starts_with('{') => {
            debug!(status = %s, "non-success status with JSON body");
            Ok(())
        }
        s => Err(ProviderError::Other(format!(
            "HTTP {s} for {symbol}: {}",
            body.chars().take(200).collect::<String>()
        ))),
    }
}
