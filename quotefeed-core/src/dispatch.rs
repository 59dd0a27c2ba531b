//! Argument dispatcher: picks the retrieval mode from the positional argument count.

use crate::error::{ProviderError, UsageError};
use crate::provider::QuoteProvider;
use crate::shape::{get_extended_info, get_historical_bars, ExtendedInfo, HistoricalBars};
use serde::Serialize;

/// A resolved invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// One argument: comma-separated symbol list.
    ExtendedInfo { symbols: String },
    /// Three arguments: ticker, start date, end date.
    HistoricalBars {
        ticker: String,
        start_date: String,
        end_date: String,
    },
}

impl Request {
    /// Select the mode from the arguments, program name excluded.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, UsageError> {
        match args {
            [symbols] => Ok(Request::ExtendedInfo {
                symbols: symbols.as_ref().to_string(),
            }),
            [ticker, start, end] => Ok(Request::HistoricalBars {
                ticker: ticker.as_ref().to_string(),
                start_date: start.as_ref().to_string(),
                end_date: end.as_ref().to_string(),
            }),
            _ => Err(UsageError { count: args.len() }),
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Request::ExtendedInfo { .. } => "extended_info",
            Request::HistoricalBars { .. } => "historical_bars",
        }
    }
}

/// Result of one invocation. Serializes as the bare mapping or record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    ExtendedInfo(ExtendedInfo),
    HistoricalBars(HistoricalBars),
}

/// Run the request against the provider. `Ok(None)` is the absence result for blank input.
pub fn execute(
    request: &Request,
    provider: &dyn QuoteProvider,
) -> Result<Option<Output>, ProviderError> {
    tracing::debug!(mode = request.mode(), provider = provider.name(), "dispatching request");
    match request {
        Request::ExtendedInfo { symbols } => {
            Ok(get_extended_info(provider, symbols)?.map(Output::ExtendedInfo))
        }
        Request::HistoricalBars {
            ticker,
            start_date,
            end_date,
        } => Ok(get_historical_bars(provider, ticker, start_date, end_date)?
            .map(Output::HistoricalBars)),
    }
}
