#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveTime};
use quotefeed_core::provider::{Metadata, PriceHistory, RawBar, TickerEntry};
use quotefeed_core::{ProviderError, QuoteProvider};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory provider: known symbols get canned data, everything else is "not found".
#[derive(Default)]
pub struct StubProvider {
    pub known: Vec<String>,
    pub bars: Vec<RawBar>,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn with_symbols(known: &[&str]) -> Self {
        Self {
            known: known.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_bars(symbol: &str, bars: Vec<RawBar>) -> Self {
        Self {
            known: vec![symbol.to_string()],
            bars,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check_known(&self, symbol: &str) -> Result<(), ProviderError> {
        if self.known.iter().any(|k| k.eq_ignore_ascii_case(symbol)) {
            Ok(())
        } else {
            Err(ProviderError::SymbolNotFound {
                symbol: symbol.to_uppercase(),
            })
        }
    }
}

impl QuoteProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn fetch_info(&self, symbols: &str) -> Result<Vec<TickerEntry>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        symbols
            .split_whitespace()
            .map(|s| {
                self.check_known(s)?;
                Ok(TickerEntry {
                    symbol: s.to_uppercase(),
                    info: sample_metadata(&s.to_uppercase()),
                })
            })
            .collect()
    }

    fn fetch_daily_history(
        &self,
        symbol: &str,
        _start: &str,
        _end: &str,
    ) -> Result<PriceHistory, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_known(symbol)?;
        Ok(PriceHistory {
            symbol: symbol.to_uppercase(),
            bars: self.bars.clone(),
        })
    }
}

pub fn sample_metadata(symbol: &str) -> Metadata {
    let mut info = Metadata::new();
    info.insert("symbol".into(), json!(symbol));
    info.insert("currency".into(), json!("USD"));
    info.insert("marketCap".into(), json!(2_900_000_000_000u64));
    info.insert("trailingPE".into(), json!(29.4));
    info.insert("dividendRate".into(), serde_json::Value::Null);
    info
}

/// Consecutive calendar days starting 2024-01-02; `None` in `closes` leaves a gap in the row.
pub fn daily_bars(closes: &[Option<f64>]) -> Vec<RawBar> {
    let first = NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date");
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| RawBar {
            date: (first + Duration::days(i as i64)).and_time(NaiveTime::MIN),
            open: close.map(|c| c - 0.5),
            high: close.map(|c| c + 1.0),
            low: close.map(|c| c - 1.0),
            close,
            volume: 1_000 + i as u64,
        })
        .collect()
}
