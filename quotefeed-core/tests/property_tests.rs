//! Property tests for the shaping invariants.
//!
//! Uses proptest to verify:
//! 1. Comma substitution maps every comma to exactly one space
//! 2. Blank input never reaches the provider
//! 3. Wrong argument counts are rejected before the provider is called
//! 4. Historical columns always have equal length
//! 5. JSON output parses back to the same value

mod common;

use common::{daily_bars, StubProvider};
use proptest::prelude::*;
use quotefeed_core::output::to_pretty_json;
use quotefeed_core::shape::{get_extended_info, get_historical_bars, space_delimited, HistoricalBars};
use quotefeed_core::{execute, Request};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_symbol() -> impl Strategy<Value = String> {
    "[A-Z]{1,5}(-[A-Z])?"
}

fn arb_close() -> impl Strategy<Value = Option<f64>> {
    prop::option::weighted(0.9, (1.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0))
}

// ── 1. Comma substitution ────────────────────────────────────────────

proptest! {
    #[test]
    fn every_comma_becomes_one_space(input in "[A-Za-z0-9,. \\-]{0,40}") {
        let out = space_delimited(&input);
        prop_assert!(!out.contains(','));
        prop_assert_eq!(out.len(), input.len());
        prop_assert_eq!(
            out.matches(' ').count(),
            input.matches(' ').count() + input.matches(',').count()
        );
    }

    #[test]
    fn symbol_list_length_is_preserved(symbols in prop::collection::vec(arb_symbol(), 1..8)) {
        let joined = symbols.join(",");
        let spaced = space_delimited(&joined);
        let tokens: Vec<&str> = spaced.split(' ').collect();
        prop_assert_eq!(tokens, symbols.iter().map(String::as_str).collect::<Vec<_>>());
    }
}

// ── 2. Blank input ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn blank_input_never_calls_provider(blank in "[ \t\r\n]{0,12}") {
        let provider = StubProvider::with_symbols(&["AAPL"]);
        prop_assert!(get_extended_info(&provider, &blank).unwrap().is_none());
        prop_assert!(get_historical_bars(&provider, &blank, "2024-01-01", "2024-02-01")
            .unwrap()
            .is_none());
        prop_assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn wrong_argument_counts_never_call_provider(
        args in prop::collection::vec("[A-Z0-9-]{0,6}", 0..8)
            .prop_filter("valid counts", |a| a.len() != 1 && a.len() != 3)
    ) {
        let known: Vec<&str> = args.iter().map(String::as_str).collect();
        let provider = StubProvider::with_symbols(&known);
        let outcome = Request::from_args(&args).map(|request| execute(&request, &provider));
        match outcome {
            Err(usage) => prop_assert_eq!(usage.count, args.len()),
            Ok(result) => prop_assert!(false, "dispatched {} arguments: {:?}", args.len(), result),
        }
        prop_assert_eq!(provider.calls(), 0);
    }
}

// ── 3. Equal-length columns ──────────────────────────────────────────

proptest! {
    #[test]
    fn historical_columns_have_equal_length(closes in prop::collection::vec(arb_close(), 0..300)) {
        let provider = StubProvider::with_bars("SPY", daily_bars(&closes));
        let bars = get_historical_bars(&provider, "SPY", "2024-01-02", "2025-01-01")
            .unwrap()
            .unwrap();

        let n = closes.len();
        prop_assert_eq!(bars.date.len(), n);
        prop_assert_eq!(bars.open.len(), n);
        prop_assert_eq!(bars.high.len(), n);
        prop_assert_eq!(bars.low.len(), n);
        prop_assert_eq!(bars.close.len(), n);
        prop_assert_eq!(bars.volume.len(), n);

        for window in bars.date.windows(2) {
            prop_assert!(window[0] < window[1]);
        }
    }
}

// ── 4. JSON round trip ───────────────────────────────────────────────

proptest! {
    #[test]
    fn historical_json_round_trips(closes in prop::collection::vec(arb_close(), 0..40)) {
        let provider = StubProvider::with_bars("MSFT", daily_bars(&closes));
        let request = Request::from_args(&["msft", "2024-01-02", "2024-03-01"]).unwrap();
        let output = execute(&request, &provider).unwrap();

        let doc = to_pretty_json(&output).unwrap();
        let parsed: HistoricalBars = serde_json::from_str(&doc).unwrap();
        prop_assert_eq!(&parsed.symbol, "msft");
        prop_assert_eq!(parsed.close, closes);
    }

    #[test]
    fn extended_info_json_round_trips(symbols in prop::collection::btree_set(arb_symbol(), 1..6)) {
        let symbols: Vec<String> = symbols.into_iter().collect();
        let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
        let provider = StubProvider::with_symbols(&refs);

        let request = Request::from_args(&[symbols.join(",")]).unwrap();
        let output = execute(&request, &provider).unwrap();
        let doc = to_pretty_json(&output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&doc).unwrap();

        let object = parsed.as_object().unwrap();
        prop_assert_eq!(object.len(), symbols.len());
        for symbol in &symbols {
            prop_assert_eq!(&object[symbol.as_str()]["symbol"], &serde_json::json!(symbol));
            prop_assert_eq!(&object[symbol.as_str()]["trailingPE"], &serde_json::json!(29.4));
        }
    }
}
