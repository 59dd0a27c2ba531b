//! quotefeed CLI: prints one JSON document of Yahoo Finance data on stdout.
//!
//! Modes, selected by argument count:
//! - `quotefeed AAPL,MSFT`: extended metadata for one or more comma-separated symbols
//! - `quotefeed AAPL 2024-01-02 2024-02-01`: daily OHLCV bars over `[start, end)`
//!
//! Every argument counts toward the mode, including `--`, `-h` and `--version`; no flags are
//! recognized. Anything else prints `Invalid arguments` on stderr and exits 1. Provider failures (unknown or
//! delisted symbols, network errors) also exit 1 with the error chain on stderr and nothing on
//! stdout.
//!
//! Environment:
//! - `QUOTEFEED_CONFIG`: optional TOML file with provider settings
//! - `QUOTEFEED_TIMEOUT_SECS`: request timeout override
//! - `QUOTEFEED_LOG`: log filter (e.g. `debug`, `quotefeed_core=trace`); logs go to stderr

use anyhow::{Context, Result};
use quotefeed_core::output::write_json;
use quotefeed_core::{execute, Output, ProviderConfig, Request, YahooProvider};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "QUOTEFEED_LOG";

fn main() -> Result<()> {
    init_logging();
    let args = raw_args();

    let request = match Request::from_args(&args) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(count = e.count, "rejected argument count");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let output = run(&request)?;

    let stdout = std::io::stdout();
    write_json(stdout.lock(), &output).context("failed to write JSON to stdout")?;
    Ok(())
}

/// Positional arguments exactly as given, program name excluded.
fn raw_args() -> Vec<String> {
    std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

fn run(request: &Request) -> Result<Option<Output>> {
    let config = ProviderConfig::from_env().context("failed to load provider configuration")?;
    let provider = YahooProvider::new(config).context("failed to create Yahoo Finance provider")?;

    let output = execute(request, &provider)
        .with_context(|| format!("{} request failed", request.mode()))?;
    Ok(output)
}

/// Log to stderr; stdout carries only the JSON document.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .try_init();
}
