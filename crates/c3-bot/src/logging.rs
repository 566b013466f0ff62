//! Tracing subscriber setup
//!
//! Logs go to stderr; stdout carries the JSON-lines transport.
//!
//! # Filter priority (highest to lowest)
//!
//! 1. `C3_LOG` env var
//! 2. `RUST_LOG` env var
//! 3. `--verbose` (debug for the c3 crates)
//! 4. `log.filter` from the config file

use crate::config::LogConfig;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::EnvFilter;

/// Project-specific filter variable
pub const LOG_ENV: &str = "C3_LOG";

const VERBOSE_DIRECTIVES: &str = "info,c3_bot=debug,c3_catalog=debug";

/// Install the global subscriber
///
/// # Errors
/// - `TryInitError` if a global subscriber is already set
pub fn init_subscriber(config: &LogConfig, verbose: bool) -> Result<(), TryInitError> {
    let filter = build_env_filter(&config.filter, verbose);
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_ansi(false))
            .try_init()
    }
}

/// Build the filter from environment, config and flags
#[must_use]
pub fn build_env_filter(configured: &str, verbose: bool) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    fallback_filter(configured, verbose)
}

fn fallback_filter(configured: &str, verbose: bool) -> EnvFilter {
    let directives = if verbose { VERBOSE_DIRECTIVES } else { configured };
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
}
