//! Tracing subscriber setup
//!
//! Logs go to stderr so that stdout stays clean for JSON reports.

use std::io;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Filter directive for our own crate at `level`; dependencies stay at warn
#[must_use]
pub fn filter_directive(level: &str) -> String {
    format!("warn,soaralarm={level}")
}

/// Build the filter: `--verbose` forces debug, then `RUST_LOG`, then the config
fn env_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new(filter_directive("debug"));
    }
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(&config.level)))
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(config, verbose));

    if config.format == "json" {
        let json_layer = fmt::layer()
            .with_target(true)
            .with_writer(io::stderr)
            .json();
        registry
            .with(json_layer)
            .try_init()
            .with_context(|| "Failed to install JSON log subscriber")?;
    } else {
        let pretty_layer = fmt::layer()
            .with_target(false)
            .with_writer(io::stderr);
        registry
            .with(pretty_layer)
            .try_init()
            .with_context(|| "Failed to install log subscriber")?;
    }

    tracing::debug!(
        "Logging initialised at level {} ({})",
        if verbose { "debug" } else { config.level.as_str() },
        config.format
    );
    Ok(())
}
