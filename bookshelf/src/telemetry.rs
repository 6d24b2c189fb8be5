//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, LogFormat};

const FALLBACK_LEVEL: &str = "info";

/// Parses the configured level, falling back to `info` when it is not a valid directive.
fn configured_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

/// Builds the event filter: `RUST_LOG` if set, otherwise the configured level.
fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| configured_filter(&config.level))
}

/// Installs the global tracing subscriber. Call once, at startup.
pub fn init_tracing(config: &LogConfig) {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(config));

    match config.format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }

    tracing::debug!(level = %config.level, format = ?config.format, "tracing initialized");
}
