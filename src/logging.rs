//! Logging setup for the `depscout` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the process entry point.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over the configured level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Installs the global subscriber. Logs go to stderr so stdout stays JSON.
pub fn init_logging(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(config));
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    let result = match config.format {
        LogFormat::Full => registry.with(layer).try_init(),
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    };
    if let Err(e) = result {
        eprintln!("[depscout] WARNING: logging already initialised: {}", e);
    }
}
