//! Structured logging via `tracing`.
//!
//! Diagnostics always go to stderr so rendered prompts on stdout stay clean for piping.

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{RegistryError, Result};
use std::io::IsTerminal;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const LOG_ENV_VAR: &str = "SLASH_REGISTRY_LOG";

/// Initialize the global subscriber.
///
/// Filter precedence: `SLASH_REGISTRY_LOG`, then `-v` (debug) / `-vv` (trace), then the
/// configured level. Calling this twice is a no-op.
pub fn init_logging(config: &LoggingConfig, verbose: u8) -> Result<()> {
    let filter = build_env_filter(config, verbose)?;
    let base = Registry::default().with(filter);

    let result = match config.format {
        LogFormat::Json => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => base
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
    Ok(())
}

fn build_env_filter(config: &LoggingConfig, verbose: u8) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
        return Ok(filter);
    }

    let directive = match verbose {
        0 => config.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    EnvFilter::try_new(directive).map_err(|e| {
        RegistryError::InvalidConfig(format!("invalid log level '{}': {}", directive, e))
    })
}
