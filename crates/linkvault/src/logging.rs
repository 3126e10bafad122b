//! Subscriber setup for the binary.
//!
//! Logs always go to stderr so stdout carries only command output.
//! Records emitted through the `log` facade by the library crates are
//! bridged into the same subscriber.

use crate::cli::LogFormat;
use linkvault_core::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set and valid; otherwise `level` (from the
/// `log_level` setting) is used.
pub fn init(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| Error::config_error(format!("invalid log level '{}': {}", level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|e| Error::other(format!("failed to set subscriber: {}", e)))
}
