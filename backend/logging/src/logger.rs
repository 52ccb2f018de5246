//! Structured Logger
//!
//! Wraps `tracing` to provide a console layer, a rolling NDJSON file layer
//! and environment-based level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix of the daily rolling log.
pub const LOG_FILE_PREFIX: &str = "schemaforge.log";

/// Build the level filter: `RUST_LOG` wins over the configured level, and an
/// unparseable level falls back to `info`.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global structured logger.
/// Creates a console logger and a rolling file logger.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) -> bool {
    let env_filter = build_filter(level);

    // Rolling file appender: writes NDJSON to `logs/schemaforge.log.YYYY-MM-DD`
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_level_falls_back() {
        // Must not panic on a malformed directive.
        let filter = build_filter("info,[[");
        assert!(!filter.to_string().is_empty());
    }

    #[test]
    fn second_init_is_harmless() {
        let dir = std::env::temp_dir().join("schemaforge-logger-test");
        let _ = init_logger(&dir, "debug");
        assert!(!init_logger(&dir, "debug"));
    }
}
