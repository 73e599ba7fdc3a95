//! Structured logger setup.
//!
//! Console output for humans plus a rolling NDJSON file for machines.
//! `PARLEY_LOG` overrides the default filter directive.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter override variable, same syntax as `RUST_LOG`.
pub const FILTER_ENV: &str = "PARLEY_LOG";

/// Initialize the global subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, default_level: &str) {
    let env_filter =
        EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    // Rolling file appender: writes NDJSON to `logs/parley.log.YYYY-MM-DD`
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "parley.log");

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false);

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_a_no_op() {
        let dir = std::env::temp_dir().join("parley-logger-test");
        init_logger(&dir, "info");
        init_logger(&dir, "debug");
        tracing::info!("logger smoke check");
    }
}
