//! Logging Infrastructure
//!
//! Console logging by default; with a log directory, output goes to a daily
//! rolling file instead. `RUST_LOG` overrides the configured level.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional file output
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&Path>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if let Some(dir) = log_dir
        && dir.exists()
    {
        let file_appender = tracing_appender::rolling::daily(dir, "roster-server");
        let builder = builder.with_writer(file_appender).with_ansi(false);
        // try_init: a second call (tests) keeps the first subscriber
        let _ = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        return;
    }

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
