use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_DIRECTIVE: &str = "armp=info";

/// Initializes the logging system: console output on stderr plus, when
/// enabled, daily-rotated JSON files.
pub fn init_logging(config: &LoggingConfig) -> std::io::Result<()> {
    let file_layer = if config.file_logging {
        fs::create_dir_all(&config.directory)?;
        let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
        // The guard flushes on drop; logging lives as long as the process.
        std::mem::forget(guard);
        Some(fmt::layer().json().with_writer(non_blocking_writer))
    } else {
        None
    };

    // stdout carries the report itself
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    // A subscriber installed earlier (tests, embedding apps) wins.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();
    Ok(())
}
