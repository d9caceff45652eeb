//! Tracing subscriber setup
//!
//! Console output (plain or JSON) plus an optional daily rolling file.

use crate::error::{CatalogError, Result};
use crate::infrastructure::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "file-catalog.log";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. The returned guard must
/// be held for as long as file logging should keep flushing.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.level)?,
    };

    let console_layer = if config.json {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                CatalogError::io_error(
                    format!("Failed to create log directory: {}", e),
                    Some(dir.clone()),
                )
            })?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(filter)
        .try_init()
        .map_err(|e| CatalogError::config_error(format!("Failed to install logger: {}", e)))?;

    Ok(guard)
}

/// Parse an `EnvFilter` directive such as `info` or `file_catalog=debug,sqlx=warn`
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| CatalogError::config_error(format!("Invalid log level '{}': {}", level, e)))
}
