//! Infrastructure layer - configuration and logging

pub mod config;
pub mod logging;

pub use config::{CatalogConfig, ConfigError, DatabaseConfig, LoggingConfig, SeedConfig};
pub use logging::init_logging;
