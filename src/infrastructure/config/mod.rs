//! Catalog configuration
//!
//! Layered loading: built-in defaults, then an optional TOML/JSON file,
//! then `FILE_CATALOG__*` environment variables
//! (e.g. `FILE_CATALOG__DATABASE__MAX_CONNECTIONS=4`).

use crate::error::CatalogError;
use eyre::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "FILE_CATALOG";

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration validation failed: {0}")]
    Validation(String),

    #[error("configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("configuration format error: {0}")]
    FormatError(String),
}

impl From<ConfigError> for CatalogError {
    fn from(error: ConfigError) -> Self {
        CatalogError::config_error(error.to_string())
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CatalogConfig {
    #[validate(nested)]
    pub database: DatabaseConfig,

    #[validate(nested)]
    pub seed: SeedConfig,

    #[validate(nested)]
    pub logging: LoggingConfig,
}

/// SQLite connection settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file; parent directories are created on open
    #[validate(custom(function = "validate_db_path"))]
    pub path: PathBuf,

    #[validate(range(min = 1, max = 64))]
    pub max_connections: u32,

    #[validate(range(min = 1, max = 3600))]
    pub acquire_timeout_secs: u64,

    /// How long a writer waits on another process's lock before failing
    #[validate(range(max = 600))]
    pub busy_timeout_secs: u64,
}

/// First-run import of files from a directory
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SeedConfig {
    pub dir: Option<PathBuf>,

    /// Extensions to import, compared case-insensitively without the dot
    #[validate(length(min = 1))]
    pub extensions: Vec<String>,

    /// Overrides the content type guessed from the extension
    pub content_type: Option<String>,
}

/// Tracing subscriber settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set
    #[validate(length(min = 1, max = 200))]
    pub level: String,

    pub json: bool,

    /// Daily rolling log files are written here when set
    pub log_dir: Option<PathBuf>,
}

fn validate_db_path(path: &PathBuf) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::new("empty_database_path"));
    }
    Ok(())
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/catalog.db"),
            max_connections: 8,
            acquire_timeout_secs: 30,
            busy_timeout_secs: 5,
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            dir: None,
            extensions: vec!["pdf".to_string()],
            content_type: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            log_dir: None,
        }
    }
}

impl DatabaseConfig {
    /// Database rooted in `dir`, otherwise default settings
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join("catalog.db"),
            ..Self::default()
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout_secs)
    }
}

impl SeedConfig {
    /// Whether `path` carries one of the configured extensions
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

impl CatalogConfig {
    /// Load defaults, then `path` (if given), then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| ConfigError::FormatError(e.to_string()))?;
        let config: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::FormatError(e.to_string()))?;

        config.validate_config()?;

        match path {
            Some(path) => tracing::info!("Loaded catalog configuration from: {}", path.display()),
            None => tracing::info!("Loaded catalog configuration from defaults and environment"),
        }
        Ok(config)
    }

    /// Parse a TOML file without environment overrides
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.to_path_buf()))?;

        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::FormatError(e.to_string()))?;
        config.validate_config()?;
        Ok(config)
    }

    /// Save configuration as TOML
    pub fn save_to_toml<P: AsRef<Path>>(&self, path: P) -> eyre::Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved catalog configuration to: {}", path.display());
        Ok(())
    }

    /// Run the declarative validators
    pub fn validate_config(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        tracing::debug!("Catalog configuration validated successfully");
        Ok(())
    }

    /// Small pool, verbose logging
    pub fn development() -> Self {
        Self {
            database: DatabaseConfig {
                max_connections: 2,
                ..DatabaseConfig::default()
            },
            seed: SeedConfig::default(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                ..LoggingConfig::default()
            },
        }
    }

    /// Larger pool, JSON logs to files
    pub fn production() -> Self {
        Self {
            database: DatabaseConfig {
                max_connections: 16,
                busy_timeout_secs: 15,
                ..DatabaseConfig::default()
            },
            seed: SeedConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                json: true,
                log_dir: Some(PathBuf::from("./logs")),
            },
        }
    }
}
