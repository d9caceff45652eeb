use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/**
 * Catalog error type - miette diagnostics for user-facing failures
 *
 * Not-found is never an error here: lookups return `Option`, removals `bool`.
 */
#[derive(Error, Debug, Diagnostic)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    #[diagnostic(code(catalog::io_error))]
    Io(#[from] std::io::Error),

    #[error("Database error: {message}")]
    #[diagnostic(
        code(catalog::database_error),
        help("Check database connection and schema integrity; the transaction was rolled back")
    )]
    Database {
        message: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Integrity error: {0}")]
    #[diagnostic(
        code(catalog::integrity_error),
        help("A catalog entry and its content are out of sync; the store needs repair")
    )]
    Integrity(String),

    #[error("Validation error: {0}")]
    #[diagnostic(
        code(catalog::validation_error),
        help("Check that the uploaded file meets the required format and constraints")
    )]
    Validation(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(catalog::config_error))]
    Config(String),

    #[error("IO error: {message}")]
    #[diagnostic(code(catalog::io_error_detailed))]
    IoDetailed {
        message: String,
        path: Option<PathBuf>,
    },
}

impl CatalogError {
    /**
     * Wrap a sqlx error with the operation that failed
     */
    pub fn database(context: impl Into<String>, source: sqlx::Error) -> Self {
        let context = context.into();
        CatalogError::Database {
            message: format!("{}: {}", context, source),
            source,
        }
    }

    pub fn integrity_error(message: impl Into<String>) -> Self {
        CatalogError::Integrity(message.into())
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        CatalogError::Validation(message.into())
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        CatalogError::Config(message.into())
    }

    pub fn io_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        CatalogError::IoDetailed {
            message: message.into(),
            path,
        }
    }

    /// True for faults raised by the storage layer (connection, lock, constraint)
    pub fn is_storage_fault(&self) -> bool {
        matches!(self, CatalogError::Database { .. })
    }
}

/**
 * Unified result type for the catalog
 */
pub type Result<T> = std::result::Result<T, CatalogError>;
