//! Ordered file catalog
//!
//! Stores uploaded files (name, content type, size and bytes) in SQLite and
//! keeps them in a user-controlled order through an integer position.
//!
//! ```no_run
//! use file_catalog::{CatalogStore, DatabaseConfig, MemoryFile};
//!
//! # async fn run() -> file_catalog::Result<()> {
//! let store = CatalogStore::open(&DatabaseConfig::default()).await?;
//! let mut upload = MemoryFile::new("report.pdf", "application/pdf", b"%PDF-1.7".to_vec());
//! let entry = store.insert(&mut upload).await?;
//! store.reorder(entry.id, 1).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod infrastructure;
pub mod models;
pub mod storage;

pub use error::{CatalogError, Result};
pub use infrastructure::{
    init_logging, CatalogConfig, ConfigError, DatabaseConfig, LoggingConfig, SeedConfig,
};
pub use models::{
    CatalogContent, CatalogEntry, CatalogFile, DiskFile, IncomingFile, MemoryFile,
    NewCatalogEntry,
};
pub use storage::{CatalogStore, IntegrityReport};
