//! Catalog data structures

pub mod entry;
pub mod incoming;

pub use entry::{CatalogContent, CatalogEntry, CatalogFile, NewCatalogEntry};
pub use incoming::{DiskFile, IncomingFile, MemoryFile};
