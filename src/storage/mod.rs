//! Catalog Storage Module
//!
//! SQLite-backed persistence for an ordered catalog of files. It provides:
//!
//! - Header and payload written, read and removed as one unit
//! - Append-at-end position allocation
//! - Reordering that shifts the entries in between
//! - Integrity verification and first-run seeding
//!
//! ## Layout
//!
//! ```text
//! catalog.db
//! ├── catalog_entries    # id, name, content_type, size, position, created_at
//! └── catalog_contents   # entry_id -> payload (cascades with its entry)
//! ```
//!
//! All mutating operations take the write gate before opening their
//! transaction, so position allocation and shifting never interleave.

pub mod catalog;
pub mod content_store;
pub mod db;
pub mod entries;
pub mod integrity;
pub mod position;
pub mod reorder;
pub(crate) mod schema;
pub mod seed;

#[cfg(test)]
mod integration_tests;

pub use catalog::CatalogStore;
pub use content_store::ContentStore;
pub use db::{Database, WriteTransaction};
pub use integrity::{verify_catalog_integrity, IntegrityReport};
pub use position::{PositionAllocator, FIRST_POSITION};
pub use reorder::{ReorderEngine, ShiftPlan};
pub use seed::seed_from_dir;
