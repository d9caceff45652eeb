//! Catalog Repository
//!
//! Entry point for callers: composes the content store, the reorder engine
//! and the plain header reads over one shared [`Database`].

use crate::error::Result;
use crate::infrastructure::config::{DatabaseConfig, SeedConfig};
use crate::models::{CatalogEntry, CatalogFile, IncomingFile, NewCatalogEntry};
use crate::storage::content_store::ContentStore;
use crate::storage::db::Database;
use crate::storage::entries;
use crate::storage::integrity::{self, IntegrityReport};
use crate::storage::reorder::ReorderEngine;
use crate::storage::seed;
use tracing::info;

/// Ordered file catalog backed by SQLite
///
/// Cheap to clone; clones share the pool and the write gate.
#[derive(Clone)]
pub struct CatalogStore {
    db: Database,
    content: ContentStore,
    reorder: ReorderEngine,
}

impl CatalogStore {
    /// Open the catalog described by `config`
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the database directory cannot be created
    /// - the connection or schema initialization fails
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        let db = Database::open(config).await?;
        info!(path = %config.path.display(), "Catalog store ready");
        Ok(Self::with_database(db))
    }

    pub fn with_database(db: Database) -> Self {
        Self {
            content: ContentStore::new(db.clone()),
            reorder: ReorderEngine::new(db.clone()),
            db,
        }
    }

    /// Store an uploaded file at the end of the catalog
    pub async fn insert<F>(&self, file: &mut F) -> Result<CatalogEntry>
    where
        F: IncomingFile + ?Sized,
    {
        let payload = file.read_all().await?;
        let draft = NewCatalogEntry::new(file.file_name(), file.content_type(), file.len() as i64);
        self.content.insert(draft, payload).await
    }

    /// Store a header and payload supplied directly
    pub async fn insert_entry(
        &self,
        draft: NewCatalogEntry,
        payload: Vec<u8>,
    ) -> Result<CatalogEntry> {
        self.content.insert(draft, payload).await
    }

    /// Remove an entry with its content. Remaining positions are not compacted.
    pub async fn remove(&self, id: i64) -> Result<bool> {
        self.content.remove(id).await
    }

    /// Move an entry, shifting the entries in between
    pub async fn reorder(&self, id: i64, new_position: i64) -> Result<Option<CatalogEntry>> {
        self.reorder.reorder(id, new_position).await
    }

    /// Entry plus payload, for downloads
    pub async fn get_content(&self, id: i64) -> Result<Option<CatalogFile>> {
        self.content.get_content(id).await
    }

    /// All entries by ascending position
    pub async fn list_all(&self) -> Result<Vec<CatalogEntry>> {
        entries::fetch_all(self.db.pool()).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<CatalogEntry>> {
        entries::fetch_by_id(self.db.pool(), id).await
    }

    pub async fn get_by_position(&self, position: i64) -> Result<Option<CatalogEntry>> {
        entries::fetch_by_position(self.db.pool(), position).await
    }

    pub async fn count(&self) -> Result<i64> {
        entries::count(self.db.pool()).await
    }

    /// Sum of all entry sizes in bytes
    pub async fn total_size(&self) -> Result<i64> {
        entries::total_size(self.db.pool()).await
    }

    /// Check header/content pairing and position uniqueness
    pub async fn verify_integrity(&self) -> Result<IntegrityReport> {
        integrity::verify_catalog_integrity(&self.db).await
    }

    /// Import files from `config.dir` if the catalog is still empty
    pub async fn seed_from_dir(&self, config: &SeedConfig) -> Result<usize> {
        seed::seed_from_dir(&self.db, config).await
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}
