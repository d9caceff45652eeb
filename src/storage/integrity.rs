//! Integrity Verification for the catalog
//!
//! Checks, from one read snapshot, that:
//! - every entry has its content row and vice versa
//! - no two entries share a position
//! - each entry's recorded size matches its payload

use crate::error::{CatalogError, Result};
use crate::storage::db::Database;
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, Transaction};
use tracing::{info, warn};

/// Result of an integrity scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// Total entries checked
    pub total_entries: usize,
    /// Entries with no content row
    pub entries_without_content: Vec<i64>,
    /// Content rows whose entry is gone
    pub orphan_contents: Vec<i64>,
    /// Positions held by more than one entry
    pub duplicate_positions: Vec<i64>,
    /// Entries whose size differs from the stored payload length
    pub size_mismatches: Vec<i64>,
    /// Timestamp of validation
    pub timestamp: i64,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self {
            total_entries: 0,
            entries_without_content: Vec::new(),
            orphan_contents: Vec::new(),
            duplicate_positions: Vec::new(),
            size_mismatches: Vec::new(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    pub fn error_count(&self) -> usize {
        self.entries_without_content.len()
            + self.orphan_contents.len()
            + self.duplicate_positions.len()
            + self.size_mismatches.len()
    }
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self::new()
    }
}

async fn ids(tx: &mut Transaction<'_, Sqlite>, sql: &'static str, what: &str) -> Result<Vec<i64>> {
    sqlx::query_scalar(sql)
        .fetch_all(&mut **tx)
        .await
        .map_err(|e| CatalogError::database(format!("Failed to check {}", what), e))
}

/// Scan the whole catalog
pub async fn verify_catalog_integrity(db: &Database) -> Result<IntegrityReport> {
    let mut tx = db.begin_read().await?;
    let mut report = IntegrityReport::new();

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_entries")
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| CatalogError::database("Failed to count entries", e))?;
    report.total_entries = total as usize;

    report.entries_without_content = ids(
        &mut tx,
        "SELECT e.id FROM catalog_entries e \
         LEFT JOIN catalog_contents c ON c.entry_id = e.id \
         WHERE c.entry_id IS NULL ORDER BY e.id",
        "entries without content",
    )
    .await?;

    report.orphan_contents = ids(
        &mut tx,
        "SELECT c.entry_id FROM catalog_contents c \
         LEFT JOIN catalog_entries e ON e.id = c.entry_id \
         WHERE e.id IS NULL ORDER BY c.entry_id",
        "orphan contents",
    )
    .await?;

    report.duplicate_positions = ids(
        &mut tx,
        "SELECT position FROM catalog_entries \
         GROUP BY position HAVING COUNT(*) > 1 ORDER BY position",
        "duplicate positions",
    )
    .await?;

    report.size_mismatches = ids(
        &mut tx,
        "SELECT e.id FROM catalog_entries e \
         JOIN catalog_contents c ON c.entry_id = e.id \
         WHERE e.size <> length(c.payload) ORDER BY e.id",
        "size mismatches",
    )
    .await?;

    tx.commit()
        .await
        .map_err(|e| CatalogError::database("Failed to finish read transaction", e))?;

    for id in &report.entries_without_content {
        warn!(id = id, "Entry has no content");
    }
    for id in &report.orphan_contents {
        warn!(id = id, "Content has no entry");
    }
    for position in &report.duplicate_positions {
        warn!(position = position, "Position is held by more than one entry");
    }
    for id in &report.size_mismatches {
        warn!(id = id, "Entry size does not match its payload");
    }

    info!(
        total = report.total_entries,
        errors = report.error_count(),
        "Catalog integrity verification complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::DatabaseConfig;
    use crate::models::NewCatalogEntry;
    use crate::storage::CatalogStore;
    use tempfile::TempDir;

    async fn create_test_store() -> (CatalogStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = CatalogStore::open(&DatabaseConfig::in_dir(temp_dir.path()))
            .await
            .unwrap();
        (store, temp_dir)
    }

    async fn insert(store: &CatalogStore, name: &str, payload: &[u8]) -> i64 {
        store
            .insert_entry(
                NewCatalogEntry::new(name, "text/plain", payload.len() as i64),
                payload.to_vec(),
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_clean_catalog_is_valid() {
        let (store, _temp_dir) = create_test_store().await;
        insert(&store, "a.txt", b"aaa").await;
        insert(&store, "b.txt", b"bb").await;

        let report = store.verify_integrity().await.unwrap();
        assert_eq!(report.total_entries, 2);
        assert!(report.is_valid());
        assert_eq!(report.error_count(), 0);
    }

    #[tokio::test]
    async fn test_detects_missing_content_and_size_mismatch() {
        let (store, _temp_dir) = create_test_store().await;
        let a = insert(&store, "a.txt", b"aaa").await;
        let b = insert(&store, "b.txt", b"bb").await;
        let pool = store.database().pool();

        sqlx::query("DELETE FROM catalog_contents WHERE entry_id = ?")
            .bind(a)
            .execute(pool)
            .await
            .unwrap();
        sqlx::query("UPDATE catalog_entries SET size = 99 WHERE id = ?")
            .bind(b)
            .execute(pool)
            .await
            .unwrap();

        let report = store.verify_integrity().await.unwrap();
        assert!(!report.is_valid());
        assert_eq!(report.entries_without_content, vec![a]);
        assert_eq!(report.size_mismatches, vec![b]);
        assert!(report.orphan_contents.is_empty());
    }

    #[tokio::test]
    async fn test_detects_duplicate_positions() {
        let (store, _temp_dir) = create_test_store().await;
        insert(&store, "a.txt", b"a").await;
        let b = insert(&store, "b.txt", b"b").await;

        sqlx::query("UPDATE catalog_entries SET position = 1 WHERE id = ?")
            .bind(b)
            .execute(store.database().pool())
            .await
            .unwrap();

        let report = store.verify_integrity().await.unwrap();
        assert_eq!(report.duplicate_positions, vec![1]);
        assert_eq!(report.error_count(), 1);
    }
}
