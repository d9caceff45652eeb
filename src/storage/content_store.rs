//! Content Store
//!
//! Writes a header row and its payload row as one unit, reads them back
//! from one snapshot, and removes them together.

use crate::error::{CatalogError, Result};
use crate::models::{CatalogContent, CatalogEntry, CatalogFile, NewCatalogEntry};
use crate::storage::db::Database;
use crate::storage::entries;
use crate::storage::position::PositionAllocator;
use chrono::{SubsecRound, Utc};
use sqlx::{Row, Sqlite, Transaction};
use tracing::{debug, error};

/// Header + payload persistence
#[derive(Clone)]
pub struct ContentStore {
    db: Database,
}

impl ContentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new entry at the end of the catalog
    ///
    /// # Returns
    ///
    /// The stored entry with identity, position and creation time filled in
    ///
    /// # Errors
    ///
    /// - `Validation` if the name is empty or `draft.size` disagrees with the payload
    /// - `Database` if any write fails; nothing is committed in that case
    pub async fn insert(&self, draft: NewCatalogEntry, payload: Vec<u8>) -> Result<CatalogEntry> {
        validate_draft(&draft, &payload)?;

        let mut tx = self.db.begin_write().await?;
        let inserted = match Self::insert_tx(&mut tx, draft, &payload).await {
            Ok(entry) => tx.commit().await.map(|()| entry),
            Err(e) => Err(e),
        };
        let entry = match inserted {
            Ok(entry) => entry,
            Err(e) => {
                error!(error = %e, "Error saving file content");
                return Err(e);
            }
        };

        debug!(
            id = entry.id,
            position = entry.position,
            name = %entry.name,
            size = entry.size,
            "Inserted catalog entry"
        );
        Ok(entry)
    }

    /// Allocate a position and write header and payload inside `tx`
    pub(crate) async fn insert_tx(
        tx: &mut Transaction<'_, Sqlite>,
        draft: NewCatalogEntry,
        payload: &[u8],
    ) -> Result<CatalogEntry> {
        let position = PositionAllocator::next_position(tx).await?;
        let created_at = Utc::now().trunc_subsecs(3);

        let id = entries::insert_tx(tx, &draft, position, created_at).await?;

        sqlx::query("INSERT INTO catalog_contents (entry_id, payload) VALUES (?, ?)")
            .bind(id)
            .bind(payload)
            .execute(&mut **tx)
            .await
            .map_err(|e| CatalogError::database("Failed to insert entry content", e))?;

        Ok(CatalogEntry {
            id,
            name: draft.name,
            content_type: draft.content_type,
            size: draft.size,
            position,
            created_at,
        })
    }

    /// Fetch an entry together with its payload
    ///
    /// `Ok(None)` when no entry has this identity. A header whose content
    /// row is missing is an `Integrity` error.
    pub async fn get_content(&self, id: i64) -> Result<Option<CatalogFile>> {
        let mut tx = self.db.begin_read().await?;

        let Some(entry) = entries::fetch_by_id(&mut *tx, id).await? else {
            return Ok(None);
        };

        let row = sqlx::query("SELECT payload FROM catalog_contents WHERE entry_id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| CatalogError::database("Failed to query entry content", e))?;

        let Some(row) = row else {
            error!(id = id, name = %entry.name, "Catalog entry has no content");
            return Err(CatalogError::integrity_error(format!(
                "entry {} exists but its content is missing",
                id
            )));
        };

        let payload: Vec<u8> = row
            .try_get("payload")
            .map_err(|e| CatalogError::database("Failed to decode entry content", e))?;

        tx.commit()
            .await
            .map_err(|e| CatalogError::database("Failed to finish read transaction", e))?;

        Ok(Some(CatalogFile {
            entry,
            content: CatalogContent {
                entry_id: id,
                payload,
            },
        }))
    }

    /// Remove an entry and its payload; `false` if it did not exist
    pub async fn remove(&self, id: i64) -> Result<bool> {
        let mut tx = self.db.begin_write().await?;
        let removed = entries::delete_tx(&mut tx, id).await?;
        tx.commit().await?;

        if removed {
            debug!(id = id, "Removed catalog entry");
        }
        Ok(removed)
    }
}

fn validate_draft(draft: &NewCatalogEntry, payload: &[u8]) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(CatalogError::validation_error("file name must not be empty"));
    }
    if draft.size != payload.len() as i64 {
        return Err(CatalogError::validation_error(format!(
            "declared size {} does not match payload length {} for '{}'",
            draft.size,
            payload.len(),
            draft.name
        )));
    }
    Ok(())
}
