//! Reorder Engine
//!
//! Moving an entry from `old` to `new` shifts every other entry in between
//! by one slot toward the vacated position:
//!
//! ```text
//! old < new:  (old, new]  each position - 1
//! old > new:  [new, old)  each position + 1
//! ```
//!
//! The shift and the move commit in one transaction.

use crate::error::{CatalogError, Result};
use crate::models::CatalogEntry;
use crate::storage::db::Database;
use crate::storage::entries;
use sqlx::{Sqlite, Transaction};
use tracing::debug;

/// Inclusive position range to shift and the direction to shift it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftPlan {
    pub lo: i64,
    pub hi: i64,
    pub step: i64,
}

impl ShiftPlan {
    /// `None` when the entry stays where it is
    pub fn between(old: i64, new: i64) -> Option<Self> {
        match old.cmp(&new) {
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Less => Some(Self {
                lo: old + 1,
                hi: new,
                step: -1,
            }),
            std::cmp::Ordering::Greater => Some(Self {
                lo: new,
                hi: old - 1,
                step: 1,
            }),
        }
    }
}

/// Position mutation for existing entries
#[derive(Clone)]
pub struct ReorderEngine {
    db: Database,
}

impl ReorderEngine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Move entry `id` to `new_position`
    ///
    /// `new_position` is taken as given: it may be an empty slot or lie
    /// outside the occupied range.
    ///
    /// # Returns
    ///
    /// The updated entry, or `None` if no entry has this identity
    pub async fn reorder(&self, id: i64, new_position: i64) -> Result<Option<CatalogEntry>> {
        let mut tx = self.db.begin_write().await?;
        let entry = Self::reorder_tx(&mut tx, id, new_position).await?;
        tx.commit().await?;
        Ok(entry)
    }

    pub(crate) async fn reorder_tx(
        tx: &mut Transaction<'_, Sqlite>,
        id: i64,
        new_position: i64,
    ) -> Result<Option<CatalogEntry>> {
        let Some(mut entry) = entries::fetch_by_id(&mut **tx, id).await? else {
            return Ok(None);
        };

        let Some(plan) = ShiftPlan::between(entry.position, new_position) else {
            return Ok(Some(entry));
        };

        debug!(
            id = id,
            from = entry.position,
            to = new_position,
            "Moving catalog entry"
        );

        let shifted = Self::shift_tx(tx, id, plan).await?;

        if !entries::update_position_tx(tx, id, new_position).await? {
            return Err(CatalogError::integrity_error(format!(
                "entry {} vanished while being moved",
                id
            )));
        }

        debug!(id = id, shifted = shifted, "Shifted neighbouring entries");
        entry.position = new_position;
        Ok(Some(entry))
    }

    /// Apply `plan` to every entry except the one being moved
    async fn shift_tx(
        tx: &mut Transaction<'_, Sqlite>,
        moving_id: i64,
        plan: ShiftPlan,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE catalog_entries
            SET position = position + ?
            WHERE position BETWEEN ? AND ? AND id <> ?
            "#,
        )
        .bind(plan.step)
        .bind(plan.lo)
        .bind(plan.hi)
        .bind(moving_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| CatalogError::database("Failed to shift positions", e))?;

        Ok(result.rows_affected())
    }
}
