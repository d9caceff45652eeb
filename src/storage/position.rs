//! Position allocation for new entries

use crate::error::{CatalogError, Result};
use sqlx::{Sqlite, Transaction};

/// Position of the first entry in an empty catalog
pub const FIRST_POSITION: i64 = 1;

/// Computes the slot for the next insert: one past the current maximum.
///
/// Gaps left by removals are never refilled. The read must happen inside the
/// same write transaction as the insert that consumes it.
pub struct PositionAllocator;

impl PositionAllocator {
    pub async fn next_position(tx: &mut Transaction<'_, Sqlite>) -> Result<i64> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(position) FROM catalog_entries")
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| CatalogError::database("Failed to read maximum position", e))?;

        match max {
            None => Ok(FIRST_POSITION),
            Some(max) => max.checked_add(1).ok_or_else(|| {
                CatalogError::validation_error(format!(
                    "position space exhausted: an entry already sits at {}",
                    max
                ))
            }),
        }
    }
}
