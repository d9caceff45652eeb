//! Header queries for `catalog_entries`
//!
//! Read helpers accept any SQLite executor, so they run against the pool
//! or inside an open transaction. Write helpers always take a transaction.

use crate::error::{CatalogError, Result};
use crate::models::{CatalogEntry, NewCatalogEntry};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, Transaction};

pub(crate) fn entry_from_row(row: &SqliteRow) -> Result<CatalogEntry> {
    let decode = |e| CatalogError::database("Failed to decode catalog entry", e);

    Ok(CatalogEntry {
        id: row.try_get("id").map_err(decode)?,
        name: row.try_get("name").map_err(decode)?,
        content_type: row.try_get("content_type").map_err(decode)?,
        size: row.try_get("size").map_err(decode)?,
        position: row.try_get("position").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
    })
}

/// Get entry by identity
pub async fn fetch_by_id<'e, E>(executor: E, id: i64) -> Result<Option<CatalogEntry>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        "SELECT id, name, content_type, size, position, created_at \
         FROM catalog_entries WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(|e| CatalogError::database("Failed to query entry", e))?;

    row.as_ref().map(entry_from_row).transpose()
}

/// First entry at `position`, lowest identity first
pub async fn fetch_by_position<'e, E>(executor: E, position: i64) -> Result<Option<CatalogEntry>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        "SELECT id, name, content_type, size, position, created_at \
         FROM catalog_entries WHERE position = ? ORDER BY id LIMIT 1",
    )
    .bind(position)
    .fetch_optional(executor)
    .await
    .map_err(|e| CatalogError::database("Failed to query entry by position", e))?;

    row.as_ref().map(entry_from_row).transpose()
}

/// All entries in display order
pub async fn fetch_all<'e, E>(executor: E) -> Result<Vec<CatalogEntry>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "SELECT id, name, content_type, size, position, created_at \
         FROM catalog_entries ORDER BY position, id",
    )
    .fetch_all(executor)
    .await
    .map_err(|e| CatalogError::database("Failed to query all entries", e))?;

    rows.iter().map(entry_from_row).collect()
}

/// Count total entries
pub async fn count<'e, E>(executor: E) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM catalog_entries")
        .fetch_one(executor)
        .await
        .map_err(|e| CatalogError::database("Failed to count entries", e))
}

/// Sum of all entry sizes
pub async fn total_size<'e, E>(executor: E) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT COALESCE(SUM(size), 0) FROM catalog_entries")
        .fetch_one(executor)
        .await
        .map_err(|e| CatalogError::database("Failed to sum entry sizes", e))
}

pub(crate) async fn insert_tx(
    tx: &mut Transaction<'_, Sqlite>,
    draft: &NewCatalogEntry,
    position: i64,
    created_at: DateTime<Utc>,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO catalog_entries (name, content_type, size, position, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&draft.name)
    .bind(&draft.content_type)
    .bind(draft.size)
    .bind(position)
    .bind(created_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| CatalogError::database("Failed to insert entry header", e))?;

    Ok(result.last_insert_rowid())
}

pub(crate) async fn update_position_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    position: i64,
) -> Result<bool> {
    let result = sqlx::query("UPDATE catalog_entries SET position = ? WHERE id = ?")
        .bind(position)
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(|e| CatalogError::database("Failed to update entry position", e))?;

    Ok(result.rows_affected() == 1)
}

/// Delete a header; `catalog_contents` follows through `ON DELETE CASCADE`
pub(crate) async fn delete_tx(tx: &mut Transaction<'_, Sqlite>, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM catalog_entries WHERE id = ?")
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(|e| CatalogError::database("Failed to delete entry", e))?;

    Ok(result.rows_affected() > 0)
}
