//! Catalog schema
//!
//! - `catalog_entries`: headers, indexed by position for ordered listing
//! - `catalog_contents`: payloads, one row per entry, removed by cascade

use crate::error::{CatalogError, Result};
use sqlx::SqlitePool;
use tracing::info;

pub(crate) async fn init_schema(pool: &SqlitePool) -> Result<()> {
    // AUTOINCREMENT keeps SQLite from handing out the id of a removed entry again
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS catalog_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            content_type TEXT NOT NULL,
            size INTEGER NOT NULL,
            position INTEGER NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| CatalogError::database("Failed to create catalog_entries table", e))?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_catalog_entries_position ON catalog_entries(position)",
    )
    .execute(pool)
    .await
    .map_err(|e| CatalogError::database("Failed to create position index", e))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS catalog_contents (
            entry_id INTEGER PRIMARY KEY NOT NULL,
            payload BLOB NOT NULL,
            FOREIGN KEY (entry_id) REFERENCES catalog_entries(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| CatalogError::database("Failed to create catalog_contents table", e))?;

    info!("Catalog schema initialized successfully");
    Ok(())
}
