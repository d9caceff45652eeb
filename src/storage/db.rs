//! SQLite pool and transaction handles
//!
//! Every mutating catalog operation runs inside a [`WriteTransaction`]:
//! the process-wide write gate is taken first, then a transaction is
//! begun on a pooled connection. Dropping the handle without calling
//! [`WriteTransaction::commit`] rolls the transaction back and then
//! releases the gate, on every exit path including `?` and cancellation.

use crate::error::{CatalogError, Result};
use crate::infrastructure::config::DatabaseConfig;
use crate::storage::schema;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

/// Pool plus the gate that serializes writers
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    write_gate: Arc<Mutex<()>>,
}

/// A write transaction holding the write gate
pub struct WriteTransaction {
    // field order matters: the transaction is dropped (rolled back) before the gate opens
    tx: Transaction<'static, Sqlite>,
    _gate: OwnedMutexGuard<()>,
}

impl Database {
    /// Open (or create) the database file and initialize the schema
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    CatalogError::io_error(
                        format!("Failed to create database directory: {}", e),
                        Some(parent.to_path_buf()),
                    )
                })?;
            }
        }

        info!(path = %config.path.display(), "Opening catalog database");

        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            // WAL gives readers a stable snapshot while a writer is mid-transaction
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout());

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await
            .map_err(|e| CatalogError::database("Failed to connect to database", e))?;

        schema::init_schema(&pool).await?;

        Ok(Self {
            pool,
            write_gate: Arc::new(Mutex::new(())),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Begin a read transaction; it sees one consistent snapshot
    pub async fn begin_read(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| CatalogError::database("Failed to begin read transaction", e))
    }

    /// Wait for the write gate, then begin a transaction
    pub async fn begin_write(&self) -> Result<WriteTransaction> {
        let gate = Arc::clone(&self.write_gate).lock_owned().await;
        debug!("Write gate acquired");

        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CatalogError::database("Failed to begin transaction", e))?;

        Ok(WriteTransaction { tx, _gate: gate })
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl WriteTransaction {
    /// Commit and release the write gate
    pub async fn commit(self) -> Result<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| CatalogError::database("Failed to commit transaction", e))
    }
}

impl Deref for WriteTransaction {
    type Target = Transaction<'static, Sqlite>;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

impl DerefMut for WriteTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tx
    }
}
