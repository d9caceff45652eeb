//! Catalog entry and content records
//!
//! An entry (header) and its content share one identity and one lifetime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog entry header stored in SQLite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Assigned by the store on insert, never reused
    pub id: i64,
    /// Display name (original file name)
    pub name: String,
    /// Content-type label, e.g. `application/pdf`
    pub content_type: String,
    /// Payload size in bytes
    pub size: i64,
    /// Ordering key; sparse, ascending order defines listing order
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

/// Binary payload owned by exactly one entry
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogContent {
    pub entry_id: i64,
    pub payload: Vec<u8>,
}

impl std::fmt::Debug for CatalogContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogContent")
            .field("entry_id", &self.entry_id)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

/// Header and payload read together from one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    pub entry: CatalogEntry,
    pub content: CatalogContent,
}

/// Header fields supplied by the caller; identity, position and
/// creation time are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCatalogEntry {
    pub name: String,
    pub content_type: String,
    pub size: i64,
}

impl NewCatalogEntry {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, size: i64) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size,
        }
    }
}
