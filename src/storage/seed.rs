//! First-run seeding from a directory of files
//!
//! Only an empty catalog is seeded. Files are imported newest first, so the
//! most recently modified file lands at position 1.

use crate::error::{CatalogError, Result};
use crate::infrastructure::config::SeedConfig;
use crate::models::{DiskFile, IncomingFile, NewCatalogEntry};
use crate::storage::content_store::ContentStore;
use crate::storage::db::Database;
use crate::storage::entries;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Import matching files from `config.dir`; returns how many were stored
pub async fn seed_from_dir(db: &Database, config: &SeedConfig) -> Result<usize> {
    let Some(dir) = config.dir.as_deref() else {
        return Ok(0);
    };

    if !dir.is_dir() {
        warn!(dir = %dir.display(), "Seed directory does not exist, skipping");
        return Ok(0);
    }

    if entries::count(db.pool()).await? > 0 {
        debug!("Catalog already populated, skipping seed");
        return Ok(0);
    }

    let mut files = Vec::new();
    for path in list_candidates(dir, config).await? {
        let mut file = DiskFile::open(&path).await?;
        if let Some(content_type) = &config.content_type {
            file = file.with_content_type(content_type.clone());
        }
        let payload = file.read_all().await?;
        let draft = NewCatalogEntry::new(file.file_name(), file.content_type(), payload.len() as i64);
        files.push((draft, payload));
    }

    let mut tx = db.begin_write().await?;

    // another writer may have filled the catalog while files were being read
    if entries::count(&mut **tx).await? > 0 {
        debug!("Catalog populated concurrently, skipping seed");
        return Ok(0);
    }

    let count = files.len();
    for (draft, payload) in files {
        ContentStore::insert_tx(&mut tx, draft, &payload).await?;
    }
    tx.commit().await?;

    info!(dir = %dir.display(), count = count, "Seeded catalog");
    Ok(count)
}

/// Matching regular files, newest modification first
async fn list_candidates(dir: &Path, config: &SeedConfig) -> Result<Vec<PathBuf>> {
    let read_error = |e: std::io::Error| {
        CatalogError::io_error(
            format!("Failed to read seed directory: {}", e),
            Some(dir.to_path_buf()),
        )
    };

    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(read_error)?;
    let mut candidates: Vec<(Option<SystemTime>, PathBuf)> = Vec::new();

    while let Some(item) = read_dir.next_entry().await.map_err(read_error)? {
        let path = item.path();
        if !config.matches(&path) {
            continue;
        }
        let metadata = item.metadata().await.map_err(read_error)?;
        if !metadata.is_file() {
            continue;
        }
        candidates.push((metadata.modified().ok(), path));
    }

    candidates.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    Ok(candidates.into_iter().map(|(_, path)| path).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::DatabaseConfig;
    use crate::storage::CatalogStore;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn create_test_store(temp_dir: &TempDir) -> CatalogStore {
        CatalogStore::open(&DatabaseConfig::in_dir(&temp_dir.path().join("db")))
            .await
            .unwrap()
    }

    fn write_with_mtime(path: &Path, content: &[u8], age_secs: u64) {
        std::fs::write(path, content).unwrap();
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
    }

    #[tokio::test]
    async fn test_seed_imports_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let seed_dir = temp_dir.path().join("seed");
        std::fs::create_dir(&seed_dir).unwrap();
        write_with_mtime(&seed_dir.join("old.pdf"), b"old", 300);
        write_with_mtime(&seed_dir.join("new.pdf"), b"newest", 10);
        write_with_mtime(&seed_dir.join("mid.PDF"), b"mid", 100);
        write_with_mtime(&seed_dir.join("skip.txt"), b"not a pdf", 5);

        let store = create_test_store(&temp_dir).await;
        let config = SeedConfig {
            dir: Some(seed_dir),
            ..SeedConfig::default()
        };

        let seeded = store.seed_from_dir(&config).await.unwrap();
        assert_eq!(seeded, 3);

        let listing: Vec<(String, i64)> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| (e.name, e.position))
            .collect();
        assert_eq!(
            listing,
            vec![
                ("new.pdf".to_string(), 1),
                ("mid.PDF".to_string(), 2),
                ("old.pdf".to_string(), 3)
            ]
        );

        let first = store.get_by_position(1).await.unwrap().unwrap();
        assert_eq!(first.content_type, "application/pdf");
        let file = store.get_content(first.id).await.unwrap().unwrap();
        assert_eq!(file.content.payload, b"newest");
    }

    #[tokio::test]
    async fn test_seed_skips_populated_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let seed_dir = temp_dir.path().join("seed");
        std::fs::create_dir(&seed_dir).unwrap();
        std::fs::write(seed_dir.join("a.pdf"), b"a").unwrap();

        let store = create_test_store(&temp_dir).await;
        let config = SeedConfig {
            dir: Some(seed_dir),
            ..SeedConfig::default()
        };

        assert_eq!(store.seed_from_dir(&config).await.unwrap(), 1);
        assert_eq!(store.seed_from_dir(&config).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_seed_without_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir).await;

        assert_eq!(store.seed_from_dir(&SeedConfig::default()).await.unwrap(), 0);

        let missing = SeedConfig {
            dir: Some(temp_dir.path().join("nope")),
            ..SeedConfig::default()
        };
        assert_eq!(store.seed_from_dir(&missing).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_seed_content_type_override() {
        let temp_dir = TempDir::new().unwrap();
        let seed_dir = temp_dir.path().join("seed");
        std::fs::create_dir(&seed_dir).unwrap();
        std::fs::write(seed_dir.join("data.bin"), b"\x00\x01").unwrap();

        let store = create_test_store(&temp_dir).await;
        let config = SeedConfig {
            dir: Some(seed_dir),
            extensions: vec!["bin".to_string()],
            content_type: Some("application/x-custom".to_string()),
        };

        assert_eq!(store.seed_from_dir(&config).await.unwrap(), 1);
        let entry = store.get_by_position(1).await.unwrap().unwrap();
        assert_eq!(entry.content_type, "application/x-custom");
        assert_eq!(entry.size, 2);
    }
}
