//! Integration tests for the catalog store
//!
//! These tests drive `CatalogStore` through the `IncomingFile` abstraction
//! and check that headers, payloads and positions stay consistent.

#[cfg(test)]
mod tests {
    use crate::models::{DiskFile, IncomingFile, MemoryFile};
    use crate::storage::CatalogStore;
    use crate::DatabaseConfig;
    use tempfile::TempDir;

    async fn create_test_catalog() -> (CatalogStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = CatalogStore::open(&DatabaseConfig::in_dir(temp_dir.path()))
            .await
            .unwrap();
        (store, temp_dir)
    }

    async fn positions(store: &CatalogStore) -> Vec<i64> {
        store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.position)
            .collect()
    }

    #[tokio::test]
    async fn test_insert_memory_file_and_download() {
        let (store, _temp_dir) = create_test_catalog().await;

        let mut upload = MemoryFile::new("report.pdf", "application/pdf", &b"%PDF-1.7 body"[..]);
        let entry = store.insert(&mut upload).await.unwrap();

        assert_eq!(entry.name, "report.pdf");
        assert_eq!(entry.content_type, "application/pdf");
        assert_eq!(entry.size, 13);
        assert_eq!(entry.position, 1);

        let file = store.get_content(entry.id).await.unwrap().unwrap();
        assert_eq!(file.entry, entry);
        assert_eq!(file.content.payload, b"%PDF-1.7 body");
    }

    #[tokio::test]
    async fn test_insert_disk_file() {
        let (store, temp_dir) = create_test_catalog().await;
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, b"hello catalog").unwrap();

        let mut upload = DiskFile::open(&path).await.unwrap();
        let entry = store.insert(&mut upload).await.unwrap();

        assert_eq!(entry.name, "notes.txt");
        assert_eq!(entry.content_type, "text/plain");
        assert_eq!(entry.size, 13);
    }

    #[tokio::test]
    async fn test_insert_through_trait_object() {
        let (store, _temp_dir) = create_test_catalog().await;

        let mut uploads: Vec<Box<dyn IncomingFile>> = vec![
            Box::new(MemoryFile::new("a.pdf", "application/pdf", &b"a"[..])),
            Box::new(MemoryFile::new("b.pdf", "application/pdf", &b"bb"[..])),
        ];
        for upload in uploads.iter_mut() {
            store.insert(upload.as_mut()).await.unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.total_size().await.unwrap(), 3);
        assert_eq!(positions(&store).await, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_removal_leaves_gap_and_insert_appends() {
        let (store, _temp_dir) = create_test_catalog().await;
        let mut ids = Vec::new();
        for name in ["a.pdf", "b.pdf", "c.pdf"] {
            let mut upload = MemoryFile::new(name, "application/pdf", &b"x"[..]);
            ids.push(store.insert(&mut upload).await.unwrap().id);
        }

        assert!(store.remove(ids[1]).await.unwrap());
        assert_eq!(positions(&store).await, vec![1, 3]);
        assert!(store.get_by_position(2).await.unwrap().is_none());

        let mut upload = MemoryFile::new("d.pdf", "application/pdf", &b"x"[..]);
        let entry = store.insert(&mut upload).await.unwrap();
        assert_eq!(entry.position, 4);
        assert_eq!(positions(&store).await, vec![1, 3, 4]);
    }

    #[tokio::test]
    async fn test_unknown_id_has_no_side_effects() {
        let (store, _temp_dir) = create_test_catalog().await;
        let mut upload = MemoryFile::new("a.pdf", "application/pdf", &b"x"[..]);
        let entry = store.insert(&mut upload).await.unwrap();

        let missing = entry.id + 100;
        assert!(store.get_by_id(missing).await.unwrap().is_none());
        assert!(store.get_content(missing).await.unwrap().is_none());
        assert!(store.reorder(missing, 1).await.unwrap().is_none());
        assert!(!store.remove(missing).await.unwrap());

        assert_eq!(store.list_all().await.unwrap(), vec![entry]);
        assert!(store.verify_integrity().await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_reorder_then_lookup_by_position() {
        let (store, _temp_dir) = create_test_catalog().await;
        let mut ids = Vec::new();
        for name in ["a.pdf", "b.pdf", "c.pdf"] {
            let mut upload = MemoryFile::new(name, "application/pdf", &b"x"[..]);
            ids.push(store.insert(&mut upload).await.unwrap().id);
        }

        let moved = store.reorder(ids[2], 1).await.unwrap().unwrap();
        assert_eq!(moved.position, 1);

        let first = store.get_by_position(1).await.unwrap().unwrap();
        assert_eq!(first.name, "c.pdf");
        let last = store.get_by_position(3).await.unwrap().unwrap();
        assert_eq!(last.name, "b.pdf");
    }

    #[tokio::test]
    async fn test_catalog_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let config = DatabaseConfig::in_dir(temp_dir.path());

        let store = CatalogStore::open(&config).await.unwrap();
        let mut upload = MemoryFile::new("a.pdf", "application/pdf", &b"persisted"[..]);
        let entry = store.insert(&mut upload).await.unwrap();
        store.close().await;

        let reopened = CatalogStore::open(&config).await.unwrap();
        let file = reopened.get_content(entry.id).await.unwrap().unwrap();
        assert_eq!(file.entry, entry);
        assert_eq!(file.content.payload, b"persisted");
    }
}
