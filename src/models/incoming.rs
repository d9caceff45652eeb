//! Incoming file abstraction
//!
//! Whatever receives an upload (HTTP multipart, a directory scan, a test)
//! hands the catalog an [`IncomingFile`]. The catalog reads the whole
//! payload into memory before opening its transaction.

use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// An uploaded file that has not been stored yet
#[async_trait]
pub trait IncomingFile: Send {
    /// Display name
    fn file_name(&self) -> &str;

    /// Content-type label as reported by the sender
    fn content_type(&self) -> &str;

    /// Declared length in bytes
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the complete payload
    async fn read_all(&mut self) -> Result<Vec<u8>>;
}

/// File already held in memory
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    content_type: String,
    data: Bytes,
}

impl MemoryFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

#[async_trait]
impl IncomingFile for MemoryFile {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    async fn read_all(&mut self) -> Result<Vec<u8>> {
        Ok(self.data.to_vec())
    }
}

/// File on the local filesystem
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    content_type: String,
    len: u64,
}

impl DiskFile {
    /// Stat `path` and guess its content type from the extension
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            CatalogError::io_error(
                format!("Failed to stat file: {}", e),
                Some(path.to_path_buf()),
            )
        })?;

        if !metadata.is_file() {
            return Err(CatalogError::validation_error(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                CatalogError::validation_error(format!("Path has no file name: {}", path.display()))
            })?;

        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            content_type,
            len: metadata.len(),
        })
    }

    /// Replace the guessed content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl IncomingFile for DiskFile {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn len(&self) -> u64 {
        self.len
    }

    async fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut file = tokio::fs::File::open(&self.path).await.map_err(|e| {
            CatalogError::io_error(
                format!("Failed to open file: {}", e),
                Some(self.path.clone()),
            )
        })?;

        let mut buffer = Vec::with_capacity(self.len as usize);
        file.read_to_end(&mut buffer).await.map_err(|e| {
            CatalogError::io_error(
                format!("Failed to read file: {}", e),
                Some(self.path.clone()),
            )
        })?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_file_reports_its_length() {
        let mut file = MemoryFile::new("notes.txt", "text/plain", b"hello".to_vec());

        assert_eq!(file.file_name(), "notes.txt");
        assert_eq!(file.content_type(), "text/plain");
        assert_eq!(file.len(), 5);
        assert!(!file.is_empty());
        assert_eq!(file.read_all().await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_disk_file_guesses_content_type() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.pdf");
        tokio::fs::write(&path, b"%PDF-1.4 fake").await.unwrap();

        let mut file = DiskFile::open(&path).await.unwrap();
        assert_eq!(file.file_name(), "report.pdf");
        assert_eq!(file.content_type(), "application/pdf");
        assert_eq!(file.len(), 13);
        assert_eq!(file.read_all().await.unwrap(), b"%PDF-1.4 fake");
    }

    #[tokio::test]
    async fn test_disk_file_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let result = DiskFile::open(temp_dir.path().join("missing.bin")).await;

        assert!(matches!(result, Err(CatalogError::IoDetailed { .. })));
    }

    #[tokio::test]
    async fn test_disk_file_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = DiskFile::open(temp_dir.path()).await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }
}
