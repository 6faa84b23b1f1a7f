//! Local filesystem photo storage.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use photogram_core::ports::{PhotoStorage, StorageError};

use super::sanitize_file_name;

/// Where photos are written and how they are addressed afterwards.
#[derive(Debug, Clone)]
pub struct PhotoStorageConfig {
    /// Directory photos are written into.
    pub save_dir: PathBuf,
    /// Prefix prepended to the stored file name to form the reference path.
    pub public_url: String,
    /// Largest accepted upload, in bytes.
    pub max_bytes: usize,
}

impl Default for PhotoStorageConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("./uploads"),
            public_url: "/photos/".to_string(),
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Writes each photo to `save_dir` as `<uuid>_<original name>` and hands out
/// `public_url` + file name as its reference path.
pub struct LocalPhotoStorage {
    config: PhotoStorageConfig,
}

impl LocalPhotoStorage {
    pub fn new(config: PhotoStorageConfig) -> Self {
        Self { config }
    }

    fn file_name_of<'a>(&self, path: &'a str) -> Result<&'a str, StorageError> {
        path.strip_prefix(self.config.public_url.as_str())
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
            .ok_or_else(|| StorageError::UnknownPath(path.to_string()))
    }
}

#[async_trait]
impl PhotoStorage for LocalPhotoStorage {
    async fn store(&self, bytes: &[u8], original_name: &str) -> Result<String, StorageError> {
        tokio::fs::create_dir_all(&self.config.save_dir).await?;

        let file_name = format!("{}_{}", Uuid::new_v4(), sanitize_file_name(original_name));
        tokio::fs::write(self.config.save_dir.join(&file_name), bytes).await?;

        tracing::debug!(file_name = %file_name, size = bytes.len(), "Photo stored");
        Ok(format!("{}{}", self.config.public_url, file_name))
    }

    async fn remove(&self, path: &str) -> Result<(), StorageError> {
        let file_name = self.file_name_of(path)?;
        tokio::fs::remove_file(self.config.save_dir.join(file_name)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_in(dir: &tempfile::TempDir) -> LocalPhotoStorage {
        LocalPhotoStorage::new(PhotoStorageConfig {
            save_dir: dir.path().join("photos"),
            public_url: "http://localhost:8080/photos/".to_string(),
            max_bytes: 1024,
        })
    }

    #[tokio::test]
    async fn test_store_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);

        let path = storage.store(b"jpeg bytes", "sunset.jpg").await.unwrap();
        assert!(path.starts_with("http://localhost:8080/photos/"));
        assert!(path.ends_with("_sunset.jpg"));

        let file_name = path.rsplit('/').next().unwrap();
        let on_disk = dir.path().join("photos").join(file_name);
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"jpeg bytes");

        storage.remove(&path).await.unwrap();
        assert!(!on_disk.exists());
    }

    #[tokio::test]
    async fn test_store_long_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);

        let original = format!("{}.jpg", "a".repeat(230));
        let path = storage.store(b"x", &original).await.unwrap();
        assert!(path.ends_with(".jpg"));

        let file_name = path.rsplit('/').next().unwrap();
        assert!(file_name.len() <= 255);
        assert!(dir.path().join("photos").join(file_name).exists());

        storage.remove(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_rejects_foreign_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);

        let result = storage.remove("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::UnknownPath(_))));

        let traversal = storage
            .remove("http://localhost:8080/photos/../secret")
            .await;
        assert!(matches!(traversal, Err(StorageError::UnknownPath(_))));
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let storage = LocalPhotoStorage::new(PhotoStorageConfig {
            save_dir: blocker,
            ..PhotoStorageConfig::default()
        });

        let result = storage.store(b"bytes", "a.jpg").await;
        assert!(matches!(result, Err(StorageError::Io(_))));
    }
}
