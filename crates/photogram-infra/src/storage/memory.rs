//! In-memory photo storage - used in tests and when running without disk access.

use std::collections::HashMap;
use std::io;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use photogram_core::ports::{PhotoStorage, StorageError};

use super::sanitize_file_name;

/// Keeps photo bytes in a map keyed by reference path.
#[derive(Default)]
pub struct InMemoryPhotoStorage {
    photos: RwLock<HashMap<String, Vec<u8>>>,
    fail_writes: bool,
}

impl InMemoryPhotoStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A storage whose every write fails with an I/O error.
    pub fn failing() -> Self {
        Self {
            photos: RwLock::default(),
            fail_writes: true,
        }
    }

    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.photos.read().await.get(path).cloned()
    }

    pub async fn len(&self) -> usize {
        self.photos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PhotoStorage for InMemoryPhotoStorage {
    async fn store(&self, bytes: &[u8], original_name: &str) -> Result<String, StorageError> {
        if self.fail_writes {
            return Err(io::Error::other("photo storage unavailable").into());
        }

        let path = format!(
            "memory://photos/{}_{}",
            Uuid::new_v4(),
            sanitize_file_name(original_name)
        );
        self.photos.write().await.insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    async fn remove(&self, path: &str) -> Result<(), StorageError> {
        self.photos
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StorageError::UnknownPath(path.to_string()))
    }
}
