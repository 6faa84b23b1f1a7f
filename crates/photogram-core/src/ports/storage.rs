//! Photo storage port - abstraction over where uploaded photos end up.

use async_trait::async_trait;

/// Durable storage for uploaded photo bytes.
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Persist `bytes` and return the reference path posts will point at.
    async fn store(&self, bytes: &[u8], original_name: &str) -> Result<String, StorageError>;

    /// Remove a previously stored photo by its reference path.
    async fn remove(&self, path: &str) -> Result<(), StorageError>;
}

/// Photo storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown photo path: {0}")]
    UnknownPath(String),
}
