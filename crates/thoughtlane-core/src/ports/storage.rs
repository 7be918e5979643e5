//! File storage port - where cover and inline images live.

use async_trait::async_trait;

use crate::domain::Upload;

/// Media storage trait - abstraction over object stores (S3, in-memory).
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store the bytes and return their public URL.
    async fn store(&self, upload: Upload) -> Result<String, StorageError>;

    /// Release a previously stored file by its public URL.
    async fn delete(&self, url: &str) -> Result<(), StorageError>;
}

/// File storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Delete failed: {0}")]
    Delete(String),

    #[error("URL does not belong to this store: {0}")]
    ForeignUrl(String),

    #[error("Storage configuration error: {0}")]
    Config(String),
}
