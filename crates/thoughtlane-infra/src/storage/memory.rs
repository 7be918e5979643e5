//! In-memory media storage.
//!
//! Suitable for development and tests. Files are lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use thoughtlane_core::domain::Upload;
use thoughtlane_core::ports::{MediaStorage, StorageError};

use super::{key_from_url, object_key, public_url};

const BASE_URL: &str = "memory://media";

/// Stored file.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// In-memory media store keyed by object key.
pub struct InMemoryMediaStorage {
    prefix: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl InMemoryMediaStorage {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Whether a file is currently held for `url`.
    pub async fn contains(&self, url: &str) -> bool {
        match key_from_url(BASE_URL, url) {
            Some(key) => self.objects.read().await.contains_key(key),
            None => false,
        }
    }

    /// Number of files currently held.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryMediaStorage {
    fn default() -> Self {
        Self::new("uploads")
    }
}

#[async_trait]
impl MediaStorage for InMemoryMediaStorage {
    async fn store(&self, upload: Upload) -> Result<String, StorageError> {
        let key = object_key(&self.prefix, &upload);
        let url = public_url(BASE_URL, &key);

        self.objects.write().await.insert(
            key,
            StoredObject {
                content_type: upload.content_type,
                bytes: upload.bytes,
            },
        );
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let key = key_from_url(BASE_URL, url)
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;

        self.objects
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::Delete(format!("no such object: {key}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> Upload {
        Upload {
            filename: "cover.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    #[tokio::test]
    async fn test_store_then_delete() {
        let storage = InMemoryMediaStorage::default();

        let url = storage.store(png()).await.unwrap();
        assert!(storage.contains(&url).await);

        storage.delete(&url).await.unwrap();
        assert!(!storage.contains(&url).await);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_foreign_url() {
        let storage = InMemoryMediaStorage::default();

        let result = storage.delete("https://elsewhere.com/x.png").await;

        assert!(matches!(result, Err(StorageError::ForeignUrl(_))));
    }
}
