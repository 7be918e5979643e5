//! S3-compatible media storage.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;

use thoughtlane_core::domain::Upload;
use thoughtlane_core::ports::{MediaStorage, StorageError};

use super::{key_from_url, object_key, public_url};

/// Bucket and URL settings for the S3 adapter.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    /// Base of the URLs handed back to clients (bucket website or CDN).
    pub public_url: String,
    pub prefix: String,
    /// Custom endpoint for S3-compatible stores such as MinIO.
    pub endpoint_url: Option<String>,
}

/// Media storage backed by an S3 bucket.
pub struct S3MediaStorage {
    client: Client,
    config: S3Config,
}

impl S3MediaStorage {
    /// Build a client from the ambient AWS configuration (env, profile, IMDS).
    pub async fn connect(config: S3Config) -> Self {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(bucket = %config.bucket, "S3 media storage configured");
        Self {
            client: Client::from_conf(builder.build()),
            config,
        }
    }
}

#[async_trait]
impl MediaStorage for S3MediaStorage {
    async fn store(&self, upload: Upload) -> Result<String, StorageError> {
        let key = object_key(&self.config.prefix, &upload);
        let size = upload.bytes.len();

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .content_type(&upload.content_type)
            .body(ByteStream::from(upload.bytes))
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        tracing::debug!(key = %key, size, "Object stored");
        Ok(public_url(&self.config.public_url, &key))
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let key = key_from_url(&self.config.public_url, url)
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;

        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete(e.to_string()))?;

        tracing::debug!(key = %key, "Object deleted");
        Ok(())
    }
}
