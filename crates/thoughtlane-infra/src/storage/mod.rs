//! Media storage adapters for cover and inline images.

mod memory;
#[cfg(feature = "s3")]
mod s3;

use chrono::Utc;
use uuid::Uuid;

use thoughtlane_core::domain::Upload;

pub use memory::InMemoryMediaStorage;
#[cfg(feature = "s3")]
pub use s3::{S3Config, S3MediaStorage};

/// Build a collision-free object key: `{prefix}/{millis}-{uuid}.{ext}`.
pub(crate) fn object_key(prefix: &str, upload: &Upload) -> String {
    let stem = format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple());
    let name = match upload.extension() {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    };

    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        name
    } else {
        format!("{prefix}/{name}")
    }
}

/// Recover the object key from a public URL issued under `base_url`.
pub(crate) fn key_from_url<'a>(base_url: &str, url: &'a str) -> Option<&'a str> {
    let base = base_url.trim_end_matches('/');
    url.strip_prefix(base)?
        .strip_prefix('/')
        .filter(|key| !key.is_empty())
}

/// Public URL for `key` under `base_url`.
pub(crate) fn public_url(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(filename: &str) -> Upload {
        Upload {
            filename: filename.to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_object_key_keeps_extension_under_prefix() {
        let key = object_key("uploads/", &upload("Cover.PNG"));

        assert!(key.starts_with("uploads/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn test_object_keys_are_unique() {
        let a = object_key("uploads", &upload("a.jpg"));
        let b = object_key("uploads", &upload("a.jpg"));

        assert_ne!(a, b);
    }

    #[test]
    fn test_key_from_url() {
        let base = "https://cdn.example.com/";

        assert_eq!(
            key_from_url(base, "https://cdn.example.com/uploads/x.png"),
            Some("uploads/x.png")
        );
        assert_eq!(key_from_url(base, "https://elsewhere.com/uploads/x.png"), None);
        assert_eq!(key_from_url(base, "https://cdn.example.com/"), None);
    }
}
