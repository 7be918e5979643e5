//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use thoughtlane_infra::{DatabaseConfig, JwtConfig};

const MIN_SECRET_LEN: usize = 16;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where uploaded images go.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Memory {
        prefix: String,
    },
    S3 {
        bucket: String,
        public_url: String,
        prefix: String,
        endpoint_url: Option<String>,
    },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub max_upload_bytes: usize,
    pub cookie_secure: bool,
}

impl AppConfig {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let database = match vars.get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: vars.parse_or("DB_MAX_CONNECTIONS", 100)?,
                min_connections: vars.parse_or("DB_MIN_CONNECTIONS", 10)?,
            }),
            None => None,
        };

        let secret = vars.require("JWT_SECRET")?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                value: "<redacted>".to_string(),
                reason: format!("must be at least {MIN_SECRET_LEN} bytes"),
            });
        }
        let jwt = JwtConfig {
            secret,
            expiration_hours: vars.parse_or("JWT_EXPIRATION_HOURS", 24)?,
            issuer: vars
                .get("JWT_ISSUER")
                .unwrap_or_else(|| "thoughtlane-api".to_string()),
        };

        let prefix = vars
            .get("STORAGE_PREFIX")
            .unwrap_or_else(|| "uploads".to_string());
        let backend = vars.get("STORAGE_BACKEND").unwrap_or_else(|| "s3".to_string());
        let storage = match backend.to_lowercase().as_str() {
            "memory" => StorageConfig::Memory { prefix },
            "s3" => StorageConfig::S3 {
                bucket: vars.require("STORAGE_BUCKET")?,
                public_url: vars.require("STORAGE_PUBLIC_URL")?,
                prefix,
                endpoint_url: vars.get("STORAGE_ENDPOINT"),
            },
            _ => {
                return Err(ConfigError::Invalid {
                    key: "STORAGE_BACKEND",
                    value: backend,
                    reason: "expected `s3` or `memory`".to_string(),
                });
            }
        };

        Ok(Self {
            host: vars.get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: vars.parse_or("PORT", 8080)?,
            database,
            jwt,
            storage,
            max_upload_bytes: vars.parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            cookie_secure: vars.parse_or("COOKIE_SECURE", false)?,
        })
    }
}

/// Typed access to a variable lookup.
pub(crate) struct Vars<'a, F: Fn(&str) -> Option<String>>(pub(crate) &'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    /// Unset and blank are the same.
    pub(crate) fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    pub(crate) fn require(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    pub(crate) fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const SECRET: (&str, &str) = ("JWT_SECRET", "0123456789abcdef0123");

    #[test]
    fn test_defaults_with_memory_storage() {
        let config = load(&[SECRET, ("STORAGE_BACKEND", "memory")]).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.database.is_none());
        assert_eq!(config.jwt.expiration_hours, 24);
        assert_eq!(config.jwt.issuer, "thoughtlane-api");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(!config.cookie_secure);
        assert!(matches!(config.storage, StorageConfig::Memory { ref prefix } if prefix == "uploads"));
    }

    #[test]
    fn test_secret_is_required() {
        let err = load(&[("STORAGE_BACKEND", "memory")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let err = load(&[("JWT_SECRET", "short"), ("STORAGE_BACKEND", "memory")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "JWT_SECRET", .. }));
    }

    #[test]
    fn test_s3_needs_bucket() {
        let err = load(&[SECRET]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("STORAGE_BUCKET")));
    }

    #[test]
    fn test_s3_settings() {
        let config = load(&[
            SECRET,
            ("STORAGE_BUCKET", "blog-media"),
            ("STORAGE_PUBLIC_URL", "https://cdn.example.com"),
            ("STORAGE_PREFIX", "covers"),
        ])
        .unwrap();

        match config.storage {
            StorageConfig::S3 { bucket, prefix, .. } => {
                assert_eq!(bucket, "blog-media");
                assert_eq!(prefix, "covers");
            }
            other => panic!("unexpected storage config: {other:?}"),
        }
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let err = load(&[SECRET, ("STORAGE_BACKEND", "memory"), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn test_database_url_enables_postgres() {
        let config = load(&[
            SECRET,
            ("STORAGE_BACKEND", "memory"),
            ("DATABASE_URL", "postgres://localhost/blog"),
            ("DB_MAX_CONNECTIONS", "20"),
        ])
        .unwrap();

        let db = config.database.unwrap();
        assert_eq!(db.max_connections, 20);
        assert_eq!(db.min_connections, 10);
    }
}
