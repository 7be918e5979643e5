//! # ThoughtLane Infrastructure
//!
//! Concrete implementations of the ports defined in `thoughtlane-core`:
//! persistence, session tokens, password hashing and media storage.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL persistence via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `s3` - S3-compatible media storage

pub mod database;
pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryStore};
pub use storage::InMemoryMediaStorage;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
pub use database::{
    PostgresCommentRepository, PostgresLikeRepository, PostgresPostRepository,
    PostgresTagRepository, PostgresUserRepository,
};

#[cfg(feature = "s3")]
pub use storage::{S3Config, S3MediaStorage};
