//! Application state - shared across all handlers.

use std::sync::Arc;

use thoughtlane_core::ports::{
    CommentRepository, LikeRepository, MediaStorage, PostRepository, TagRepository,
    UserRepository,
};
use thoughtlane_core::services::{
    AccountService, CommentService, LikeService, PostService, SessionGate, TagService,
};
use thoughtlane_infra::{
    Argon2PasswordService, DatabaseConfig, InMemoryMediaStorage, InMemoryStore, JwtTokenService,
};

#[cfg(feature = "postgres")]
use thoughtlane_infra::{
    PostgresCommentRepository, PostgresLikeRepository, PostgresPostRepository,
    PostgresTagRepository, PostgresUserRepository,
};

use crate::config::{AppConfig, StorageConfig};

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("database connection failed: {0}")]
    Database(String),

    #[error("{0}")]
    Unsupported(&'static str),
}

/// The repository set every service is built from.
struct Repositories {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    tags: Arc<dyn TagRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            tags: store.clone(),
            likes: store,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub posts: PostService,
    pub comments: CommentService,
    pub tags: TagService,
    pub likes: LikeService,
    pub session: SessionGate,
    pub max_upload_bytes: usize,
    pub cookie_secure: bool,
}

impl AppState {
    /// Build the application state with the configured adapters.
    pub async fn build(config: &AppConfig) -> Result<Self, InitError> {
        let repos = Self::repositories(config).await?;
        let storage = Self::media_storage(&config.storage).await?;
        let session = SessionGate::new(Arc::new(JwtTokenService::new(config.jwt.clone())));

        tracing::info!("Application state initialized");
        Ok(Self::assemble(
            repos,
            storage,
            session,
            config.max_upload_bytes,
            config.cookie_secure,
        ))
    }

    fn assemble(
        repos: Repositories,
        storage: Arc<dyn MediaStorage>,
        session: SessionGate,
        max_upload_bytes: usize,
        cookie_secure: bool,
    ) -> Self {
        let tags = TagService::new(repos.tags, repos.posts.clone());

        Self {
            accounts: AccountService::new(
                repos.users.clone(),
                Arc::new(Argon2PasswordService::new()),
            ),
            posts: PostService::new(
                repos.posts.clone(),
                repos.users.clone(),
                tags.clone(),
                storage,
            ),
            comments: CommentService::new(
                repos.comments.clone(),
                repos.posts.clone(),
                repos.users,
            ),
            likes: LikeService::new(repos.likes, repos.posts, repos.comments),
            tags,
            session,
            max_upload_bytes,
            cookie_secure,
        }
    }

    async fn repositories(config: &AppConfig) -> Result<Repositories, InitError> {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running on the in-memory store.");
            return Ok(Repositories::in_memory());
        };

        Self::connect_postgres(db_config).await
    }

    #[cfg(feature = "postgres")]
    async fn connect_postgres(db_config: &DatabaseConfig) -> Result<Repositories, InitError> {
        let db = thoughtlane_infra::database::connect(db_config)
            .await
            .map_err(|e| InitError::Database(e.to_string()))?;

        Ok(Repositories {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            tags: Arc::new(PostgresTagRepository::new(db.clone())),
            likes: Arc::new(PostgresLikeRepository::new(db)),
        })
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect_postgres(_db_config: &DatabaseConfig) -> Result<Repositories, InitError> {
        Err(InitError::Unsupported(
            "DATABASE_URL is set but the server was built without the `postgres` feature",
        ))
    }

    async fn media_storage(config: &StorageConfig) -> Result<Arc<dyn MediaStorage>, InitError> {
        match config {
            StorageConfig::Memory { prefix } => {
                tracing::warn!("Using in-memory media storage. Uploads are lost on restart.");
                Ok(Arc::new(InMemoryMediaStorage::new(prefix.clone())))
            }

            #[cfg(feature = "s3")]
            StorageConfig::S3 {
                bucket,
                public_url,
                prefix,
                endpoint_url,
            } => {
                let storage = thoughtlane_infra::S3MediaStorage::connect(thoughtlane_infra::S3Config {
                    bucket: bucket.clone(),
                    public_url: public_url.clone(),
                    prefix: prefix.clone(),
                    endpoint_url: endpoint_url.clone(),
                })
                .await;
                Ok(Arc::new(storage))
            }

            #[cfg(not(feature = "s3"))]
            StorageConfig::S3 { .. } => Err(InitError::Unsupported(
                "STORAGE_BACKEND=s3 requires the `s3` feature",
            )),
        }
    }

    /// Fully in-memory state, for handler tests.
    #[cfg(test)]
    pub fn in_memory(session: SessionGate, max_upload_bytes: usize) -> Self {
        Self::assemble(
            Repositories::in_memory(),
            Arc::new(InMemoryMediaStorage::default()),
            session,
            max_upload_bytes,
            false,
        )
    }
}
