use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Authored, Comment, LikeTarget, Post, Tag, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository. Listings are ordered newest first.
///
/// The `*_with_tags` and `delete_cascade` methods are atomic: either every
/// row they touch is written or none is.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_authored(&self, id: Uuid) -> Result<Option<Authored<Post>>, RepoError>;

    async fn list_authored(&self, limit: u64, offset: u64)
    -> Result<Vec<Authored<Post>>, RepoError>;

    /// Page through the posts whose id is in `ids`.
    async fn list_authored_by_ids(
        &self,
        ids: &[Uuid],
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Authored<Post>>, RepoError>;

    async fn list_authored_by_user(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Authored<Post>>, RepoError>;

    /// Insert the post and one tag row per name.
    async fn create_with_tags(&self, post: Post, tags: &[String]) -> Result<Post, RepoError>;

    /// Overwrite the post; when `tags` is given, replace its tag set.
    async fn update_with_tags(
        &self,
        post: Post,
        tags: Option<&[String]>,
    ) -> Result<Post, RepoError>;

    /// Delete the post with its tags, comments, and every like on the post
    /// or on one of its comments.
    async fn delete_cascade(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Comment repository. Listings are ordered oldest first.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    async fn list_authored_by_post(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<Authored<Comment>>, RepoError>;

    /// Delete the comment and every like targeting it.
    async fn delete_cascade(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Tag repository. Names handed in are already trimmed and de-duplicated.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Every tag row, sorted ascending by name.
    async fn list_all(&self) -> Result<Vec<Tag>, RepoError>;

    /// Rows for one post in insertion order.
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError>;

    /// Insert one row per name the post does not already carry.
    async fn add_to_post(&self, post_id: Uuid, names: &[String]) -> Result<Vec<Tag>, RepoError>;

    /// Delete every row for the post. Returns the number of rows removed.
    async fn remove_from_post(&self, post_id: Uuid) -> Result<u64, RepoError>;

    /// Atomically make the post's tag set exactly `names`.
    async fn replace_for_post(
        &self,
        post_id: Uuid,
        names: &[String],
    ) -> Result<Vec<Tag>, RepoError>;

    /// Post ids with a tag of exactly this name, without repeats.
    async fn post_ids_by_name(&self, name: &str) -> Result<Vec<Uuid>, RepoError>;
}

/// Like repository over the polymorphic like relation.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Flip the (user, target) like in a single atomic write. Returns the
    /// state after the call.
    async fn toggle(&self, user_id: Uuid, target: LikeTarget) -> Result<bool, RepoError>;

    /// Likes on exactly this target.
    async fn count(&self, target: LikeTarget) -> Result<u64, RepoError>;

    async fn exists(&self, user_id: Uuid, target: LikeTarget) -> Result<bool, RepoError>;

    /// Post-like counts for the given posts. Posts without likes may be absent.
    async fn count_for_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError>;

    /// The subset of `post_ids` the user has liked.
    async fn liked_posts(
        &self,
        post_ids: &[Uuid],
        user_id: Uuid,
    ) -> Result<HashSet<Uuid>, RepoError>;
}
