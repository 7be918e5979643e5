//! Like/toggle engine.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{LikeTarget, ToggleOutcome};
use crate::error::{DomainError, DomainResult, RepoResultExt};
use crate::ports::{CommentRepository, LikeRepository, PostRepository};

#[derive(Clone)]
pub struct LikeService {
    likes: Arc<dyn LikeRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl LikeService {
    pub fn new(
        likes: Arc<dyn LikeRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            likes,
            posts,
            comments,
        }
    }

    pub async fn toggle_post_like(&self, post_id: Uuid, user_id: Uuid) -> DomainResult<ToggleOutcome> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("post", post_id));
        }
        self.toggle(user_id, LikeTarget::Post(post_id)).await
    }

    pub async fn toggle_comment_like(
        &self,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<ToggleOutcome> {
        if self.comments.find_by_id(comment_id).await?.is_none() {
            return Err(DomainError::not_found("comment", comment_id));
        }
        self.toggle(user_id, LikeTarget::Comment(comment_id)).await
    }

    async fn toggle(&self, user_id: Uuid, target: LikeTarget) -> DomainResult<ToggleOutcome> {
        let liked = self
            .likes
            .toggle(user_id, target)
            .await
            .or_not_found(target.kind(), target.id())?;
        tracing::debug!(%user_id, ?target, liked, "Like toggled");
        Ok(ToggleOutcome { liked })
    }

    pub async fn count_for_post(&self, post_id: Uuid) -> DomainResult<u64> {
        Ok(self.likes.count(LikeTarget::Post(post_id)).await?)
    }

    pub async fn count_for_comment(&self, comment_id: Uuid) -> DomainResult<u64> {
        Ok(self.likes.count(LikeTarget::Comment(comment_id)).await?)
    }

    /// Always `false` for an anonymous caller.
    pub async fn has_user_liked_post(&self, post_id: Uuid, user_id: Option<Uuid>) -> DomainResult<bool> {
        self.has_user_liked(LikeTarget::Post(post_id), user_id).await
    }

    /// Always `false` for an anonymous caller.
    pub async fn has_user_liked_comment(
        &self,
        comment_id: Uuid,
        user_id: Option<Uuid>,
    ) -> DomainResult<bool> {
        self.has_user_liked(LikeTarget::Comment(comment_id), user_id).await
    }

    async fn has_user_liked(&self, target: LikeTarget, user_id: Option<Uuid>) -> DomainResult<bool> {
        match user_id {
            Some(user_id) => Ok(self.likes.exists(user_id, target).await?),
            None => Ok(false),
        }
    }

    /// Like count for every id in `post_ids`; posts without likes map to 0.
    pub async fn counts_for_posts(&self, post_ids: &[Uuid]) -> DomainResult<HashMap<Uuid, u64>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let counts = self.likes.count_for_posts(post_ids).await?;
        Ok(post_ids
            .iter()
            .map(|id| (*id, counts.get(id).copied().unwrap_or(0)))
            .collect())
    }

    /// Whether the user liked each post in `post_ids`; all `false` when anonymous.
    pub async fn user_likes_for_posts(
        &self,
        post_ids: &[Uuid],
        user_id: Option<Uuid>,
    ) -> DomainResult<HashMap<Uuid, bool>> {
        let liked = match user_id {
            Some(user_id) if !post_ids.is_empty() => {
                self.likes.liked_posts(post_ids, user_id).await?
            }
            _ => Default::default(),
        };

        Ok(post_ids
            .iter()
            .map(|id| (*id, liked.contains(id)))
            .collect())
    }
}
