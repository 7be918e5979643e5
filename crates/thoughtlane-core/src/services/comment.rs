//! Comment subsystem.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Authored, Comment};
use crate::error::{DomainError, DomainResult, RepoResultExt};
use crate::ports::{CommentRepository, PostRepository, UserRepository};

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            comments,
            posts,
            users,
        }
    }

    pub async fn create(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> DomainResult<Authored<Comment>> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation("Comment content is required".into()));
        }

        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("post", post_id));
        }
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", author_id))?;

        let comment = self
            .comments
            .create(Comment::new(post_id, author_id, content.to_string()))
            .await
            .or_not_found("post", post_id)?;
        tracing::info!(comment_id = %comment.id, %post_id, "Comment created");

        Ok(Authored::new(comment, author.summary()))
    }

    /// Comments on a post, oldest first.
    pub async fn list_by_post(&self, post_id: Uuid) -> DomainResult<Vec<Authored<Comment>>> {
        Ok(self.comments.list_authored_by_post(post_id).await?)
    }

    pub async fn delete(&self, comment_id: Uuid, caller_id: Uuid) -> DomainResult<()> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", comment_id))?;

        if !comment.is_authored_by(caller_id) {
            return Err(DomainError::Forbidden("comment"));
        }

        self.comments
            .delete_cascade(comment_id)
            .await
            .or_not_found("comment", comment_id)?;
        tracing::info!(%comment_id, "Comment deleted");
        Ok(())
    }

    /// `false` when the comment does not exist.
    pub async fn is_author(&self, comment_id: Uuid, user_id: Uuid) -> DomainResult<bool> {
        Ok(self
            .comments
            .find_by_id(comment_id)
            .await?
            .is_some_and(|c| c.is_authored_by(user_id)))
    }
}
