//! Post lifecycle manager.
//!
//! Owns post CRUD and authorship checks, and drives the side effects of a
//! post's lifecycle: tag rows, dependent comments and likes, and the cover
//! image held by the media store.
//!
//! Cover images follow one rule: a row never references a URL that was not
//! successfully stored, and a stored file is only released once no row
//! references it any more.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    Authored, NewPost, Page, Post, PostChanges, Upload, normalize_tag_names,
};
use crate::error::{DomainError, DomainResult, RepoResultExt};
use crate::ports::{MediaStorage, PostRepository, UserRepository};

use super::TagService;

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    tags: TagService,
    storage: Arc<dyn MediaStorage>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        tags: TagService,
        storage: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            posts,
            users,
            tags,
            storage,
        }
    }

    pub async fn create(
        &self,
        author_id: Uuid,
        draft: NewPost,
        cover: Option<Upload>,
        tag_names: Option<Vec<String>>,
    ) -> DomainResult<Authored<Post>> {
        validate_title(&draft.title)?;
        if let Some(upload) = &cover {
            validate_image(upload)?;
        }

        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", author_id))?;

        let cover_url = match cover {
            Some(upload) => Some(self.storage.store(upload).await?),
            None => None,
        };

        let tags = normalize_tag_names(tag_names.unwrap_or_default());
        let post = Post::new(author_id, draft, cover_url.clone());

        let post = match self.posts.create_with_tags(post, &tags).await {
            Ok(post) => post,
            Err(err) => {
                self.release(cover_url.as_deref()).await;
                return Err(err).or_not_found("user", author_id);
            }
        };

        tracing::info!(post_id = %post.id, %author_id, tags = tags.len(), "Post created");
        Ok(Authored::new(post, author.summary()))
    }

    pub async fn update(
        &self,
        post_id: Uuid,
        caller_id: Uuid,
        changes: PostChanges,
        cover: Option<Upload>,
        tag_names: Option<Vec<String>>,
    ) -> DomainResult<Authored<Post>> {
        let mut post = self.find(post_id).await?;
        if !post.is_authored_by(caller_id) {
            return Err(DomainError::Forbidden("post"));
        }

        if let Some(title) = &changes.title {
            validate_title(title)?;
        }
        if let Some(upload) = &cover {
            validate_image(upload)?;
        }

        let new_cover = match cover {
            Some(upload) => Some(self.storage.store(upload).await?),
            None => None,
        };
        let old_cover = post.cover_image_url.clone();

        changes.apply_to(&mut post);
        if new_cover.is_some() {
            post.cover_image_url = new_cover.clone();
        }

        let tags = tag_names.map(normalize_tag_names);
        let updated = self.posts.update_with_tags(post, tags.as_deref()).await;
        if updated.is_err() {
            self.release(new_cover.as_deref()).await;
        }
        updated.or_not_found("post", post_id)?;

        if new_cover.is_some() {
            self.release(old_cover.as_deref()).await;
        }

        tracing::info!(%post_id, "Post updated");
        self.get(post_id).await
    }

    pub async fn delete(&self, post_id: Uuid, caller_id: Uuid) -> DomainResult<()> {
        let post = self.find(post_id).await?;
        if !post.is_authored_by(caller_id) {
            return Err(DomainError::Forbidden("post"));
        }

        self.posts
            .delete_cascade(post_id)
            .await
            .or_not_found("post", post_id)?;
        self.release(post.cover_image_url.as_deref()).await;

        tracing::info!(%post_id, "Post deleted");
        Ok(())
    }

    pub async fn get(&self, post_id: Uuid) -> DomainResult<Authored<Post>> {
        self.posts
            .find_authored(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    /// Newest-first page of all posts.
    pub async fn list(&self, page: Page) -> DomainResult<Vec<Authored<Post>>> {
        Ok(self.posts.list_authored(page.limit(), page.offset()).await?)
    }

    /// Newest-first page of posts tagged `tag_name`; empty when none match.
    pub async fn list_by_tag(&self, tag_name: &str, page: Page) -> DomainResult<Vec<Authored<Post>>> {
        self.tags.posts_by_name(tag_name, page).await
    }

    /// Newest-first page of one author's posts.
    pub async fn list_by_author(&self, user_id: Uuid, page: Page) -> DomainResult<Vec<Authored<Post>>> {
        Ok(self
            .posts
            .list_authored_by_user(user_id, page.limit(), page.offset())
            .await?)
    }

    /// `false` when the post does not exist.
    pub async fn is_author(&self, post_id: Uuid, user_id: Uuid) -> DomainResult<bool> {
        Ok(self
            .posts
            .find_by_id(post_id)
            .await?
            .is_some_and(|p| p.is_authored_by(user_id)))
    }

    /// Store an image embedded in post content and return its URL.
    pub async fn upload_inline_image(&self, upload: Upload) -> DomainResult<String> {
        validate_image(&upload)?;
        Ok(self.storage.store(upload).await?)
    }

    async fn find(&self, post_id: Uuid) -> DomainResult<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    /// Best effort: a file that cannot be released is logged and left behind.
    async fn release(&self, url: Option<&str>) {
        let Some(url) = url else { return };
        if let Err(err) = self.storage.delete(url).await {
            tracing::warn!(%url, error = %err, "Failed to release stored file");
        }
    }
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation("Title is required".into()));
    }
    Ok(())
}

fn validate_image(upload: &Upload) -> DomainResult<()> {
    if upload.bytes.is_empty() {
        return Err(DomainError::Validation("Uploaded file is empty".into()));
    }
    if !upload.content_type.starts_with("image/") {
        return Err(DomainError::Validation(format!(
            "Unsupported file type: {}",
            upload.content_type
        )));
    }
    Ok(())
}
