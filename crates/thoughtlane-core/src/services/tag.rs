//! Tag subsystem - per-post tag rows and the global tag listing.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Authored, Page, Post, Tag, TagSummary, distinct_by_name, normalize_tag_names};
use crate::error::{DomainResult, RepoResultExt};
use crate::ports::{PostRepository, TagRepository};

#[derive(Clone)]
pub struct TagService {
    tags: Arc<dyn TagRepository>,
    posts: Arc<dyn PostRepository>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { tags, posts }
    }

    /// Distinct tag names across all posts, sorted ascending.
    pub async fn all(&self) -> DomainResult<Vec<TagSummary>> {
        Ok(distinct_by_name(self.tags.list_all().await?))
    }

    pub async fn by_post(&self, post_id: Uuid) -> DomainResult<Vec<Tag>> {
        Ok(self.tags.list_by_post(post_id).await?)
    }

    pub async fn add_to_post<S: AsRef<str>>(
        &self,
        post_id: Uuid,
        names: &[S],
    ) -> DomainResult<Vec<Tag>> {
        let names = normalize_tag_names(names);
        if names.is_empty() {
            return Ok(Vec::new());
        }
        self.tags
            .add_to_post(post_id, &names)
            .await
            .or_not_found("post", post_id)
    }

    pub async fn remove_from_post(&self, post_id: Uuid) -> DomainResult<()> {
        let removed = self.tags.remove_from_post(post_id).await?;
        tracing::debug!(%post_id, removed, "Tags removed from post");
        Ok(())
    }

    /// Make the post's tag set exactly `names` (after normalization).
    pub async fn replace_for_post<S: AsRef<str>>(
        &self,
        post_id: Uuid,
        names: &[S],
    ) -> DomainResult<Vec<Tag>> {
        let names = normalize_tag_names(names);
        self.tags
            .replace_for_post(post_id, &names)
            .await
            .or_not_found("post", post_id)
    }

    /// Newest-first page of posts carrying a tag with exactly this name.
    pub async fn posts_by_name(&self, name: &str, page: Page) -> DomainResult<Vec<Authored<Post>>> {
        let post_ids = self.tags.post_ids_by_name(name).await?;
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .posts
            .list_authored_by_ids(&post_ids, page.limit(), page.offset())
            .await?)
    }
}
