//! In-memory store - used when no database is configured, and in tests.
//!
//! Every table sits behind a single async `RwLock`, so each repository call
//! sees and leaves a consistent snapshot: multi-row operations are atomic
//! exactly like their transactional PostgreSQL counterparts.
//! Note: Data is lost on process restart.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use thoughtlane_core::domain::{Authored, Comment, Like, LikeTarget, Post, Tag, User};
use thoughtlane_core::error::RepoError;
use thoughtlane_core::ports::{
    BaseRepository, CommentRepository, LikeRepository, PostRepository, TagRepository,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    /// Insertion order doubles as per-post tag order.
    tags: Vec<Tag>,
    likes: Vec<Like>,
}

impl Tables {
    fn author_of<T>(&self, item: T, user_id: Uuid) -> Result<Authored<T>, RepoError> {
        let author = self
            .users
            .get(&user_id)
            .ok_or_else(|| RepoError::Corrupt(format!("missing author {user_id}")))?;
        Ok(Authored::new(item, author.summary()))
    }

    /// Newest first, id as tie-breaker, then paged.
    fn page_posts<'a>(
        &self,
        posts: impl Iterator<Item = &'a Post>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Authored<Post>>, RepoError> {
        let mut posts: Vec<&Post> = posts.collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        posts
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .map(|p| self.author_of(p.clone(), p.user_id))
            .collect()
    }

    fn insert_tags(&mut self, post_id: Uuid, names: &[String]) -> Vec<Tag> {
        let mut added = Vec::new();
        for name in names {
            let taken = self
                .tags
                .iter()
                .any(|t| t.post_id == post_id && &t.name == name);
            if taken {
                continue;
            }
            let tag = Tag::new(post_id, name.clone());
            self.tags.push(tag.clone());
            added.push(tag);
        }
        added
    }

    fn matches(like: &Like, user_id: Uuid, target: LikeTarget) -> bool {
        like.user_id == user_id && like.target == target
    }
}

/// In-memory implementation of every repository port.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("Username already taken".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables.users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.user_id) {
            return Err(RepoError::MissingReference(format!("unknown user {}", post.user_id)));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        let user_id = slot.user_id;
        let created_at = slot.created_at;
        *slot = Post {
            user_id,
            created_at,
            ..post
        };
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_authored(&self, id: Uuid) -> Result<Option<Authored<Post>>, RepoError> {
        let tables = self.tables.read().await;
        tables
            .posts
            .get(&id)
            .map(|p| tables.author_of(p.clone(), p.user_id))
            .transpose()
    }

    async fn list_authored(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Authored<Post>>, RepoError> {
        let tables = self.tables.read().await;
        tables.page_posts(tables.posts.values(), limit, offset)
    }

    async fn list_authored_by_ids(
        &self,
        ids: &[Uuid],
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Authored<Post>>, RepoError> {
        let tables = self.tables.read().await;
        let wanted: HashSet<&Uuid> = ids.iter().collect();
        tables.page_posts(
            tables.posts.values().filter(|p| wanted.contains(&p.id)),
            limit,
            offset,
        )
    }

    async fn list_authored_by_user(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Authored<Post>>, RepoError> {
        let tables = self.tables.read().await;
        tables.page_posts(
            tables.posts.values().filter(|p| p.user_id == user_id),
            limit,
            offset,
        )
    }

    async fn create_with_tags(&self, post: Post, tags: &[String]) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.user_id) {
            return Err(RepoError::MissingReference(format!("unknown user {}", post.user_id)));
        }
        tables.posts.insert(post.id, post.clone());
        tables.insert_tags(post.id, tags);
        Ok(post)
    }

    async fn update_with_tags(
        &self,
        post: Post,
        tags: Option<&[String]>,
    ) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        slot.title = post.title;
        slot.summary = post.summary;
        slot.content = post.content;
        slot.cover_image_url = post.cover_image_url;
        let updated = slot.clone();

        if let Some(names) = tags {
            tables.tags.retain(|t| t.post_id != post.id);
            tables.insert_tags(post.id, names);
        }
        Ok(updated)
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        let comment_ids: HashSet<Uuid> = tables
            .comments
            .values()
            .filter(|c| c.post_id == id)
            .map(|c| c.id)
            .collect();
        tables.comments.retain(|_, c| c.post_id != id);
        tables.tags.retain(|t| t.post_id != id);
        tables.likes.retain(|l| match l.target {
            LikeTarget::Post(post_id) => post_id != id,
            LikeTarget::Comment(comment_id) => !comment_ids.contains(&comment_id),
        });
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn create(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::MissingReference(format!("unknown post {}", comment.post_id)));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .comments
            .get_mut(&comment.id)
            .ok_or(RepoError::NotFound)?;
        *slot = comment.clone();
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.comments.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_authored_by_post(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<Authored<Comment>>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        comments
            .into_iter()
            .map(|c| tables.author_of(c.clone(), c.user_id))
            .collect()
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.comments.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.likes.retain(|l| l.target != LikeTarget::Comment(id));
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Tag>, RepoError> {
        let mut tags = self.tables.read().await.tags.clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tags
            .iter()
            .filter(|t| t.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn add_to_post(&self, post_id: Uuid, names: &[String]) -> Result<Vec<Tag>, RepoError> {
        Ok(self.tables.write().await.insert_tags(post_id, names))
    }

    async fn remove_from_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.tags.len();
        tables.tags.retain(|t| t.post_id != post_id);
        Ok((before - tables.tags.len()) as u64)
    }

    async fn replace_for_post(
        &self,
        post_id: Uuid,
        names: &[String],
    ) -> Result<Vec<Tag>, RepoError> {
        let mut tables = self.tables.write().await;
        tables.tags.retain(|t| t.post_id != post_id);
        Ok(tables.insert_tags(post_id, names))
    }

    async fn post_ids_by_name(&self, name: &str) -> Result<Vec<Uuid>, RepoError> {
        let tables = self.tables.read().await;
        let mut ids: Vec<Uuid> = Vec::new();
        for tag in tables.tags.iter().filter(|t| t.name == name) {
            if !ids.contains(&tag.post_id) {
                ids.push(tag.post_id);
            }
        }
        Ok(ids)
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn toggle(&self, user_id: Uuid, target: LikeTarget) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.likes.len();
        tables
            .likes
            .retain(|l| !Tables::matches(l, user_id, target));

        if tables.likes.len() < before {
            return Ok(false);
        }
        tables.likes.push(Like::new(user_id, target));
        Ok(true)
    }

    async fn count(&self, target: LikeTarget) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.likes.iter().filter(|l| l.target == target).count() as u64)
    }

    async fn exists(&self, user_id: Uuid, target: LikeTarget) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .any(|l| Tables::matches(l, user_id, target)))
    }

    async fn count_for_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError> {
        let tables = self.tables.read().await;
        let mut counts = HashMap::new();
        for like in &tables.likes {
            if let LikeTarget::Post(post_id) = like.target {
                if post_ids.contains(&post_id) {
                    *counts.entry(post_id).or_insert(0) += 1;
                }
            }
        }
        Ok(counts)
    }

    async fn liked_posts(
        &self,
        post_ids: &[Uuid],
        user_id: Uuid,
    ) -> Result<HashSet<Uuid>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .filter(|l| l.user_id == user_id)
            .filter_map(|l| l.target.post_id())
            .filter(|id| post_ids.contains(id))
            .collect())
    }
}
