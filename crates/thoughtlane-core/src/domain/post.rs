use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog post owned by its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// Owner. Never changes after creation.
    pub user_id: Uuid,
    pub title: String,
    pub summary: String,
    /// Rich text, stored as-is.
    pub content: String,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(user_id: Uuid, draft: NewPost, cover_image_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: draft.title,
            summary: draft.summary,
            content: draft.content,
            cover_image_url,
            created_at: Utc::now(),
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Fields supplied when creating a post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub summary: String,
    pub content: String,
}

/// Partial update of a post. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
}

impl PostChanges {
    /// Apply the supplied fields, leaving ownership and timestamps alone.
    pub fn apply_to(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(summary) = self.summary {
            post.summary = summary;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
    }
}

/// A file received from a client, not yet written to storage.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// The lowercase extension of the original filename, if any.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.filename.rsplit_once('.')?;
        if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_overwrite_only_supplied_fields() {
        let owner = Uuid::new_v4();
        let mut post = Post::new(
            owner,
            NewPost {
                title: "Old".into(),
                summary: "sum".into(),
                content: "body".into(),
            },
            Some("https://cdn/a.png".into()),
        );

        PostChanges {
            title: Some("New".into()),
            ..Default::default()
        }
        .apply_to(&mut post);

        assert_eq!(post.title, "New");
        assert_eq!(post.summary, "sum");
        assert_eq!(post.content, "body");
        assert_eq!(post.cover_image_url.as_deref(), Some("https://cdn/a.png"));
        assert_eq!(post.user_id, owner);
    }

    #[test]
    fn upload_extension() {
        let upload = |name: &str| Upload {
            filename: name.into(),
            content_type: "image/png".into(),
            bytes: vec![],
        };
        assert_eq!(upload("cover.PNG").extension().as_deref(), Some("png"));
        assert_eq!(upload("cover").extension(), None);
        assert_eq!(upload("../../etc/pa$$wd.x/y").extension(), None);
    }
}
