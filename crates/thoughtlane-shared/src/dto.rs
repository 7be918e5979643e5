//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response to a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredResponse {
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
}

/// The authenticated caller, as returned by login and profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub username: String,
}

/// Embedded author of a post or comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

/// A post as rendered to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub cover: Option<String>,
    pub author: AuthorResponse,
    pub created_at: DateTime<Utc>,
    /// Tag names, only on single-post reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "likeCount", default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(rename = "userLiked", default, skip_serializing_if = "Option::is_none")]
    pub user_liked: Option<bool>,
}

/// Request to add a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    pub content: String,
}

/// A comment as rendered to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: AuthorResponse,
}

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToggleLikeResponse {
    pub liked: bool,
    #[serde(rename = "likeCount")]
    pub like_count: u64,
}

/// Like state of a single post or comment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LikeSummaryResponse {
    #[serde(rename = "likeCount")]
    pub like_count: u64,
    #[serde(rename = "userLiked")]
    pub user_liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub tag_id: Uuid,
    pub name: String,
}

/// URL of a freshly stored image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> PostResponse {
        PostResponse {
            id: Uuid::nil(),
            title: "Hello".to_string(),
            summary: "Intro".to_string(),
            content: "<p>Hi</p>".to_string(),
            cover: None,
            author: AuthorResponse {
                id: Uuid::nil(),
                username: "alice@example.com".to_string(),
                name: "alice".to_string(),
            },
            created_at: Utc::now(),
            tags: None,
            like_count: None,
            user_liked: None,
        }
    }

    #[test]
    fn test_post_omits_absent_extras() {
        let body = serde_json::to_value(post()).unwrap();

        assert!(body.get("tags").is_none());
        assert!(body.get("likeCount").is_none());
        assert!(body["cover"].is_null());
        assert_eq!(body["author"]["name"], "alice");
    }

    #[test]
    fn test_post_engagement_fields_are_camel_case() {
        let body = serde_json::to_value(PostResponse {
            like_count: Some(3),
            user_liked: Some(true),
            ..post()
        })
        .unwrap();

        assert_eq!(body["likeCount"], 3);
        assert_eq!(body["userLiked"], true);
    }

    #[test]
    fn test_toggle_response_shape() {
        let body = serde_json::to_value(ToggleLikeResponse {
            liked: true,
            like_count: 1,
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({ "liked": true, "likeCount": 1 }));
    }
}
