use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - represents a registered author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user. The display name defaults to the part of the
    /// username before an `@`.
    pub fn new(username: String, password_hash: String) -> Self {
        let name = username
            .split('@')
            .next()
            .unwrap_or(username.as_str())
            .to_string();

        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            name,
            created_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
        }
    }
}

/// The public slice of a user embedded in posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

/// A post or comment together with its author summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Authored<T> {
    #[serde(flatten)]
    pub item: T,
    pub author: AuthorSummary,
}

impl<T> Authored<T> {
    pub fn new(item: T, author: AuthorSummary) -> Self {
        Self { item, author }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_defaults_to_local_part() {
        let user = User::new("alice@example.com".into(), "hash".into());
        assert_eq!(user.name, "alice");

        let user = User::new("bob".into(), "hash".into());
        assert_eq!(user.name, "bob");
    }
}
