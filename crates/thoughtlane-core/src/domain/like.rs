use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a like points at. Storage keeps two nullable columns; this type
/// makes the "both set" and "neither set" states unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum LikeTarget {
    Post(Uuid),
    Comment(Uuid),
}

impl LikeTarget {
    /// Rebuild a target from the stored column pair.
    pub fn from_columns(post_id: Option<Uuid>, comment_id: Option<Uuid>) -> Option<Self> {
        match (post_id, comment_id) {
            (Some(id), None) => Some(Self::Post(id)),
            (None, Some(id)) => Some(Self::Comment(id)),
            _ => None,
        }
    }

    pub fn post_id(&self) -> Option<Uuid> {
        match self {
            Self::Post(id) => Some(*id),
            Self::Comment(_) => None,
        }
    }

    pub fn comment_id(&self) -> Option<Uuid> {
        match self {
            Self::Comment(id) => Some(*id),
            Self::Post(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Post(_) => "post",
            Self::Comment(_) => "comment",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Post(id) | Self::Comment(id) => *id,
        }
    }
}

/// Like row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target: LikeTarget,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(user_id: Uuid, target: LikeTarget) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            target,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of a toggle: the state after the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_requires_exactly_one_column() {
        let id = Uuid::new_v4();
        assert_eq!(
            LikeTarget::from_columns(Some(id), None),
            Some(LikeTarget::Post(id))
        );
        assert_eq!(
            LikeTarget::from_columns(None, Some(id)),
            Some(LikeTarget::Comment(id))
        );
        assert_eq!(LikeTarget::from_columns(None, None), None);
        assert_eq!(LikeTarget::from_columns(Some(id), Some(id)), None);
    }
}
