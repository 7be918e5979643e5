use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag row - one per (post, name) pair. Names are not globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub post_id: Uuid,
    pub name: String,
}

impl Tag {
    pub fn new(post_id: Uuid, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            name,
        }
    }
}

/// A distinct tag name with one representative row id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    pub tag_id: Uuid,
    pub name: String,
}

/// Trim each name, drop blanks and repeated names. Case is preserved and
/// the first occurrence keeps its position.
pub fn normalize_tag_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() || out.iter().any(|n| n == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}

/// Collapse rows to distinct names sorted ascending. For each name the
/// representative id is the first row seen after a stable sort by name.
pub fn distinct_by_name(mut tags: Vec<Tag>) -> Vec<TagSummary> {
    tags.sort_by(|a, b| a.name.cmp(&b.name));
    let mut out: Vec<TagSummary> = Vec::new();
    for tag in tags {
        if out.last().is_some_and(|last| last.name == tag.name) {
            continue;
        }
        out.push(TagSummary {
            tag_id: tag.id,
            name: tag.name,
        });
    }
    out
}
