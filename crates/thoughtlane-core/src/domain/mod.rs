//! Domain entities - the core business objects.

mod comment;
mod like;
mod page;
mod post;
mod tag;
mod user;

pub use comment::Comment;
pub use like::{Like, LikeTarget, ToggleOutcome};
pub use page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageQuery};
pub use post::{NewPost, Post, PostChanges, Upload};
pub use tag::{Tag, TagSummary, distinct_by_name, normalize_tag_names};
pub use user::{AuthorSummary, Authored, User};
