//! Services - the business operations, written against the ports.

mod account;
mod comment;
mod like;
mod post;
mod session;
mod tag;

pub use account::{AccountService, MIN_PASSWORD_LEN};
pub use comment::CommentService;
pub use like::LikeService;
pub use post::PostService;
pub use session::{Identity, SessionGate};
pub use tag::TagService;
