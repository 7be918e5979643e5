//! Request correlation: ids on the wire and on the root tracing span.

mod request_id;
mod span;

pub use request_id::{RequestId, propagate_request_id};
pub use span::{ThoughtLaneRootSpan, record_user};
