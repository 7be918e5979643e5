//! Root span for every HTTP request.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage};
use tracing::Span;
use tracing_actix_web::{DefaultRootSpanBuilder, RootSpan, RootSpanBuilder};
use uuid::Uuid;

use super::RequestId;

/// The default `tracing-actix-web` span plus the `X-Request-ID` value as
/// `correlation_id`, and a `user_id` slot filled once the caller is
/// authenticated. The builder's own `request_id` is per hop; the
/// correlation id survives proxies.
pub struct ThoughtLaneRootSpan;

impl RootSpanBuilder for ThoughtLaneRootSpan {
    fn on_request_start(request: &ServiceRequest) -> Span {
        let correlation_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default();

        tracing_actix_web::root_span!(
            request,
            correlation_id = %correlation_id,
            user_id = tracing::field::Empty
        )
    }

    fn on_request_end<B: MessageBody>(span: Span, outcome: &Result<ServiceResponse<B>, Error>) {
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}

/// Record the authenticated caller on the request's root span, if any.
pub fn record_user(extensions: &actix_web::dev::Extensions, user_id: Uuid) {
    if let Some(span) = extensions.get::<RootSpan>() {
        span.record("user_id", tracing::field::display(user_id));
    }
}
