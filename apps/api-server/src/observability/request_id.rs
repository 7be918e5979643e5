//! Request correlation ids.
//!
//! Every request carries an id in `X-Request-ID`: adopted from the caller
//! (a browser proxy or load balancer) when it looks sane, minted otherwise,
//! and always echoed on the response.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use actix_web::middleware::Next;
use actix_web::{Error, HttpMessage};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied id that is adopted as-is.
const MAX_ADOPTED_LEN: usize = 64;

/// The id stored in request extensions for the root span to pick up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| Self::adoptable(id))
            .map(|id| Self(id.to_string()))
            .unwrap_or_else(|| Self(Uuid::new_v4().to_string()))
    }

    fn adoptable(id: &str) -> bool {
        !id.is_empty()
            && id.len() <= MAX_ADOPTED_LEN
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `from_fn` middleware: resolve the id, stash it, echo it back.
///
/// Must wrap outside `TracingLogger` so the root span can read it.
pub async fn propagate_request_id(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let request_id = RequestId::from_headers(req.headers());
    req.extensions_mut().insert(request_id.clone());

    let mut res = next.call(req).await?;

    // Adopted and minted ids are both header-safe.
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        res.headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use actix_web::middleware::from_fn;
    use actix_web::{App, HttpResponse, test, web};

    use super::*;

    fn headers(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderValue::from_str(id).unwrap(),
        );
        headers
    }

    #[::core::prelude::v1::test]
    fn test_sane_caller_id_is_adopted() {
        assert_eq!(RequestId::from_headers(&headers("lb-1234.a_b")).as_str(), "lb-1234.a_b");
    }

    #[::core::prelude::v1::test]
    fn test_odd_caller_id_is_replaced() {
        let long = "a".repeat(MAX_ADOPTED_LEN + 1);
        for id in ["", "has space", "semi;colon", long.as_str()] {
            let minted = RequestId::from_headers(&headers(id));
            assert!(Uuid::parse_str(minted.as_str()).is_ok(), "{id:?} was adopted");
        }

        let minted = RequestId::from_headers(&HeaderMap::new());
        assert!(Uuid::parse_str(minted.as_str()).is_ok());
    }

    #[actix_web::test]
    async fn test_id_is_echoed_and_visible_to_handlers() {
        let app = test::init_service(
            App::new().wrap(from_fn(propagate_request_id)).route(
                "/",
                web::get().to(|req: actix_web::HttpRequest| async move {
                    let id = req.extensions().get::<RequestId>().cloned();
                    HttpResponse::Ok().body(id.map(|id| id.0).unwrap_or_default())
                }),
            ),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/")
                .insert_header((REQUEST_ID_HEADER, "edge-42"))
                .to_request(),
        )
        .await;

        assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "edge-42");
        assert_eq!(test::read_body(resp).await, "edge-42");
    }
}
