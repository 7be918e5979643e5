//! Authentication extractors.
//!
//! The session token is read from the `token` cookie, falling back to an
//! `Authorization: Bearer` header for non-browser clients.

use std::future::{Ready, ready};
use std::ops::Deref;

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, http::header, web};

use thoughtlane_core::ports::AuthError;
use thoughtlane_core::services::Identity;

use super::error::AppError;
use crate::observability::record_user;
use crate::state::AppState;

/// Name of the session cookie.
pub const TOKEN_COOKIE: &str = "token";

/// The raw credential presented with the request, if any.
fn credential(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn resolve(req: &HttpRequest) -> Result<Option<Identity>, AppError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        return Err(AppError::Internal("AppState not found in app data".to_string()));
    };

    let identity = state.session.authenticate(credential(req).as_deref())?;
    if let Some(identity) = &identity {
        record_user(&req.extensions(), identity.user_id);
    }
    Ok(identity)
}

/// Authenticated caller - rejects the request with 401 when absent.
///
/// ```ignore
/// async fn protected_route(user: Authenticated) -> impl Responder {
///     format!("Hello, {}!", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

impl Deref for Authenticated {
    type Target = Identity;

    fn deref(&self) -> &Identity {
        &self.0
    }
}

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(match resolve(req) {
            Ok(Some(identity)) => Ok(Authenticated(identity)),
            Ok(None) => Err(AuthError::MissingAuth.into()),
            Err(e) => Err(e),
        })
    }
}

/// Optional identity extractor - anonymous callers get `None`.
///
/// A credential that is present but invalid or expired is still rejected.
#[derive(Debug, Clone)]
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|identity| identity.user_id)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req).map(OptionalIdentity))
    }
}
