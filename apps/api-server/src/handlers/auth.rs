//! Account and session handlers.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, web};

use thoughtlane_shared::dto::{LoginRequest, RegisterRequest, RegisteredResponse, SessionResponse};

use crate::middleware::auth::{Authenticated, TOKEN_COOKIE};
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn session_cookie(value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .finish()
}

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state.accounts.register(&req.username, &req.password).await?;
    tracing::debug!(user_id = %user.id, "Registration complete");

    Ok(HttpResponse::Ok().json(RegisteredResponse {
        user_id: user.id,
        username: user.username,
        name: user.name,
    }))
}

/// POST /login - sets the session cookie.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state.accounts.login(&req.username, &req.password).await?;
    let token = state.session.issue(user.id, &user.username)?;
    let lifetime = Duration::seconds(state.session.token_lifetime_seconds());
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, lifetime, state.cookie_secure))
        .json(SessionResponse {
            id: user.id,
            username: user.username,
        }))
}

/// GET /profile
pub async fn profile(user: Authenticated) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(SessionResponse {
        id: user.user_id,
        username: user.username.clone(),
    }))
}

/// POST /logout - clears the session cookie.
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(session_cookie(String::new(), Duration::ZERO, state.cookie_secure))
        .json("ok")
}
