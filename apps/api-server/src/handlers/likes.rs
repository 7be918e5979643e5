//! Like toggles and like summaries.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use thoughtlane_shared::dto::{LikeSummaryResponse, ToggleLikeResponse};

use crate::middleware::auth::{Authenticated, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /like/post/{id}
pub async fn toggle_post_like(
    state: web::Data<AppState>,
    user: Authenticated,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let outcome = state.likes.toggle_post_like(post_id, user.user_id).await?;
    let like_count = state.likes.count_for_post(post_id).await?;

    Ok(HttpResponse::Ok().json(ToggleLikeResponse {
        liked: outcome.liked,
        like_count,
    }))
}

/// POST /like/comment/{id}
pub async fn toggle_comment_like(
    state: web::Data<AppState>,
    user: Authenticated,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment_id = path.into_inner();

    let outcome = state
        .likes
        .toggle_comment_like(comment_id, user.user_id)
        .await?;
    let like_count = state.likes.count_for_comment(comment_id).await?;

    Ok(HttpResponse::Ok().json(ToggleLikeResponse {
        liked: outcome.liked,
        like_count,
    }))
}

/// GET /post/{id}/likes
pub async fn post_likes(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    Ok(HttpResponse::Ok().json(LikeSummaryResponse {
        like_count: state.likes.count_for_post(post_id).await?,
        user_liked: state
            .likes
            .has_user_liked_post(post_id, viewer.user_id())
            .await?,
    }))
}

/// GET /comment/{id}/likes
pub async fn comment_likes(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment_id = path.into_inner();

    Ok(HttpResponse::Ok().json(LikeSummaryResponse {
        like_count: state.likes.count_for_comment(comment_id).await?,
        user_liked: state
            .likes
            .has_user_liked_comment(comment_id, viewer.user_id())
            .await?,
    }))
}
