//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use thoughtlane_core::domain::{Authored, Comment};
use thoughtlane_shared::SuccessResponse;
use thoughtlane_shared::dto::{CommentResponse, CreateCommentRequest};

use super::posts::author_response;
use crate::middleware::auth::Authenticated;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn comment_response(authored: Authored<Comment>) -> CommentResponse {
    let Authored {
        item: comment,
        author,
    } = authored;
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        content: comment.content,
        created_at: comment.created_at,
        author: author_response(author),
    }
}

/// POST /comment
pub async fn create_comment(
    state: web::Data<AppState>,
    user: Authenticated,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let comment = state
        .comments
        .create(req.post_id, user.user_id, &req.content)
        .await?;

    Ok(HttpResponse::Ok().json(comment_response(comment)))
}

/// GET /post/{id}/comments - oldest first.
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments = state.comments.list_by_post(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(
        comments
            .into_iter()
            .map(comment_response)
            .collect::<Vec<_>>(),
    ))
}

/// DELETE /comment/{id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    user: Authenticated,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .comments
        .delete(path.into_inner(), user.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}
