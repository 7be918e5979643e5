//! Post handlers: create, update, read, list and delete.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use thoughtlane_core::domain::{AuthorSummary, Authored, NewPost, Page, PageQuery, Post, PostChanges};
use thoughtlane_shared::SuccessResponse;
use thoughtlane_shared::dto::{AuthorResponse, PostResponse, UploadResponse};

use super::form::UploadForm;
use crate::middleware::auth::{Authenticated, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn author_response(author: AuthorSummary) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username,
        name: author.name,
    }
}

fn post_response(authored: Authored<Post>) -> PostResponse {
    let Authored { item: post, author } = authored;
    PostResponse {
        id: post.id,
        title: post.title,
        summary: post.summary,
        content: post.content,
        cover: post.cover_image_url,
        author: author_response(author),
        created_at: post.created_at,
        tags: None,
        like_count: None,
        user_liked: None,
    }
}

/// Render a listing with like counts and the viewer's like state, two
/// batch lookups for the whole page.
async fn listing(
    state: &AppState,
    posts: Vec<Authored<Post>>,
    viewer: &OptionalIdentity,
) -> AppResult<Vec<PostResponse>> {
    let ids: Vec<Uuid> = posts.iter().map(|p| p.item.id).collect();
    let counts = state.likes.counts_for_posts(&ids).await?;
    let liked = state.likes.user_likes_for_posts(&ids, viewer.user_id()).await?;

    Ok(posts
        .into_iter()
        .map(|authored| {
            let id = authored.item.id;
            PostResponse {
                like_count: Some(counts.get(&id).copied().unwrap_or(0)),
                user_liked: Some(liked.get(&id).copied().unwrap_or(false)),
                ..post_response(authored)
            }
        })
        .collect())
}

/// POST /post (multipart: title, summary, content, tags, file)
pub async fn create_post(
    state: web::Data<AppState>,
    user: Authenticated,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = UploadForm::read(payload, state.max_upload_bytes).await?;
    let draft = NewPost {
        title: form.text("title").unwrap_or_default(),
        summary: form.text("summary").unwrap_or_default(),
        content: form.text("content").unwrap_or_default(),
    };
    let tags = form.tags();

    let post = state
        .posts
        .create(user.user_id, draft, form.file, tags)
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// PUT /post (multipart: id, optional title/summary/content, tags, file)
pub async fn update_post(
    state: web::Data<AppState>,
    user: Authenticated,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = UploadForm::read(payload, state.max_upload_bytes).await?;
    let post_id = form
        .text("id")
        .and_then(|id| Uuid::parse_str(id.trim()).ok())
        .ok_or_else(|| AppError::BadRequest("A valid post id is required".to_string()))?;
    let changes = PostChanges {
        title: form.text("title"),
        summary: form.text("summary"),
        content: form.text("content"),
    };
    let tags = form.tags();

    let post = state
        .posts
        .update(post_id, user.user_id, changes, form.file, tags)
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// GET /post?limit&page
pub async fn list_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list(Page::from(query.into_inner())).await?;

    Ok(HttpResponse::Ok().json(listing(&state, posts, &viewer).await?))
}

/// GET /post/{id} - includes the post's tag names.
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state.posts.get(post_id).await?;
    let tags = state.tags.by_post(post_id).await?;

    Ok(HttpResponse::Ok().json(PostResponse {
        tags: Some(tags.into_iter().map(|t| t.name).collect()),
        ..post_response(post)
    }))
}

/// DELETE /post/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    user: Authenticated,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete(path.into_inner(), user.user_id).await?;

    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

/// GET /posts/tag/{tag_name}?limit&page
pub async fn posts_by_tag(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .list_by_tag(&path.into_inner(), Page::from(query.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(listing(&state, posts, &viewer).await?))
}

/// GET /user/{id}/posts?limit&page
pub async fn posts_by_user(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .list_by_author(path.into_inner(), Page::from(query.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(listing(&state, posts, &viewer).await?))
}

/// POST /upload-content-image (multipart: file)
pub async fn upload_content_image(
    state: web::Data<AppState>,
    _user: Authenticated,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = UploadForm::read(payload, state.max_upload_bytes).await?;
    let upload = form
        .file
        .ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    let url = state.posts.upload_inline_image(upload).await?;

    Ok(HttpResponse::Ok().json(UploadResponse { url }))
}
