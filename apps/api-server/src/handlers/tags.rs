//! Tag listing.

use actix_web::{HttpResponse, web};

use thoughtlane_shared::dto::TagResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /tags - distinct names, sorted.
pub async fn list_tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags: Vec<TagResponse> = state
        .tags
        .all()
        .await?
        .into_iter()
        .map(|t| TagResponse {
            tag_id: t.tag_id,
            name: t.name,
        })
        .collect();

    Ok(HttpResponse::Ok().json(tags))
}
