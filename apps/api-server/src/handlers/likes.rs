//! Like handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use photogram_shared::ApiResponse;
use photogram_shared::dto::LikeStatusResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{id}/likes
pub async fn like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .sns
        .like_post(identity.member_id, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/posts/{id}/likes
pub async fn unlike(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .sns
        .unlike_post(identity.member_id, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/posts/{id}/likes/me
pub async fn my_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let liked = state
        .sns
        .is_post_liked_by_user(post_id, identity.member_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(LikeStatusResponse { post_id, liked })))
}
