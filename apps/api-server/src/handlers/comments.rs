//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use photogram_core::domain::Comment;
use photogram_shared::ApiResponse;
use photogram_shared::dto::{CommentResponse, CommentWriteRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        author_id: comment.author_id,
        message: comment.message,
        created_at: comment.created_at,
    }
}

/// POST /api/posts/{id}/comments
pub async fn write_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentWriteRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .sns
        .write_comment(identity.member_id, path.into_inner(), body.into_inner().message)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(comment_response(comment))))
}

/// GET /api/posts/{id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments: Vec<CommentResponse> = state
        .sns
        .get_comments(path.into_inner())
        .await?
        .into_iter()
        .map(comment_response)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(comments)))
}
