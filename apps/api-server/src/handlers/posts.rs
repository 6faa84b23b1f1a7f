//! Post handlers: upload, listing, search, modification and removal.

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures::StreamExt;
use uuid::Uuid;

use photogram_core::domain::{
    PhotoUpload, Post, PostSearchCondition, PostSearchResult, PostUpdate,
};
use photogram_shared::ApiResponse;
use photogram_shared::dto::{
    PostResponse, PostSearchQuery, PostSummaryResponse, PostUpdateRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        like_count: post.like_count() as u64,
        id: post.id,
        author_id: post.author_id,
        photo_path: post.photo_path,
        caption: post.caption,
        location: post.location,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn summary_response(row: PostSearchResult) -> PostSummaryResponse {
    PostSummaryResponse {
        post_id: row.post_id,
        author_id: row.author_id,
        author_name: row.author_name,
        photo_path: row.photo_path,
        caption: row.caption,
        location: row.location,
        like_count: row.like_count,
        created_at: row.created_at,
    }
}

/// Fields collected from a `multipart/form-data` post upload.
#[derive(Default)]
struct PostForm {
    photo: Option<PhotoUpload>,
    caption: Option<String>,
    location: Option<String>,
}

async fn read_field(field: &mut Field, limit: usize) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let bytes = chunk.map_err(|e| {
            tracing::warn!("Error reading upload field: {}", e);
            AppError::BadRequest("Malformed multipart body".to_string())
        })?;
        if buf.len() + bytes.len() > limit {
            return Err(AppError::BadRequest(format!(
                "Upload exceeds the {} byte limit",
                limit
            )));
        }
        buf.extend_from_slice(&bytes);
    }
    Ok(buf)
}

fn text(bytes: Vec<u8>) -> AppResult<Option<String>> {
    let value = String::from_utf8(bytes)
        .map_err(|_| AppError::BadRequest("Form fields must be UTF-8".to_string()))?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

async fn read_form(mut payload: Multipart, max_photo_bytes: usize) -> AppResult<PostForm> {
    let mut form = PostForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::BadRequest(e.to_string()))?;
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "photo" => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();
                let bytes = read_field(&mut field, max_photo_bytes).await?;
                form.photo = Some(PhotoUpload::new(file_name, bytes));
            }
            "caption" => form.caption = text(read_field(&mut field, max_photo_bytes).await?)?,
            "location" => form.location = text(read_field(&mut field, max_photo_bytes).await?)?,
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
                read_field(&mut field, max_photo_bytes).await?;
            }
        }
    }

    Ok(form)
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_form(payload, state.max_photo_bytes).await?;
    let photo = form
        .photo
        .ok_or_else(|| AppError::BadRequest("A photo file is required".to_string()))?;

    let post = state
        .sns
        .register_post(identity.member_id, photo, form.caption, form.location)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        post_response(post),
        "Post created",
    )))
}

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts: Vec<PostResponse> = state
        .sns
        .get_all_posts()
        .await?
        .into_iter()
        .map(post_response)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /api/posts/search
pub async fn search_posts(
    state: web::Data<AppState>,
    query: web::Query<PostSearchQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let condition = PostSearchCondition {
        author_id: query.author_id,
        author_name: query.author_name,
        caption: query.caption,
        location: query.location,
        created_from: query.created_from,
        created_to: query.created_to,
    };

    let rows: Vec<PostSummaryResponse> = state
        .sns
        .search_by_conditions(&condition)
        .await?
        .into_iter()
        .map(summary_response)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(rows)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.sns.get_post_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post))))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostUpdateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let update = PostUpdate {
        photo_path: req.photo_path,
        caption: req.caption,
        location: req.location,
    };

    let post = state.sns.modify_post(path.into_inner(), update).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post))))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.sns.remove_post(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
