//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterMemberRequest {
    pub name: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// A member's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub name: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub photo_path: String,
    pub caption: Option<String>,
    pub location: Option<String>,
    pub like_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to replace a post's photo path, caption and location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostUpdateRequest {
    pub photo_path: String,
    pub caption: Option<String>,
    pub location: Option<String>,
}

/// Query string accepted by post search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostSearchQuery {
    pub author_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub caption: Option<String>,
    pub location: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

/// One row of a post search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummaryResponse {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub photo_path: String,
    pub caption: Option<String>,
    pub location: Option<String>,
    pub like_count: u64,
    pub created_at: DateTime<Utc>,
}

/// Request to comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentWriteRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Whether the caller has liked a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeStatusResponse {
    pub post_id: Uuid,
    pub liked: bool,
}
