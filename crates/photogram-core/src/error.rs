//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::StorageError;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Member not found: {0}")]
    MemberNotFound(Uuid),

    #[error("Post not found: {0}")]
    PostNotFound(Uuid),

    #[error("Photo storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Member {member_id} already liked post {post_id}")]
    AlreadyLiked { member_id: Uuid, post_id: Uuid },

    #[error("Member {member_id} has not liked post {post_id}")]
    AlreadyUnliked { member_id: Uuid, post_id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Repository(#[from] RepoError),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
