use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const MAX_COMMENT_LEN: usize = 1000;

/// Comment entity - a message a member left on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            message,
            created_at: Utc::now(),
        }
    }

    pub fn validate_message(message: &str) -> Result<(), DomainError> {
        if message.trim().is_empty() {
            return Err(DomainError::Validation("Message must not be empty".to_string()));
        }
        if message.chars().count() > MAX_COMMENT_LEN {
            return Err(DomainError::Validation(format!(
                "Message must be at most {MAX_COMMENT_LEN} characters"
            )));
        }
        Ok(())
    }
}
