use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Longest display name a member may register with.
pub const MAX_MEMBER_NAME_LEN: usize = 20;

/// Member entity - an account that can post, comment and like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Create a new member with generated ID and timestamps.
    pub fn new(name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check a display name before it is used for registration.
    pub fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation("Name must not be empty".to_string()));
        }
        if trimmed.chars().count() > MAX_MEMBER_NAME_LEN {
            return Err(DomainError::Validation(format!(
                "Name must be at most {MAX_MEMBER_NAME_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(Member::validate_name("alice").is_ok());
        assert!(Member::validate_name("   ").is_err());
        assert!(Member::validate_name(&"x".repeat(MAX_MEMBER_NAME_LEN + 1)).is_err());
    }
}
