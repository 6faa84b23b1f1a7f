use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Post;
use crate::error::DomainError;

/// Filter for post search. Every field is optional; set fields are ANDed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostSearchCondition {
    pub author_id: Option<Uuid>,
    /// Substring of the author's display name.
    pub author_name: Option<String>,
    /// Substring of the caption.
    pub caption: Option<String>,
    /// Substring of the location.
    pub location: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

impl PostSearchCondition {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let (Some(from), Some(to)) = (self.created_from, self.created_to) {
            if from > to {
                return Err(DomainError::Validation(
                    "created_from must not be after created_to".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Evaluate the condition against a post and its author's display name.
    ///
    /// Stores that can push the filter down to the database do not need this;
    /// it is the reference semantics for the ones that cannot.
    pub fn matches(&self, post: &Post, author_name: &str) -> bool {
        fn contains(haystack: Option<&str>, needle: &Option<String>) -> bool {
            match needle {
                Some(n) => haystack.is_some_and(|h| h.contains(n.as_str())),
                None => true,
            }
        }

        self.author_id.is_none_or(|id| id == post.author_id)
            && contains(Some(author_name), &self.author_name)
            && contains(post.caption.as_deref(), &self.caption)
            && contains(post.location.as_deref(), &self.location)
            && self.created_from.is_none_or(|from| post.created_at >= from)
            && self.created_to.is_none_or(|to| post.created_at <= to)
    }
}

/// Summary row returned by post search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSearchResult {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub photo_path: String,
    pub caption: Option<String>,
    pub location: Option<String>,
    pub like_count: u64,
    pub created_at: DateTime<Utc>,
}

impl PostSearchResult {
    pub fn from_post(post: &Post, author_name: impl Into<String>) -> Self {
        Self {
            post_id: post.id,
            author_id: post.author_id,
            author_name: author_name.into(),
            photo_path: post.photo_path.clone(),
            caption: post.caption.clone(),
            location: post.location.clone(),
            like_count: post.like_count() as u64,
            created_at: post.created_at,
        }
    }
}
