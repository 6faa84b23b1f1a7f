//! Domain entities - the core business objects.

mod comment;
mod member;
mod post;
mod search;

pub use comment::{Comment, MAX_COMMENT_LEN};
pub use member::{MAX_MEMBER_NAME_LEN, Member};
pub use post::{MAX_CAPTION_LEN, MAX_LOCATION_LEN, Post, PostUpdate, PhotoUpload, is_liked_by};
pub use search::{PostSearchCondition, PostSearchResult};

use crate::error::DomainError;

/// Reject an optional text field longer than `max` characters.
pub(crate) fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<(), DomainError> {
    match value {
        Some(v) if v.chars().count() > max => Err(DomainError::Validation(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}
