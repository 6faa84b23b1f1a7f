use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::check_len;
use crate::error::DomainError;

pub const MAX_CAPTION_LEN: usize = 500;
pub const MAX_LOCATION_LEN: usize = 100;

/// Post entity - a photo shared by a member.
///
/// `liked_by` is the like-set: each member appears at most once. Comments are
/// not embedded here; they live in the comment store and are keyed by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub photo_path: String,
    pub caption: Option<String>,
    pub location: Option<String>,
    pub liked_by: BTreeSet<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with an empty like-set.
    pub fn new(
        author_id: Uuid,
        photo_path: String,
        caption: Option<String>,
        location: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            photo_path,
            caption,
            location,
            liked_by: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the mutable fields. Author and id stay as they are.
    pub fn apply(&mut self, update: PostUpdate) {
        self.photo_path = update.photo_path;
        self.caption = update.caption;
        self.location = update.location;
        self.updated_at = Utc::now();
    }

    pub fn like_count(&self) -> usize {
        self.liked_by.len()
    }
}

/// Whether `member_id` is part of a post's like-set.
pub fn is_liked_by(liked_by: &BTreeSet<Uuid>, member_id: Uuid) -> bool {
    liked_by.contains(&member_id)
}

/// Replacement values for a post's mutable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostUpdate {
    pub photo_path: String,
    pub caption: Option<String>,
    pub location: Option<String>,
}

impl PostUpdate {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.photo_path.trim().is_empty() {
            return Err(DomainError::Validation(
                "Photo path must not be empty".to_string(),
            ));
        }
        check_len("Caption", self.caption.as_deref(), MAX_CAPTION_LEN)?;
        check_len("Location", self.location.as_deref(), MAX_LOCATION_LEN)
    }
}

/// Raw photo received with an upload, before it is stored.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.file_name.trim().is_empty() {
            return Err(DomainError::Validation("Photo file name is required".to_string()));
        }
        if self.bytes.is_empty() {
            return Err(DomainError::Validation("Photo must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_liked_by() {
        let member = Uuid::new_v4();
        let mut likes = BTreeSet::new();
        assert!(!is_liked_by(&likes, member));

        likes.insert(member);
        assert!(is_liked_by(&likes, member));
        assert!(!is_liked_by(&likes, Uuid::new_v4()));
    }

    #[test]
    fn test_apply_keeps_identity() {
        let author = Uuid::new_v4();
        let mut post = Post::new(author, "/photos/a.jpg".into(), Some("Sunset".into()), None);
        let id = post.id;

        post.apply(PostUpdate {
            photo_path: "/photos/b.jpg".into(),
            caption: None,
            location: Some("Beach".into()),
        });

        assert_eq!(post.id, id);
        assert_eq!(post.author_id, author);
        assert_eq!(post.photo_path, "/photos/b.jpg");
        assert_eq!(post.caption, None);
        assert_eq!(post.location.as_deref(), Some("Beach"));
    }

    #[test]
    fn test_update_validation() {
        let update = PostUpdate {
            photo_path: "/photos/a.jpg".into(),
            caption: Some("c".repeat(MAX_CAPTION_LEN)),
            location: Some("l".repeat(MAX_LOCATION_LEN)),
        };
        assert!(update.validate().is_ok());

        let too_long = PostUpdate {
            caption: Some("c".repeat(MAX_CAPTION_LEN + 1)),
            ..update.clone()
        };
        assert!(matches!(too_long.validate(), Err(DomainError::Validation(_))));

        let no_photo = PostUpdate {
            photo_path: " ".into(),
            ..update
        };
        assert!(no_photo.validate().is_err());
    }

    #[test]
    fn test_photo_upload_validation() {
        assert!(PhotoUpload::new("a.jpg", vec![1, 2, 3]).validate().is_ok());
        assert!(PhotoUpload::new("a.jpg", vec![]).validate().is_err());
        assert!(PhotoUpload::new("", vec![1]).validate().is_err());
    }
}
