use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Member, Post, PostSearchCondition, PostSearchResult};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Member repository with account-specific lookups.
#[async_trait]
pub trait MemberRepository: BaseRepository<Member, Uuid> {
    /// Find a member by their display name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Member>, RepoError>;
}

/// Post repository.
///
/// Posts come back with their like-set populated. `save` never touches the
/// like-set; membership only changes through `add_like` and `remove_like`.
/// `delete` removes the post's comments and likes in the same transaction.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts, newest first.
    async fn find_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Posts matching `condition`, newest first.
    async fn search(
        &self,
        condition: &PostSearchCondition,
    ) -> Result<Vec<PostSearchResult>, RepoError>;

    /// Add `member_id` to the like-set. Returns `false` if it was already there.
    async fn add_like(&self, post_id: Uuid, member_id: Uuid) -> Result<bool, RepoError>;

    /// Remove `member_id` from the like-set. Returns `false` if it was absent.
    async fn remove_like(&self, post_id: Uuid, member_id: Uuid) -> Result<bool, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post, oldest first.
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}
