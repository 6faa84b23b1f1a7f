//! Post, comment and like operations.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    Comment, MAX_CAPTION_LEN, MAX_LOCATION_LEN, Member, PhotoUpload, Post, PostSearchCondition,
    PostSearchResult, PostUpdate, check_len, is_liked_by,
};
use crate::error::DomainError;
use crate::ports::{CommentRepository, MemberRepository, PhotoStorage, PostRepository};

/// Orchestrates member, post and comment lookups and enforces the invariants
/// the individual stores cannot express on their own.
#[derive(Clone)]
pub struct SnsService {
    members: Arc<dyn MemberRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    photos: Arc<dyn PhotoStorage>,
}

impl SnsService {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        photos: Arc<dyn PhotoStorage>,
    ) -> Self {
        Self {
            members,
            posts,
            comments,
            photos,
        }
    }

    /// Store the photo and create a post owned by `member_id`.
    pub async fn register_post(
        &self,
        member_id: Uuid,
        photo: PhotoUpload,
        caption: Option<String>,
        location: Option<String>,
    ) -> Result<Post, DomainError> {
        photo.validate()?;
        check_len("Caption", caption.as_deref(), MAX_CAPTION_LEN)?;
        check_len("Location", location.as_deref(), MAX_LOCATION_LEN)?;

        let member = self.find_member(member_id).await?;
        let photo_path = self.photos.store(&photo.bytes, &photo.file_name).await?;

        let post = Post::new(member.id, photo_path.clone(), caption, location);
        match self.posts.save(post).await {
            Ok(saved) => {
                tracing::info!(post_id = %saved.id, member_id = %member.id, "Post registered");
                Ok(saved)
            }
            Err(e) => {
                // An orphaned photo is tolerable, but try not to leave one.
                tracing::warn!(
                    error = %e,
                    photo_path = %photo_path,
                    "Saving post failed after photo was stored"
                );
                if let Err(cleanup) = self.photos.remove(&photo_path).await {
                    tracing::warn!(error = %cleanup, "Failed to remove orphaned photo");
                }
                Err(e.into())
            }
        }
    }

    /// Every post, newest first.
    pub async fn get_all_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_all().await?)
    }

    pub async fn get_post_by_id(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.find_post(post_id).await
    }

    /// Overwrite photo path, caption and location of an existing post.
    pub async fn modify_post(
        &self,
        post_id: Uuid,
        update: PostUpdate,
    ) -> Result<Post, DomainError> {
        update.validate()?;

        let mut post = self.find_post(post_id).await?;
        post.apply(update);
        let saved = self.posts.save(post).await?;

        tracing::info!(post_id = %post_id, "Post modified");
        Ok(saved)
    }

    /// Delete a post together with its comments and likes.
    pub async fn remove_post(&self, post_id: Uuid) -> Result<(), DomainError> {
        self.find_post(post_id).await?;
        self.posts.delete(post_id).await?;

        tracing::info!(post_id = %post_id, "Post removed");
        Ok(())
    }

    pub async fn write_comment(
        &self,
        member_id: Uuid,
        post_id: Uuid,
        message: String,
    ) -> Result<Comment, DomainError> {
        Comment::validate_message(&message)?;

        let member = self.find_member(member_id).await?;
        let post = self.find_post(post_id).await?;

        let comment = self
            .comments
            .save(Comment::new(post.id, member.id, message))
            .await?;

        tracing::debug!(comment_id = %comment.id, post_id = %post.id, "Comment written");
        Ok(comment)
    }

    /// Comments on an existing post, oldest first.
    pub async fn get_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let post = self.find_post(post_id).await?;
        Ok(self.comments.find_by_post_id(post.id).await?)
    }

    pub async fn like_post(&self, member_id: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        let member = self.find_member(member_id).await?;
        let post = self.find_post(post_id).await?;

        let already_liked = DomainError::AlreadyLiked {
            member_id: member.id,
            post_id: post.id,
        };
        if is_liked_by(&post.liked_by, member.id) {
            return Err(already_liked);
        }
        // A concurrent like can land between the check and the insert; the
        // store reports that as "nothing inserted".
        if !self.posts.add_like(post.id, member.id).await? {
            return Err(already_liked);
        }

        tracing::debug!(member_id = %member.id, post_id = %post.id, "Post liked");
        Ok(())
    }

    pub async fn unlike_post(&self, member_id: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        let member = self.find_member(member_id).await?;
        let post = self.find_post(post_id).await?;

        let already_unliked = DomainError::AlreadyUnliked {
            member_id: member.id,
            post_id: post.id,
        };
        if !is_liked_by(&post.liked_by, member.id) {
            return Err(already_unliked);
        }
        if !self.posts.remove_like(post.id, member.id).await? {
            return Err(already_unliked);
        }

        tracing::debug!(member_id = %member.id, post_id = %post.id, "Post unliked");
        Ok(())
    }

    pub async fn is_post_liked_by_user(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DomainError> {
        let post = self.find_post(post_id).await?;
        Ok(is_liked_by(&post.liked_by, user_id))
    }

    pub async fn search_by_conditions(
        &self,
        condition: &PostSearchCondition,
    ) -> Result<Vec<PostSearchResult>, DomainError> {
        condition.validate()?;
        Ok(self.posts.search(condition).await?)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))
    }

    async fn find_member(&self, member_id: Uuid) -> Result<Member, DomainError> {
        self.members
            .find_by_id(member_id)
            .await?
            .ok_or(DomainError::MemberNotFound(member_id))
    }
}
