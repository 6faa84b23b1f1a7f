//! In-memory store - used when no database is configured, and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use photogram_core::domain::{Comment, Member, Post, PostSearchCondition, PostSearchResult};
use photogram_core::error::RepoError;
use photogram_core::ports::{BaseRepository, CommentRepository, MemberRepository, PostRepository};

#[derive(Default)]
struct Tables {
    members: HashMap<Uuid, Member>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

/// Members, posts and comments behind a single async `RwLock`.
///
/// One lock for all tables gives every operation the same all-or-nothing
/// behaviour a database transaction would: a post and its comments disappear
/// together, and a like check-and-insert cannot interleave with another.
/// Construct one per process and share it through `Arc`.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(a: &Post, b: &Post) -> std::cmp::Ordering {
    b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id))
}

#[async_trait]
impl BaseRepository<Member, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>, RepoError> {
        Ok(self.tables.read().await.members.get(&id).cloned())
    }

    async fn save(&self, member: Member) -> Result<Member, RepoError> {
        let mut tables = self.tables.write().await;
        let name_taken = tables
            .members
            .values()
            .any(|m| m.name == member.name && m.id != member.id);
        if name_taken {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        tables.members.insert(member.id, member.clone());
        Ok(member)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .members
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Member>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.members.values().find(|m| m.name == name).cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.members.contains_key(&post.author_id) {
            return Err(RepoError::Constraint(format!(
                "author {} does not exist",
                post.author_id
            )));
        }

        // The like-set is owned by add_like/remove_like.
        post.liked_by = tables
            .posts
            .get(&post.id)
            .map(|existing| existing.liked_by.clone())
            .unwrap_or_default();

        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables.posts.values().cloned().collect();
        posts.sort_by(newest_first);
        Ok(posts)
    }

    async fn search(
        &self,
        condition: &PostSearchCondition,
    ) -> Result<Vec<PostSearchResult>, RepoError> {
        let tables = self.tables.read().await;
        let author_name = |post: &Post| {
            tables
                .members
                .get(&post.author_id)
                .map(|m| m.name.clone())
                .unwrap_or_default()
        };

        let mut matched: Vec<(&Post, String)> = tables
            .posts
            .values()
            .map(|post| (post, author_name(post)))
            .filter(|(post, name)| condition.matches(post, name))
            .collect();
        matched.sort_by(|(a, _), (b, _)| newest_first(a, b));

        Ok(matched
            .into_iter()
            .map(|(post, name)| PostSearchResult::from_post(post, name))
            .collect())
    }

    async fn add_like(&self, post_id: Uuid, member_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.members.contains_key(&member_id) {
            return Err(RepoError::Constraint(format!(
                "member {member_id} does not exist"
            )));
        }
        let post = tables
            .posts
            .get_mut(&post_id)
            .ok_or_else(|| RepoError::Constraint(format!("post {post_id} does not exist")))?;

        Ok(post.liked_by.insert(member_id))
    }

    async fn remove_like(&self, post_id: Uuid, member_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .posts
            .get_mut(&post_id)
            .is_some_and(|post| post.liked_by.remove(&member_id)))
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                comment.post_id
            )));
        }
        if !tables.members.contains_key(&comment.author_id) {
            return Err(RepoError::Constraint(format!(
                "author {} does not exist",
                comment.author_id
            )));
        }

        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }
}
