//! PostgreSQL repository implementations.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, IntoColumnRef, LikeExpr, OnConflict, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, DbConn, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use photogram_core::domain::{Comment, Member, Post, PostSearchCondition, PostSearchResult};
use photogram_core::error::RepoError;
use photogram_core::ports::{BaseRepository, CommentRepository, MemberRepository, PostRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::member::{self, Entity as MemberEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_like::{self, Entity as PostLikeEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err, upsert};

/// PostgreSQL member repository.
pub type PostgresMemberRepository = PostgresBaseRepository<MemberEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Member>, RepoError> {
        tracing::debug!(member_name = %name, "Finding member by name");

        let result = MemberEntity::find()
            .filter(member::Column::Name.eq(name))
            .one(&*self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&*self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// `LIKE` pattern matching `needle` literally anywhere in the column.
fn substring_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn contains_literal(column: impl IntoColumnRef, needle: &str) -> SimpleExpr {
    Expr::col(column).like(LikeExpr::new(substring_pattern(needle)).escape('\\'))
}

/// Translate a search condition into a filter over `posts` joined with `members`.
pub(crate) fn search_filter(condition: &PostSearchCondition) -> Condition {
    let mut filter = Condition::all();
    if let Some(author_id) = condition.author_id {
        filter = filter.add(post::Column::AuthorId.eq(author_id));
    }
    if let Some(name) = &condition.author_name {
        filter = filter.add(contains_literal((MemberEntity, member::Column::Name), name));
    }
    if let Some(caption) = &condition.caption {
        filter = filter.add(contains_literal((PostEntity, post::Column::Caption), caption));
    }
    if let Some(location) = &condition.location {
        filter = filter.add(contains_literal((PostEntity, post::Column::Location), location));
    }
    if let Some(from) = condition.created_from {
        filter = filter.add(post::Column::CreatedAt.gte(from.fixed_offset()));
    }
    if let Some(to) = condition.created_to {
        filter = filter.add(post::Column::CreatedAt.lte(to.fixed_offset()));
    }
    filter
}

/// PostgreSQL post repository. Rows in `posts` are joined with their
/// `post_likes` rows to rebuild each post's like-set.
pub struct PostgresPostRepository {
    db: Arc<DbConn>,
}

impl PostgresPostRepository {
    pub fn new(db: impl Into<Arc<DbConn>>) -> Self {
        Self { db: db.into() }
    }

    async fn like_sets(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, BTreeSet<Uuid>>, RepoError> {
        let mut sets: HashMap<Uuid, BTreeSet<Uuid>> = HashMap::new();
        if post_ids.is_empty() {
            return Ok(sets);
        }

        let rows = PostLikeEntity::find()
            .filter(post_like::Column::PostId.is_in(post_ids.iter().copied()))
            .all(&*self.db)
            .await
            .map_err(repo_err)?;

        for row in rows {
            sets.entry(row.post_id).or_default().insert(row.member_id);
        }
        Ok(sets)
    }

    async fn hydrate(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut likes = self.like_sets(&ids).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let liked_by = likes.remove(&m.id).unwrap_or_default();
                m.into_domain(liked_by)
            })
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(repo_err)?
        else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![model]).await?.pop())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let model =
            upsert::<PostEntity, post::ActiveModel>(&*self.db, entity.into()).await?;
        self.hydrate(vec![model])
            .await?
            .pop()
            .ok_or(RepoError::NotFound)
    }

    /// Remove the post's comments, its like-set rows and then the post itself
    /// in one transaction.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let comments = CommentEntity::delete_many()
            .filter(comment::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(repo_err)?;
        PostLikeEntity::delete_many()
            .filter(post_like::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(repo_err)?;
        let result = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(repo_err)?;
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(repo_err)?;
        tracing::debug!(
            post_id = %id,
            comments_removed = comments.rows_affected,
            "Post deleted with its comments"
        );
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let models = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .all(&*self.db)
            .await
            .map_err(repo_err)?;

        self.hydrate(models).await
    }

    async fn search(
        &self,
        condition: &PostSearchCondition,
    ) -> Result<Vec<PostSearchResult>, RepoError> {
        let filter = search_filter(condition);

        let rows = PostEntity::find()
            .find_also_related(MemberEntity)
            .filter(filter)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .all(&*self.db)
            .await
            .map_err(repo_err)?;

        let ids: Vec<Uuid> = rows.iter().map(|(p, _)| p.id).collect();
        let mut likes = self.like_sets(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|(model, author)| {
                let liked_by = likes.remove(&model.id).unwrap_or_default();
                let post = model.into_domain(liked_by);
                let author_name = author.map(|a| a.name).unwrap_or_default();
                PostSearchResult::from_post(&post, author_name)
            })
            .collect())
    }

    async fn add_like(&self, post_id: Uuid, member_id: Uuid) -> Result<bool, RepoError> {
        let row = post_like::ActiveModel {
            post_id: Set(post_id),
            member_id: Set(member_id),
            created_at: Set(Utc::now().into()),
        };

        let inserted = PostLikeEntity::insert(row)
            .on_conflict(
                OnConflict::columns([post_like::Column::PostId, post_like::Column::MemberId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await
            .map_err(repo_err)?;

        Ok(inserted > 0)
    }

    async fn remove_like(&self, post_id: Uuid, member_id: Uuid) -> Result<bool, RepoError> {
        let result = PostLikeEntity::delete_many()
            .filter(post_like::Column::PostId.eq(post_id))
            .filter(post_like::Column::MemberId.eq(member_id))
            .exec(&*self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.rows_affected > 0)
    }
}
