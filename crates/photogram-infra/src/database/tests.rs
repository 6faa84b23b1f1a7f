use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    DatabaseBackend, EntityTrait, MockDatabase, MockExecResult, QueryFilter, QueryTrait, Value,
};
use uuid::Uuid;

use crate::database::entity::{comment, member, post, post_like};
use crate::database::postgres_repo::{
    PostgresCommentRepository, PostgresMemberRepository, PostgresPostRepository, search_filter,
};
use photogram_core::domain::{Member, Post, PostSearchCondition};
use photogram_core::error::RepoError;
use photogram_core::ports::{
    BaseRepository, CommentRepository, MemberRepository, PostRepository,
};

fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

#[tokio::test]
async fn test_find_member_by_name() {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![member::Model {
            id,
            name: "alice".to_owned(),
            password_hash: "hash".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresMemberRepository::new(db);
    let result: Option<Member> = repo.find_by_name("alice").await.unwrap();

    let member = result.unwrap();
    assert_eq!(member.id, id);
    assert_eq!(member.name, "alice");
}

#[tokio::test]
async fn test_find_post_by_id_loads_like_set() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let liker = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post::Model {
            id: post_id,
            author_id,
            photo_path: "/photos/sunset.jpg".to_owned(),
            caption: Some("Sunset".to_owned()),
            location: Some("Beach".to_owned()),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .append_query_results(vec![vec![post_like::Model {
            post_id,
            member_id: liker,
            created_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.id, post_id);
    assert_eq!(post.author_id, author_id);
    assert_eq!(post.caption.as_deref(), Some("Sunset"));
    assert!(post.liked_by.contains(&liker));
    assert_eq!(post.like_count(), 1);
}

#[tokio::test]
async fn test_find_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_comments_for_post() {
    let post_id = Uuid::new_v4();
    let now = Utc::now();
    let row = |message: &str| comment::Model {
        id: Uuid::new_v4(),
        post_id,
        author_id: Uuid::new_v4(),
        message: message.to_owned(),
        created_at: now.into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row("first"), row("second")]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let comments = repo.find_by_post_id(post_id).await.unwrap();

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].message, "first");
    assert!(comments.iter().all(|c| c.post_id == post_id));
}

#[tokio::test]
async fn test_add_like_reports_conflict() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec(1), exec(0)])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let (post_id, member_id) = (Uuid::new_v4(), Uuid::new_v4());

    assert!(repo.add_like(post_id, member_id).await.unwrap());
    assert!(!repo.add_like(post_id, member_id).await.unwrap());
}

#[tokio::test]
async fn test_remove_like_reports_absence() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec(0)])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(!repo.remove_like(Uuid::new_v4(), Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_delete_post_cascades_in_transaction() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec(2), exec(1), exec(1)])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(repo.delete(Uuid::new_v4()).await.is_ok());
}

#[tokio::test]
async fn test_delete_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec(0), exec(0), exec(0)])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = repo.delete(Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_repositories_share_one_connection() {
    let now = Utc::now();
    let member_id = Uuid::new_v4();
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![member::Model {
                id: member_id,
                name: "alice".to_owned(),
                password_hash: "hash".to_owned(),
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .append_exec_results(vec![exec(1)])
            .into_connection(),
    );

    let members = PostgresMemberRepository::new(db.clone());
    let posts = PostgresPostRepository::new(db);

    let found: Option<Member> = members.find_by_id(member_id).await.unwrap();
    assert_eq!(found.unwrap().name, "alice");
    assert!(posts.add_like(Uuid::new_v4(), member_id).await.unwrap());
}

#[test]
fn test_search_filter_matches_wildcards_literally() {
    let condition = PostSearchCondition {
        caption: Some("100%_off".to_string()),
        location: Some(r"C:\beach".to_string()),
        ..Default::default()
    };

    let stmt = post::Entity::find()
        .filter(search_filter(&condition))
        .build(DatabaseBackend::Postgres);

    assert!(stmt.sql.contains("ESCAPE"));
    let values = stmt.values.unwrap().0;
    assert!(values.contains(&Value::from(r"%100\%\_off%")));
    assert!(values.contains(&Value::from(r"%C:\\beach%")));
}
