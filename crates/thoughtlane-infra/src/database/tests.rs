use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use thoughtlane_core::domain::{LikeTarget, Post};
use thoughtlane_core::error::RepoError;
use thoughtlane_core::ports::{
    BaseRepository, CommentRepository, LikeRepository, PostRepository, TagRepository,
};

use super::entity::{post, tag, user};
use super::{
    PostgresCommentRepository, PostgresLikeRepository, PostgresPostRepository,
    PostgresTagRepository,
};

fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

fn post_model(id: Uuid, user_id: Uuid) -> post::Model {
    post::Model {
        id,
        user_id,
        title: "Test Post".to_owned(),
        summary: "Summary".to_owned(),
        content: "<p>Content</p>".to_owned(),
        cover_image_url: None,
        created_at: Utc::now().into(),
    }
}

fn user_model(id: Uuid) -> user::Model {
    user::Model {
        id,
        username: "alice@example.com".to_owned(),
        password_hash: "hash".to_owned(),
        name: "alice".to_owned(),
        created_at: Utc::now().into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, user_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.user_id, user_id);
}

#[tokio::test]
async fn test_find_authored_embeds_author() {
    let post_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![(post_model(post_id, user_id), user_model(user_id))]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let authored = repo.find_authored(post_id).await.unwrap().unwrap();

    assert_eq!(authored.item.id, post_id);
    assert_eq!(authored.author.id, user_id);
    assert_eq!(authored.author.name, "alice");
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    // comment ids, then likes/comments/tags/post deletes
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
        .append_exec_results([exec(0), exec(0), exec(0), exec(0)])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = repo.delete_cascade(Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_delete_comment_cascades_likes() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec(3), exec(1)])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);

    assert!(repo.delete_cascade(Uuid::new_v4()).await.is_ok());
}

#[tokio::test]
async fn test_list_tags_by_post() {
    let post_id = Uuid::new_v4();
    let rows = vec![
        tag::Model {
            id: Uuid::new_v4(),
            post_id,
            name: "rust".to_owned(),
            position: 0,
        },
        tag::Model {
            id: Uuid::new_v4(),
            post_id,
            name: "web".to_owned(),
            position: 1,
        },
    ];

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([rows])
        .into_connection();

    let repo = PostgresTagRepository::new(db);

    let names: Vec<_> = repo
        .list_by_post(post_id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["rust", "web"]);
}

#[tokio::test]
async fn test_remove_tags_reports_count() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec(2)])
        .into_connection();

    let repo = PostgresTagRepository::new(db);

    assert_eq!(repo.remove_from_post(Uuid::new_v4()).await.unwrap(), 2);
}

#[tokio::test]
async fn test_toggle_removes_existing_like() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec(1)])
        .into_connection();

    let repo = PostgresLikeRepository::new(db);

    let liked = repo
        .toggle(Uuid::new_v4(), LikeTarget::Post(Uuid::new_v4()))
        .await
        .unwrap();

    assert!(!liked);
}

#[tokio::test]
async fn test_toggle_inserts_when_absent() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec(0), exec(1)])
        .into_connection();

    let repo = PostgresLikeRepository::new(db);

    let liked = repo
        .toggle(Uuid::new_v4(), LikeTarget::Comment(Uuid::new_v4()))
        .await
        .unwrap();

    assert!(liked);
}

#[tokio::test]
async fn test_count_likes() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[BTreeMap::from([("num_items", Value::from(4i64))])]])
        .into_connection();

    let repo = PostgresLikeRepository::new(db);

    let count = repo.count(LikeTarget::Post(Uuid::new_v4())).await.unwrap();

    assert_eq!(count, 4);
}
