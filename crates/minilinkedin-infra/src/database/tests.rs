use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use minilinkedin_core::domain::{Post, ProfileChanges};
use minilinkedin_core::ports::{BaseRepository, PostRepository, UserRepository};

use super::entity::{post, user};
use super::postgres_repo::{PostgresPostRepository, PostgresUserRepository, mask_email};

fn user_model(id: Uuid, email: &str) -> user::Model {
    let now = Utc::now();
    user::Model {
        id,
        name: "Ada Lovelace".to_owned(),
        email: email.to_owned(),
        password_hash: "$argon2id$v=19$fake".to_owned(),
        bio: Some("Analyst".to_owned()),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn post_model(id: Uuid, author_id: Uuid, content: &str) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id,
        content: content.to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[post_model(post_id, author_id, "Content")]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.content, "Content");
    assert_eq!(post.id, post_id);
    assert_eq!(post.author_id, author_id);
}

#[tokio::test]
async fn test_find_post_with_author() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[(
            post_model(post_id, author_id, "hello"),
            user_model(author_id, "ada@example.com"),
        )]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let joined = repo.find_with_author(post_id).await.unwrap().unwrap();
    assert_eq!(joined.post.content, "hello");
    assert_eq!(joined.author.id, author_id);
    assert_eq!(joined.author.email, "ada@example.com");
}

#[tokio::test]
async fn test_list_posts_newest_first_query() {
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[(
            post_model(Uuid::new_v4(), author_id, "latest"),
            user_model(author_id, "ada@example.com"),
        )]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let rows = repo.list_with_authors(Some(author_id), 20, 10).await.unwrap();
    assert_eq!(rows.len(), 1);

    let log = repo.db.into_transaction_log();
    let sql = format!("{:?}", log[0]);
    assert!(sql.contains("ORDER BY"));
    assert!(sql.contains("created_at"));
    assert!(sql.contains("DESC"));
    assert!(sql.contains("LIMIT"));
    assert!(sql.contains("OFFSET"));
    assert!(sql.contains("author_id"));
}

#[tokio::test]
async fn test_count_posts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(25)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert_eq!(repo.count(None).await.unwrap(), 25);
}

#[tokio::test]
async fn test_conditional_update_reports_missing_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let (id, owner) = (Uuid::new_v4(), Uuid::new_v4());

    assert!(
        repo.update_content_if_owner(id, owner, "edited", Utc::now())
            .await
            .unwrap()
    );
    assert!(
        !repo
            .update_content_if_owner(id, owner, "edited", Utc::now())
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_conditional_delete() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(!repo.delete_if_owner(Uuid::new_v4(), Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_find_user_by_email() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[user_model(id, "ada@example.com")]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user = repo.find_by_email("ada@example.com").await.unwrap().unwrap();

    assert_eq!(user.id, id);
    assert_eq!(user.bio.as_deref(), Some("Analyst"));
}

#[tokio::test]
async fn test_empty_profile_update_skips_write() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[user_model(id, "ada@example.com")]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user = repo
        .update_profile(id, &ProfileChanges::default(), Utc::now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.name, "Ada Lovelace");

    // only the lookup ran
    assert_eq!(repo.db.into_transaction_log().len(), 1);
}

#[tokio::test]
async fn test_profile_update_missing_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let changes = ProfileChanges {
        name: Some("Grace".to_owned()),
        bio: None,
    };

    assert!(
        repo.update_profile(Uuid::new_v4(), &changes, Utc::now())
            .await
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_mask_email() {
    assert_eq!(mask_email("ada@example.com"), "a***@example.com");
    assert_eq!(mask_email("a@example.com"), "***@example.com");
    assert_eq!(mask_email("nope"), "***");
}
