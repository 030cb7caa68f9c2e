use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use fanhub_core::error::StoreError;
use fanhub_core::ports::{LikeIntent, LikeStore, NotificationStore, PostStore};

use super::PostgresDocumentStore;
use super::entity::{notification, post};

fn post_row(post_id: Uuid, likes: i64) -> post::Model {
    post::Model {
        id: post_id,
        title: None,
        description: "d".to_owned(),
        link: None,
        image_url: None,
        author_id: Uuid::new_v4(),
        author_name: "Author".to_owned(),
        author_avatar: None,
        created_at: chrono::Utc::now().into(),
        likes,
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post::Model {
            id: post_id,
            title: Some("Test Post".to_owned()),
            description: "Description".to_owned(),
            link: None,
            image_url: None,
            author_id,
            author_name: "Author".to_owned(),
            author_avatar: None,
            created_at: now.into(),
            likes: 3,
        }]])
        .into_connection();

    let store = PostgresDocumentStore::new(db);

    let result = PostStore::find_by_id(&store, post_id).await.unwrap();

    let found = result.unwrap();
    assert_eq!(found.id, post_id);
    assert_eq!(found.title.as_deref(), Some("Test Post"));
    assert_eq!(found.author.id, author_id);
    assert_eq!(found.likes, 3);
}

#[tokio::test]
async fn test_recent_notifications_decode_kind() {
    let recipient = Uuid::new_v4();
    let now = chrono::Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![notification::Model {
            id: Uuid::new_v4(),
            recipient_id: recipient,
            kind: "reply".to_owned(),
            actor_id: Uuid::new_v4(),
            actor_name: "Fan".to_owned(),
            actor_avatar: None,
            post_id: Uuid::new_v4(),
            post_title_snippet: "Hello".to_owned(),
            reply_text_snippet: Some("Nice post!".to_owned()),
            reply_id: Some(Uuid::new_v4()),
            created_at: now.into(),
            read: false,
        }]])
        .into_connection();

    let store = PostgresDocumentStore::new(db);

    let items = store.recent_for(recipient, 20).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(
        items[0].kind,
        fanhub_core::domain::NotificationKind::Reply
    );
    assert_eq!(items[0].reply_text_snippet.as_deref(), Some("Nice post!"));
}

#[tokio::test]
async fn test_apply_like_rereads_counter_after_relative_update() {
    let post_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_row(post_id, 3)]])
        .append_exec_results(vec![
            // marker insert
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            // counter update
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ])
        .append_query_results(vec![vec![post_row(post_id, 10)]])
        .into_connection();

    let store = PostgresDocumentStore::new(db);

    let applied = store
        .apply(post_id, user_id, LikeIntent::Like)
        .await
        .unwrap();

    // The committed count comes from re-reading the row after the relative
    // update, not from the snapshot taken at the start of the transaction.
    assert_eq!(applied.likes, 10);
}

#[tokio::test]
async fn test_apply_unlike_without_marker_is_a_conflict() {
    let post_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_row(post_id, 1)]])
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let store = PostgresDocumentStore::new(db);

    let err = store
        .apply(post_id, user_id, LikeIntent::Unlike)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}
