//! End-to-end interaction scenarios over the in-memory document store.

use std::sync::Arc;

use fanhub_core::domain::{NotificationKind, Post, User};
use fanhub_core::error::DomainError;
use fanhub_core::ports::NotificationStore;
use fanhub_core::services::{
    FeedController, FeedScope, InteractionStores, LikeOutcome, PostInteraction, ReplyOutcome,
};
use fanhub_infra::{InMemoryDocumentStore, StoreNotifier};

struct Harness {
    store: Arc<InMemoryDocumentStore>,
    stores: InteractionStores,
    notifier: Arc<StoreNotifier>,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(InMemoryDocumentStore::new());
        let stores = InteractionStores {
            posts: store.clone(),
            likes: store.clone(),
            replies: store.clone(),
        };
        let notifier = Arc::new(StoreNotifier::new(store.clone(), None));
        Self {
            store,
            stores,
            notifier,
        }
    }

    async fn publish(&self, author: &User, title: &str, description: &str) -> Post {
        let post = Post::new(
            author.snapshot(),
            Some(title.to_string()),
            description.to_string(),
            None,
        );
        use fanhub_core::ports::PostStore;
        PostStore::create(self.store.as_ref(), post).await.unwrap()
    }

    fn engine(&self, post: Post) -> PostInteraction {
        PostInteraction::new(post, self.stores.clone(), self.notifier.clone())
    }
}

fn user(name: &str) -> User {
    User::new(
        format!("{}@example.com", name.to_lowercase()),
        "hash".into(),
        Some(name.into()),
    )
}

#[tokio::test]
async fn like_then_unlike_notifies_once() {
    let h = Harness::new();
    let alice = user("Alice");
    let bob = user("Bob");
    let post = h.publish(&alice, "Hello world", "First post").await;
    let engine = h.engine(post);

    let bob_view = bob.snapshot();
    let outcome = engine.toggle_like(Some(&bob_view)).await.unwrap();
    assert_eq!(
        outcome,
        LikeOutcome::Committed {
            liked: true,
            likes: 1
        }
    );

    let outcome = engine.toggle_like(Some(&bob_view)).await.unwrap();
    assert_eq!(
        outcome,
        LikeOutcome::Committed {
            liked: false,
            likes: 0
        }
    );

    // Only the like produced a notification; the unlike did not.
    let inbox = h.store.recent_for(alice.id, 20).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::Like);
    assert_eq!(inbox[0].post_title_snippet, "Hello world");
    assert_eq!(inbox[0].actor.name, "Bob");
}

#[tokio::test]
async fn reply_notification_carries_deep_link() {
    let h = Harness::new();
    let alice = user("Alice");
    let bob = user("Bob");
    let post = h.publish(&alice, "Hello world", "First post").await;
    let engine = h.engine(post);

    let outcome = engine
        .submit_reply(Some(&bob.snapshot()), "Nice post!")
        .await
        .unwrap();
    let reply = match outcome {
        ReplyOutcome::Posted(r) => r,
        ReplyOutcome::Ignored => panic!("reply was ignored"),
    };

    let inbox = h.store.recent_for(alice.id, 20).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::Reply);
    assert_eq!(inbox[0].reply_text_snippet.as_deref(), Some("Nice post!"));
    assert_eq!(inbox[0].reply_id, Some(reply.id));
}

#[tokio::test]
async fn counter_always_matches_marker_count() {
    let h = Harness::new();
    let alice = user("Alice");
    let post = h.publish(&alice, "Hello", "World").await;
    let engine = h.engine(post.clone());

    let fans: Vec<_> = (0..5).map(|i| user(&format!("Fan{i}"))).collect();
    for fan in &fans {
        engine.toggle_like(Some(&fan.snapshot())).await.unwrap();
    }
    engine
        .toggle_like(Some(&fans[0].snapshot()))
        .await
        .unwrap();
    engine
        .toggle_like(Some(&fans[0].snapshot()))
        .await
        .unwrap();

    use fanhub_core::ports::{LikeStore, PostStore};
    let stored = PostStore::find_by_id(h.store.as_ref(), post.id)
        .await
        .unwrap()
        .unwrap();
    let markers = h.store.count_for_post(post.id).await.unwrap();
    assert_eq!(stored.likes as u64, markers);
    assert_eq!(markers, 5);
}

#[tokio::test]
async fn feed_filter_matches_title_description_and_author() {
    let h = Harness::new();
    let alice = user("Alice");
    let bob = user("Bob");
    h.publish(&alice, "Alpha Launch", "The big day").await;
    h.publish(&bob, "Untitled", "alpha testing notes").await;
    h.publish(&bob, "Other", "nothing relevant").await;

    let feed = FeedController::new(h.store.clone(), 50);

    let posts = feed
        .view(FeedScope::Explore, None, Some("alpha"))
        .await
        .unwrap();
    assert_eq!(posts.len(), 2);

    let posts = feed
        .view(FeedScope::Mine, Some(bob.id), Some("alice"))
        .await
        .unwrap();
    assert!(posts.is_empty());

    let posts = feed
        .view(FeedScope::Explore, None, Some("bob"))
        .await
        .unwrap();
    assert_eq!(posts.len(), 2);
}

#[tokio::test]
async fn reply_delete_requires_author_or_post_owner() {
    let h = Harness::new();
    let alice = user("Alice");
    let bob = user("Bob");
    let carol = user("Carol");
    let post = h.publish(&alice, "Hello", "World").await;
    let engine = h.engine(post.clone());

    let reply = match engine
        .submit_reply(Some(&bob.snapshot()), "mine")
        .await
        .unwrap()
    {
        ReplyOutcome::Posted(r) => r,
        ReplyOutcome::Ignored => panic!("reply was ignored"),
    };

    let err = engine
        .delete_reply(Some(&carol.snapshot()), reply.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    use fanhub_core::ports::ReplyStore;
    assert_eq!(h.store.list_for_post(post.id).await.unwrap().len(), 1);

    // Post owner may remove any reply under their post.
    engine
        .delete_reply(Some(&alice.snapshot()), reply.id)
        .await
        .unwrap();
    assert!(h.store.list_for_post(post.id).await.unwrap().is_empty());
}
