//! One store behind a single lock, implementing every document port.
//!
//! Holding all collections behind one `RwLock` is what makes the like
//! transaction atomic here: `apply` takes the write lock once and performs
//! its read-check-write without anyone else observing the intermediate
//! state.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use fanhub_core::StoreError;
use fanhub_core::domain::{Notification, Post, Reply, User};
use fanhub_core::ports::{
    LikeApplied, LikeIntent, LikeStore, NotificationStore, PostStore, ReplyStore, UserStore,
};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    /// Like markers keyed by `(post_id, user_id)`, value is the like time.
    likes: HashMap<(Uuid, Uuid), DateTime<Utc>>,
    replies: HashMap<Uuid, Reply>,
    notifications: HashMap<Uuid, Notification>,
}

/// In-memory implementation of all five document store ports.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryDocumentStore {
    async fn create(&self, user: User) -> Result<User, StoreError> {
        let mut c = self.collections.write().await;
        if c.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Constraint(format!(
                "email already registered: {}",
                user.email
            )));
        }
        c.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.collections.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let c = self.collections.read().await;
        Ok(c.users.values().find(|u| u.email == email).cloned())
    }

    async fn set_avatar(&self, id: Uuid, url: &str) -> Result<(), StoreError> {
        let mut c = self.collections.write().await;
        let user = c.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.avatar_url = Some(url.to_string());
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl PostStore for InMemoryDocumentStore {
    async fn create(&self, mut post: Post) -> Result<Post, StoreError> {
        // Store clock wins over whatever the caller put in.
        post.created_at = Utc::now();
        let mut c = self.collections.write().await;
        c.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        Ok(self.collections.read().await.posts.get(&id).cloned())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Post>, StoreError> {
        let c = self.collections.read().await;
        let mut posts: Vec<Post> = c.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(limit);
        Ok(posts)
    }

    async fn recent_by_author(
        &self,
        author_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Post>, StoreError> {
        let c = self.collections.read().await;
        let mut posts: Vec<Post> = c
            .posts
            .values()
            .filter(|p| p.author.id == author_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(limit);
        Ok(posts)
    }

    async fn set_image_url(&self, id: Uuid, url: &str) -> Result<(), StoreError> {
        let mut c = self.collections.write().await;
        let post = c.posts.get_mut(&id).ok_or(StoreError::NotFound)?;
        post.image_url = Some(url.to_string());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut c = self.collections.write().await;
        // Only the post document goes; markers and replies stay behind
        // until the sweep finds them.
        c.posts.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl LikeStore for InMemoryDocumentStore {
    async fn is_liked(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let c = self.collections.read().await;
        Ok(c.likes.contains_key(&(post_id, user_id)))
    }

    async fn apply(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        intent: LikeIntent,
    ) -> Result<LikeApplied, StoreError> {
        let mut c = self.collections.write().await;
        let Collections { posts, likes, .. } = &mut *c;

        let post = posts.get_mut(&post_id).ok_or(StoreError::NotFound)?;
        let marker = likes.contains_key(&(post_id, user_id));

        match (intent, marker) {
            (LikeIntent::Like, false) => {
                likes.insert((post_id, user_id), Utc::now());
                post.likes += 1;
            }
            (LikeIntent::Unlike, true) => {
                likes.remove(&(post_id, user_id));
                post.likes -= 1;
            }
            (LikeIntent::Like, true) => {
                return Err(StoreError::Conflict("already liked".into()));
            }
            (LikeIntent::Unlike, false) => {
                return Err(StoreError::Conflict("not currently liked".into()));
            }
        }

        Ok(LikeApplied { likes: post.likes })
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, StoreError> {
        let c = self.collections.read().await;
        Ok(c.likes.keys().filter(|(p, _)| *p == post_id).count() as u64)
    }

    async fn delete_orphaned(&self) -> Result<u64, StoreError> {
        let mut c = self.collections.write().await;
        let Collections { posts, likes, .. } = &mut *c;
        let before = likes.len();
        likes.retain(|(post_id, _), _| posts.contains_key(post_id));
        Ok((before - likes.len()) as u64)
    }
}

#[async_trait]
impl ReplyStore for InMemoryDocumentStore {
    async fn create(&self, mut reply: Reply) -> Result<Reply, StoreError> {
        reply.created_at = Utc::now();
        let mut c = self.collections.write().await;
        c.replies.insert(reply.id, reply.clone());
        Ok(reply)
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Reply>, StoreError> {
        let c = self.collections.read().await;
        let mut replies: Vec<Reply> = c
            .replies
            .values()
            .filter(|r| r.post_id == post_id)
            .cloned()
            .collect();
        replies.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(replies)
    }

    async fn find_by_id(
        &self,
        post_id: Uuid,
        reply_id: Uuid,
    ) -> Result<Option<Reply>, StoreError> {
        let c = self.collections.read().await;
        Ok(c.replies
            .get(&reply_id)
            .filter(|r| r.post_id == post_id)
            .cloned())
    }

    async fn delete(&self, post_id: Uuid, reply_id: Uuid) -> Result<(), StoreError> {
        let mut c = self.collections.write().await;
        match c.replies.get(&reply_id) {
            Some(r) if r.post_id == post_id => {
                c.replies.remove(&reply_id);
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }

    async fn delete_orphaned(&self) -> Result<u64, StoreError> {
        let mut c = self.collections.write().await;
        let Collections { posts, replies, .. } = &mut *c;
        let before = replies.len();
        replies.retain(|_, r| posts.contains_key(&r.post_id));
        Ok((before - replies.len()) as u64)
    }
}

#[async_trait]
impl NotificationStore for InMemoryDocumentStore {
    async fn create(&self, notification: Notification) -> Result<Notification, StoreError> {
        let mut c = self.collections.write().await;
        c.notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn recent_for(
        &self,
        recipient_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Notification>, StoreError> {
        let c = self.collections.read().await;
        let mut items: Vec<Notification> = c
            .notifications
            .values()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit);
        Ok(items)
    }

    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> Result<(), StoreError> {
        let mut c = self.collections.write().await;
        match c.notifications.get_mut(&id) {
            Some(n) if n.recipient_id == recipient_id => {
                n.read = true;
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }

    async fn mark_all_read(&self, recipient_id: Uuid, ids: &[Uuid]) -> Result<u64, StoreError> {
        let mut c = self.collections.write().await;
        let mut marked = 0;
        for id in ids {
            if let Some(n) = c.notifications.get_mut(id) {
                if n.recipient_id == recipient_id && !n.read {
                    n.read = true;
                    marked += 1;
                }
            }
        }
        Ok(marked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanhub_core::domain::AuthorSnapshot;

    fn author(name: &str) -> AuthorSnapshot {
        AuthorSnapshot::new(Uuid::new_v4(), name, None)
    }

    fn post(author: AuthorSnapshot) -> Post {
        Post::new(author, Some("Title".into()), "Description".into(), None)
    }

    #[tokio::test]
    async fn like_transaction_keeps_counter_equal_to_markers() {
        let store = InMemoryDocumentStore::new();
        let p = PostStore::create(&store, post(author("A"))).await.unwrap();
        let fan1 = Uuid::new_v4();
        let fan2 = Uuid::new_v4();

        store.apply(p.id, fan1, LikeIntent::Like).await.unwrap();
        let applied = store.apply(p.id, fan2, LikeIntent::Like).await.unwrap();
        assert_eq!(applied.likes, 2);
        assert_eq!(store.count_for_post(p.id).await.unwrap(), 2);

        let applied = store.apply(p.id, fan1, LikeIntent::Unlike).await.unwrap();
        assert_eq!(applied.likes, 1);
        assert_eq!(store.count_for_post(p.id).await.unwrap(), 1);

        let stored = PostStore::find_by_id(&store, p.id).await.unwrap().unwrap();
        assert_eq!(stored.likes, 1);
    }

    #[tokio::test]
    async fn mismatched_intent_aborts_without_changes() {
        let store = InMemoryDocumentStore::new();
        let p = PostStore::create(&store, post(author("A"))).await.unwrap();
        let fan = Uuid::new_v4();

        let err = store.apply(p.id, fan, LikeIntent::Unlike).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        store.apply(p.id, fan, LikeIntent::Like).await.unwrap();
        let err = store.apply(p.id, fan, LikeIntent::Like).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let stored = PostStore::find_by_id(&store, p.id).await.unwrap().unwrap();
        assert_eq!(stored.likes, 1);
        assert_eq!(store.count_for_post(p.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryDocumentStore::new();
        let u = User::new("fan@example.com".into(), "hash".into(), None);
        UserStore::create(&store, u).await.unwrap();

        let dup = User::new("fan@example.com".into(), "hash2".into(), None);
        let err = UserStore::create(&store, dup).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[tokio::test]
    async fn replies_list_in_ascending_creation_order() {
        let store = InMemoryDocumentStore::new();
        let p = PostStore::create(&store, post(author("A"))).await.unwrap();
        let a = author("B");

        for text in ["first", "second", "third"] {
            ReplyStore::create(&store, Reply::new(p.id, a.clone(), text.into()))
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let replies = store.list_for_post(p.id).await.unwrap();
        let texts: Vec<&str> = replies.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn mark_all_read_skips_foreign_and_already_read() {
        let store = InMemoryDocumentStore::new();
        let recipient = Uuid::new_v4();
        let p = post(AuthorSnapshot::new(recipient, "A", None));

        let n1 = NotificationStore::create(&store, Notification::like(author("F1"), &p))
            .await
            .unwrap();
        let mut already = Notification::like(author("F2"), &p);
        already.read = true;
        let n2 = NotificationStore::create(&store, already).await.unwrap();

        let other = post(author("Z"));
        let n3 = NotificationStore::create(&store, Notification::like(author("F3"), &other))
            .await
            .unwrap();

        let marked = store
            .mark_all_read(recipient, &[n1.id, n2.id, n3.id])
            .await
            .unwrap();
        assert_eq!(marked, 1);
    }

    #[tokio::test]
    async fn orphan_sweep_removes_markers_and_replies_of_deleted_posts() {
        let store = InMemoryDocumentStore::new();
        let kept = PostStore::create(&store, post(author("A"))).await.unwrap();
        let doomed = PostStore::create(&store, post(author("A"))).await.unwrap();

        let fan = author("B");
        store.apply(kept.id, fan.id, LikeIntent::Like).await.unwrap();
        store.apply(doomed.id, fan.id, LikeIntent::Like).await.unwrap();
        ReplyStore::create(&store, Reply::new(kept.id, fan.clone(), "stays".into()))
            .await
            .unwrap();
        ReplyStore::create(&store, Reply::new(doomed.id, fan, "orphaned".into()))
            .await
            .unwrap();

        PostStore::delete(&store, doomed.id).await.unwrap();

        // Deletion itself does not cascade.
        assert_eq!(store.count_for_post(doomed.id).await.unwrap(), 1);

        assert_eq!(LikeStore::delete_orphaned(&store).await.unwrap(), 1);
        assert_eq!(ReplyStore::delete_orphaned(&store).await.unwrap(), 1);
        assert_eq!(store.count_for_post(kept.id).await.unwrap(), 1);
        assert_eq!(store.list_for_post(kept.id).await.unwrap().len(), 1);
    }
}
