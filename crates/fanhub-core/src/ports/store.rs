//! Document store ports.
//!
//! The backing store is assumed to provide strongly consistent reads by id and
//! an atomic read-check-write primitive, which `LikeStore::apply` exposes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Notification, Post, Reply, User};
use crate::error::StoreError;

/// User documents - `users/{userId}`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: User) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Update the stored avatar URL. Snapshots embedded in existing documents
    /// are left as-is.
    async fn set_avatar(&self, id: Uuid, url: &str) -> Result<(), StoreError>;
}

/// Post documents - `posts/{postId}`.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError>;

    /// Most recent posts across all authors, creation time descending.
    async fn recent(&self, limit: usize) -> Result<Vec<Post>, StoreError>;

    /// Most recent posts by one author, creation time descending.
    async fn recent_by_author(&self, author_id: Uuid, limit: usize)
    -> Result<Vec<Post>, StoreError>;

    async fn set_image_url(&self, id: Uuid, url: &str) -> Result<(), StoreError>;

    /// Delete the post document only. Like markers and replies are NOT
    /// cascaded; the orphan sweep picks them up later.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Direction of a like toggle, fixed before the transaction opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeIntent {
    Like,
    Unlike,
}

/// Result of a committed like transaction.
#[derive(Debug, Clone, Copy)]
pub struct LikeApplied {
    /// The authoritative counter value after the commit.
    pub likes: i64,
}

/// Like markers - `posts/{postId}/likes/{userId}`.
#[async_trait]
pub trait LikeStore: Send + Sync {
    async fn is_liked(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;

    /// Atomically reconcile a like toggle: read the marker, check it against
    /// the intent, then write marker and counter together.
    ///
    /// - intent Like, no marker: create marker, increment counter.
    /// - intent Unlike, marker present: delete marker, decrement counter.
    /// - any other combination: abort with [`StoreError::Conflict`], leaving
    ///   both documents untouched.
    ///
    /// Conflicts are not retried here; the engine rolls back its optimistic
    /// state and surfaces the error.
    async fn apply(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        intent: LikeIntent,
    ) -> Result<LikeApplied, StoreError>;

    /// Count marker documents for a post. Used by tests and the sweep to
    /// check the counter invariant.
    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, StoreError>;

    /// Remove markers whose post no longer exists. Returns how many were
    /// deleted.
    async fn delete_orphaned(&self) -> Result<u64, StoreError>;
}

/// Reply documents - `posts/{postId}/replies/{replyId}`.
#[async_trait]
pub trait ReplyStore: Send + Sync {
    async fn create(&self, reply: Reply) -> Result<Reply, StoreError>;

    /// All replies for a post, creation time ascending.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Reply>, StoreError>;

    async fn find_by_id(&self, post_id: Uuid, reply_id: Uuid)
    -> Result<Option<Reply>, StoreError>;

    async fn delete(&self, post_id: Uuid, reply_id: Uuid) -> Result<(), StoreError>;

    /// Remove replies whose post no longer exists. Returns how many were
    /// deleted.
    async fn delete_orphaned(&self) -> Result<u64, StoreError>;
}

/// Notification documents - `users/{userId}/notifications/{notificationId}`.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, notification: Notification) -> Result<Notification, StoreError>;

    /// Most recent notifications for a recipient, creation time descending.
    async fn recent_for(
        &self,
        recipient_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Notification>, StoreError>;

    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> Result<(), StoreError>;

    /// Batched write marking every listed notification read. Returns how many
    /// documents changed.
    async fn mark_all_read(&self, recipient_id: Uuid, ids: &[Uuid]) -> Result<u64, StoreError>;
}
