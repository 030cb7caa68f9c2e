//! Default notification fan-out: persist the document, then publish it on
//! the live channel.
//!
//! Failures are logged and swallowed. A like that committed stays committed
//! even when its notification cannot be written.

use std::sync::Arc;

use async_trait::async_trait;

use fanhub_core::domain::Notification;
use fanhub_core::ports::{InteractionNotifier, NotificationChannel, NotificationEvent,
    NotificationStore};

/// Writes notifications through a [`NotificationStore`] and pushes them to an
/// optional [`NotificationChannel`] for connected recipients.
pub struct StoreNotifier {
    store: Arc<dyn NotificationStore>,
    channel: Option<Arc<dyn NotificationChannel>>,
}

impl StoreNotifier {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        channel: Option<Arc<dyn NotificationChannel>>,
    ) -> Self {
        Self { store, channel }
    }
}

#[async_trait]
impl InteractionNotifier for StoreNotifier {
    async fn notify(&self, notification: Notification) {
        if notification.is_self_directed() {
            tracing::debug!(
                actor = %notification.actor.id,
                "Dropping self-directed notification"
            );
            return;
        }

        let stored = match self.store.create(notification).await {
            Ok(n) => n,
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist notification");
                return;
            }
        };

        if let Some(channel) = &self.channel {
            let event = NotificationEvent::from(stored);
            if let Err(e) = channel.publish(&event).await {
                tracing::warn!(
                    recipient = %event.recipient_id,
                    error = %e,
                    "Failed to publish notification event"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::InMemoryNotificationChannel;
    use crate::memory::InMemoryDocumentStore;
    use fanhub_core::domain::{AuthorSnapshot, Post};
    use uuid::Uuid;

    fn liked_post(author_id: Uuid) -> Post {
        Post::new(
            AuthorSnapshot::new(author_id, "Author", None),
            Some("Title".into()),
            "Description".into(),
            None,
        )
    }

    #[tokio::test]
    async fn persists_and_publishes() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let channel = Arc::new(InMemoryNotificationChannel::default());
        let notifier = StoreNotifier::new(store.clone(), Some(channel.clone()));

        let author_id = Uuid::new_v4();
        let actor = AuthorSnapshot::new(Uuid::new_v4(), "Fan", None);
        notifier
            .notify(Notification::like(actor, &liked_post(author_id)))
            .await;

        let recent = store.recent_for(author_id, 10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].post_title_snippet, "Title");
    }

    #[tokio::test]
    async fn self_directed_is_never_written() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let notifier = StoreNotifier::new(store.clone(), None);

        let author_id = Uuid::new_v4();
        let actor = AuthorSnapshot::new(author_id, "Author", None);
        notifier
            .notify(Notification::like(actor, &liked_post(author_id)))
            .await;

        assert!(store.recent_for(author_id, 10).await.unwrap().is_empty());
    }
}
