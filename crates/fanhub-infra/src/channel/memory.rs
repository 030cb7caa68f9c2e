//! In-memory notification channel.
//!
//! This is a fallback when Redis is not available.
//! Works within a single process only.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use fanhub_core::ports::{ChannelError, EventHandler, NotificationChannel, NotificationEvent};

/// In-memory notification channel, one broadcast sender per recipient.
pub struct InMemoryNotificationChannel {
    feeds: Arc<RwLock<HashMap<Uuid, broadcast::Sender<NotificationEvent>>>>,
    buffer_size: usize,
}

impl InMemoryNotificationChannel {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            feeds: Arc::new(RwLock::new(HashMap::new())),
            buffer_size,
        }
    }
}

impl Default for InMemoryNotificationChannel {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl NotificationChannel for InMemoryNotificationChannel {
    async fn publish(&self, event: &NotificationEvent) -> Result<(), ChannelError> {
        let feeds = self.feeds.read().await;

        if let Some(sender) = feeds.get(&event.recipient_id) {
            // Ignore send errors (recipient has no live subscriber)
            let _ = sender.send(event.clone());
            tracing::debug!(recipient = %event.recipient_id, "Notification event published");
        } else {
            tracing::debug!(recipient = %event.recipient_id, "No live subscriber for recipient");
        }

        Ok(())
    }

    async fn subscribe(
        &self,
        recipient_id: Uuid,
        handler: EventHandler,
    ) -> Result<(), ChannelError> {
        let mut feeds = self.feeds.write().await;

        let sender = feeds
            .entry(recipient_id)
            .or_insert_with(|| broadcast::channel(self.buffer_size).0);

        let mut receiver = sender.subscribe();

        tokio::spawn(async move {
            tracing::info!(recipient = %recipient_id, "Subscribed to notification feed");

            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        handler(event).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        tracing::warn!(
                            recipient = %recipient_id,
                            lagged = count,
                            "Notification subscriber lagged behind"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!(recipient = %recipient_id, "Notification feed closed");
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    async fn unsubscribe(&self, recipient_id: Uuid) -> Result<(), ChannelError> {
        let mut feeds = self.feeds.write().await;
        feeds.remove(&recipient_id);
        tracing::info!(recipient = %recipient_id, "Unsubscribed from notification feed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanhub_core::domain::{AuthorSnapshot, Notification, Post};
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn delivers_to_subscribed_recipient_only() {
        let channel = InMemoryNotificationChannel::default();
        let recipient = Uuid::new_v4();
        let (tx, mut rx) = mpsc::channel(1);

        channel
            .subscribe(
                recipient,
                Box::new(move |event| {
                    let tx = tx.clone();
                    Box::pin(async move {
                        let _ = tx.send(event.notification.id).await;
                    })
                }),
            )
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;

        let post = Post::new(
            AuthorSnapshot::new(recipient, "Author", None),
            None,
            "Hello".into(),
            None,
        );
        let actor = AuthorSnapshot::new(Uuid::new_v4(), "Fan", None);
        let event = NotificationEvent::from(Notification::like(actor, &post));
        let expected = event.notification.id;

        channel.publish(&event).await.unwrap();

        let received = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(received, Some(expected));

        channel.unsubscribe(recipient).await.unwrap();
    }

    #[tokio::test]
    async fn publish_without_subscriber_is_ok() {
        let channel = InMemoryNotificationChannel::default();
        let post = Post::new(
            AuthorSnapshot::new(Uuid::new_v4(), "Author", None),
            None,
            "Hello".into(),
            None,
        );
        let actor = AuthorSnapshot::new(Uuid::new_v4(), "Fan", None);
        let event = NotificationEvent::from(Notification::like(actor, &post));

        assert!(channel.publish(&event).await.is_ok());
    }
}
