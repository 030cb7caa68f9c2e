//! Notification center.
//!
//! Maintains a bounded live view of the most recent notifications for one
//! identity. The unread count is never stored; it is derived from the view on
//! every read. A center can run detached (request-scoped, no live feed) or
//! connected to the notification channel, in which case incoming events are
//! pushed into the view as they arrive.

use std::sync::{Arc, Weak};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::Notification;
use crate::error::DomainError;
use crate::ports::{NotificationChannel, NotificationEvent, NotificationStore};

/// Callback invoked for every live event after the view has been updated.
/// Used by the socket layer to forward events to connected clients.
pub type EventSink = Arc<dyn Fn(&NotificationEvent) + Send + Sync>;

/// Live view of one identity's notifications.
pub struct NotificationCenter {
    store: Arc<dyn NotificationStore>,
    channel: Option<Arc<dyn NotificationChannel>>,
    recipient_id: Uuid,
    limit: usize,
    view: RwLock<Vec<Notification>>,
}

impl NotificationCenter {
    /// Request-scoped center with no live subscription.
    pub fn detached(
        store: Arc<dyn NotificationStore>,
        recipient_id: Uuid,
        limit: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            channel: None,
            recipient_id,
            limit,
            view: RwLock::new(Vec::new()),
        })
    }

    /// Center subscribed to the live channel. The subscription holds only a
    /// weak reference, so dropping the center ends the updates.
    pub async fn connect(
        store: Arc<dyn NotificationStore>,
        channel: Arc<dyn NotificationChannel>,
        recipient_id: Uuid,
        limit: usize,
        sink: Option<EventSink>,
    ) -> Result<Arc<Self>, DomainError> {
        let center = Arc::new(Self {
            store,
            channel: Some(channel.clone()),
            recipient_id,
            limit,
            view: RwLock::new(Vec::new()),
        });
        center.refresh().await?;

        let weak: Weak<Self> = Arc::downgrade(&center);
        channel
            .subscribe(
                recipient_id,
                Box::new(move |event: NotificationEvent| {
                    let weak = weak.clone();
                    let sink = sink.clone();
                    Box::pin(async move {
                        if let Some(center) = weak.upgrade() {
                            center.push(event.notification.clone()).await;
                        }
                        if let Some(sink) = &sink {
                            sink(&event);
                        }
                    })
                }),
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(center)
    }

    pub fn recipient_id(&self) -> Uuid {
        self.recipient_id
    }

    /// Reload the view from the store, newest first, bounded by the limit.
    pub async fn refresh(&self) -> Result<(), DomainError> {
        let items = self.store.recent_for(self.recipient_id, self.limit).await?;
        *self.view.write().await = items;
        Ok(())
    }

    /// Insert a freshly delivered notification at the head of the view.
    async fn push(&self, notification: Notification) {
        let mut view = self.view.write().await;
        view.insert(0, notification);
        view.truncate(self.limit);
    }

    pub async fn items(&self) -> Vec<Notification> {
        self.view.read().await.clone()
    }

    /// Pure derivation: how many items in view are unread.
    pub async fn unread_count(&self) -> usize {
        self.view.read().await.iter().filter(|n| !n.read).count()
    }

    /// Mark one notification read (click-through).
    pub async fn mark_read(&self, id: Uuid) -> Result<(), DomainError> {
        self.store.mark_read(self.recipient_id, id).await?;
        let mut view = self.view.write().await;
        if let Some(n) = view.iter_mut().find(|n| n.id == id) {
            n.read = true;
        }
        Ok(())
    }

    /// Mark every currently-unread item in view read, in one batched write.
    pub async fn mark_all_read(&self) -> Result<u64, DomainError> {
        let unread: Vec<Uuid> = {
            let view = self.view.read().await;
            view.iter().filter(|n| !n.read).map(|n| n.id).collect()
        };
        if unread.is_empty() {
            return Ok(0);
        }

        let changed = self.store.mark_all_read(self.recipient_id, &unread).await?;
        let mut view = self.view.write().await;
        for n in view.iter_mut() {
            n.read = true;
        }
        Ok(changed)
    }

    /// Drop the live subscription. Called when the identity signs out or the
    /// socket disconnects.
    pub async fn disconnect(&self) {
        if let Some(channel) = &self.channel {
            if let Err(err) = channel.unsubscribe(self.recipient_id).await {
                tracing::warn!(
                    recipient_id = %self.recipient_id,
                    error = %err,
                    "failed to unsubscribe notification feed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuthorSnapshot, Post};
    use crate::error::StoreError;
    use crate::ports::{ChannelError, EventHandler};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeNotificationStore {
        rows: Mutex<Vec<Notification>>,
        batch_calls: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl NotificationStore for FakeNotificationStore {
        async fn create(&self, n: Notification) -> Result<Notification, StoreError> {
            self.rows.lock().unwrap().push(n.clone());
            Ok(n)
        }

        async fn recent_for(
            &self,
            recipient_id: Uuid,
            limit: usize,
        ) -> Result<Vec<Notification>, StoreError> {
            let mut rows: Vec<_> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.recipient_id == recipient_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            rows.truncate(limit);
            Ok(rows)
        }

        async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> Result<(), StoreError> {
            let mut rows = self.rows.lock().unwrap();
            match rows
                .iter_mut()
                .find(|n| n.recipient_id == recipient_id && n.id == id)
            {
                Some(n) => {
                    n.read = true;
                    Ok(())
                }
                None => Err(StoreError::NotFound),
            }
        }

        async fn mark_all_read(
            &self,
            recipient_id: Uuid,
            ids: &[Uuid],
        ) -> Result<u64, StoreError> {
            self.batch_calls.lock().unwrap().push(ids.len());
            let mut changed = 0;
            let mut rows = self.rows.lock().unwrap();
            for n in rows.iter_mut() {
                if n.recipient_id == recipient_id && ids.contains(&n.id) && !n.read {
                    n.read = true;
                    changed += 1;
                }
            }
            Ok(changed)
        }
    }

    /// Channel double that captures the handler so tests can inject events.
    #[derive(Default)]
    struct CapturingChannel {
        handler: Mutex<Option<EventHandler>>,
        unsubscribed: Mutex<Vec<Uuid>>,
    }

    #[async_trait]
    impl NotificationChannel for CapturingChannel {
        async fn publish(&self, event: &NotificationEvent) -> Result<(), ChannelError> {
            let handler = self.handler.lock().unwrap().take();
            if let Some(handler) = handler {
                handler(event.clone()).await;
                *self.handler.lock().unwrap() = Some(handler);
            }
            Ok(())
        }

        async fn subscribe(
            &self,
            _recipient_id: Uuid,
            handler: EventHandler,
        ) -> Result<(), ChannelError> {
            *self.handler.lock().unwrap() = Some(handler);
            Ok(())
        }

        async fn unsubscribe(&self, recipient_id: Uuid) -> Result<(), ChannelError> {
            self.unsubscribed.lock().unwrap().push(recipient_id);
            Ok(())
        }
    }

    fn notification_for(recipient_id: Uuid) -> Notification {
        let author = AuthorSnapshot::new(recipient_id, "Author", None);
        let post = Post::new(author, Some("T".into()), "D".into(), None);
        let actor = AuthorSnapshot::new(Uuid::new_v4(), "Fan", None);
        Notification::like(actor, &post)
    }

    #[tokio::test]
    async fn unread_count_is_derived_from_view() {
        let store = Arc::new(FakeNotificationStore::default());
        let me = Uuid::new_v4();
        for _ in 0..3 {
            store.create(notification_for(me)).await.unwrap();
        }
        let mut read_one = notification_for(me);
        read_one.read = true;
        store.create(read_one).await.unwrap();

        let center = NotificationCenter::detached(store, me, 20);
        center.refresh().await.unwrap();

        assert_eq!(center.items().await.len(), 4);
        assert_eq!(center.unread_count().await, 3);
    }

    #[tokio::test]
    async fn mark_all_read_batches_only_unread_items() {
        let store = Arc::new(FakeNotificationStore::default());
        let me = Uuid::new_v4();
        for _ in 0..2 {
            store.create(notification_for(me)).await.unwrap();
        }
        let mut read_one = notification_for(me);
        read_one.read = true;
        store.create(read_one).await.unwrap();

        let center = NotificationCenter::detached(store.clone(), me, 20);
        center.refresh().await.unwrap();

        let changed = center.mark_all_read().await.unwrap();
        assert_eq!(changed, 2);
        assert_eq!(center.unread_count().await, 0);
        // One batched call covering exactly the two unread ids.
        assert_eq!(*store.batch_calls.lock().unwrap(), vec![2]);

        // Nothing left unread: no second store call.
        assert_eq!(center.mark_all_read().await.unwrap(), 0);
        assert_eq!(store.batch_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn connected_center_receives_live_events() {
        let store = Arc::new(FakeNotificationStore::default());
        let channel = Arc::new(CapturingChannel::default());
        let me = Uuid::new_v4();

        let seen: Arc<Mutex<Vec<Uuid>>> = Arc::default();
        let sink: EventSink = {
            let seen = seen.clone();
            Arc::new(move |event: &NotificationEvent| {
                seen.lock().unwrap().push(event.notification.id);
            })
        };

        let center = NotificationCenter::connect(store, channel.clone(), me, 20, Some(sink))
            .await
            .unwrap();
        assert_eq!(center.unread_count().await, 0);

        let event = NotificationEvent::from(notification_for(me));
        channel.publish(&event).await.unwrap();

        assert_eq!(center.items().await.len(), 1);
        assert_eq!(center.unread_count().await, 1);
        assert_eq!(*seen.lock().unwrap(), vec![event.notification.id]);

        center.disconnect().await;
        assert_eq!(*channel.unsubscribed.lock().unwrap(), vec![me]);
    }

    #[tokio::test]
    async fn live_view_is_bounded_by_limit() {
        let store = Arc::new(FakeNotificationStore::default());
        let channel = Arc::new(CapturingChannel::default());
        let me = Uuid::new_v4();

        let center = NotificationCenter::connect(store, channel.clone(), me, 2, None)
            .await
            .unwrap();

        for _ in 0..4 {
            channel
                .publish(&NotificationEvent::from(notification_for(me)))
                .await
                .unwrap();
        }
        assert_eq!(center.items().await.len(), 2);
    }
}
