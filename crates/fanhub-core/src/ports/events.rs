//! Interaction event ports.
//!
//! The interaction engine hands committed side effects to an
//! [`InteractionNotifier`] instead of writing notification documents inline.
//! The default implementation persists the notification and publishes it on a
//! [`NotificationChannel`]; it can later be swapped for a server-triggered
//! pipeline without touching the engine's contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

use crate::domain::Notification;

/// A notification event as seen by live subscribers (the bell feed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub recipient_id: Uuid,
    pub notification: Notification,
}

impl From<Notification> for NotificationEvent {
    fn from(notification: Notification) -> Self {
        Self {
            recipient_id: notification.recipient_id,
            notification,
        }
    }
}

/// Fan-out hook called by the interaction engine after a committed
/// interaction.
///
/// Best-effort by contract: implementations log failures and never let them
/// reach the interaction result. Self-directed notifications must be dropped
/// before any write.
#[async_trait]
pub trait InteractionNotifier: Send + Sync {
    async fn notify(&self, notification: Notification);
}

/// Handler invoked for each event delivered to a subscription.
pub type EventHandler =
    Box<dyn Fn(NotificationEvent) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Live notification channel, keyed by recipient identity.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Publish an event to the recipient's feed.
    async fn publish(&self, event: &NotificationEvent) -> Result<(), ChannelError>;

    /// Subscribe to a recipient's feed.
    async fn subscribe(&self, recipient_id: Uuid, handler: EventHandler)
    -> Result<(), ChannelError>;

    /// Drop the subscription for a recipient (identity signed out or socket
    /// closed).
    async fn unsubscribe(&self, recipient_id: Uuid) -> Result<(), ChannelError>;
}

/// Channel errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Failed to publish: {0}")]
    Publish(String),

    #[error("Failed to subscribe: {0}")]
    Subscribe(String),

    #[error("Connection error: {0}")]
    Connection(String),
}
