//! Redis-backed notification channel.
//!
//! Events cross process boundaries as JSON on one Redis channel per
//! recipient, so any API instance can deliver to a socket it holds.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::RwLock;
use uuid::Uuid;

use fanhub_core::ports::{ChannelError, EventHandler, NotificationChannel, NotificationEvent};

/// Redis connection configuration for the notification channel.
#[derive(Debug, Clone)]
pub struct RedisChannelConfig {
    pub url: String,
    pub connect_timeout: Duration,
}

impl Default for RedisChannelConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisChannelConfig {
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(5)),
        }
    }
}

fn feed_channel(recipient_id: Uuid) -> String {
    format!("fanhub:users:{recipient_id}:notifications")
}

/// Redis-backed notification channel.
pub struct RedisNotificationChannel {
    conn: ConnectionManager,
    client: Client,
    subscriptions: Arc<RwLock<HashMap<Uuid, tokio::task::JoinHandle<()>>>>,
}

impl RedisNotificationChannel {
    pub async fn new(config: RedisChannelConfig) -> Result<Self, ChannelError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| ChannelError::Connection(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn_manager_fut = ConnectionManager::new(client.clone());
        let conn = tokio::time::timeout(config.connect_timeout, conn_manager_fut)
            .await
            .map_err(|_| ChannelError::Connection("Connection timed out".to_string()))?
            .map_err(|e| ChannelError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis notification channel");

        Ok(Self {
            conn,
            client,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, ChannelError> {
        Self::new(RedisChannelConfig::from_env()).await
    }
}

#[async_trait]
impl NotificationChannel for RedisNotificationChannel {
    async fn publish(&self, event: &NotificationEvent) -> Result<(), ChannelError> {
        let payload =
            serde_json::to_string(event).map_err(|e| ChannelError::Publish(e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(feed_channel(event.recipient_id), payload)
            .await
            .map_err(|e| ChannelError::Publish(e.to_string()))?;
        Ok(())
    }

    async fn subscribe(
        &self,
        recipient_id: Uuid,
        handler: EventHandler,
    ) -> Result<(), ChannelError> {
        let client = self.client.clone();
        let channel_name = feed_channel(recipient_id);

        let handle = tokio::spawn(async move {
            let mut pubsub = match client.get_async_pubsub().await {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to get pubsub connection");
                    return;
                }
            };

            if let Err(e) = pubsub.subscribe(&channel_name).await {
                tracing::error!(channel = %channel_name, error = %e, "Failed to subscribe");
                return;
            }

            tracing::debug!(channel = %channel_name, "Subscribed to Redis channel");

            let mut stream = pubsub.on_message();
            while let Some(msg) = stream.next().await {
                let payload: String = match msg.get_payload() {
                    Ok(p) => p,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to get message payload");
                        continue;
                    }
                };

                let event: NotificationEvent = match serde_json::from_str(&payload) {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::warn!(error = %e, "Dropping malformed notification event");
                        continue;
                    }
                };

                handler(event).await;
            }

            tracing::info!(channel = %channel_name, "Notification channel closed");
        });

        if let Some(previous) = self
            .subscriptions
            .write()
            .await
            .insert(recipient_id, handle)
        {
            previous.abort();
        }

        Ok(())
    }

    async fn unsubscribe(&self, recipient_id: Uuid) -> Result<(), ChannelError> {
        if let Some(handle) = self.subscriptions.write().await.remove(&recipient_id) {
            handle.abort();
            tracing::debug!(recipient = %recipient_id, "Unsubscribed from Redis channel");
        }
        Ok(())
    }
}
