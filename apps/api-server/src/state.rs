//! Application state - shared across all handlers.

use std::sync::Arc;

use fanhub_core::ports::{
    InteractionNotifier, LikeStore, MediaStorage, NotificationChannel, NotificationStore,
    PostStore, ReplyStore, UserStore,
};
use fanhub_core::services::{FeedController, InteractionStores};
use fanhub_infra::{InMemoryDocumentStore, InMemoryMediaStorage, InMemoryNotificationChannel,
    StoreNotifier};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub likes: Arc<dyn LikeStore>,
    pub replies: Arc<dyn ReplyStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub channel: Arc<dyn NotificationChannel>,
    pub notifier: Arc<dyn InteractionNotifier>,
    pub media: Arc<dyn MediaStorage>,
    pub feed: Arc<FeedController>,
    pub notification_limit: usize,
    /// Which document store backend is live, surfaced by the health check.
    pub store_backend: &'static str,
}

/// Every document port implemented by one backend.
trait DocumentStore:
    UserStore + PostStore + LikeStore + ReplyStore + NotificationStore + Send + Sync
{
}

impl DocumentStore for InMemoryDocumentStore {}

#[cfg(feature = "postgres")]
impl DocumentStore for fanhub_infra::PostgresDocumentStore {}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (store, store_backend) = Self::init_store(config).await;

        let channel = Self::init_channel().await;

        let notifier: Arc<dyn InteractionNotifier> = Arc::new(StoreNotifier::new(
            store.clone() as Arc<dyn NotificationStore>,
            Some(channel.clone()),
        ));

        let media = Self::init_media();

        let feed = Arc::new(FeedController::new(
            store.clone() as Arc<dyn PostStore>,
            config.feed_page_size,
        ));

        tracing::info!("Application state initialized");

        Self {
            users: store.clone(),
            posts: store.clone(),
            likes: store.clone(),
            replies: store.clone(),
            notifications: store,
            channel,
            notifier,
            media,
            feed,
            notification_limit: config.notification_limit,
            store_backend,
        }
    }

    /// The store handles the interaction engine needs.
    pub fn interaction_stores(&self) -> InteractionStores {
        InteractionStores {
            posts: self.posts.clone(),
            likes: self.likes.clone(),
            replies: self.replies.clone(),
        }
    }

    #[cfg(feature = "postgres")]
    async fn init_store(config: &AppConfig) -> (Arc<dyn DocumentStore>, &'static str) {
        use fanhub_infra::PostgresDocumentStore;
        use fanhub_infra::database::connect;

        if let Some(db_config) = &config.database {
            match connect(db_config).await {
                Ok(conn) => return (Arc::new(PostgresDocumentStore::new(conn)), "postgres"),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        (Arc::new(InMemoryDocumentStore::new()), "memory")
    }

    #[cfg(not(feature = "postgres"))]
    async fn init_store(_config: &AppConfig) -> (Arc<dyn DocumentStore>, &'static str) {
        tracing::info!("Running without postgres feature - using in-memory store");
        (Arc::new(InMemoryDocumentStore::new()), "memory")
    }

    #[cfg(feature = "redis")]
    async fn init_channel() -> Arc<dyn NotificationChannel> {
        use fanhub_infra::RedisNotificationChannel;

        if std::env::var("REDIS_URL").is_ok() {
            match RedisNotificationChannel::from_env().await {
                Ok(channel) => return Arc::new(channel),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to Redis: {}. Using in-memory channel.",
                        e
                    );
                }
            }
        }

        Arc::new(InMemoryNotificationChannel::default())
    }

    #[cfg(not(feature = "redis"))]
    async fn init_channel() -> Arc<dyn NotificationChannel> {
        Arc::new(InMemoryNotificationChannel::default())
    }

    #[cfg(feature = "media-gateway")]
    fn init_media() -> Arc<dyn MediaStorage> {
        use fanhub_infra::{HttpMediaGateway, MediaGatewayConfig};

        if let Some(gateway_config) = MediaGatewayConfig::from_env() {
            match HttpMediaGateway::new(gateway_config) {
                Ok(gateway) => return Arc::new(gateway),
                Err(e) => {
                    tracing::error!("Failed to build media gateway client: {}", e);
                }
            }
        } else {
            tracing::warn!("MEDIA_UPLOAD_URL not set. Uploads stay in memory.");
        }

        Arc::new(InMemoryMediaStorage::new())
    }

    #[cfg(not(feature = "media-gateway"))]
    fn init_media() -> Arc<dyn MediaStorage> {
        Arc::new(InMemoryMediaStorage::new())
    }
}
