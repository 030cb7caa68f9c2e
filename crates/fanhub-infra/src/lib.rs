//! # Fan Hub Infrastructure
//!
//! Concrete implementations of the ports defined in `fanhub-core`.
//! This crate contains the document stores, authentication, the live
//! notification channel, and the media upload gateway.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL document store via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `redis` - Redis-backed live notification channel
//! - `media-gateway` - HTTP media upload gateway

pub mod channel;
pub mod events;
pub mod media;
pub mod memory;

#[cfg(feature = "postgres")]
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use channel::InMemoryNotificationChannel;
pub use events::StoreNotifier;
pub use media::InMemoryMediaStorage;
pub use memory::InMemoryDocumentStore;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, DatabaseConnection, PostgresDocumentStore};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "redis")]
pub use channel::{RedisChannelConfig, RedisNotificationChannel};

#[cfg(feature = "media-gateway")]
pub use media::{HttpMediaGateway, MediaGatewayConfig};
