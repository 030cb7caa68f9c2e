//! Live notification channel implementations.

mod memory;

#[cfg(feature = "redis")]
mod redis;

pub use memory::InMemoryNotificationChannel;

#[cfg(feature = "redis")]
pub use redis::{RedisChannelConfig, RedisNotificationChannel};
