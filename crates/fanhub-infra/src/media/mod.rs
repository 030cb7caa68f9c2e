//! Media upload gateway implementations.

mod memory;

#[cfg(feature = "media-gateway")]
mod http;

pub use memory::InMemoryMediaStorage;

#[cfg(feature = "media-gateway")]
pub use http::{HttpMediaGateway, MediaGatewayConfig};
