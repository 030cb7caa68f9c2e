//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod events;
mod media;
mod store;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use events::{
    ChannelError, EventHandler, InteractionNotifier, NotificationChannel, NotificationEvent,
};
pub use media::{MediaError, MediaFolder, MediaStorage, StoredMedia};
pub use store::{
    LikeApplied, LikeIntent, LikeStore, NotificationStore, PostStore, ReplyStore, UserStore,
};
