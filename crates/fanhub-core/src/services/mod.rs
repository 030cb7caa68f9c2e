//! Stateful services driving the Fan Hub: the per-post interaction engine,
//! the feed controller and the notification center.

mod feed;
mod interaction;
mod notifications;

pub use feed::{FeedController, FeedScope};
pub use interaction::{InteractionStores, LikeOutcome, PostInteraction, ReplyOutcome};
pub use notifications::{EventSink, NotificationCenter};
