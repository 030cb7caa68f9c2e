//! Domain entities - the core business objects.

mod author;
mod notification;
mod post;
mod reply;
mod user;

pub use author::AuthorSnapshot;
pub use notification::{Notification, NotificationKind, REPLY_SNIPPET_CHARS, TITLE_SNIPPET_CHARS};
pub use post::Post;
pub use reply::Reply;
pub use user::User;

/// Truncate `text` to its first `max_chars` characters.
///
/// Operates on char boundaries so multi-byte text never panics.
pub(crate) fn snippet(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
