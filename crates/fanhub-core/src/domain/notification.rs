use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorSnapshot, Post, Reply};

/// Characters of post title/description embedded in a notification.
pub const TITLE_SNIPPET_CHARS: usize = 50;
/// Characters of reply text embedded in a reply notification.
pub const REPLY_SNIPPET_CHARS: usize = 75;

/// What kind of interaction produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Reply,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Reply => "reply",
        }
    }
}

/// Notification entity - belongs to exactly one recipient.
///
/// Created as a side effect of a like or reply on the recipient's post,
/// never self-targeted. Mutated only by marking read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub kind: NotificationKind,
    pub actor: AuthorSnapshot,
    pub post_id: Uuid,
    pub post_title_snippet: String,
    pub reply_text_snippet: Option<String>,
    /// Present for reply notifications so a deep link can scroll to the reply.
    pub reply_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    /// Notification sent to a post's author when someone likes the post.
    pub fn like(actor: AuthorSnapshot, post: &Post) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_id: post.author.id,
            kind: NotificationKind::Like,
            actor,
            post_id: post.id,
            post_title_snippet: post.title_snippet(),
            reply_text_snippet: None,
            reply_id: None,
            created_at: Utc::now(),
            read: false,
        }
    }

    /// Notification sent to a post's author when someone replies.
    pub fn reply(actor: AuthorSnapshot, post: &Post, reply: &Reply) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_id: post.author.id,
            kind: NotificationKind::Reply,
            actor,
            post_id: post.id,
            post_title_snippet: post.title_snippet(),
            reply_text_snippet: Some(reply.text_snippet()),
            reply_id: Some(reply.id),
            created_at: Utc::now(),
            read: false,
        }
    }

    /// Whether this notification would target its own actor.
    /// Self-notifications are suppressed before they are ever written.
    pub fn is_self_directed(&self) -> bool {
        self.actor.id == self.recipient_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_by(author_id: Uuid) -> Post {
        Post::new(
            AuthorSnapshot::new(author_id, "Author", None),
            None,
            "Hello world".into(),
            None,
        )
    }

    #[test]
    fn like_notification_targets_post_author() {
        let author_id = Uuid::new_v4();
        let actor = AuthorSnapshot::new(Uuid::new_v4(), "Fan", None);
        let n = Notification::like(actor.clone(), &post_by(author_id));

        assert_eq!(n.recipient_id, author_id);
        assert_eq!(n.kind, NotificationKind::Like);
        assert_eq!(n.post_title_snippet, "Hello world");
        assert!(!n.read);
        assert!(!n.is_self_directed());
    }

    #[test]
    fn reply_notification_carries_snippet_and_reply_id() {
        let post = post_by(Uuid::new_v4());
        let actor = AuthorSnapshot::new(Uuid::new_v4(), "Fan", None);
        let reply = Reply::new(post.id, actor.clone(), "Nice post!".into());
        let n = Notification::reply(actor, &post, &reply);

        assert_eq!(n.kind, NotificationKind::Reply);
        assert_eq!(n.reply_text_snippet.as_deref(), Some("Nice post!"));
        assert_eq!(n.reply_id, Some(reply.id));
    }

    #[test]
    fn self_directed_detection() {
        let author_id = Uuid::new_v4();
        let post = post_by(author_id);
        let n = Notification::like(AuthorSnapshot::new(author_id, "Author", None), &post);
        assert!(n.is_self_directed());
    }
}
