use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorSnapshot, REPLY_SNIPPET_CHARS, snippet};

/// Reply entity - belongs to exactly one post.
///
/// Displayed in ascending creation order. Deletable by its own author or by
/// the parent post's author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub id: Uuid,
    pub post_id: Uuid,
    pub text: String,
    pub author: AuthorSnapshot,
    pub created_at: DateTime<Utc>,
}

impl Reply {
    /// Create a new reply with a client-side timestamp approximation.
    /// The store may overwrite `created_at` with its own clock on insert.
    pub fn new(post_id: Uuid, author: AuthorSnapshot, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            text,
            author,
            created_at: Utc::now(),
        }
    }

    /// First 75 characters of the reply text, for notification context.
    pub fn text_snippet(&self) -> String {
        snippet(&self.text, REPLY_SNIPPET_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_snippet_truncates_to_75_chars() {
        let author = AuthorSnapshot::new(Uuid::new_v4(), "A", None);
        let reply = Reply::new(Uuid::new_v4(), author, "y".repeat(100));
        assert_eq!(reply.text_snippet().chars().count(), 75);
    }
}
