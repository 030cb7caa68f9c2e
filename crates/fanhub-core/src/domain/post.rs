use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorSnapshot, TITLE_SNIPPET_CHARS, snippet};

/// Post entity - one Fan Hub entry.
///
/// `likes` is a denormalized counter that must always equal the number of
/// like markers stored for the post. Only the atomic like transaction in the
/// store is allowed to move it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: String,
    pub link: Option<String>,
    /// Set after creation via the upload gateway, never at create time.
    pub image_url: Option<String>,
    pub author: AuthorSnapshot,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
}

impl Post {
    /// Create a new post. Starts with no image and a zero like counter.
    pub fn new(
        author: AuthorSnapshot,
        title: Option<String>,
        description: String,
        link: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            link,
            image_url: None,
            author,
            created_at: Utc::now(),
            likes: 0,
        }
    }

    /// Short context string for notifications: the first 50 characters of the
    /// title, falling back to the description, falling back to "your post".
    pub fn title_snippet(&self) -> String {
        let source = self
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| Some(&self.description).map(String::as_str).filter(|d| !d.is_empty()));

        match source {
            Some(text) => snippet(text, TITLE_SNIPPET_CHARS),
            None => "your post".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> AuthorSnapshot {
        AuthorSnapshot::new(Uuid::new_v4(), "Author", None)
    }

    #[test]
    fn new_post_has_no_image_and_zero_likes() {
        let post = Post::new(author(), Some("T".into()), "D".into(), None);
        assert!(post.image_url.is_none());
        assert_eq!(post.likes, 0);
    }

    #[test]
    fn title_snippet_prefers_title_then_description() {
        let long_title = "x".repeat(80);
        let post = Post::new(author(), Some(long_title), "desc".into(), None);
        assert_eq!(post.title_snippet().chars().count(), 50);

        let post = Post::new(author(), None, "Hello world".into(), None);
        assert_eq!(post.title_snippet(), "Hello world");

        let post = Post::new(author(), None, String::new(), None);
        assert_eq!(post.title_snippet(), "your post");
    }

    #[test]
    fn title_snippet_respects_char_boundaries() {
        let title = "é".repeat(60);
        let post = Post::new(author(), Some(title), "d".into(), None);
        assert_eq!(post.title_snippet().chars().count(), 50);
    }
}
