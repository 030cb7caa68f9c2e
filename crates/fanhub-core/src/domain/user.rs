use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthorSnapshot;

/// User entity - a signed-up identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(email: String, password_hash: String, display_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            display_name,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The name shown on documents this user authors.
    /// Falls back to the email address when no display name is set.
    pub fn author_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }

    /// Author fields to embed on a document created by this user.
    pub fn snapshot(&self) -> AuthorSnapshot {
        AuthorSnapshot::new(self.id, self.author_name(), self.avatar_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_name_falls_back_to_email() {
        let user = User::new("fan@example.com".into(), "hash".into(), None);
        assert_eq!(user.author_name(), "fan@example.com");

        let named = User::new("fan@example.com".into(), "hash".into(), Some("Fan One".into()));
        assert_eq!(named.author_name(), "Fan One");
        assert_eq!(named.snapshot().name, "Fan One");
    }
}
