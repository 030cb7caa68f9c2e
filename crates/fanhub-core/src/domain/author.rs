use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author details copied by value onto a document at write time.
///
/// Intentionally stale: a later profile edit does not rewrite the snapshots
/// embedded in existing posts, replies or notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSnapshot {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
}

impl AuthorSnapshot {
    pub fn new(id: Uuid, name: impl Into<String>, avatar: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            avatar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_keeps_given_fields() {
        let id = Uuid::new_v4();
        let snap = AuthorSnapshot::new(id, "Ada", Some("https://cdn/a.png".into()));
        assert_eq!(snap.id, id);
        assert_eq!(snap.name, "Ada");
        assert_eq!(snap.avatar.as_deref(), Some("https://cdn/a.png"));
    }
}
