//! Post feed controller.
//!
//! Produces two bounded views over the posts collection: "explore" (most
//! recent across all authors) and "mine" (most recent by the viewer). The
//! text filter is applied client-side over the fetched page, never pushed
//! down to the store.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Post;
use crate::error::DomainError;
use crate::ports::PostStore;

/// Which view of the feed to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    Explore,
    Mine,
}

/// Feed controller over the post store.
pub struct FeedController {
    posts: Arc<dyn PostStore>,
    page_size: usize,
}

impl FeedController {
    pub fn new(posts: Arc<dyn PostStore>, page_size: usize) -> Self {
        Self { posts, page_size }
    }

    /// Most recent posts across all authors, creation time descending.
    pub async fn explore(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.recent(self.page_size).await?)
    }

    /// Most recent posts by one author, creation time descending.
    pub async fn mine(&self, author_id: Uuid) -> Result<Vec<Post>, DomainError> {
        Ok(self
            .posts
            .recent_by_author(author_id, self.page_size)
            .await?)
    }

    /// Fetch one view and apply the optional text filter.
    /// The `mine` scope requires a signed-in viewer.
    pub async fn view(
        &self,
        scope: FeedScope,
        viewer: Option<Uuid>,
        query: Option<&str>,
    ) -> Result<Vec<Post>, DomainError> {
        let posts = match scope {
            FeedScope::Explore => self.explore().await?,
            FeedScope::Mine => {
                let viewer = viewer.ok_or(DomainError::Unauthenticated)?;
                self.mine(viewer).await?
            }
        };

        Ok(match query.map(str::trim) {
            Some(q) if !q.is_empty() => Self::filter(posts, q),
            _ => posts,
        })
    }

    /// Case-insensitive substring match over title, description and author
    /// name. Pure; preserves the incoming order.
    pub fn filter(posts: Vec<Post>, query: &str) -> Vec<Post> {
        let needle = query.to_lowercase();
        posts
            .into_iter()
            .filter(|post| {
                post.title
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&needle))
                    || post.description.to_lowercase().contains(&needle)
                    || post.author.name.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AuthorSnapshot;
    use crate::error::StoreError;
    use async_trait::async_trait;

    struct FixedPostStore {
        posts: Vec<Post>,
    }

    #[async_trait]
    impl PostStore for FixedPostStore {
        async fn create(&self, post: Post) -> Result<Post, StoreError> {
            Ok(post)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
            Ok(self.posts.iter().find(|p| p.id == id).cloned())
        }

        async fn recent(&self, limit: usize) -> Result<Vec<Post>, StoreError> {
            Ok(self.posts.iter().take(limit).cloned().collect())
        }

        async fn recent_by_author(
            &self,
            author_id: Uuid,
            limit: usize,
        ) -> Result<Vec<Post>, StoreError> {
            Ok(self
                .posts
                .iter()
                .filter(|p| p.author.id == author_id)
                .take(limit)
                .cloned()
                .collect())
        }

        async fn set_image_url(&self, _id: Uuid, _url: &str) -> Result<(), StoreError> {
            Ok(())
        }

        async fn delete(&self, _id: Uuid) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn post(author: &AuthorSnapshot, title: &str) -> Post {
        Post::new(author.clone(), Some(title.into()), "desc".into(), None)
    }

    #[tokio::test]
    async fn filter_matches_title_case_insensitively_in_both_scopes() {
        let alice = AuthorSnapshot::new(Uuid::new_v4(), "Alice", None);
        let posts = vec![post(&alice, "Alpha Launch"), post(&alice, "Beta Release")];
        let feed = FeedController::new(Arc::new(FixedPostStore { posts }), 50);

        let explore = feed
            .view(FeedScope::Explore, None, Some("alp"))
            .await
            .unwrap();
        assert_eq!(explore.len(), 1);
        assert_eq!(explore[0].title.as_deref(), Some("Alpha Launch"));

        let mine = feed
            .view(FeedScope::Mine, Some(alice.id), Some("alp"))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title.as_deref(), Some("Alpha Launch"));
    }

    #[tokio::test]
    async fn filter_also_matches_description_and_author_name() {
        let bob = AuthorSnapshot::new(Uuid::new_v4(), "Bobby Tables", None);
        let mut p = post(&bob, "Untitled");
        p.description = "shipping notes".into();
        let feed = FeedController::new(Arc::new(FixedPostStore { posts: vec![p] }), 50);

        assert_eq!(
            feed.view(FeedScope::Explore, None, Some("SHIPPING")).await.unwrap().len(),
            1
        );
        assert_eq!(
            feed.view(FeedScope::Explore, None, Some("bobby")).await.unwrap().len(),
            1
        );
        assert!(
            feed.view(FeedScope::Explore, None, Some("nothing")).await.unwrap().is_empty()
        );
    }

    #[tokio::test]
    async fn blank_query_returns_everything() {
        let a = AuthorSnapshot::new(Uuid::new_v4(), "A", None);
        let posts = vec![post(&a, "One"), post(&a, "Two")];
        let feed = FeedController::new(Arc::new(FixedPostStore { posts }), 50);

        assert_eq!(feed.view(FeedScope::Explore, None, Some("  ")).await.unwrap().len(), 2);
        assert_eq!(feed.view(FeedScope::Explore, None, None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn mine_requires_a_viewer() {
        let feed = FeedController::new(Arc::new(FixedPostStore { posts: vec![] }), 50);
        let err = feed.view(FeedScope::Mine, None, None).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated));
    }

    #[tokio::test]
    async fn page_size_bounds_the_view() {
        let a = AuthorSnapshot::new(Uuid::new_v4(), "A", None);
        let posts = (0..5).map(|i| post(&a, &format!("p{i}"))).collect();
        let feed = FeedController::new(Arc::new(FixedPostStore { posts }), 3);

        assert_eq!(feed.explore().await.unwrap().len(), 3);
    }
}
