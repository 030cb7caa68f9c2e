//! Post interaction engine.
//!
//! One engine instance owns the view state for one post: the liked flag and
//! like counter, the lazily loaded reply list, and per-operation busy flags.
//! Like toggles are applied optimistically and reconciled against the store's
//! atomic transaction; a failed transaction rolls the view back to its
//! pre-operation values.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{AuthorSnapshot, Notification, Post, Reply};
use crate::error::DomainError;
use crate::ports::{InteractionNotifier, LikeIntent, LikeStore, PostStore, ReplyStore};

/// Store handles the engine needs, injected rather than ambient.
#[derive(Clone)]
pub struct InteractionStores {
    pub posts: Arc<dyn PostStore>,
    pub likes: Arc<dyn LikeStore>,
    pub replies: Arc<dyn ReplyStore>,
}

/// Result of a like toggle, explicit so rollback is a pure function of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeOutcome {
    /// A toggle was already in flight; this invocation did nothing.
    Ignored,
    /// Transaction committed; `likes` is the authoritative counter.
    Committed { liked: bool, likes: i64 },
    /// Transaction aborted; the view was restored to the given values.
    RolledBack { liked: bool, likes: i64, reason: String },
}

/// Result of a reply submission.
#[derive(Debug, Clone)]
pub enum ReplyOutcome {
    /// A submission was already in flight; this invocation did nothing.
    Ignored,
    Posted(Reply),
}

#[derive(Debug, Default)]
struct ViewState {
    /// Whose marker the `liked` flag reflects. The flag is meaningless for
    /// any other viewer and is re-read from the store when the actor changes.
    viewer_id: Option<Uuid>,
    liked: bool,
    like_count: i64,
    replies: Vec<Reply>,
    replies_expanded: bool,
    /// Set once the reply fetch has been attempted; reset only on fetch error
    /// so the user can retry by re-expanding.
    replies_fetched: bool,
}

/// Per-post interaction engine.
pub struct PostInteraction {
    post: Post,
    stores: InteractionStores,
    notifier: Arc<dyn InteractionNotifier>,
    view: RwLock<ViewState>,
    like_busy: AtomicBool,
    reply_busy: AtomicBool,
    delete_busy: AtomicBool,
}

impl PostInteraction {
    pub fn new(post: Post, stores: InteractionStores, notifier: Arc<dyn InteractionNotifier>) -> Self {
        let view = ViewState {
            like_count: post.likes.max(0),
            ..ViewState::default()
        };
        Self {
            post,
            stores,
            notifier,
            view: RwLock::new(view),
            like_busy: AtomicBool::new(false),
            reply_busy: AtomicBool::new(false),
            delete_busy: AtomicBool::new(false),
        }
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    /// Resolve the viewer's current liked state from the store.
    pub async fn hydrate(&self, viewer: Option<&AuthorSnapshot>) -> Result<(), DomainError> {
        let liked = match viewer {
            Some(actor) => self.stores.likes.is_liked(self.post.id, actor.id).await?,
            None => false,
        };
        let mut view = self.view.write().await;
        view.viewer_id = viewer.map(|a| a.id);
        view.liked = liked;
        Ok(())
    }

    pub async fn liked(&self) -> bool {
        self.view.read().await.liked
    }

    pub async fn like_count(&self) -> i64 {
        self.view.read().await.like_count
    }

    pub async fn replies(&self) -> Vec<Reply> {
        self.view.read().await.replies.clone()
    }

    pub async fn replies_expanded(&self) -> bool {
        self.view.read().await.replies_expanded
    }

    /// Toggle the viewer's like on this post.
    ///
    /// The view is updated optimistically before the transaction runs; the
    /// counter never goes below zero. A second call while one is in flight
    /// returns [`LikeOutcome::Ignored`]. When the acting viewer differs from
    /// the one the view was hydrated for, their marker is read first so the
    /// toggle direction is theirs, not the previous viewer's. Aborted
    /// transactions are not retried.
    pub async fn toggle_like(
        &self,
        viewer: Option<&AuthorSnapshot>,
    ) -> Result<LikeOutcome, DomainError> {
        let actor = viewer.ok_or(DomainError::Unauthenticated)?;

        if self
            .like_busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(LikeOutcome::Ignored);
        }

        if self.view.read().await.viewer_id != Some(actor.id) {
            let liked = match self.stores.likes.is_liked(self.post.id, actor.id).await {
                Ok(liked) => liked,
                Err(err) => {
                    self.like_busy.store(false, Ordering::Release);
                    return Err(err.into());
                }
            };
            let mut view = self.view.write().await;
            view.viewer_id = Some(actor.id);
            view.liked = liked;
        }

        // Optimistic update, applied before the store is consulted.
        let (prev_liked, prev_count) = {
            let mut view = self.view.write().await;
            let prev = (view.liked, view.like_count);
            view.liked = !prev.0;
            view.like_count = if prev.0 { (prev.1 - 1).max(0) } else { prev.1 + 1 };
            prev
        };

        let intent = if prev_liked {
            LikeIntent::Unlike
        } else {
            LikeIntent::Like
        };

        let outcome = match self.stores.likes.apply(self.post.id, actor.id, intent).await {
            Ok(applied) => {
                let (liked, likes) = {
                    let mut view = self.view.write().await;
                    view.like_count = applied.likes.max(0);
                    (view.liked, view.like_count)
                };
                if intent == LikeIntent::Like && actor.id != self.post.author.id {
                    self.notifier
                        .notify(Notification::like(actor.clone(), &self.post))
                        .await;
                }
                LikeOutcome::Committed { liked, likes }
            }
            Err(err) => {
                tracing::warn!(
                    post_id = %self.post.id,
                    error = %err,
                    "like transaction failed, rolling back optimistic state"
                );
                let mut view = self.view.write().await;
                view.liked = prev_liked;
                view.like_count = prev_count;
                LikeOutcome::RolledBack {
                    liked: prev_liked,
                    likes: prev_count,
                    reason: err.to_string(),
                }
            }
        };

        self.like_busy.store(false, Ordering::Release);
        Ok(outcome)
    }

    /// Append a reply and expand the panel.
    ///
    /// On success the stored reply is inserted into the local list without a
    /// re-fetch. On failure the caller keeps its input and retries.
    pub async fn submit_reply(
        &self,
        viewer: Option<&AuthorSnapshot>,
        text: &str,
    ) -> Result<ReplyOutcome, DomainError> {
        let actor = viewer.ok_or(DomainError::Unauthenticated)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::Validation("Reply cannot be empty".to_string()));
        }

        if self
            .reply_busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(ReplyOutcome::Ignored);
        }

        let reply = Reply::new(self.post.id, actor.clone(), text.to_string());
        let result = self.stores.replies.create(reply).await;
        let outcome = match result {
            Ok(stored) => {
                {
                    let mut view = self.view.write().await;
                    view.replies.push(stored.clone());
                    view.replies_expanded = true;
                    view.replies_fetched = true;
                }
                if actor.id != self.post.author.id {
                    self.notifier
                        .notify(Notification::reply(actor.clone(), &self.post, &stored))
                        .await;
                }
                Ok(ReplyOutcome::Posted(stored))
            }
            Err(err) => Err(DomainError::from(err)),
        };

        self.reply_busy.store(false, Ordering::Release);
        outcome
    }

    /// Expand the reply panel, fetching at most once per engine lifetime.
    ///
    /// A failed fetch collapses the panel and resets the guard so the next
    /// expand retries.
    pub async fn expand_replies(&self) -> Result<Vec<Reply>, DomainError> {
        {
            let mut view = self.view.write().await;
            view.replies_expanded = true;
            if view.replies_fetched {
                return Ok(view.replies.clone());
            }
            view.replies_fetched = true;
        }

        match self.stores.replies.list_for_post(self.post.id).await {
            Ok(list) => {
                let mut view = self.view.write().await;
                view.replies = list.clone();
                Ok(list)
            }
            Err(err) => {
                let mut view = self.view.write().await;
                view.replies_fetched = false;
                view.replies_expanded = false;
                Err(err.into())
            }
        }
    }

    pub async fn collapse_replies(&self) {
        self.view.write().await.replies_expanded = false;
    }

    /// Delete the post document. Author only.
    ///
    /// Subcollections are not cascaded here; orphaned likes and replies are
    /// collected by the scheduled sweep.
    pub async fn delete_post(&self, viewer: Option<&AuthorSnapshot>) -> Result<(), DomainError> {
        let actor = viewer.ok_or(DomainError::Unauthenticated)?;
        if actor.id != self.post.author.id {
            return Err(DomainError::Forbidden);
        }

        if self
            .delete_busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(DomainError::Busy);
        }

        let result = self.stores.posts.delete(self.post.id).await;
        self.delete_busy.store(false, Ordering::Release);
        result.map_err(Into::into)
    }

    /// Delete one reply. Allowed for the reply's author or the post's author.
    pub async fn delete_reply(
        &self,
        viewer: Option<&AuthorSnapshot>,
        reply_id: Uuid,
    ) -> Result<(), DomainError> {
        let actor = viewer.ok_or(DomainError::Unauthenticated)?;

        // Prefer the locally loaded copy; fall back to a store read when the
        // panel was never expanded.
        let reply = {
            let view = self.view.read().await;
            view.replies.iter().find(|r| r.id == reply_id).cloned()
        };
        let reply = match reply {
            Some(r) => r,
            None => self
                .stores
                .replies
                .find_by_id(self.post.id, reply_id)
                .await?
                .ok_or(DomainError::NotFound {
                    entity: "reply",
                    id: reply_id,
                })?,
        };

        if actor.id != reply.author.id && actor.id != self.post.author.id {
            return Err(DomainError::Forbidden);
        }

        if self
            .delete_busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(DomainError::Busy);
        }

        let result = self.stores.replies.delete(self.post.id, reply_id).await;
        self.delete_busy.store(false, Ordering::Release);
        result?;

        self.view
            .write()
            .await
            .replies
            .retain(|r| r.id != reply_id);
        Ok(())
    }
}
