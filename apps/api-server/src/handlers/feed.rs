//! Feed handler.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use fanhub_core::services::FeedScope;
use fanhub_shared::dto::FeedResponse;

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// "explore" (default) or "mine".
    pub scope: Option<String>,
    /// Case-insensitive text filter over the fetched page.
    pub q: Option<String>,
}

/// GET /api/feed?scope=explore|mine&q=...
pub async fn feed(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<FeedQuery>,
) -> AppResult<HttpResponse> {
    let scope = match query.scope.as_deref() {
        None | Some("explore") => FeedScope::Explore,
        Some("mine") => FeedScope::Mine,
        Some(other) => {
            return Err(AppError::BadRequest(format!("Unknown feed scope: {other}")));
        }
    };

    let viewer = identity.0.as_ref().map(|i| i.user_id());
    let posts = state.feed.view(scope, viewer, query.q.as_deref()).await?;

    let mut responses = Vec::with_capacity(posts.len());
    for post in &posts {
        let liked = match viewer {
            Some(user_id) => Some(state.likes.is_liked(post.id, user_id).await?),
            None => None,
        };
        responses.push(super::post_response(post, liked));
    }

    Ok(HttpResponse::Ok().json(FeedResponse {
        scope: match scope {
            FeedScope::Explore => "explore".to_string(),
            FeedScope::Mine => "mine".to_string(),
        },
        posts: responses,
    }))
}
