//! Post lifecycle handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use fanhub_core::domain::{Post, Reply};
use fanhub_core::services::PostInteraction;
use fanhub_shared::dto::{CreatePostRequest, PostDetailResponse, SetPostImageRequest};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let description = req.description.trim().to_string();
    if description.is_empty() {
        return Err(AppError::BadRequest(
            "Description cannot be empty".to_string(),
        ));
    }
    let title = req
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let post = Post::new(identity.snapshot(), title, description, req.link);
    let saved = state.posts.create(post).await?;

    Ok(HttpResponse::Created().json(super::post_response(&saved, Some(false))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailQuery {
    /// Deep-link target from a reply notification.
    pub reply_id: Option<Uuid>,
}

/// Echo the requested deep-link reply id only while that reply still exists;
/// a stale link (reply deleted since the notification) is dropped silently.
fn highlight_reply(replies: &[Reply], requested: Option<Uuid>) -> Option<Uuid> {
    requested.filter(|target| replies.iter().any(|r| r.id == *target))
}

/// GET /api/posts/{id}?replyId=...
///
/// Returns the post, its replies in ascending creation order, and echoes the
/// requested deep-link reply id when that reply still exists.
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    query: web::Query<DetailQuery>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))?;

    let replies = state.replies.list_for_post(post_id).await?;

    let liked = match identity.0.as_ref() {
        Some(viewer) => Some(state.likes.is_liked(post_id, viewer.user_id()).await?),
        None => None,
    };

    let highlight_reply_id = highlight_reply(&replies, query.reply_id);

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: super::post_response(&post, liked),
        replies: replies.iter().map(super::reply_response).collect(),
        highlight_reply_id,
    }))
}

/// DELETE /api/posts/{id} - author only.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))?;

    let engine = PostInteraction::new(post, state.interaction_stores(), state.notifier.clone());
    engine.delete_post(Some(&identity.snapshot())).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// PATCH /api/posts/{id}/image - attach an uploaded image. Author only.
pub async fn set_image(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<SetPostImageRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))?;

    if post.author.id != identity.user_id() {
        return Err(AppError::Forbidden);
    }

    state.posts.set_image_url(post_id, &body.image_url).await?;

    let updated = Post {
        image_url: Some(body.into_inner().image_url),
        ..post
    };
    Ok(HttpResponse::Ok().json(super::post_response(&updated, None)))
}
