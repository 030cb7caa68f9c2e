//! Like and reply handlers, routed through the interaction engine.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use fanhub_core::services::{LikeOutcome, PostInteraction, ReplyOutcome};
use fanhub_shared::dto::{CreateReplyRequest, LikeToggleResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn engine_for(state: &AppState, post_id: Uuid) -> AppResult<PostInteraction> {
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))?;

    Ok(PostInteraction::new(
        post,
        state.interaction_stores(),
        state.notifier.clone(),
    ))
}

/// POST /api/posts/{id}/like
///
/// Toggles the viewer's like. A conflicting transaction rolls the optimistic
/// state back and reports 409 with the restored values; the client decides
/// whether to try again.
pub async fn toggle_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let engine = engine_for(&state, path.into_inner()).await?;
    let viewer = identity.snapshot();
    engine.hydrate(Some(&viewer)).await?;

    let outcome = engine.toggle_like(Some(&viewer)).await?;
    Ok(match outcome {
        LikeOutcome::Ignored => HttpResponse::Ok().json(LikeToggleResponse::Ignored),
        LikeOutcome::Committed { liked, likes } => {
            HttpResponse::Ok().json(LikeToggleResponse::Committed { liked, likes })
        }
        LikeOutcome::RolledBack {
            liked,
            likes,
            reason,
        } => HttpResponse::Conflict().json(LikeToggleResponse::RolledBack {
            liked,
            likes,
            reason,
        }),
    })
}

/// GET /api/posts/{id}/replies
pub async fn list_replies(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    if state.posts.find_by_id(post_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Post {post_id} not found")));
    }

    let replies = state.replies.list_for_post(post_id).await?;
    Ok(HttpResponse::Ok().json(
        replies
            .iter()
            .map(super::reply_response)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/posts/{id}/replies
pub async fn create_reply(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreateReplyRequest>,
) -> AppResult<HttpResponse> {
    let engine = engine_for(&state, path.into_inner()).await?;

    let outcome = engine
        .submit_reply(Some(&identity.snapshot()), &body.text)
        .await?;

    match outcome {
        ReplyOutcome::Posted(reply) => {
            Ok(HttpResponse::Created().json(super::reply_response(&reply)))
        }
        ReplyOutcome::Ignored => Err(AppError::Busy),
    }
}

/// DELETE /api/posts/{id}/replies/{reply_id}
///
/// Allowed for the reply's author or the post's author.
pub async fn delete_reply(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, reply_id) = path.into_inner();
    let engine = engine_for(&state, post_id).await?;

    engine
        .delete_reply(Some(&identity.snapshot()), reply_id)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
