//! Notification bell handlers.
//!
//! Request-scoped handlers use a detached center; the live-updating center
//! lives with the socket connection.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use fanhub_core::services::NotificationCenter;
use fanhub_shared::dto::{MarkAllReadResponse, NotificationListResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let center = NotificationCenter::detached(
        state.notifications.clone(),
        identity.user_id(),
        state.notification_limit,
    );
    center.refresh().await?;

    let items = center.items().await;
    let unread_count = center.unread_count().await;

    Ok(HttpResponse::Ok().json(NotificationListResponse {
        notifications: items.iter().map(super::notification_response).collect(),
        unread_count,
    }))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let center = NotificationCenter::detached(
        state.notifications.clone(),
        identity.user_id(),
        state.notification_limit,
    );
    center.mark_read(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/notifications/read-all
///
/// One batched write covering every unread item in the current view.
pub async fn mark_all_read(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let center = NotificationCenter::detached(
        state.notifications.clone(),
        identity.user_id(),
        state.notification_limit,
    );
    center.refresh().await?;
    let marked = center.mark_all_read().await?;

    Ok(HttpResponse::Ok().json(MarkAllReadResponse { marked }))
}
