//! Socket.IO handlers for the live notification bell.
//!
//! A client authenticates with its access token, joins its `user:{id}` room,
//! and from then on receives `notification` events as they are published.
//! The per-socket [`NotificationCenter`] is torn down on disconnect.

use socketioxide::{
    SocketIo,
    extract::{Data, SocketRef},
};
use std::sync::Arc;
use tokio::sync::Mutex;

use fanhub_core::ports::TokenService;
use fanhub_core::services::{EventSink, NotificationCenter};

use crate::state::AppState;

fn user_room(user_id: uuid::Uuid) -> String {
    format!("user:{user_id}")
}

/// Per-socket session, set once `auth` succeeds.
#[derive(Default, Clone)]
struct Session {
    center: Arc<Mutex<Option<Arc<NotificationCenter>>>>,
}

/// Configure Socket.IO handlers.
pub fn configure_socket_handlers(io: SocketIo, state: AppState, token_service: Arc<dyn TokenService>) {
    let io_for_ns = io.clone();
    io.ns("/", move |socket: SocketRef| {
        let io = io_for_ns.clone();
        let state = state.clone();
        let token_service = token_service.clone();
        async move {
            tracing::info!(socket_id = %socket.id, "Client connected");

            let session = Session::default();

            // Authenticate and join the identity's room.
            let auth_session = session.clone();
            socket.on(
                "auth",
                move |socket: SocketRef, Data::<String>(token)| {
                    let io = io.clone();
                    let state = state.clone();
                    let token_service = token_service.clone();
                    let session = auth_session.clone();
                    async move {
                        let claims = match token_service.validate_token(&token) {
                            Ok(claims) => claims,
                            Err(e) => {
                                tracing::warn!(socket_id = %socket.id, error = %e, "Socket auth failed");
                                socket.emit("auth_error", &e.to_string()).ok();
                                return;
                            }
                        };

                        let user_id = claims.user_id;
                        let room = user_room(user_id);
                        socket.join(room.clone()).ok();

                        // Forward every live event into the room.
                        let sink: EventSink = {
                            let io = io.clone();
                            let room = room.clone();
                            Arc::new(move |event| {
                                let payload = crate::handlers::notification_response(&event.notification);
                                io.to(room.clone()).emit("notification", &payload).ok();
                            })
                        };

                        match NotificationCenter::connect(
                            state.notifications.clone(),
                            state.channel.clone(),
                            user_id,
                            state.notification_limit,
                            Some(sink),
                        )
                        .await
                        {
                            Ok(center) => {
                                let unread = center.unread_count().await;
                                *session.center.lock().await = Some(center);
                                tracing::info!(socket_id = %socket.id, user_id = %user_id, "Socket authenticated");
                                socket.emit("authed", &serde_json::json!({ "unreadCount": unread })).ok();
                            }
                            Err(e) => {
                                tracing::error!(user_id = %user_id, error = %e, "Failed to connect notification center");
                                socket.emit("auth_error", &"subscription failed").ok();
                            }
                        }
                    }
                },
            );

            let disconnect_session = session.clone();
            socket.on_disconnect(move |socket: SocketRef| {
                let session = disconnect_session.clone();
                async move {
                    if let Some(center) = session.center.lock().await.take() {
                        center.disconnect().await;
                    }
                    tracing::info!(socket_id = %socket.id, "Client disconnected");
                }
            });
        }
    });
}

/// Create SocketIO layer for integration.
pub fn create_socketio_layer(
    state: AppState,
    token_service: Arc<dyn TokenService>,
) -> (socketioxide::layer::SocketIoLayer, SocketIo) {
    let (layer, io) = SocketIo::new_layer();
    configure_socket_handlers(io.clone(), state, token_service);
    (layer, io)
}
