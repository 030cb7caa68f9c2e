//! HTTP handlers and route configuration.

mod auth;
mod feed;
mod health;
mod interactions;
mod notifications;
mod posts;
mod upload;

use actix_web::web;

use fanhub_core::domain::{Notification, Post, Reply};
use fanhub_shared::dto::{NotificationResponse, PostResponse, ReplyResponse};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Feed
            .route("/feed", web::get().to(feed::feed))
            // Posts and their interactions
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create))
                    .route("/{id}", web::get().to(posts::detail))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/image", web::patch().to(posts::set_image))
                    .route("/{id}/like", web::post().to(interactions::toggle_like))
                    .route("/{id}/replies", web::get().to(interactions::list_replies))
                    .route("/{id}/replies", web::post().to(interactions::create_reply))
                    .route(
                        "/{id}/replies/{reply_id}",
                        web::delete().to(interactions::delete_reply),
                    ),
            )
            // Notification bell
            .service(
                web::scope("/notifications")
                    .route("", web::get().to(notifications::list))
                    .route("/read-all", web::post().to(notifications::mark_all_read))
                    .route("/{id}/read", web::post().to(notifications::mark_read)),
            )
            // Uploads
            .service(
                web::scope("/upload")
                    .route("/avatar", web::post().to(upload::avatar))
                    .route("/post-image", web::post().to(upload::post_image)),
            ),
    );
}

pub(crate) fn post_response(post: &Post, liked_by_viewer: Option<bool>) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title.clone(),
        description: post.description.clone(),
        link: post.link.clone(),
        image_url: post.image_url.clone(),
        author_id: post.author.id,
        author_name: post.author.name.clone(),
        author_avatar: post.author.avatar.clone(),
        created_at: post.created_at,
        likes: post.likes,
        liked_by_viewer,
    }
}

pub(crate) fn reply_response(reply: &Reply) -> ReplyResponse {
    ReplyResponse {
        id: reply.id,
        post_id: reply.post_id,
        text: reply.text.clone(),
        author_id: reply.author.id,
        author_name: reply.author.name.clone(),
        author_avatar: reply.author.avatar.clone(),
        created_at: reply.created_at,
    }
}

pub(crate) fn notification_response(n: &Notification) -> NotificationResponse {
    NotificationResponse {
        id: n.id,
        kind: n.kind.as_str().to_string(),
        actor_id: n.actor.id,
        actor_name: n.actor.name.clone(),
        actor_avatar: n.actor.avatar.clone(),
        post_id: n.post_id,
        post_title_snippet: n.post_title_snippet.clone(),
        reply_text_snippet: n.reply_text_snippet.clone(),
        reply_id: n.reply_id,
        created_at: n.created_at,
        read: n.read,
    }
}
