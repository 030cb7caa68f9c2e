//! Data Transfer Objects - request/response types for the API.
//!
//! Fan Hub document fields use camelCase on the wire (`authorId`,
//! `createdAt`, `secureUrl`), matching what the web client stores and reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Public view of an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to create a post. Images are attached after creation via the
/// upload gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub description: String,
    pub link: Option<String>,
}

/// Request to attach an uploaded image to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPostImageRequest {
    pub image_url: String,
}

/// One post as rendered in the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: String,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
    /// Whether the requesting identity currently likes this post.
    /// Absent for anonymous requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liked_by_viewer: Option<bool>,
}

/// A feed view plus the scope it was produced for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub scope: String,
    pub posts: Vec<PostResponse>,
}

/// One reply under a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub text: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to post a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReplyRequest {
    pub text: String,
}

/// Post detail view: the post, its replies (ascending), and the echo of a
/// requested deep-link reply id when that reply is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub replies: Vec<ReplyResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_reply_id: Option<Uuid>,
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LikeToggleResponse {
    /// Another toggle was in flight; nothing changed.
    Ignored,
    /// Transaction committed.
    #[serde(rename_all = "camelCase")]
    Committed { liked: bool, likes: i64 },
    /// Transaction aborted; the reported values are the restored state.
    #[serde(rename_all = "camelCase")]
    RolledBack {
        liked: bool,
        likes: i64,
        reason: String,
    },
}

/// One notification in the bell dropdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub actor_id: Uuid,
    pub actor_name: String,
    pub actor_avatar: Option<String>,
    pub post_id: Uuid,
    pub post_title_snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_text_snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

/// The notification view plus its derived unread count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: usize,
}

/// Result of a bulk mark-as-read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    pub marked: u64,
}

/// Successful upload: the stable public URL on the media host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub secure_url: String,
}

/// Failed upload, returned with a non-200 status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadErrorResponse {
    pub error: String,
}
