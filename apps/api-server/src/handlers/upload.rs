//! Upload handlers for the media gateway.
//!
//! Both endpoints accept one multipart `file` field and answer with the
//! stable public URL. Failures come back as `{ "error": ... }` with a
//! non-200 status, which is what the web client checks for.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures::StreamExt;

use fanhub_core::ports::{MediaError, MediaFolder};
use fanhub_shared::dto::{UploadErrorResponse, UploadResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

async fn read_file_field(mut payload: Multipart) -> AppResult<(Vec<u8>, String)> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::BadRequest(e.to_string()))?;

        let Some(cd) = field.content_disposition() else {
            continue;
        };
        if cd.get_name() != Some("file") {
            continue;
        }
        let filename = cd
            .get_filename()
            .unwrap_or("upload.bin")
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::BadRequest("Upload exceeds 20MB limit".to_string()));
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok((bytes, filename));
    }

    Err(AppError::BadRequest("Missing file field".to_string()))
}

fn upload_error(err: MediaError) -> HttpResponse {
    match err {
        MediaError::Rejected(detail) => {
            HttpResponse::BadRequest().json(UploadErrorResponse { error: detail })
        }
        MediaError::Gateway(detail) => {
            tracing::error!(error = %detail, "Media gateway failure");
            HttpResponse::BadGateway().json(UploadErrorResponse {
                error: "Upload failed".to_string(),
            })
        }
    }
}

/// POST /api/upload/avatar
///
/// Stores the file and points the identity's profile at it.
pub async fn avatar(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let (bytes, filename) = read_file_field(payload).await?;

    let stored = match state
        .media
        .upload(bytes, &filename, MediaFolder::Avatars)
        .await
    {
        Ok(stored) => stored,
        Err(err) => return Ok(upload_error(err)),
    };

    state
        .users
        .set_avatar(identity.user_id(), &stored.secure_url)
        .await?;

    Ok(HttpResponse::Ok().json(UploadResponse {
        secure_url: stored.secure_url,
    }))
}

/// POST /api/upload/post-image
///
/// Stores the file; the client attaches the returned URL to a post via
/// PATCH /api/posts/{id}/image.
pub async fn post_image(
    state: web::Data<AppState>,
    _identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let (bytes, filename) = read_file_field(payload).await?;

    match state
        .media
        .upload(bytes, &filename, MediaFolder::Posts)
        .await
    {
        Ok(stored) => Ok(HttpResponse::Ok().json(UploadResponse {
            secure_url: stored.secure_url,
        })),
        Err(err) => Ok(upload_error(err)),
    }
}
