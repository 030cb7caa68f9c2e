//! Media upload gateway port.
//!
//! Avatar and post-image uploads go through the same gateway, differing only
//! by the storage folder tag. The gateway returns a stable public URL.

use async_trait::async_trait;

/// Where an uploaded file is filed on the media host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFolder {
    Avatars,
    Posts,
}

impl MediaFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFolder::Avatars => "avatars",
            MediaFolder::Posts => "posts",
        }
    }
}

/// A successfully stored file.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub secure_url: String,
}

/// Media upload gateway.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        folder: MediaFolder,
    ) -> Result<StoredMedia, MediaError>;
}

/// Upload errors.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Media gateway error: {0}")]
    Gateway(String),
}
