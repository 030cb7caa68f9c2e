//! HTTP media gateway client.
//!
//! Forwards uploads to the external media host and returns the stable
//! public URL it reports.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use fanhub_core::ports::{MediaError, MediaFolder, MediaStorage, StoredMedia};

/// Media gateway configuration.
#[derive(Debug, Clone)]
pub struct MediaGatewayConfig {
    pub upload_url: String,
    pub timeout: Duration,
}

impl MediaGatewayConfig {
    pub fn from_env() -> Option<Self> {
        let upload_url = std::env::var("MEDIA_UPLOAD_URL").ok()?;
        Some(Self {
            upload_url,
            timeout: std::env::var("MEDIA_UPLOAD_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(30)),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadOk {
    secure_url: String,
}

#[derive(Deserialize)]
struct UploadFailed {
    error: String,
}

/// [`MediaStorage`] backed by an HTTP upload endpoint.
pub struct HttpMediaGateway {
    client: reqwest::Client,
    config: MediaGatewayConfig,
}

impl HttpMediaGateway {
    pub fn new(config: MediaGatewayConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MediaError::Gateway(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl MediaStorage for HttpMediaGateway {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        folder: MediaFolder,
    ) -> Result<StoredMedia, MediaError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("folder", folder.as_str());

        let response = self
            .client
            .post(&self.config.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Gateway(e.to_string()))?;

        if response.status().is_success() {
            let ok: UploadOk = response
                .json()
                .await
                .map_err(|e| MediaError::Gateway(e.to_string()))?;
            Ok(StoredMedia {
                secure_url: ok.secure_url,
            })
        } else {
            let status = response.status();
            let detail = response
                .json::<UploadFailed>()
                .await
                .map(|f| f.error)
                .unwrap_or_else(|_| format!("upload failed with status {status}"));
            Err(MediaError::Rejected(detail))
        }
    }
}
