//! In-memory media storage for tests and local runs without a gateway.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use fanhub_core::ports::{MediaError, MediaFolder, MediaStorage, StoredMedia};

/// Stores uploads in a map and hands out fake `memory://` URLs.
#[derive(Default)]
pub struct InMemoryMediaStorage {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored files. Test hook.
    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait]
impl MediaStorage for InMemoryMediaStorage {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        folder: MediaFolder,
    ) -> Result<StoredMedia, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Rejected("empty file".to_string()));
        }

        let url = format!("memory://{}/{}-{}", folder.as_str(), Uuid::new_v4(), filename);
        self.files.write().await.insert(url.clone(), bytes);

        Ok(StoredMedia { secure_url: url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_file_under_folder_prefix() {
        let storage = InMemoryMediaStorage::new();
        let stored = storage
            .upload(vec![1, 2, 3], "avatar.png", MediaFolder::Avatars)
            .await
            .unwrap();

        assert!(stored.secure_url.starts_with("memory://avatars/"));
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn rejects_empty_file() {
        let storage = InMemoryMediaStorage::new();
        let err = storage
            .upload(vec![], "empty.png", MediaFolder::Posts)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::Rejected(_)));
    }
}
