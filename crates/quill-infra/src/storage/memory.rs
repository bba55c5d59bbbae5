//! In-memory object storage.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use quill_core::domain::ImageAsset;
use quill_core::ports::{ObjectStorage, StorageError};

struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
    created_at: DateTime<Utc>,
}

/// In-memory object storage.
///
/// Fallback when no storage backend is configured. Public URLs use a
/// `memory://` scheme so embedded references are recognizable in content,
/// but they do not resolve outside the process.
#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<String, StoredObject>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored byte size of an object, for tests and diagnostics.
    pub fn size_of(&self, name: &str) -> Option<usize> {
        self.objects
            .lock()
            .expect("objects lock")
            .get(name)
            .map(|o| o.bytes.len())
    }

    pub fn content_type_of(&self, name: &str) -> Option<String> {
        self.objects
            .lock()
            .expect("objects lock")
            .get(name)
            .map(|o| o.content_type.clone())
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.objects.lock().expect("objects lock").insert(
            name.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(self.public_url(name))
    }

    async fn list(&self) -> Result<Vec<ImageAsset>, StorageError> {
        let objects = self.objects.lock().expect("objects lock");
        let mut assets: Vec<ImageAsset> = objects
            .iter()
            .map(|(name, object)| ImageAsset {
                name: name.clone(),
                url: self.public_url(name),
                created_at: object.created_at,
            })
            .collect();
        assets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(assets)
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        self.objects
            .lock()
            .expect("objects lock")
            .remove(name)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    fn public_url(&self, name: &str) -> String {
        format!("memory://blog/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_list_and_delete() {
        let storage = InMemoryStorage::new();
        let url = storage
            .upload("a.webp", vec![1, 2, 3], "image/webp")
            .await
            .unwrap();
        assert_eq!(url, "memory://blog/a.webp");
        assert_eq!(storage.size_of("a.webp"), Some(3));

        let assets = storage.list().await.unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "a.webp");
        assert_eq!(assets[0].url, url);

        storage.delete("a.webp").await.unwrap();
        assert!(storage.list().await.unwrap().is_empty());
        assert!(matches!(
            storage.delete("a.webp").await,
            Err(StorageError::NotFound)
        ));
    }
}
