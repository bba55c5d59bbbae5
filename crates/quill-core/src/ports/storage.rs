//! Object-storage port for uploaded image assets.

use async_trait::async_trait;

use crate::domain::ImageAsset;

/// Binary object storage with public-URL derivation. All objects live under
/// the store's fixed `blog/` namespace.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload bytes under the given name; returns the public URL.
    async fn upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// All stored assets, each with its computed public URL, sorted by
    /// creation time descending.
    async fn list(&self) -> Result<Vec<ImageAsset>, StorageError>;

    /// Permanent delete. Does not cascade to posts referencing the URL.
    async fn delete(&self, name: &str) -> Result<(), StorageError>;

    /// Public URL for a stored name.
    fn public_url(&self, name: &str) -> String;
}

/// Object-storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage connection failed: {0}")]
    Connection(String),

    #[error("Storage request failed: {0}")]
    Request(String),

    #[error("Object not found")]
    NotFound,
}
