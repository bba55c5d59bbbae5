use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostPatch, WaitlistSignup};
use crate::error::StoreError;

/// Post CRUD against the backing content store. Each call is a single round
/// trip; there is no local caching, callers re-fetch lists after mutations.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, newest first.
    async fn list(&self) -> Result<Vec<Post>, StoreError>;

    /// Published posts only, newest display date first.
    async fn list_published(&self) -> Result<Vec<Post>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Post>, StoreError>;

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError>;

    /// Create a post. Fails with [`StoreError::Constraint`] on a slug
    /// collision; returns the stored record including the generated id.
    async fn create(&self, post: NewPost) -> Result<Post, StoreError>;

    /// Partial-field update. Fails with [`StoreError::NotFound`] if the id
    /// does not exist; returns the updated record.
    async fn update(&self, id: &str, patch: PostPatch) -> Result<Post, StoreError>;

    /// Permanent delete.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Waitlist row storage.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Insert a signup. A duplicate email surfaces as
    /// [`StoreError::Constraint`], which the service translates to the
    /// friendly "already on the waitlist" response.
    async fn insert(&self, signup: &WaitlistSignup) -> Result<(), StoreError>;
}
