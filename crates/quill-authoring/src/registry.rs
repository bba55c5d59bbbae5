//! Registry of open editing sessions, keyed by post id.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use quill_core::StoreError;
use quill_core::ports::PostStore;

use crate::session::EditingSession;

/// Why a session could not be opened.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("Post not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Holds at most one editing session per post. Opening an already-open post
/// returns the existing session; closing tears it down (cancelling any armed
/// autosave) and forgets it.
pub struct SessionRegistry {
    store: Arc<dyn PostStore>,
    sessions: RwLock<HashMap<String, Arc<EditingSession>>>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self {
            store,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Open (or resume) an editing session for the given post.
    pub async fn open(&self, post_id: &str) -> Result<Arc<EditingSession>, OpenError> {
        if let Some(existing) = self.sessions.read().await.get(post_id) {
            return Ok(existing.clone());
        }

        let post = self
            .store
            .get(post_id)
            .await?
            .ok_or(OpenError::NotFound)?;

        let mut sessions = self.sessions.write().await;
        // A concurrent open may have won the race while we fetched.
        let session = sessions
            .entry(post_id.to_string())
            .or_insert_with(|| Arc::new(EditingSession::new(self.store.clone(), post)))
            .clone();
        Ok(session)
    }

    pub async fn get(&self, post_id: &str) -> Option<Arc<EditingSession>> {
        self.sessions.read().await.get(post_id).cloned()
    }

    /// Tear down and forget the session for a post. Returns false if none
    /// was open.
    pub async fn close(&self, post_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(post_id);
        match removed {
            Some(session) => {
                session.close().await;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FieldEdit;
    use crate::test_util::{RecordingStore, sample_post};
    use std::time::Duration;

    #[tokio::test]
    async fn open_is_idempotent_per_post() {
        let store = Arc::new(RecordingStore::with_post(sample_post(false)));
        let registry = SessionRegistry::new(store);

        let a = registry.open("p1").await.unwrap();
        let b = registry.open("p1").await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn open_unknown_post_fails() {
        let store = Arc::new(RecordingStore::default());
        let registry = SessionRegistry::new(store);
        assert!(matches!(registry.open("missing").await, Err(OpenError::NotFound)));
    }

    #[tokio::test(start_paused = true)]
    async fn close_cancels_the_pending_autosave() {
        let store = Arc::new(RecordingStore::with_post(sample_post(false)));
        let registry = SessionRegistry::new(store.clone());

        let session = registry.open("p1").await.unwrap();
        session.apply(FieldEdit::Title("Edited".to_string())).await;
        assert!(registry.close("p1").await);
        assert!(registry.get("p1").await.is_none());

        tokio::time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;
        assert_eq!(store.update_count(), 0);
    }

    #[tokio::test]
    async fn close_without_a_session_is_a_noop() {
        let store = Arc::new(RecordingStore::default());
        let registry = SessionRegistry::new(store);
        assert!(!registry.close("p1").await);
    }
}
