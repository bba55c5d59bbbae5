//! Per-post editing session - the draft/publish state machine.
//!
//! States: unpublished or published, each clean or dirty. Draft edits arm a
//! trailing-edge debounce that persists after 1.5s of silence; published
//! edits only mark dirty and wait for the explicit "update live post"
//! action. Publish toggles persist immediately and are never debounced.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use quill_core::StoreError;
use quill_core::domain::{Document, Post, read_time_label, slugify};
use quill_core::ports::PostStore;

use crate::autosave::DebounceHandle;

/// Quiet period before a draft edit is persisted.
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(1500);

const EXCERPT_MAX_CHARS: usize = 160;

/// Persistence status surfaced to the editor UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    Saving,
    Error,
}

impl SaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveStatus::Saved => "saved",
            SaveStatus::Saving => "saving",
            SaveStatus::Error => "error",
        }
    }
}

/// A tracked-field edit applied to the session.
#[derive(Debug, Clone)]
pub enum FieldEdit {
    /// Also re-derives the slug from the new title.
    Title(String),
    Slug(String),
    /// Soft-capped at 160 characters.
    Excerpt(String),
    /// Full replacement of the serialized content; re-derives the read time.
    Content(String),
    CoverImage(Option<String>),
    /// Derived display field only - never marks the post dirty.
    ReadTime { words: u32 },
}

impl FieldEdit {
    /// Whether this edit counts towards dirty state and autosave.
    fn qualifies(&self) -> bool {
        !matches!(self, FieldEdit::ReadTime { .. })
    }
}

/// Preview bytes held while an upload is in flight.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Snapshot of the session for the editor UI.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub post: Post,
    pub dirty: bool,
    pub status: SaveStatus,
    pub upload_in_flight: bool,
}

struct SessionState {
    editing: Post,
    /// Frozen last-persisted snapshot used for dirty comparison.
    original: Post,
    document: Document,
    previews: HashMap<Uuid, PreviewImage>,
    status: SaveStatus,
    autosave: DebounceHandle,
    upload_in_flight: bool,
}

impl SessionState {
    fn dirty(&self) -> bool {
        self.editing.differs_from(&self.original)
    }
}

struct SessionInner {
    store: Arc<dyn PostStore>,
    post_id: String,
    state: Mutex<SessionState>,
}

/// An editing session for one post. Client-side-ephemeral by contract:
/// closing the session drops any armed autosave, so the only durable state
/// is what a fired autosave or explicit save already persisted.
pub struct EditingSession {
    inner: Arc<SessionInner>,
}

impl EditingSession {
    pub fn new(store: Arc<dyn PostStore>, post: Post) -> Self {
        let post_id = post.id.clone();
        let document = Document::from_html(&post.content);
        let state = SessionState {
            original: post.clone(),
            editing: post,
            document,
            previews: HashMap::new(),
            status: SaveStatus::Saved,
            autosave: DebounceHandle::new(),
            upload_in_flight: false,
        };
        Self {
            inner: Arc::new(SessionInner {
                store,
                post_id,
                state: Mutex::new(state),
            }),
        }
    }

    pub fn post_id(&self) -> &str {
        &self.inner.post_id
    }

    /// Current editor-facing view of the session.
    pub async fn view(&self) -> SessionView {
        let st = self.inner.state.lock().await;
        SessionView {
            post: st.editing.clone(),
            dirty: st.dirty(),
            status: st.status,
            upload_in_flight: st.upload_in_flight,
        }
    }

    /// Apply a field edit. Qualifying edits mark the post dirty; while the
    /// post is unpublished they also restart the autosave debounce. Edits to
    /// a published post wait for [`EditingSession::save_now`].
    pub async fn apply(&self, edit: FieldEdit) {
        let mut st = self.inner.state.lock().await;
        let qualifies = edit.qualifies();

        match edit {
            FieldEdit::Title(title) => {
                st.editing.slug = slugify(&title);
                st.editing.title = title;
            }
            FieldEdit::Slug(slug) => st.editing.slug = slug,
            FieldEdit::Excerpt(excerpt) => {
                st.editing.excerpt = excerpt.chars().take(EXCERPT_MAX_CHARS).collect();
            }
            FieldEdit::Content(html) => {
                st.document = Document::from_html(&html);
                let words = st.document.word_count();
                st.editing.read_time = read_time_label(words);
                st.editing.content = html;
            }
            FieldEdit::CoverImage(url) => st.editing.cover_image = url,
            FieldEdit::ReadTime { words } => {
                st.editing.read_time = read_time_label(words);
            }
        }

        if qualifies && !st.editing.published {
            self.arm_autosave(&mut st);
        }
    }

    /// Manual save - the "Update Live Post" action. Also usable on drafts to
    /// skip the debounce wait.
    pub async fn save_now(&self) -> Result<Post, StoreError> {
        {
            let mut st = self.inner.state.lock().await;
            st.autosave.disarm();
        }
        self.inner.persist().await
    }

    /// Flip publish state and persist immediately, never debounced. The
    /// first-ever publish stamps `published_at` and the display date; later
    /// cycles leave both untouched.
    pub async fn toggle_publish(&self) -> Result<Post, StoreError> {
        {
            let mut st = self.inner.state.lock().await;
            st.autosave.disarm();
            if st.editing.published {
                st.editing.unpublish();
            } else {
                st.editing.publish(Utc::now());
            }
        }
        self.inner.persist().await
    }

    /// Tear the session down: cancel any armed autosave and release preview
    /// bytes. An in-flight but not-yet-fired autosave is dropped.
    pub async fn close(&self) {
        let mut st = self.inner.state.lock().await;
        st.autosave.disarm();
        st.previews.clear();
    }

    /// Pending preview bytes for an in-flight upload.
    pub async fn preview(&self, upload_id: Uuid) -> Option<PreviewImage> {
        self.inner.state.lock().await.previews.get(&upload_id).cloned()
    }

    fn arm_autosave(&self, st: &mut SessionState) {
        let weak = Arc::downgrade(&self.inner);
        st.autosave.arm(AUTOSAVE_DELAY, async move {
            if let Some(inner) = weak.upgrade() {
                inner.autosave_fire().await;
            }
        });
    }

    // Upload pipeline hooks. The correlation id returned by `begin_upload`
    // is the only handle the pipeline needs to find its placeholder later.

    pub(crate) async fn begin_upload(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Option<Uuid> {
        let mut st = self.inner.state.lock().await;
        if st.upload_in_flight {
            return None;
        }
        st.upload_in_flight = true;

        let upload_id = Uuid::new_v4();
        st.previews.insert(
            upload_id,
            PreviewImage {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        let preview_src = format!("preview://{}", upload_id);
        st.document.insert_loading_image(upload_id, &preview_src);
        let html = st.document.to_html();
        st.editing.content = html;
        Some(upload_id)
    }

    /// Swap the placeholder to its public URL. Returns false when the node
    /// was deleted during the upload; the result is discarded in that case.
    pub(crate) async fn finish_upload(&self, upload_id: Uuid, public_url: &str) -> bool {
        let mut st = self.inner.state.lock().await;
        let swapped = st.document.resolve_image(upload_id, public_url);
        if swapped {
            let html = st.document.to_html();
            st.editing.content = html;
            if !st.editing.published {
                self.arm_autosave(&mut st);
            }
        }
        swapped
    }

    /// Remove the placeholder after a failed upload - never leave a
    /// permanently loading node behind.
    pub(crate) async fn fail_upload(&self, upload_id: Uuid) {
        let mut st = self.inner.state.lock().await;
        if st.document.remove_image(upload_id) {
            let html = st.document.to_html();
            st.editing.content = html;
        }
    }

    /// Release the preview bytes and the in-flight slot, on success and
    /// failure paths alike.
    pub(crate) async fn end_upload(&self, upload_id: Uuid) {
        let mut st = self.inner.state.lock().await;
        st.previews.remove(&upload_id);
        st.upload_in_flight = false;
    }
}

impl SessionInner {
    async fn autosave_fire(self: Arc<Self>) {
        {
            let st = self.state.lock().await;
            // A publish toggle may have raced the timer; published posts
            // only persist through the explicit save.
            if st.editing.published || !st.dirty() {
                return;
            }
        }
        if let Err(e) = self.persist().await {
            tracing::error!(post_id = %self.post_id, error = %e, "draft autosave failed");
        }
    }

    /// Persist the current editing state and, on success, advance the clean
    /// snapshot to exactly what was sent - edits racing the round trip stay
    /// dirty.
    async fn persist(self: &Arc<Self>) -> Result<Post, StoreError> {
        let (patch, snapshot) = {
            let mut st = self.state.lock().await;
            st.status = SaveStatus::Saving;
            (st.editing.as_patch(), st.editing.clone())
        };

        match self.store.update(&self.post_id, patch).await {
            Ok(stored) => {
                let mut st = self.state.lock().await;
                st.original = snapshot;
                st.status = SaveStatus::Saved;
                Ok(stored)
            }
            Err(e) => {
                let mut st = self.state.lock().await;
                st.status = SaveStatus::Error;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{RecordingStore, sample_post};
    use tokio::task::yield_now;
    use tokio::time::advance;

    fn session_with(store: Arc<RecordingStore>, post: Post) -> EditingSession {
        EditingSession::new(store, post)
    }

    async fn settle() {
        // Let spawned timer tasks observe the advanced clock.
        for _ in 0..4 {
            yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn draft_edit_burst_produces_one_persist() {
        let store = Arc::new(RecordingStore::with_post(sample_post(false)));
        let session = session_with(store.clone(), sample_post(false));

        for title in ["H", "He", "Hello"] {
            session.apply(FieldEdit::Title(title.to_string())).await;
            advance(Duration::from_millis(1000)).await;
            settle().await;
        }
        assert_eq!(store.update_count(), 0, "debounce must restart per edit");

        advance(Duration::from_millis(1500)).await;
        settle().await;

        assert_eq!(store.update_count(), 1);
        let (_, patch) = store.last_update().unwrap();
        assert_eq!(patch.title.as_deref(), Some("Hello"));
        assert_eq!(patch.slug.as_deref(), Some("hello"));
        assert!(!session.view().await.dirty);
    }

    #[tokio::test(start_paused = true)]
    async fn no_persist_before_the_quiet_period() {
        let store = Arc::new(RecordingStore::with_post(sample_post(false)));
        let session = session_with(store.clone(), sample_post(false));

        session.apply(FieldEdit::Excerpt("changed".to_string())).await;
        advance(Duration::from_millis(1499)).await;
        settle().await;
        assert_eq!(store.update_count(), 0);

        advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(store.update_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn published_edits_wait_for_manual_save() {
        let store = Arc::new(RecordingStore::with_post(sample_post(true)));
        let session = session_with(store.clone(), sample_post(true));

        session.apply(FieldEdit::Title("Live Edit".to_string())).await;
        session.apply(FieldEdit::Content("<p>new body</p>".to_string())).await;
        advance(Duration::from_secs(60)).await;
        settle().await;

        assert_eq!(store.update_count(), 0);
        assert!(session.view().await.dirty);

        session.save_now().await.unwrap();
        assert_eq!(store.update_count(), 1);
        assert!(!session.view().await.dirty);
    }

    #[tokio::test(start_paused = true)]
    async fn read_time_edit_is_not_dirty_and_never_autosaves() {
        let store = Arc::new(RecordingStore::with_post(sample_post(false)));
        let session = session_with(store.clone(), sample_post(false));

        session.apply(FieldEdit::ReadTime { words: 2000 }).await;
        advance(Duration::from_secs(10)).await;
        settle().await;

        let view = session.view().await;
        assert_eq!(view.post.read_time, "10 min read");
        assert!(!view.dirty);
        assert_eq!(store.update_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn publish_toggle_persists_immediately_and_stamps_once() {
        let store = Arc::new(RecordingStore::with_post(sample_post(false)));
        let session = session_with(store.clone(), sample_post(false));

        let published = session.toggle_publish().await.unwrap();
        assert!(published.published);
        assert_eq!(store.update_count(), 1);
        let stamp = session.view().await.post.published_at;
        assert!(stamp.is_some());

        session.toggle_publish().await.unwrap(); // unpublish
        session.toggle_publish().await.unwrap(); // republish
        let view = session.view().await;
        assert_eq!(view.post.published_at, stamp);
        assert_eq!(store.update_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn publish_toggle_disarms_a_pending_autosave() {
        let store = Arc::new(RecordingStore::with_post(sample_post(false)));
        let session = session_with(store.clone(), sample_post(false));

        session.apply(FieldEdit::Title("Draft".to_string())).await;
        session.toggle_publish().await.unwrap();
        assert_eq!(store.update_count(), 1);

        // The debounce armed by the edit must not fire a second persist.
        advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(store.update_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn close_drops_an_unfired_autosave() {
        let store = Arc::new(RecordingStore::with_post(sample_post(false)));
        let session = session_with(store.clone(), sample_post(false));

        session.apply(FieldEdit::Title("Lost Edit".to_string())).await;
        session.close().await;

        advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(store.update_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_persist_keeps_snapshot_and_reports_error() {
        let store = Arc::new(RecordingStore::with_post(sample_post(false)));
        store.fail_next_update();
        let session = session_with(store.clone(), sample_post(false));

        session.apply(FieldEdit::Title("Will Fail".to_string())).await;
        advance(Duration::from_millis(1500)).await;
        settle().await;

        let view = session.view().await;
        assert_eq!(view.status, SaveStatus::Error);
        assert!(view.dirty, "snapshot must not advance on failure");

        // Editing again re-arms the debounce and the retry succeeds.
        session.apply(FieldEdit::Title("Will Succeed".to_string())).await;
        advance(Duration::from_millis(1500)).await;
        settle().await;

        let view = session.view().await;
        assert_eq!(view.status, SaveStatus::Saved);
        assert!(!view.dirty);
    }

    #[tokio::test(start_paused = true)]
    async fn excerpt_is_capped_at_160_chars() {
        let store = Arc::new(RecordingStore::with_post(sample_post(true)));
        let session = session_with(store, sample_post(true));

        session.apply(FieldEdit::Excerpt("x".repeat(300))).await;
        assert_eq!(session.view().await.post.excerpt.len(), 160);
    }
}
