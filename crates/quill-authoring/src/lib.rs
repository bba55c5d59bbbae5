//! # Quill Authoring
//!
//! The content authoring pipeline layered over the content store: per-post
//! editing sessions with dirty tracking, trailing-edge debounced autosave
//! for drafts, explicit-save semantics for published posts, and the
//! non-blocking image upload pipeline.

mod autosave;
mod registry;
mod session;
mod upload;

pub use autosave::DebounceHandle;
pub use registry::{OpenError, SessionRegistry};
pub use session::{
    AUTOSAVE_DELAY, EditingSession, FieldEdit, PreviewImage, SaveStatus, SessionView,
};
pub use upload::{ImageUploadPipeline, UploadError, UploadFile};

#[cfg(test)]
pub(crate) mod test_util;
