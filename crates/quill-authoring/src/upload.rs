//! Image upload pipeline.
//!
//! Turns a selected or pasted image into a durable public URL embedded in
//! the document without blocking editing: insert a loading placeholder
//! immediately, optimize and upload in the background, then swap the
//! placeholder in place via its correlation id.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use quill_core::ports::{ImageOptimizer, ObjectStorage, StorageError};

use crate::session::EditingSession;

/// A user-selected or pasted image file.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Upload failures surfaced to the editor.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Only one upload may be in flight per editor instance; the upload
    /// control stays disabled until the prior one settles.
    #[error("Another upload is already in progress")]
    Busy,

    #[error("Upload failed: {0}")]
    Storage(#[from] StorageError),
}

/// The upload pipeline for one editor instance.
pub struct ImageUploadPipeline {
    storage: Arc<dyn ObjectStorage>,
    optimizer: Arc<dyn ImageOptimizer>,
}

impl ImageUploadPipeline {
    pub fn new(storage: Arc<dyn ObjectStorage>, optimizer: Arc<dyn ImageOptimizer>) -> Self {
        Self { storage, optimizer }
    }

    /// Run the full pipeline against a session's document.
    ///
    /// Returns `Ok(Some(url))` when the placeholder was swapped to its
    /// public URL, and `Ok(None)` when the node was deleted during the
    /// upload and the result was discarded. On failure the placeholder is
    /// removed - a permanently loading node is never left behind.
    pub async fn process(
        &self,
        session: &EditingSession,
        file: UploadFile,
    ) -> Result<Option<String>, UploadError> {
        let upload_id = session
            .begin_upload(&file.bytes, &file.content_type)
            .await
            .ok_or(UploadError::Busy)?;

        let result = self.upload_inner(&file, upload_id, session).await;
        // Release the preview reference on success and failure alike.
        session.end_upload(upload_id).await;
        result
    }

    async fn upload_inner(
        &self,
        file: &UploadFile,
        upload_id: Uuid,
        session: &EditingSession,
    ) -> Result<Option<String>, UploadError> {
        let (bytes, content_type, extension) = self.optimize(file).await;
        let name = format!("{}.{}", Uuid::new_v4().simple(), extension);

        match self.storage.upload(&name, bytes, &content_type).await {
            Ok(public_url) => {
                if session.finish_upload(upload_id, &public_url).await {
                    Ok(Some(public_url))
                } else {
                    // Placeholder deleted during upload; drop the result.
                    tracing::debug!(%upload_id, "upload finished for a deleted placeholder");
                    Ok(None)
                }
            }
            Err(e) => {
                session.fail_upload(upload_id).await;
                Err(UploadError::Storage(e))
            }
        }
    }

    /// Compression is best-effort: any optimizer failure falls back to
    /// uploading the original file unmodified.
    async fn optimize(&self, file: &UploadFile) -> (Vec<u8>, String, String) {
        let optimizer = self.optimizer.clone();
        let bytes = file.bytes.clone();
        let filename = file.filename.clone();

        let optimized =
            tokio::task::spawn_blocking(move || optimizer.optimize(&bytes, &filename)).await;

        match optimized {
            Ok(Ok(img)) => (img.bytes, img.content_type.to_string(), img.extension.to_string()),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "image optimization failed, uploading original");
                (
                    file.bytes.clone(),
                    file.content_type.clone(),
                    original_extension(&file.filename),
                )
            }
            Err(e) => {
                tracing::warn!(error = %e, "image optimization task panicked, uploading original");
                (
                    file.bytes.clone(),
                    file.content_type.clone(),
                    original_extension(&file.filename),
                )
            }
        }
    }
}

fn original_extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}
