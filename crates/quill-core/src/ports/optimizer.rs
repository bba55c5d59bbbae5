//! Image optimization port.

/// The result of a successful optimization pass.
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub extension: &'static str,
}

/// Client-side style compression/resizing before upload.
///
/// Failure here is recoverable: the upload pipeline falls back to the
/// original file unmodified.
pub trait ImageOptimizer: Send + Sync {
    fn optimize(&self, bytes: &[u8], filename: &str) -> Result<OptimizedImage, OptimizeError>;
}

/// Optimization errors - never fatal to the upload.
#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    #[error("Unsupported or corrupt image data: {0}")]
    Decode(String),

    #[error("Re-encoding failed: {0}")]
    Encode(String),
}
