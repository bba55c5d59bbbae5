//! Image optimizer backed by the image crate.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, GenericImageView};

use quill_core::ports::{ImageOptimizer, OptimizeError, OptimizedImage};

const JPEG_QUALITY_LADDER: [u8; 4] = [80, 70, 60, 50];

/// Optimizer configuration.
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Longest allowed edge; larger images are scaled down proportionally.
    pub max_dimension: u32,
    /// Preferred output size. Best effort, not a hard cap.
    pub target_bytes: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_dimension: 1200,
            target_bytes: 400 * 1024,
        }
    }
}

/// Resize-and-recompress optimizer.
///
/// Scales the image down to the configured maximum edge, then tries lossless
/// WebP; if that lands over the target size, walks a JPEG quality ladder and
/// keeps the first result under target (or the lowest rung).
pub struct StandardOptimizer {
    config: OptimizerConfig,
}

impl Default for StandardOptimizer {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

impl StandardOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    fn encode_webp(&self, image: &DynamicImage) -> Result<Vec<u8>, OptimizeError> {
        let rgba = image.to_rgba8();
        let mut bytes = Vec::new();
        WebPEncoder::new_lossless(&mut bytes)
            .encode(
                rgba.as_raw(),
                rgba.width(),
                rgba.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| OptimizeError::Encode(e.to_string()))?;
        Ok(bytes)
    }

    fn encode_jpeg(&self, image: &DynamicImage, quality: u8) -> Result<Vec<u8>, OptimizeError> {
        let rgb = image.to_rgb8();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, quality)
            .encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| OptimizeError::Encode(e.to_string()))?;
        Ok(bytes)
    }
}

impl ImageOptimizer for StandardOptimizer {
    fn optimize(&self, bytes: &[u8], filename: &str) -> Result<OptimizedImage, OptimizeError> {
        let image =
            image::load_from_memory(bytes).map_err(|e| OptimizeError::Decode(e.to_string()))?;

        let (width, height) = image.dimensions();
        let max = self.config.max_dimension;
        let image = if width > max || height > max {
            image.resize(max, max, FilterType::Lanczos3)
        } else {
            image
        };

        let webp = self.encode_webp(&image)?;
        if webp.len() <= self.config.target_bytes {
            return Ok(OptimizedImage {
                bytes: webp,
                content_type: "image/webp",
                extension: "webp",
            });
        }

        let mut best: Option<Vec<u8>> = None;
        for quality in JPEG_QUALITY_LADDER {
            let jpeg = self.encode_jpeg(&image, quality)?;
            let done = jpeg.len() <= self.config.target_bytes;
            best = Some(jpeg);
            if done {
                break;
            }
        }
        let jpeg = best.ok_or_else(|| OptimizeError::Encode("empty quality ladder".to_string()))?;

        tracing::debug!(
            original = bytes.len(),
            optimized = jpeg.len(),
            %filename,
            "image recompressed as jpeg"
        );
        Ok(OptimizedImage {
            bytes: jpeg,
            content_type: "image/jpeg",
            extension: "jpg",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        }));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn oversized_images_are_scaled_to_the_max_edge() {
        let optimizer = StandardOptimizer::default();
        let result = optimizer.optimize(&png_bytes(2400, 1200), "big.png").unwrap();

        let decoded = image::load_from_memory(&result.bytes).unwrap();
        let (w, h) = decoded.dimensions();
        assert_eq!(w, 1200);
        assert_eq!(h, 600);
    }

    #[test]
    fn small_images_keep_their_dimensions() {
        let optimizer = StandardOptimizer::default();
        let result = optimizer.optimize(&png_bytes(300, 200), "small.png").unwrap();

        let decoded = image::load_from_memory(&result.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (300, 200));
    }

    #[test]
    fn over_target_output_falls_back_to_jpeg() {
        // A tiny target forces the ladder; even its lowest rung is accepted.
        let optimizer = StandardOptimizer::new(OptimizerConfig {
            max_dimension: 1200,
            target_bytes: 1,
        });
        let result = optimizer.optimize(&png_bytes(600, 400), "photo.png").unwrap();
        assert_eq!(result.content_type, "image/jpeg");
        assert_eq!(result.extension, "jpg");
    }

    #[test]
    fn garbage_input_is_a_decode_error() {
        let optimizer = StandardOptimizer::default();
        let result = optimizer.optimize(b"not an image", "junk.bin");
        assert!(matches!(result, Err(OptimizeError::Decode(_))));
    }
}
