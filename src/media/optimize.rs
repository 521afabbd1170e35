use anyhow::{Context, Result};
use bytes::Bytes;
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;

/// Widest image the site ever serves.
pub const DEFAULT_MAX_WIDTH: u32 = 1600;

pub const WEBP_CONTENT_TYPE: &str = "image/webp";

#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub bytes: Bytes,
    pub width: u32,
    pub height: u32,
}

/// Decode any supported legacy format, shrink to fit `max_width` (aspect ratio
/// kept, never enlarged) and re-encode as WebP.
///
/// The `image` crate's WebP encoder is lossless, so output size depends on the
/// resize more than on a quality knob.
pub fn optimize_image(input: &[u8], max_width: u32) -> Result<OptimizedImage> {
    let decoded = image::load_from_memory(input).context("decoding image")?;

    let resized = if decoded.width() > max_width {
        decoded.resize(max_width, u32::MAX, FilterType::Lanczos3)
    } else {
        decoded
    };

    // The WebP encoder only takes 8-bit RGB(A).
    let normalized = if resized.color().has_alpha() {
        DynamicImage::ImageRgba8(resized.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(resized.to_rgb8())
    };

    let mut buf = Vec::new();
    normalized
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::WebP)
        .context("encoding webp")?;

    Ok(OptimizedImage {
        bytes: Bytes::from(buf),
        width: normalized.width(),
        height: normalized.height(),
    })
}
