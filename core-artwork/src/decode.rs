//! # Decode and Scale
//!
//! Turns encoded image bytes into a square RGBA bitmap bounded by the
//! requested size class. Large source images are first downsampled by the
//! biggest power of two that keeps both axes at or above the target, so
//! the expensive high-quality pass runs on a small intermediate. Images
//! already within bounds are never upscaled.

use bytes::Bytes;
use image::imageops::FilterType;
use image::GenericImageView;

use crate::error::{ArtworkError, Result};

/// A decoded, display-ready artwork bitmap (RGBA8, square unless the
/// source was smaller than the target on one axis).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows.
    pub data: Bytes,
}

impl Artwork {
    /// Memory footprint used for cache accounting.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }
}

/// Decode `data` and scale it to a square at most `target` pixels wide.
pub fn decode_scaled(data: &[u8], target: u32) -> Result<Artwork> {
    let img = image::load_from_memory(data)
        .map_err(|e| ArtworkError::Decode(format!("Failed to load image: {e}")))?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(ArtworkError::Decode("Image has zero dimension".to_string()));
    }

    // Cheap power-of-two pre-shrink.
    let min_side = width.min(height);
    let mut img = if min_side > target {
        let mut factor = 1u32;
        while min_side / (factor * 2) >= target {
            factor *= 2;
        }
        if factor > 1 {
            img.resize(width / factor, height / factor, FilterType::Triangle)
        } else {
            img
        }
    } else {
        img
    };

    // Center-crop to square.
    let (width, height) = img.dimensions();
    let side = width.min(height);
    if width != height {
        let x = (width - side) / 2;
        let y = (height - side) / 2;
        img = img.crop_imm(x, y, side, side);
    }

    // Final exact pass; skip when the source is already within bounds.
    if side > target {
        img = img.resize_exact(target, target, FilterType::Lanczos3);
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Artwork {
        width,
        height,
        data: Bytes::from(rgba.into_raw()),
    })
}
