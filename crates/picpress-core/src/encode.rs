//! Lossy WebP encoding for upload artifacts.
//!
//! A single encode pass over an RGB buffer at a given quality. The budget
//! search in [`crate::budget`] calls this repeatedly; each call is
//! independent and allocates its own output buffer.

use thiserror::Error;
use webp::Encoder;

/// MIME type of every artifact this crate produces.
pub const WEBP_MIME: &str = "image/webp";

/// Errors that can occur during WebP encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec rejected the encode call
    #[error("WebP encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode RGB pixel data to lossy WebP bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - Encoder quality in `(0.0, 1.0]`, where 1.0 is highest.
///   Values outside the range are clamped. libwebp takes quality on a
///   0-100 scale; the mapping happens here so callers only ever see the
///   unit scale.
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` or
/// `EncodeError::InvalidPixelData` for malformed input, and
/// `EncodeError::EncodingFailed` if libwebp rejects the encode call.
pub fn encode_webp(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let quality = quality.clamp(0.01, 1.0);

    let encoder = Encoder::from_rgb(pixels, width, height);
    let encoded = encoder
        .encode_simple(false, quality * 100.0)
        .map_err(|e| EncodeError::EncodingFailed(format!("{e:?}")))?;

    Ok(encoded.to_vec())
}
