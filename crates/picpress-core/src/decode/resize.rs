//! Dimension bounding for upload artifacts.
//!
//! The pipeline never needs arbitrary geometry, only "no edge longer than
//! the configured maximum, aspect ratio preserved, never upscale". The
//! exact-dimensions `resize` is the primitive; `fit_within` implements the
//! bounding policy on top of it.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if either target dimension is zero,
/// or `DecodeError::CorruptedFile` if the pixel buffer cannot be converted.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Scale an image down so that its longest edge is at most `max_dimension`.
///
/// Both axes shrink by the same factor, so the aspect ratio is preserved to
/// within one pixel of rounding on the shorter edge. Images that already
/// fit are returned unchanged; this function never upscales.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if `max_dimension` is zero, or
/// `DecodeError::CorruptedFile` if the pixel buffer cannot be converted.
pub fn fit_within(
    image: &DecodedImage,
    max_dimension: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if max_dimension == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    if image.longest_edge() <= max_dimension {
        return Ok(image.clone());
    }

    let (new_width, new_height) = fit_dimensions(image.width, image.height, max_dimension);

    resize(image, new_width, new_height, filter)
}

/// Compute the dimensions that bound an image to `max_dimension` on its
/// longer edge while preserving aspect ratio.
///
/// The longer edge lands on `max_dimension` exactly; the shorter edge is
/// rounded and floored at 1 px so extreme aspect ratios stay encodable.
fn fit_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let longer = width.max(height);
    if longer <= max_dimension {
        return (width, height);
    }

    let scale = max_dimension as f64 / longer as f64;
    if width >= height {
        let new_height = (height as f64 * scale).round() as u32;
        (max_dimension, new_height.max(1))
    } else {
        let new_width = (width as f64 * scale).round() as u32;
        (new_width.max(1), max_dimension)
    }
}
