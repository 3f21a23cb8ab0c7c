//! Size-budgeted compression: the quality search over WebP encodings.
//!
//! The pipeline bounds an image's dimensions, then walks encoder quality
//! top-down until the encoded size fits the byte budget or the quality
//! floor is reached. The search is a monotonic linear scan, not a binary
//! search: the first quality that fits is the highest rung of the ladder
//! `1.0, 1.0 - step, 1.0 - 2*step, ...` that satisfies the budget, so the
//! result is predictable at the cost of re-encoding the full raster on
//! every failed pass. Each pass depends on the previous pass's measured
//! size, so the search is inherently sequential within one image.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{decode_image, fit_within, DecodeError, FilterType};
use crate::encode::{encode_webp, EncodeError, WEBP_MIME};

/// Errors from the compression pipeline.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The configuration would make the search meaningless or unbounded.
    #[error("Invalid compressor configuration: {0}")]
    InvalidConfig(String),

    /// The input bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A WebP encode pass failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Tuning parameters for the compression pipeline.
///
/// The defaults are the storefront upload settings: product photos are
/// bounded to 1600 px and 600 KiB with a deep quality floor. The admin
/// gallery uses the larger [`CompressorConfig::gallery`] preset.
///
/// Deserializes from a JS-style options object; omitted fields fall back
/// to the storefront defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressorConfig {
    /// Upper bound for the longer image edge in pixels.
    pub max_dimension: u32,
    /// Byte budget the search tries to satisfy.
    pub target_max_bytes: usize,
    /// Lowest quality the search may use, in `(0.0, 1.0]`. Reaching the
    /// floor terminates the search even when the budget is not met.
    pub min_quality: f32,
    /// Quality decrement between passes.
    pub quality_step: f32,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            max_dimension: 1600,
            target_max_bytes: 600 * 1024,
            min_quality: 0.1,
            quality_step: 0.05,
        }
    }
}

impl CompressorConfig {
    /// Settings for the admin gallery uploader: larger images, a fatter
    /// budget and a conservative quality floor.
    pub fn gallery() -> Self {
        Self {
            max_dimension: 2048,
            target_max_bytes: 1024 * 1024,
            min_quality: 0.5,
            quality_step: 0.05,
        }
    }

    /// Validate the configuration before the search runs.
    ///
    /// # Errors
    ///
    /// Returns `CompressError::InvalidConfig` naming the offending field.
    pub fn validate(&self) -> Result<(), CompressError> {
        if self.max_dimension == 0 {
            return Err(CompressError::InvalidConfig(
                "max_dimension must be non-zero".to_string(),
            ));
        }
        if self.target_max_bytes == 0 {
            return Err(CompressError::InvalidConfig(
                "target_max_bytes must be non-zero".to_string(),
            ));
        }
        if !(self.min_quality > 0.0 && self.min_quality <= 1.0) {
            return Err(CompressError::InvalidConfig(format!(
                "min_quality must be in (0.0, 1.0], got {}",
                self.min_quality
            )));
        }
        if !(self.quality_step > 0.0) {
            return Err(CompressError::InvalidConfig(format!(
                "quality_step must be positive, got {}",
                self.quality_step
            )));
        }
        Ok(())
    }
}

/// The final encoded image, ready for upload.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// WebP-encoded bytes.
    pub bytes: Vec<u8>,
    /// Source file name with its extension replaced by `.webp`.
    pub file_name: String,
    /// Always `image/webp`.
    pub content_type: &'static str,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// The quality the search terminated at. `1.0` means the image fit
    /// the budget on the first pass.
    pub quality: f32,
}

impl Artifact {
    /// Encoded size in bytes.
    pub fn byte_size(&self) -> usize {
        self.bytes.len()
    }
}

/// Replace a file name's extension with `.webp`.
///
/// Only the final extension is stripped; names without one get `.webp`
/// appended.
pub fn webp_file_name(name: &str) -> String {
    let stem = match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    };
    format!("{stem}.webp")
}

/// Compress an image to a size- and dimension-bounded WebP artifact.
///
/// Decodes `bytes`, bounds the longer edge to `config.max_dimension`
/// (never upscaling), then searches encoder quality top-down for the
/// first encoding within `config.target_max_bytes`. If no quality down to
/// `config.min_quality` fits, the floor encoding is returned as a success:
/// exceeding the budget at floor quality is a policy outcome, not an
/// error.
///
/// One invocation is one-shot: no retries, no partial artifacts, and no
/// state shared with concurrent invocations.
///
/// # Errors
///
/// * `CompressError::InvalidConfig` - the configuration fails validation
/// * `CompressError::Decode` - `bytes` is not a decodable image
/// * `CompressError::Encode` - a WebP encode pass failed
pub fn compress_to_budget(
    bytes: &[u8],
    file_name: &str,
    config: &CompressorConfig,
) -> Result<Artifact, CompressError> {
    config.validate()?;

    let decoded = decode_image(bytes)?;
    let bounded = fit_within(&decoded, config.max_dimension, FilterType::Lanczos3)?;
    drop(decoded);

    let mut quality = 1.0f32;
    loop {
        let encoded = encode_webp(&bounded.pixels, bounded.width, bounded.height, quality)?;

        if encoded.len() <= config.target_max_bytes || quality <= config.min_quality {
            return Ok(Artifact {
                bytes: encoded,
                file_name: webp_file_name(file_name),
                content_type: WEBP_MIME,
                width: bounded.width,
                height: bounded.height,
                quality,
            });
        }

        quality = (quality - config.quality_step).max(config.min_quality);
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
