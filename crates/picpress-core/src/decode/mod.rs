//! Image decoding for the compression pipeline.
//!
//! This module provides functionality for:
//! - Sniffing and decoding uploaded raster images (JPEG, PNG, WebP)
//! - EXIF orientation correction for camera photos
//! - Dimension bounding with aspect-ratio preservation
//!
//! # Architecture
//!
//! Decoding trusts the bytes, not the caller: the container format is
//! detected from content, so a mislabeled upload either decodes correctly
//! or fails with a [`DecodeError`]. The decoded buffer is owned by the
//! invocation that produced it and is never shared between pipelines.

mod raster;
mod resize;
mod types;

pub use raster::decode_image;
pub use resize::{fit_within, resize};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
