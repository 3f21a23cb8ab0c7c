//! Picpress Core - size-budgeted image compression
//!
//! This crate turns arbitrary uploaded raster images into WebP artifacts
//! that fit a byte budget and a dimension bound, maximizing visual quality
//! subject to both. It is the engine behind the storefront's product photo
//! uploader.
//!
//! The pipeline per image:
//!
//! 1. Sniff and decode the input (JPEG, PNG or WebP), applying EXIF
//!    orientation ([`decode`]).
//! 2. Bound the longer edge to the configured maximum, preserving aspect
//!    ratio and never upscaling ([`decode::fit_within`]).
//! 3. Search encoder quality top-down until the encoded size fits the
//!    budget or the quality floor is reached ([`budget`]).
//!
//! Everything here is synchronous and allocation-scoped to one call:
//! callers that want concurrency run independent invocations, typically
//! one per uploaded file.

pub mod budget;
pub mod decode;
pub mod encode;

pub use budget::{compress_to_budget, webp_file_name, Artifact, CompressError, CompressorConfig};
pub use decode::{decode_image, fit_within, resize, DecodeError, DecodedImage, FilterType, Orientation};
pub use encode::{encode_webp, EncodeError, WEBP_MIME};
