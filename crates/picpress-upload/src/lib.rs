//! Picpress Upload - presigned object-storage transfer
//!
//! This crate moves compressed artifacts from [`picpress_core`] into
//! object storage via presigned URLs:
//!
//! - [`PresignClient`] - asks the presign endpoint for a one-time write
//!   grant (`POST {filename, contentType}`), then PUTs the bytes straight
//!   to storage with the artifact's MIME type.
//! - [`Pipeline`] - drives compress-then-upload for single files and
//!   concurrent batches, keeping per-file failures isolated.
//!
//! Neither layer retries: a failed file surfaces one terminal error and
//! the caller decides whether to rerun its pipeline.

mod client;
mod pipeline;

pub use client::{PresignClient, StoredImage, UploadError, UploadGrant};
pub use pipeline::{Pipeline, PipelineError, SourceFile};
