//! WASM-compatible wrapper types for compression results.
//!
//! This module provides JavaScript-friendly types that wrap the core
//! Picpress types, handling the conversion between Rust and JavaScript
//! data representations.

use js_sys::Uint8Array;
use picpress_core::Artifact;
use wasm_bindgen::prelude::*;

/// A compressed upload artifact for JavaScript.
///
/// Wraps the core `Artifact` type. The encoded bytes live in WASM memory;
/// `bytes()` copies them out as a `Uint8Array` for handing to `fetch` or
/// a `Blob` constructor.
#[wasm_bindgen]
pub struct JsArtifact {
    file_name: String,
    content_type: &'static str,
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    quality: f32,
}

#[wasm_bindgen]
impl JsArtifact {
    /// Output file name, always ending in `.webp`.
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    /// MIME type of the encoded bytes (`image/webp`).
    #[wasm_bindgen(getter)]
    pub fn content_type(&self) -> String {
        self.content_type.to_string()
    }

    /// Output width in pixels.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The quality the search terminated at (1.0 = first pass fit).
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Encoded size in bytes.
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the encoded bytes as a Uint8Array.
    ///
    /// Note: This creates a copy in JavaScript memory, which is what a
    /// `Blob`/`fetch` body needs anyway.
    pub fn bytes(&self) -> Uint8Array {
        Uint8Array::from(self.bytes.as_slice())
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional - wasm-bindgen's finalizer will handle cleanup
    /// automatically. Call this to immediately release a large artifact.
    pub fn release(self) {
        // Dropping self releases the memory
    }
}

impl JsArtifact {
    /// Create a JsArtifact from a core Artifact.
    pub(crate) fn from_artifact(artifact: Artifact) -> Self {
        Self {
            file_name: artifact.file_name,
            content_type: artifact.content_type,
            bytes: artifact.bytes,
            width: artifact.width,
            height: artifact.height,
            quality: artifact.quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JsArtifact {
        JsArtifact {
            file_name: "photo.webp".to_string(),
            content_type: "image/webp",
            bytes: vec![1, 2, 3, 4],
            width: 100,
            height: 50,
            quality: 0.85,
        }
    }

    #[test]
    fn test_js_artifact_getters() {
        let artifact = sample();
        assert_eq!(artifact.file_name(), "photo.webp");
        assert_eq!(artifact.content_type(), "image/webp");
        assert_eq!(artifact.width(), 100);
        assert_eq!(artifact.height(), 50);
        assert_eq!(artifact.byte_length(), 4);
    }

    #[test]
    fn test_from_artifact() {
        let core = Artifact {
            bytes: vec![9, 8, 7],
            file_name: "scan.webp".to_string(),
            content_type: "image/webp",
            width: 10,
            height: 20,
            quality: 1.0,
        };
        let js = JsArtifact::from_artifact(core);
        assert_eq!(js.file_name(), "scan.webp");
        assert_eq!(js.byte_length(), 3);
        assert_eq!(js.quality(), 1.0);
    }
}
