//! Picpress WASM - WebAssembly bindings for Picpress
//!
//! This crate exposes the picpress-core compression pipeline to
//! JavaScript/TypeScript applications. The upload form compresses images
//! in the browser before they ever cross the network, then PUTs the
//! artifact to a presigned URL.
//!
//! # Module Structure
//!
//! - `compress` - The full compress-to-budget pipeline binding
//! - `types` - WASM-compatible wrapper types for artifacts
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image } from '@picpress/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const artifact = compress_image(bytes, file.name, undefined);
//! console.log(`${artifact.width}x${artifact.height}, ${artifact.byte_length} bytes`);
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod types;

// Re-export public types
pub use compress::compress_image;
pub use types::JsArtifact;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
