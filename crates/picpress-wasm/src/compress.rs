//! Compression WASM bindings.
//!
//! This module exposes the full compression pipeline to JavaScript: the
//! upload form hands over the selected file's bytes and name, and gets
//! back a budgeted WebP artifact ready to PUT to a presigned URL.

use crate::types::JsArtifact;
use picpress_core::{compress_to_budget, CompressorConfig};
use wasm_bindgen::prelude::*;

/// Compress an image to a size- and dimension-bounded WebP artifact.
///
/// # Arguments
///
/// * `bytes` - Raw file bytes as a `Uint8Array` (JPEG, PNG or WebP)
/// * `file_name` - Original file name; the extension is replaced with
///   `.webp` on the artifact
/// * `options` - Optional settings object; any subset of
///   `{ maxDimension, targetMaxBytes, minQuality, qualityStep }`.
///   Omitted fields use the storefront defaults (1600 px, 600 KiB,
///   floor 0.1, step 0.05).
///
/// # Returns
///
/// A [`JsArtifact`] whose bytes fit the byte budget, or were encoded at
/// the quality floor when the budget is unreachable.
///
/// # Errors
///
/// Returns an error if:
/// - The options object has the wrong shape or invalid values
/// - The bytes are not a decodable image
/// - A WebP encode pass fails
///
/// # Example
///
/// ```typescript
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// const artifact = compress_image(bytes, file.name, { maxDimension: 2048 });
/// await fetch(uploadUrl, {
///   method: 'PUT',
///   headers: { 'Content-Type': artifact.content_type },
///   body: artifact.bytes(),
/// });
/// ```
#[wasm_bindgen]
pub fn compress_image(
    bytes: &[u8],
    file_name: &str,
    options: JsValue,
) -> Result<JsArtifact, JsValue> {
    let config: CompressorConfig = if options.is_undefined() || options.is_null() {
        CompressorConfig::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))?
    };

    compress_to_budget(bytes, file_name, &config)
        .map(JsArtifact::from_artifact)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Tests for compress bindings.
///
/// Note: `compress_image` returns `Result<T, JsValue>`, which only works
/// on wasm32 targets. For comprehensive pipeline testing, see the tests
/// in `picpress_core::budget` which cover the underlying functionality.
#[cfg(test)]
mod tests {
    use picpress_core::{compress_to_budget, CompressorConfig};

    #[test]
    fn test_default_config_matches_storefront_settings() {
        let config = CompressorConfig::default();
        assert_eq!(config.max_dimension, 1600);
        assert_eq!(config.target_max_bytes, 600 * 1024);
    }

    #[test]
    fn test_core_pipeline_reachable_from_binding_crate() {
        // Garbage input: the call must surface a decode error, proving
        // the core path the binding wraps is wired up.
        let result = compress_to_budget(&[0u8; 8], "x.png", &CompressorConfig::default());
        assert!(result.is_err());
    }
}
