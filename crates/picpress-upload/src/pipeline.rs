//! The encode-then-upload pipeline.
//!
//! One pipeline instance serves a whole upload form. Each file runs its
//! own compress-and-upload sequence; across files the sequences are
//! independent and concurrent, with no shared mutable state. Batch results
//! come back in input order so callers associate outcomes with the files
//! they selected, never with completion order.

use futures::future::join_all;
use picpress_core::{compress_to_budget, CompressError, CompressorConfig};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::client::{PresignClient, StoredImage, UploadError};

/// Errors from a single file's pipeline run.
///
/// One file's failure never touches its siblings in a batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Compression failed: undecodable input, codec failure or bad
    /// configuration.
    #[error(transparent)]
    Compress(#[from] CompressError),

    /// The presign request or the storage transfer failed.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// The blocking compression worker was torn down before finishing.
    #[error("compression worker terminated: {0}")]
    WorkerLost(String),
}

/// An uploaded file as the browser handed it over.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Original file name, extension included.
    pub file_name: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// Compress-and-upload driver.
#[derive(Debug, Clone)]
pub struct Pipeline {
    client: PresignClient,
    config: CompressorConfig,
}

impl Pipeline {
    /// Create a pipeline with the given upload client and compression
    /// settings.
    pub fn new(client: PresignClient, config: CompressorConfig) -> Self {
        Self { client, config }
    }

    /// Run one file through compression and upload.
    ///
    /// The quality search is CPU-bound and can take many encode passes,
    /// so it runs on the blocking pool rather than stalling the reactor.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError` for this file only; the error names which
    /// stage failed.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn process(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredImage, PipelineError> {
        let config = self.config;
        let name = file_name.to_string();

        let artifact = tokio::task::spawn_blocking(move || {
            compress_to_budget(&bytes, &name, &config)
        })
        .await
        .map_err(|e| PipelineError::WorkerLost(e.to_string()))??;

        debug!(
            file = %artifact.file_name,
            bytes = artifact.byte_size(),
            quality = artifact.quality,
            "compressed, starting upload"
        );

        Ok(self.client.upload(&artifact).await?)
    }

    /// Run a batch of files concurrently.
    ///
    /// Results are returned in the same order as `files`. Failed files
    /// yield their own `Err` entry and leave the rest of the batch
    /// untouched.
    pub async fn process_batch(
        &self,
        files: Vec<SourceFile>,
    ) -> Vec<Result<StoredImage, PipelineError>> {
        join_all(
            files
                .into_iter()
                .map(|file| async move { self.process(&file.file_name, file.bytes).await }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use serde_json::json;
    use std::io::Cursor;

    fn png_file(name: &str, width: u32, height: u32) -> SourceFile {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        SourceFile {
            file_name: name.to_string(),
            bytes: buf.into_inner(),
        }
    }

    fn grant_body(server: &mockito::Server, key: &str) -> String {
        json!({
            "uploadUrl": format!("{}/bucket/{key}", server.url()),
            "publicUrl": format!("https://cdn.example.com/{key}"),
            "key": key,
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_process_compresses_then_uploads() {
        let mut server = mockito::Server::new_async().await;
        let body = grant_body(&server, "banner.webp");
        server
            .mock("POST", "/presign")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/bucket/banner.webp")
            .match_header("content-type", "image/webp")
            .with_status(200)
            .create_async()
            .await;

        let pipeline = Pipeline::new(
            PresignClient::new(format!("{}/presign", server.url())),
            CompressorConfig::default(),
        );

        let file = png_file("banner.png", 64, 48);
        let stored = pipeline.process(&file.file_name, file.bytes).await.unwrap();

        assert_eq!(stored.public_url, "https://cdn.example.com/banner.webp");
        put.assert_async().await;
    }

    #[tokio::test]
    async fn test_undecodable_file_fails_without_network_calls() {
        let mut server = mockito::Server::new_async().await;
        let presign = server
            .mock("POST", "/presign")
            .expect(0)
            .create_async()
            .await;

        let pipeline = Pipeline::new(
            PresignClient::new(format!("{}/presign", server.url())),
            CompressorConfig::default(),
        );

        let err = pipeline
            .process("not-an-image.txt", b"plain text".to_vec())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Compress(_)));
        presign.assert_async().await;
    }

    #[tokio::test]
    async fn test_batch_results_in_input_order_with_isolated_failures() {
        let mut server = mockito::Server::new_async().await;
        // Both valid files get grants; order of arrival is not ours to
        // control, so both mocks accept any number of hits.
        let body_a = grant_body(&server, "a.webp");
        server
            .mock("POST", "/presign")
            .match_body(mockito::Matcher::PartialJson(json!({"filename": "a.webp"})))
            .with_status(200)
            .with_body(body_a)
            .create_async()
            .await;
        let body_c = grant_body(&server, "c.webp");
        server
            .mock("POST", "/presign")
            .match_body(mockito::Matcher::PartialJson(json!({"filename": "c.webp"})))
            .with_status(200)
            .with_body(body_c)
            .create_async()
            .await;
        server
            .mock("PUT", mockito::Matcher::Regex(r"^/bucket/".to_string()))
            .with_status(200)
            .expect_at_least(2)
            .create_async()
            .await;

        let pipeline = Pipeline::new(
            PresignClient::new(format!("{}/presign", server.url())),
            CompressorConfig::default(),
        );

        let files = vec![
            png_file("a.png", 32, 32),
            SourceFile {
                file_name: "b.bin".to_string(),
                bytes: vec![0u8; 16],
            },
            png_file("c.png", 32, 32),
        ];

        let results = pipeline.process_batch(files).await;

        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].as_ref().unwrap().key,
            "a.webp",
            "first result must belong to the first input"
        );
        assert!(
            matches!(results[1], Err(PipelineError::Compress(_))),
            "the broken file fails alone"
        );
        assert_eq!(results[2].as_ref().unwrap().key, "c.webp");
    }
}
