//! Presigned upload client.
//!
//! The storefront backend never proxies image bytes: the client asks a
//! presign endpoint for a one-time write grant, then PUTs the artifact
//! straight to object storage. The grant's public URL is the durable
//! reference the application stores.

use picpress_core::Artifact;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, instrument};

/// Errors from the presign request or the storage transfer.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The presign endpoint returned a non-success status.
    #[error("presign request rejected with status {status}: {body}")]
    PresignRejected { status: u16, body: String },

    /// The presign endpoint answered with a body that does not match the
    /// grant shape.
    #[error("invalid presign response: {0}")]
    InvalidResponse(String),

    /// The object store rejected the PUT.
    #[error("upload transfer rejected with status {0}")]
    TransferRejected(u16),

    /// A connection-level failure on either call.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Body of the presign request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresignRequest<'a> {
    filename: &'a str,
    content_type: &'a str,
}

/// A one-time write grant issued by the presign endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadGrant {
    /// Pre-authorized URL the artifact bytes are PUT to.
    pub upload_url: String,
    /// Durable, publicly readable URL of the object.
    pub public_url: String,
    /// Object key within the bucket.
    pub key: String,
}

/// The stored object reference returned after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Durable URL to persist in application data.
    pub public_url: String,
    /// Object key within the bucket.
    pub key: String,
}

/// Client for the presign endpoint and the object store it grants
/// access to.
///
/// Cheap to clone; concurrent uploads share the underlying connection
/// pool but no mutable state.
#[derive(Debug, Clone)]
pub struct PresignClient {
    client: Client,
    endpoint: String,
}

impl PresignClient {
    /// Creates a client against the given presign endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Request a write grant for an object with the given name and MIME
    /// type.
    #[instrument(skip(self))]
    pub async fn presign(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadGrant, UploadError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&PresignRequest {
                filename: file_name,
                content_type,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status, body = %body, "presign endpoint rejected request");
            return Err(UploadError::PresignRejected { status, body });
        }

        let grant: UploadGrant = response
            .json()
            .await
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

        debug!(key = %grant.key, "received upload grant");
        Ok(grant)
    }

    /// PUT raw bytes to a granted URL.
    ///
    /// Any 2xx status is success; everything else is
    /// `UploadError::TransferRejected`.
    #[instrument(skip(self, grant, bytes), fields(key = %grant.key, size = bytes.len()))]
    pub async fn transfer(
        &self,
        grant: &UploadGrant,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), UploadError> {
        let response = self
            .client
            .put(&grant.upload_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            error!(status, "object store rejected upload");
            return Err(UploadError::TransferRejected(status));
        }

        debug!("transfer complete");
        Ok(())
    }

    /// Upload a compressed artifact: presign, then transfer.
    ///
    /// No retry on failure; the caller restarts the whole pipeline if it
    /// wants another attempt.
    pub async fn upload(&self, artifact: &Artifact) -> Result<StoredImage, UploadError> {
        let grant = self.presign(&artifact.file_name, artifact.content_type).await?;
        self.transfer(&grant, artifact.content_type, artifact.bytes.clone())
            .await?;

        Ok(StoredImage {
            public_url: grant.public_url,
            key: grant.key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn test_artifact() -> Artifact {
        Artifact {
            bytes: vec![0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00],
            file_name: "photo.webp".to_string(),
            content_type: "image/webp",
            width: 4,
            height: 4,
            quality: 1.0,
        }
    }

    #[tokio::test]
    async fn test_upload_puts_bytes_to_granted_url() {
        let mut server = mockito::Server::new_async().await;

        let presign = server
            .mock("POST", "/presign")
            .match_body(Matcher::Json(json!({
                "filename": "photo.webp",
                "contentType": "image/webp",
            })))
            .with_status(200)
            .with_body(
                json!({
                    "uploadUrl": format!("{}/bucket/products/photo.webp", server.url()),
                    "publicUrl": "https://cdn.example.com/products/photo.webp",
                    "key": "products/photo.webp",
                })
                .to_string(),
            )
            .create_async()
            .await;

        let put = server
            .mock("PUT", "/bucket/products/photo.webp")
            .match_header("content-type", "image/webp")
            .with_status(200)
            .create_async()
            .await;

        let client = PresignClient::new(format!("{}/presign", server.url()));
        let stored = client.upload(&test_artifact()).await.unwrap();

        assert_eq!(stored.public_url, "https://cdn.example.com/products/photo.webp");
        assert_eq!(stored.key, "products/photo.webp");
        presign.assert_async().await;
        put.assert_async().await;
    }

    #[tokio::test]
    async fn test_presign_rejection_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/presign")
            .with_status(403)
            .with_body("bucket quota exceeded")
            .create_async()
            .await;

        let client = PresignClient::new(format!("{}/presign", server.url()));
        let err = client.upload(&test_artifact()).await.unwrap_err();

        match err {
            UploadError::PresignRejected { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "bucket quota exceeded");
            }
            other => panic!("expected PresignRejected, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transfer_rejection_fails_upload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/presign")
            .with_status(200)
            .with_body(
                json!({
                    "uploadUrl": format!("{}/bucket/k", server.url()),
                    "publicUrl": "https://cdn.example.com/k",
                    "key": "k",
                })
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("PUT", "/bucket/k")
            .with_status(500)
            .create_async()
            .await;

        let client = PresignClient::new(format!("{}/presign", server.url()));
        let err = client.upload(&test_artifact()).await.unwrap_err();

        assert!(matches!(err, UploadError::TransferRejected(500)));
    }

    #[tokio::test]
    async fn test_malformed_grant_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/presign")
            .with_status(200)
            .with_body(r#"{"unexpected": true}"#)
            .create_async()
            .await;

        let client = PresignClient::new(format!("{}/presign", server.url()));
        let err = client.presign("photo.webp", "image/webp").await.unwrap_err();

        assert!(matches!(err, UploadError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        // Port 1 is never listening
        let client = PresignClient::new("http://127.0.0.1:1/presign");
        let err = client.presign("photo.webp", "image/webp").await.unwrap_err();

        assert!(matches!(err, UploadError::Network(_)));
    }
}
