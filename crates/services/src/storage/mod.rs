mod http;

pub use http::HttpBlobStorage;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("storage rejected upload: status {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("storage response missing url")]
    MissingUrl,
}

/// Blob storage for audio files. Uploads return a publicly fetchable URL;
/// there is no delete and no compensating cleanup, so files orphaned by a
/// later trigger failure simply remain.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError>;

    async fn download(&self, url: &str) -> Result<Vec<u8>, StorageError>;
}
