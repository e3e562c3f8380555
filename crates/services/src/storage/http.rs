use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use tracing::debug;

use super::{BlobStorage, StorageError};

/// Client for an HTTP upload service: multipart POST against the
/// configured endpoint with an optional bearer key, JSON `{"url": ...}`
/// reply. Downloads are plain GETs on the returned URL.
#[derive(Clone)]
pub struct HttpBlobStorage {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: Option<String>,
}

impl HttpBlobStorage {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl BlobStorage for HttpBlobStorage {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(StorageError::Request)?;
        let form = multipart::Form::new().part("file", part);

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        debug!(filename, content_type, "uploading blob");
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected { status, body });
        }

        let body: UploadResponse = response.json().await?;
        body.url.ok_or(StorageError::MissingUrl)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected { status, body });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
