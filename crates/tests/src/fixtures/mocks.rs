//! Stand-ins for the external services: blob storage, ffmpeg, OpenAI.
//! Behaviorally faithful where the pipeline depends on it (uploads are
//! downloadable, merge preserves input order).

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;

use ambience_services::{
    AiError, AudioMerger, BlobStorage, MergeError, StorageError, Summarizer, Transcriber,
};
use ambience_store::{Transcription, Word};

/// In-memory blob storage addressed by `memory://` URLs.
#[derive(Default)]
pub struct MockBlobStorage {
    blobs: DashMap<String, Vec<u8>>,
}

impl MockBlobStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn blob(&self, url: &str) -> Option<Vec<u8>> {
        self.blobs.get(url).map(|b| b.clone())
    }
}

#[async_trait]
impl BlobStorage for MockBlobStorage {
    async fn upload(
        &self,
        filename: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let url = format!("memory://{filename}");
        self.blobs.insert(url.clone(), bytes);
        Ok(url)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        self.blobs
            .get(url)
            .map(|b| b.clone())
            .ok_or_else(|| StorageError::Rejected {
                status: reqwest::StatusCode::NOT_FOUND,
                body: format!("no such blob: {url}"),
            })
    }
}

/// "Merges" by concatenating the referenced blobs in input order, so
/// tests can assert ordering on the merged bytes.
pub struct MockMerger {
    storage: Arc<MockBlobStorage>,
    delay: Duration,
}

impl MockMerger {
    pub fn new(storage: Arc<MockBlobStorage>) -> Self {
        Self {
            storage,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(storage: Arc<MockBlobStorage>, delay: Duration) -> Self {
        Self { storage, delay }
    }
}

#[async_trait]
impl AudioMerger for MockMerger {
    async fn merge(&self, input_urls: &[String]) -> Result<Vec<u8>, MergeError> {
        if input_urls.is_empty() {
            return Err(MergeError::NoInput);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let mut merged = Vec::new();
        for url in input_urls {
            let bytes = self
                .storage
                .blob(url)
                .ok_or_else(|| MergeError::Spawn(std::io::Error::other(format!("missing {url}"))))?;
            merged.extend_from_slice(&bytes);
        }
        Ok(merged)
    }
}

pub struct MockTranscriber;

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &[u8]) -> Result<Transcription, AiError> {
        Ok(Transcription {
            text: "hello merged world".to_string(),
            words: vec![
                Word {
                    word: "hello".into(),
                    start: 0.0,
                    end: 0.4,
                },
                Word {
                    word: "merged".into(),
                    start: 0.4,
                    end: 0.9,
                },
                Word {
                    word: "world".into(),
                    start: 0.9,
                    end: 1.3,
                },
            ],
        })
    }
}

pub struct MockSummarizer;

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, _audio: &[u8]) -> Result<String, AiError> {
        Ok("Mock conversation title".to_string())
    }
}

/// Fails every attempt; counts calls so tests can assert retry behavior.
#[derive(Default)]
pub struct FailingTranscriber {
    pub calls: AtomicU32,
}

#[async_trait]
impl Transcriber for FailingTranscriber {
    async fn transcribe(&self, _audio: &[u8]) -> Result<Transcription, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AiError::Api {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: "asr unavailable".to_string(),
        })
    }
}
