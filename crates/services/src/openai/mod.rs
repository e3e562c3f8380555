mod client;

pub use client::OpenAiClient;

use async_trait::async_trait;
use thiserror::Error;

use ambience_store::Transcription;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("api key not configured")]
    NoApiKey,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("api returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Speech-to-text with word-level timing.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcription, AiError>;
}

/// Short title-like summary produced directly from the audio.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, audio: &[u8]) -> Result<String, AiError>;
}
