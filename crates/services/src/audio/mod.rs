mod ffmpeg;

pub use ffmpeg::FfmpegMerger;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("no input audio")]
    NoInput,
    #[error("failed to spawn ffmpeg: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("ffmpeg exited with {status}: {stderr}")]
    Ffmpeg {
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Concatenate input audio streams, input order preserved, into one mp3.
#[async_trait]
pub trait AudioMerger: Send + Sync {
    async fn merge(&self, input_urls: &[String]) -> Result<Vec<u8>, MergeError>;
}
