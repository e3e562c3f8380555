use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{AudioMerger, MergeError};

/// Shells out to `ffmpeg` with a concat filtergraph. Inputs are passed as
/// URLs (ffmpeg fetches them itself); the merged file lands in a scratch
/// dir that is dropped with the guard.
pub struct FfmpegMerger {
    binary: String,
}

impl FfmpegMerger {
    pub fn new() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
        }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegMerger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioMerger for FfmpegMerger {
    async fn merge(&self, input_urls: &[String]) -> Result<Vec<u8>, MergeError> {
        if input_urls.is_empty() {
            return Err(MergeError::NoInput);
        }

        let scratch = tempfile::tempdir()?;
        let out_path = scratch.path().join("merged.mp3");

        // [0:a][1:a]...concat=n=N:v=0:a=1[a]
        let streams: String = (0..input_urls.len()).map(|i| format!("[{i}:a]")).collect();
        let filter = format!("{streams}concat=n={}:v=0:a=1[a]", input_urls.len());

        let mut cmd = Command::new(&self.binary);
        for url in input_urls {
            cmd.arg("-i").arg(url);
        }
        cmd.arg("-filter_complex")
            .arg(&filter)
            .arg("-map")
            .arg("[a]")
            .arg("-acodec")
            .arg("libmp3lame")
            .arg("-q:a")
            .arg("2")
            .arg("-y")
            .arg(&out_path);

        debug!(inputs = input_urls.len(), %filter, "running ffmpeg concat");
        let output = cmd.output().await?;
        if !output.status.success() {
            return Err(MergeError::Ffmpeg {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(tokio::fs::read(&out_path).await?)
    }
}
