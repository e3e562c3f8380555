use std::sync::Arc;

use tracing::{debug, warn};

use crate::keys;
use crate::kv::{KvResult, KvStore};
use crate::models::{RunArtifacts, RunStatus, Transcription};

/// How many run ids a listing returns (most recent first).
pub const LIST_LIMIT: isize = 33;

/// Domain layer over the key-value store. One `Run` spans four flat keys
/// (status, audio, transcription, summary) plus membership in the owning
/// user's run list; the run id is the only join key and nothing enforces
/// referential integrity, so readers tolerate dangling ids.
#[derive(Clone)]
pub struct RunStore {
    kv: Arc<dyn KvStore>,
}

impl RunStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Register a fresh run: initial status plus front insertion into the
    /// user's run list.
    pub async fn create(&self, user_id: &str, run_id: &str) -> KvResult<()> {
        self.kv
            .set(&keys::status(run_id), RunStatus::Processing.as_str())
            .await?;
        self.kv.lpush(&keys::user_runs(user_id), run_id).await?;
        debug!(run_id, user_id, "run created");
        Ok(())
    }

    /// Raw stored status string, `None` when the key has never been
    /// written (or the run was deleted).
    pub async fn status(&self, run_id: &str) -> KvResult<Option<String>> {
        self.kv.get(&keys::status(run_id)).await
    }

    pub async fn set_status(&self, run_id: &str, status: RunStatus) -> KvResult<()> {
        self.kv.set(&keys::status(run_id), status.as_str()).await
    }

    pub async fn set_audio_url(&self, run_id: &str, url: &str) -> KvResult<()> {
        self.kv.set(&keys::audio(run_id), url).await
    }

    pub async fn set_transcription(
        &self,
        run_id: &str,
        transcription: &Transcription,
    ) -> KvResult<()> {
        let json = serde_json::to_string(transcription)?;
        self.kv.set(&keys::transcription(run_id), &json).await
    }

    pub async fn set_summary(&self, run_id: &str, summary: &str) -> KvResult<()> {
        self.kv.set(&keys::summary(run_id), summary).await
    }

    /// Fetch all artifacts in one combined read. Absent keys come back as
    /// `None`; a transcription value that no longer decodes is treated the
    /// same way rather than failing the whole read.
    pub async fn artifacts(&self, run_id: &str) -> KvResult<RunArtifacts> {
        let audio_key = keys::audio(run_id);
        let transcription_key = keys::transcription(run_id);
        let summary_key = keys::summary(run_id);
        let (audio_url, transcription_raw, summary) = futures::try_join!(
            self.kv.get(&audio_key),
            self.kv.get(&transcription_key),
            self.kv.get(&summary_key),
        )?;

        let transcription = transcription_raw.and_then(|raw| {
            serde_json::from_str::<Transcription>(&raw)
                .map_err(|e| warn!(run_id, error = %e, "undecodable transcription value"))
                .ok()
        });

        Ok(RunArtifacts {
            audio_url,
            transcription,
            summary,
        })
    }

    pub async fn transcription(&self, run_id: &str) -> KvResult<Option<Transcription>> {
        let raw = self.kv.get(&keys::transcription(run_id)).await?;
        Ok(raw.and_then(|raw| serde_json::from_str(&raw).ok()))
    }

    pub async fn summary(&self, run_id: &str) -> KvResult<Option<String>> {
        self.kv.get(&keys::summary(run_id)).await
    }

    /// Remove every key belonging to the run, then every occurrence of the
    /// run id in the user's list. Absent keys are not an error, so the
    /// operation is idempotent. The two writes are independent; a partial
    /// failure can leave a dangling list entry, which readers tolerate.
    pub async fn delete(&self, run_id: &str, user_id: Option<&str>) -> KvResult<()> {
        let run_keys = vec![
            keys::status(run_id),
            keys::audio(run_id),
            keys::transcription(run_id),
            keys::summary(run_id),
        ];
        self.kv.del(&run_keys).await?;

        if let Some(user_id) = user_id {
            self.kv.lrem(&keys::user_runs(user_id), run_id).await?;
        }
        debug!(run_id, "run deleted");
        Ok(())
    }

    /// Rename overwrites the summary key only. Blank input is a no-op and
    /// returns `false`, preserving the original.
    pub async fn rename(&self, run_id: &str, summary: &str) -> KvResult<bool> {
        if summary.trim().is_empty() {
            return Ok(false);
        }
        self.set_summary(run_id, summary).await?;
        Ok(true)
    }

    /// Up to 33 most-recent run ids for a user.
    pub async fn list_runs(&self, user_id: &str) -> KvResult<Vec<String>> {
        self.kv
            .lrange(&keys::user_runs(user_id), 0, LIST_LIMIT - 1)
            .await
    }
}
