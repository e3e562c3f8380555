use std::sync::Arc;

use nanoid::nanoid;
use tracing::{error, info, info_span, Instrument};

use ambience_store::{RunStatus, RunStore};

use crate::audio::AudioMerger;
use crate::openai::{Summarizer, Transcriber};
use crate::storage::BlobStorage;

use super::flow_control::FlowControl;
use super::{WorkflowError, WorkflowPolicy};

/// Executes the run pipeline: merge -> {transcribe, summarize} -> finalize.
/// Every collaborator is injected, so the engine runs against mocks in
/// tests and against ffmpeg/OpenAI/Redis in production. Each step is
/// retried with exponential backoff; a step that exhausts its retries
/// moves the run to the `failed` terminal status.
pub struct WorkflowEngine {
    runs: RunStore,
    storage: Arc<dyn BlobStorage>,
    merger: Arc<dyn AudioMerger>,
    transcriber: Arc<dyn Transcriber>,
    summarizer: Arc<dyn Summarizer>,
    flow: FlowControl,
    policy: WorkflowPolicy,
}

impl WorkflowEngine {
    pub fn new(
        runs: RunStore,
        storage: Arc<dyn BlobStorage>,
        merger: Arc<dyn AudioMerger>,
        transcriber: Arc<dyn Transcriber>,
        summarizer: Arc<dyn Summarizer>,
        policy: WorkflowPolicy,
    ) -> Self {
        let flow = FlowControl::new(policy.parallelism, policy.rate, policy.period);
        Self {
            runs,
            storage,
            merger,
            transcriber,
            summarizer,
            flow,
            policy,
        }
    }

    /// Start a run for the given input URLs and return its id. The
    /// pipeline itself runs on a spawned task; callers observe progress
    /// through the status store. Empty input is rejected before any side
    /// effect.
    pub async fn trigger(
        self: &Arc<Self>,
        user_id: &str,
        input_urls: Vec<String>,
    ) -> Result<String, WorkflowError> {
        if input_urls.is_empty() {
            return Err(WorkflowError::NoAudio);
        }
        let permit = self
            .flow
            .try_start(user_id)
            .ok_or(WorkflowError::Throttled)?;

        let run_id = format!("wfr_{}", nanoid!(21));
        self.runs.create(user_id, &run_id).await?;
        info!(run_id, user_id, inputs = input_urls.len(), "run triggered");

        let engine = Arc::clone(self);
        let id = run_id.clone();
        let span = info_span!("workflow", run_id = %id);
        tokio::spawn(
            async move {
                // slot stays taken until the pipeline finishes
                let _permit = permit;
                if let Err(e) = engine.execute(&id, &input_urls).await {
                    error!(error = %e, "workflow failed");
                    if let Err(e) = engine.runs.set_status(&id, RunStatus::Failed).await {
                        error!(error = %e, "could not record failed status");
                    }
                }
            }
            .instrument(span),
        );

        Ok(run_id)
    }

    async fn execute(&self, run_id: &str, inputs: &[String]) -> Result<(), WorkflowError> {
        let merged_url = self
            .policy
            .retry
            .run(run_id, "merge", || self.merge_step(run_id, inputs))
            .await?;

        // transcribe and summarize depend only on the merged file and run
        // concurrently; each writes its own result key
        let (transcribed, summarized) = tokio::join!(
            self.policy
                .retry
                .run(run_id, "transcribe", || self
                    .transcribe_step(run_id, &merged_url)),
            self.policy
                .retry
                .run(run_id, "summarize", || self
                    .summarize_step(run_id, &merged_url)),
        );
        transcribed?;
        summarized?;

        self.runs.set_status(run_id, RunStatus::Complete).await?;
        info!("workflow complete");
        Ok(())
    }

    /// Concatenate the inputs, upload the merged mp3, publish its URL and
    /// advance the status.
    async fn merge_step(&self, run_id: &str, inputs: &[String]) -> Result<String, WorkflowError> {
        let merged = self.merger.merge(inputs).await?;
        let url = self
            .storage
            .upload(&format!("merged-{run_id}.mp3"), "audio/mpeg", merged)
            .await?;
        self.runs.set_audio_url(run_id, &url).await?;
        self.runs
            .set_status(run_id, RunStatus::RunningAiTasks)
            .await?;
        Ok(url)
    }

    async fn transcribe_step(&self, run_id: &str, merged_url: &str) -> Result<(), WorkflowError> {
        let audio = self.storage.download(merged_url).await?;
        let transcription = self.transcriber.transcribe(&audio).await?;
        self.runs.set_transcription(run_id, &transcription).await?;
        Ok(())
    }

    async fn summarize_step(&self, run_id: &str, merged_url: &str) -> Result<(), WorkflowError> {
        let audio = self.storage.download(merged_url).await?;
        let summary = self.summarizer.summarize(&audio).await?;
        self.runs.set_summary(run_id, &summary).await?;
        Ok(())
    }
}
