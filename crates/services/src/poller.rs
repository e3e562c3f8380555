//! Client-side status polling: `Idle -> Polling -> Terminal`. The loop
//! reads the status at a fixed interval until a terminal state, a
//! max-wait ceiling, or cancellation, and performs no further reads
//! afterwards.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use ambience_config::PollerSettings;
use ambience_store::{RunStatus, RunStore};

/// Where the poller reads status from: the HTTP endpoint in a real
/// client, the run store directly in tests. `None` means the status key
/// does not exist (yet), which keeps the poller going.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn status(&self, run_id: &str) -> Result<Option<String>, String>;
}

#[async_trait]
impl StatusSource for RunStore {
    async fn status(&self, run_id: &str) -> Result<Option<String>, String> {
        RunStore::status(self, run_id).await.map_err(|e| e.to_string())
    }
}

/// Reads `GET {base_url}/api/status/{id}`. The endpoint reports absent
/// runs as `"unknown"`, which maps back to `None` here.
pub struct HttpStatusSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStatusSource {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn status(&self, run_id: &str) -> Result<Option<String>, String> {
        #[derive(serde::Deserialize)]
        struct StatusResponse {
            status: String,
        }

        let url = format!("{}/api/status/{}", self.base_url, run_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let body: StatusResponse = response.json().await.map_err(|e| e.to_string())?;
        if body.status.eq_ignore_ascii_case("unknown") {
            return Ok(None);
        }
        Ok(Some(body.status))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Run reached `complete`; carries the run id so the caller can
    /// switch to viewing results.
    Complete(String),
    Failed(String),
    TimedOut(String),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_wait: Duration::from_secs(600),
        }
    }
}

impl From<&PollerSettings> for PollerConfig {
    fn from(s: &PollerSettings) -> Self {
        Self {
            interval: Duration::from_millis(s.interval_ms),
            max_wait: Duration::from_secs(s.max_wait_secs),
        }
    }
}

/// Cancels the associated poller and observes its state.
pub struct PollHandle {
    cancel: watch::Sender<bool>,
    state: watch::Receiver<PollerState>,
}

impl PollHandle {
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    pub fn state(&self) -> PollerState {
        *self.state.borrow()
    }
}

pub struct StatusPoller {
    source: Arc<dyn StatusSource>,
    config: PollerConfig,
    cancel: watch::Receiver<bool>,
    state: watch::Sender<PollerState>,
}

impl StatusPoller {
    pub fn new(source: Arc<dyn StatusSource>, config: PollerConfig) -> (Self, PollHandle) {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(PollerState::Idle);
        (
            Self {
                source,
                config,
                cancel: cancel_rx,
                state: state_tx,
            },
            PollHandle {
                cancel: cancel_tx,
                state: state_rx,
            },
        )
    }

    /// Poll until terminal. Consumes the poller: a finished loop never
    /// issues another read.
    pub async fn poll(self, run_id: &str) -> PollOutcome {
        let Self {
            source,
            config,
            mut cancel,
            state,
        } = self;

        let _ = state.send(PollerState::Polling);
        let deadline = Instant::now() + config.max_wait;
        let mut ticker = tokio::time::interval(config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let outcome = loop {
            tokio::select! {
                biased;
                _ = cancel.changed() => {
                    debug!(run_id, "polling cancelled");
                    break PollOutcome::Cancelled;
                }
                tick = ticker.tick() => {
                    if tick >= deadline {
                        warn!(run_id, "polling gave up, max wait reached");
                        break PollOutcome::TimedOut(run_id.to_string());
                    }
                    match source.status(run_id).await {
                        Ok(Some(raw)) => match RunStatus::parse(&raw) {
                            Some(RunStatus::Complete) => {
                                break PollOutcome::Complete(run_id.to_string());
                            }
                            Some(RunStatus::Failed) => {
                                break PollOutcome::Failed(run_id.to_string());
                            }
                            _ => debug!(run_id, status = %raw, "still in progress"),
                        },
                        Ok(None) => debug!(run_id, "status not yet available"),
                        // transient read failures do not stop the loop
                        Err(e) => warn!(run_id, error = %e, "status read failed"),
                    }
                }
            }
        };

        let _ = state.send(PollerState::Terminal);
        outcome
    }
}
