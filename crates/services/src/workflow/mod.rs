mod engine;
mod flow_control;
mod retry;

pub use engine::WorkflowEngine;
pub use flow_control::{FlowControl, FlowPermit};
pub use retry::RetryPolicy;

use std::time::Duration;

use thiserror::Error;

use ambience_config::WorkflowSettings;
use ambience_store::KvError;

use crate::audio::MergeError;
use crate::openai::AiError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("no audio provided")]
    NoAudio,
    #[error("too many concurrent runs for this user")]
    Throttled,
    #[error(transparent)]
    Store(#[from] KvError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error(transparent)]
    Ai(#[from] AiError),
}

/// Execution policy: per-step retry plus per-user flow control.
#[derive(Debug, Clone)]
pub struct WorkflowPolicy {
    pub retry: RetryPolicy,
    pub parallelism: usize,
    pub rate: u32,
    pub period: Duration,
}

impl From<&WorkflowSettings> for WorkflowPolicy {
    fn from(s: &WorkflowSettings) -> Self {
        Self {
            retry: RetryPolicy {
                max_retries: s.max_retries,
                base_delay: Duration::from_millis(s.retry_delay_ms),
            },
            parallelism: s.parallelism,
            rate: s.rate,
            period: Duration::from_secs(s.period_secs),
        }
    }
}
