use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

use super::WorkflowError;

/// Exponential backoff: attempt `n` sleeps `base_delay * 2^n` before the
/// next try, up to `max_retries` retries after the first attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub async fn run<T, F, Fut>(
        &self,
        run_id: &str,
        step: &str,
        mut op: F,
    ) -> Result<T, WorkflowError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, WorkflowError>>,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_retries => {
                    let delay = self.base_delay * 2u32.pow(attempt);
                    warn!(run_id, step, attempt, error = %e, delay_ms = delay.as_millis() as u64, "step failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(run_id, step, error = %e, "step failed, retries exhausted");
                    return Err(e);
                }
            }
        }
    }
}
