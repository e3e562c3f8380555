//! Key scheme of the status store. The run id is the sole join key across
//! the status, artifact, and per-user list records.

pub fn status(run_id: &str) -> String {
    format!("workflow:{run_id}:status")
}

pub fn audio(run_id: &str) -> String {
    format!("workflow:{run_id}:audio")
}

pub fn transcription(run_id: &str) -> String {
    format!("workflow:{run_id}:transcription")
}

pub fn summary(run_id: &str) -> String {
    format!("workflow:{run_id}:summary")
}

pub fn user_runs(user_id: &str) -> String {
    format!("user:{user_id}:workflows")
}
