use serde::{Deserialize, Serialize};

/// Lifecycle of a run. Stored on the wire as lowercase snake strings;
/// `parse` additionally accepts the legacy free-form phrasings so runs
/// written by older deployments still resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Processing,
    RunningAiTasks,
    Complete,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Processing => "processing",
            RunStatus::RunningAiTasks => "running_ai_tasks",
            RunStatus::Complete => "complete",
            RunStatus::Failed => "failed",
        }
    }

    /// Case-insensitive parse. `None` for unrecognized strings, which
    /// callers treat the same as an absent status key.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "processing" | "processing audio..." => Some(RunStatus::Processing),
            "running_ai_tasks" | "running ai tasks..." => Some(RunStatus::RunningAiTasks),
            "complete" | "completed" => Some(RunStatus::Complete),
            "failed" => Some(RunStatus::Failed),
            _ => None,
        }
    }

    /// Terminal states stop pollers.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Complete | RunStatus::Failed)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transcribed word with its playback interval in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

/// Result artifacts of a run. Every field is absent until its producing
/// step has written it, so `None` means "not yet available", not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunArtifacts {
    pub audio_url: Option<String>,
    pub transcription: Option<Transcription>,
    pub summary: Option<String>,
}
