pub mod audio;
pub mod openai;
pub mod poller;
pub mod storage;
pub mod transcript;
pub mod workflow;

pub use audio::{AudioMerger, FfmpegMerger, MergeError};
pub use openai::{AiError, OpenAiClient, Summarizer, Transcriber};
pub use poller::{
    HttpStatusSource, PollOutcome, PollerConfig, PollerState, StatusPoller, StatusSource,
};
pub use storage::{BlobStorage, HttpBlobStorage, StorageError};
pub use workflow::{RetryPolicy, WorkflowEngine, WorkflowError, WorkflowPolicy};
