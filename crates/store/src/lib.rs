pub mod keys;
pub mod kv;
pub mod models;
pub mod run_store;

pub use kv::{KvError, KvStore, MemoryKv, RedisKv};
pub use models::{RunArtifacts, RunStatus, Transcription, Word};
pub use run_store::RunStore;
