mod memory;
mod redis_kv;

pub use memory::MemoryKv;
pub use redis_kv::RedisKv;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type KvResult<T> = Result<T, KvError>;

/// The handful of key-value commands the run store needs. Values are JSON
/// strings. Absent keys read back as `None`.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> KvResult<()>;

    /// Delete all given keys. Keys that do not exist are ignored.
    async fn del(&self, keys: &[String]) -> KvResult<()>;

    /// Push a value to the front of a list.
    async fn lpush(&self, key: &str, value: &str) -> KvResult<()>;

    /// Inclusive range, redis `LRANGE` semantics. An absent list is empty.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> KvResult<Vec<String>>;

    /// Remove all occurrences of `value` from the list.
    async fn lrem(&self, key: &str, value: &str) -> KvResult<()>;
}
