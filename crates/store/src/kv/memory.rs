use async_trait::async_trait;
use dashmap::DashMap;

use super::{KvResult, KvStore};

/// In-memory backend with the same observable semantics as `RedisKv`.
/// Backs unit and integration tests so the whole stack runs without a
/// live Redis.
#[derive(Default)]
pub struct MemoryKv {
    strings: DashMap<String, String>,
    lists: DashMap<String, Vec<String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.strings.get(key).map(|v| v.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.strings.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> KvResult<()> {
        for key in keys {
            self.strings.remove(key);
            self.lists.remove(key);
        }
        Ok(())
    }

    async fn lpush(&self, key: &str, value: &str) -> KvResult<()> {
        self.lists
            .entry(key.to_string())
            .or_default()
            .insert(0, value.to_string());
        Ok(())
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> KvResult<Vec<String>> {
        let Some(list) = self.lists.get(key) else {
            return Ok(Vec::new());
        };
        let len = list.len() as isize;
        let clamp = |i: isize| -> isize {
            let i = if i < 0 { len + i } else { i };
            i.clamp(0, len.max(0))
        };
        let start = clamp(start);
        // stop is inclusive, redis-style
        let stop = if stop < 0 { len + stop } else { stop }.min(len - 1);
        if len == 0 || start > stop {
            return Ok(Vec::new());
        }
        Ok(list[start as usize..=stop as usize].to_vec())
    }

    async fn lrem(&self, key: &str, value: &str) -> KvResult<()> {
        if let Some(mut list) = self.lists.get_mut(key) {
            list.retain(|v| v != value);
        }
        Ok(())
    }
}
