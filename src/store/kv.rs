//! Key-value storage seam for the dashboard record.

use crate::models::StoreState;
use anyhow::Result;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Single-key get/put storage for [`StoreState`] records.
///
/// Implementations hand out owned values: mutating what `get` returns never
/// touches the stored record.
#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<StoreState>>;

    /// Replace the record at `key` (last write wins).
    async fn put(&self, key: &str, state: &StoreState) -> Result<()>;
}

/// Process-local store, used for tests and `--store memory`.
#[derive(Default)]
pub struct MemoryKv {
    records: Mutex<HashMap<String, StoreState>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait::async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<StoreState>> {
        Ok(self.records.lock().get(key).cloned())
    }

    async fn put(&self, key: &str, state: &StoreState) -> Result<()> {
        self.records.lock().insert(key.to_string(), state.clone());
        Ok(())
    }
}
