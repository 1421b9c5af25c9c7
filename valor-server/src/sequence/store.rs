//! Counter storage backends

use async_trait::async_trait;
use dashmap::DashMap;

use super::error::CounterStoreError;

/// Durable per-name counter
///
/// `increment` must be a single atomic increment-and-fetch that creates the
/// counter at 0 when absent. A call that returns an error must not have
/// applied its increment.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Add one to `name` and return the new value
    async fn increment(&self, name: &str) -> Result<u64, CounterStoreError>;

    /// Last issued value, `None` if the counter was never created
    async fn current(&self, name: &str) -> Result<Option<u64>, CounterStoreError>;
}

/// In-process counter store
///
/// Uses the DashMap entry lock for atomicity. State is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    counters: DashMap<String, u64>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self, name: &str) -> Result<u64, CounterStoreError> {
        let mut entry = self.counters.entry(name.to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    async fn current(&self, name: &str) -> Result<Option<u64>, CounterStoreError> {
        Ok(self.counters.get(name).map(|v| *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_lazy_create() {
        let store = MemoryCounterStore::new();
        assert_eq!(store.current("orderId").await.unwrap(), None);
        assert_eq!(store.increment("orderId").await.unwrap(), 1);
        assert_eq!(store.current("orderId").await.unwrap(), Some(1));
    }
}
