// # Memory Checkpoint Store
//
// In-memory implementation of CheckpointStore.
//
// ## Purpose
//
// Provides a checkpoint that doesn't persist across restarts. Every process
// start behaves like a first run, so each run reports a change.
//
// ## When to Use
//
// - Testing environments
// - Embedding the pipeline in a longer-lived process

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::checkpoint_store::CheckpointStore;

/// In-memory checkpoint store implementation
///
/// Clones share the same underlying value, so a test can keep a handle
/// while the engine owns another.
///
/// # Example
///
/// ```rust,no_run
/// use callsign_core::checkpoint::MemoryCheckpointStore;
/// use callsign_core::traits::CheckpointStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryCheckpointStore::new();
///
///     store.store("1.2.3.4").await?;
///     assert_eq!(store.load().await?, Some("1.2.3.4".to_string()));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryCheckpointStore {
    inner: Arc<RwLock<Option<String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryCheckpointStore {
    /// Create a new empty memory checkpoint store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a checkpoint
    pub fn with_value(ip: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(ip.into()))),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of successful `store()` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn load(&self) -> Result<Option<String>, Error> {
        Ok(self.inner.read().await.clone())
    }

    async fn store(&self, ip: &str) -> Result<(), Error> {
        *self.inner.write().await = Some(ip.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryCheckpointStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        store.store("1.2.3.4").await.unwrap();
        store.store("1.2.3.5").await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some("1.2.3.5".to_string()));
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryCheckpointStore::with_value("1.2.3.4");
        let handle = store.clone();

        store.store("5.6.7.8").await.unwrap();

        assert_eq!(handle.load().await.unwrap(), Some("5.6.7.8".to_string()));
        assert_eq!(handle.write_count(), 1);
    }
}
