// # Checkpoint
//
// Checkpoint store implementations and the write-first comparison that
// decides whether a run reports a change.

pub mod file;
pub mod memory;

pub use file::FileCheckpointStore;
pub use memory::MemoryCheckpointStore;

use crate::error::{Error, Result};
use crate::record::IpRecord;
use crate::traits::CheckpointStore;
use tracing::{debug, info};

/// Outcome of comparing a fresh record against the checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// The IP differs from the checkpoint (or the debug override is set)
    Changed {
        /// The checkpoint read before the write, if any
        previous: Option<String>,
        /// The IP that is now persisted
        current: String,
    },
    /// The IP equals the checkpoint
    Unchanged {
        /// The IP that is now persisted
        current: String,
    },
}

impl Comparison {
    pub fn is_changed(&self) -> bool {
        matches!(self, Comparison::Changed { .. })
    }
}

/// Compare a record against the checkpoint and persist its IP
///
/// Steps, in order:
/// 1. Read the checkpoint. Absence or a read failure means "no prior value".
/// 2. Extract a usable IP from the record, else [`Error::Comparison`] with no write.
/// 3. Overwrite the checkpoint with that IP, whatever the outcome below.
/// 4. With `debug_override`, always report [`Comparison::Changed`].
/// 5. Otherwise report `Unchanged` on textual equality, else `Changed`.
pub async fn compare_and_update(
    store: &dyn CheckpointStore,
    record: &IpRecord,
    debug_override: bool,
) -> Result<Comparison> {
    let previous = match store.load().await {
        Ok(value) => value,
        Err(e) => {
            debug!("Treating checkpoint as empty: {}", e);
            None
        }
    };

    let current = record
        .usable_ip()
        .ok_or_else(|| match record.ip.as_deref() {
            Some(raw) => Error::comparison(format!("Latest IP address is not valid: {:?}", raw)),
            None => Error::comparison("Latest record has no IP address"),
        })?
        .to_string();

    store.store(&current).await?;

    if debug_override {
        info!("Debug override enabled, reporting IP address as changed");
        return Ok(Comparison::Changed { previous, current });
    }

    if previous.as_deref() == Some(current.as_str()) {
        debug!("Checkpoint matches latest IP address {}", current);
        return Ok(Comparison::Unchanged { current });
    }

    Ok(Comparison::Changed { previous, current })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio_test::{assert_err, assert_ok};

    /// Store whose reads always fail, as with a permission error
    struct UnreadableStore {
        inner: MemoryCheckpointStore,
    }

    #[async_trait]
    impl CheckpointStore for UnreadableStore {
        async fn load(&self) -> Result<Option<String>> {
            Err(Error::storage_read("permission denied"))
        }

        async fn store(&self, ip: &str) -> Result<()> {
            self.inner.store(ip).await
        }
    }

    #[tokio::test]
    async fn test_first_run_reports_changed() {
        let store = MemoryCheckpointStore::new();
        let result = assert_ok!(compare_and_update(&store, &IpRecord::new("1.2.3.4"), false).await);

        assert_eq!(
            result,
            Comparison::Changed {
                previous: None,
                current: "1.2.3.4".to_string()
            }
        );
        assert_eq!(store.load().await.unwrap(), Some("1.2.3.4".to_string()));
    }

    #[tokio::test]
    async fn test_same_ip_reports_unchanged_but_still_writes() {
        let store = MemoryCheckpointStore::with_value("1.2.3.4");
        let result = compare_and_update(&store, &IpRecord::new("1.2.3.4"), false)
            .await
            .unwrap();

        assert!(!result.is_changed());
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_different_ip_reports_previous() {
        let store = MemoryCheckpointStore::with_value("1.2.3.4");
        let result = compare_and_update(&store, &IpRecord::new("5.6.7.8"), false)
            .await
            .unwrap();

        assert_eq!(
            result,
            Comparison::Changed {
                previous: Some("1.2.3.4".to_string()),
                current: "5.6.7.8".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_debug_override_forces_changed() {
        let store = MemoryCheckpointStore::with_value("1.2.3.4");
        let result = compare_and_update(&store, &IpRecord::new("1.2.3.4"), true)
            .await
            .unwrap();

        assert!(result.is_changed());
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_ip_fails_without_write() {
        let store = MemoryCheckpointStore::with_value("1.2.3.4");
        let err = assert_err!(compare_and_update(&store, &IpRecord::default(), false).await);

        assert!(matches!(err, Error::Comparison(_)));
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.load().await.unwrap(), Some("1.2.3.4".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_ip_fails_without_write() {
        let store = MemoryCheckpointStore::new();
        let err = compare_and_update(&store, &IpRecord::new("RateLimited"), true)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Comparison(_)));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_checkpoint_counts_as_empty() {
        let store = UnreadableStore {
            inner: MemoryCheckpointStore::new(),
        };
        let result = compare_and_update(&store, &IpRecord::new("1.2.3.4"), false)
            .await
            .unwrap();

        assert!(result.is_changed());
        assert_eq!(store.inner.write_count(), 1);
    }
}
