// # Checkpoint Store Trait
//
// Defines the interface for persisting the last known IP address.
//
// ## Purpose
//
// The checkpoint is a single scalar: the IP address fetched by the previous
// run. Comparing against it is how a run decides whether anything changed.
//
// ## Implementations
//
// - File-based: plain text file holding only the address
// - In-memory: for tests and embedding
//
// ## Usage
//
// ```rust,ignore
// use callsign_core::CheckpointStore;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let store = /* CheckpointStore implementation */;
//
//     // Check last known IP
//     let last_ip = store.load().await?;
//
//     // Overwrite with the latest IP
//     store.store("203.0.113.5").await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for checkpoint store implementations
///
/// # Implementation Guidelines
///
/// - **Absence is not an error**: a missing checkpoint is `Ok(None)`
/// - **Full overwrite**: `store()` replaces the previous value entirely
/// - **Durable on return**: once `store()` returns `Ok`, the value survives a restart
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Read the last known IP
    ///
    /// # Returns
    ///
    /// - `Ok(Some(String))`: The stored value
    /// - `Ok(None)`: No checkpoint yet
    /// - `Err(Error::StorageRead)`: The checkpoint exists but could not be read
    async fn load(&self) -> Result<Option<String>, crate::Error>;

    /// Overwrite the checkpoint with a new IP
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Successfully persisted
    /// - `Err(Error::StorageWrite)`: Storage error
    async fn store(&self, ip: &str) -> Result<(), crate::Error>;
}
