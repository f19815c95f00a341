// # callsign-core
//
// Core library for Callsign, a one-shot public IP change reporter.
//
// ## Architecture Overview
//
// A run is a linear pipeline, invoked once per execution by an external
// scheduler:
// - **IpSource**: Fetch the current public IP and geolocation as an [`IpRecord`]
// - **CheckpointStore**: Persist the last known IP between runs
// - **compare_and_update**: Write-first comparison against the checkpoint
// - **Notifier**: Deliver a change notification
// - **CallsignEngine**: Sequences fetch → compare → notify
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from the HTTP integrations
// 2. **Explicit Results**: Every component returns a `Result`; only the binary logs and maps exit codes
// 3. **Library-First**: The whole pipeline can be driven from tests with in-memory doubles
// 4. **Write-First Checkpoint**: The checkpoint always reflects the last *fetched* IP

pub mod checkpoint;
pub mod config;
pub mod engine;
pub mod error;
pub mod record;
pub mod traits;

// Re-export core types for convenience
pub use checkpoint::{Comparison, FileCheckpointStore, MemoryCheckpointStore, compare_and_update};
pub use config::{CallsignConfig, LogWebhookConfig};
pub use engine::{CallsignEngine, RunOutcome};
pub use error::{Error, Result};
pub use record::IpRecord;
pub use traits::{CheckpointStore, Delivery, IpSource, Notifier};
