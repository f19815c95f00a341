//! Core Callsign engine
//!
//! The CallsignEngine is responsible for:
//! - Fetching the current IP record via IpSource
//! - Comparing it against (and advancing) the checkpoint
//! - Delivering a notification via Notifier when the IP changed
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐      ┌────────────────────┐      ┌─────────────┐
//! │  IpSource   │─────▶│ compare_and_update │─────▶│  Notifier   │
//! │  (fetch)    │      │ (CheckpointStore)  │      │  (deliver)  │
//! └─────────────┘      └────────────────────┘      └─────────────┘
//! ```
//!
//! ## Run Flow
//!
//! 1. Fetch the record; a failure stops the run before anything is written
//! 2. Compare against the checkpoint, persisting the new IP unconditionally
//! 3. If unchanged, stop
//! 4. Notify
//!
//! No step re-enters an earlier one, and nothing is retried here.

use crate::checkpoint::{Comparison, compare_and_update};
use crate::config::CallsignConfig;
use crate::error::Result;
use crate::record::IpRecord;
use crate::traits::{CheckpointStore, Delivery, IpSource, Notifier};
use tracing::{debug, info};

/// How a run ended when nothing failed
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The IP matches the checkpoint; no notification was attempted
    Unchanged {
        ip: String,
    },

    /// The IP changed and the notifier was invoked
    Notified {
        record: IpRecord,
        previous_ip: Option<String>,
        delivery: Delivery,
    },
}

/// Core Callsign engine
///
/// ## Lifecycle
///
/// 1. Create with [`CallsignEngine::new()`]
/// 2. Call [`CallsignEngine::run_once()`] once per process execution
///
/// Scheduling is external: the engine never loops or sleeps on its own.
pub struct CallsignEngine {
    /// IP source for the lookup
    ip_source: Box<dyn IpSource>,

    /// Checkpoint of the last fetched IP
    checkpoint: Box<dyn CheckpointStore>,

    /// Notifier for change reports
    notifier: Box<dyn Notifier>,

    /// Report every run as a change
    debug_override: bool,
}

impl CallsignEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `checkpoint`: Checkpoint store implementation
    /// - `notifier`: Notifier implementation
    /// - `config`: Callsign configuration (only `debug` is read here)
    pub fn new(
        ip_source: Box<dyn IpSource>,
        checkpoint: Box<dyn CheckpointStore>,
        notifier: Box<dyn Notifier>,
        config: &CallsignConfig,
    ) -> Self {
        Self {
            ip_source,
            checkpoint,
            notifier,
            debug_override: config.debug,
        }
    }

    /// Run the fetch → compare → notify pipeline once
    ///
    /// # Returns
    ///
    /// - `Ok(RunOutcome)`: The run completed
    /// - `Err(Error::Fetch | Error::Comparison)`: Nothing to report; nothing written or sent
    /// - `Err(Error::StorageWrite | Error::Delivery)`: The run failed
    pub async fn run_once(&self) -> Result<RunOutcome> {
        debug!("Fetching IP record from {}", self.ip_source.source_name());
        let record = self.ip_source.fetch().await?;

        let comparison =
            compare_and_update(self.checkpoint.as_ref(), &record, self.debug_override).await?;

        let previous_ip = match comparison {
            Comparison::Unchanged { current } => {
                info!("Latest IP address matches the last known IP address");
                return Ok(RunOutcome::Unchanged { ip: current });
            }
            Comparison::Changed { previous, current } => {
                info!(
                    "IP address changed: {} -> {}",
                    previous.as_deref().unwrap_or("none"),
                    current
                );
                previous
            }
        };

        let delivery = self.notifier.notify(&record).await?;
        match delivery {
            Delivery::Sent => info!("Notification sent via {}", self.notifier.notifier_name()),
            Delivery::Disabled => info!("Notification destination is not set"),
        }

        Ok(RunOutcome::Notified {
            record,
            previous_ip,
            delivery,
        })
    }
}
