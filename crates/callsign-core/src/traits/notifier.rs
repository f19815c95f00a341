// # Notifier Trait
//
// Defines the interface for reporting an IP change.
//
// ## Implementations
//
// - Discord webhook: `callsign-notifier-discord` crate

use crate::record::IpRecord;
use async_trait::async_trait;

/// Result of a notification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The notification was accepted by the destination
    Sent,
    /// No destination is configured; nothing was sent
    Disabled,
}

/// Trait for notifier implementations
///
/// Notifications are optional: a notifier without a destination returns
/// [`Delivery::Disabled`] without touching the network.
///
/// The only retry a notifier may perform is waiting out rate limiting
/// signaled by the destination (HTTP 429). Everything else is returned as
/// [`Error::Delivery`](crate::Error::Delivery).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Report the given record as the new public IP
    async fn notify(&self, record: &IpRecord) -> Result<Delivery, crate::Error>;

    /// Get the notifier name (for logging/debugging)
    fn notifier_name(&self) -> &'static str;
}
