// # IP Source Trait
//
// Defines the interface for looking up the current public IP address.
//
// ## Implementations
//
// - ipapi.co: `callsign-ip-ipapi` crate
//
// ## Usage
//
// ```rust,ignore
// use callsign_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let record = source.fetch().await?;
//     println!("Current IP: {}", record.ip_or_placeholder());
//
//     Ok(())
// }
// ```

use crate::record::IpRecord;
use async_trait::async_trait;

/// Trait for IP source implementations
///
/// A source performs exactly one lookup per call. It does not retry, cache
/// or compare; those decisions belong to the [`CallsignEngine`](crate::CallsignEngine).
///
/// # Errors
///
/// Any transport error, non-success status or unparsable body must be
/// reported as [`Error::Fetch`](crate::Error::Fetch).
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetch the current IP record
    async fn fetch(&self) -> Result<IpRecord, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
