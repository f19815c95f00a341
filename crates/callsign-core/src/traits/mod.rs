//! Core traits for Callsign
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Fetch the current public IP and geolocation
//! - [`CheckpointStore`]: Persist the last known IP between runs
//! - [`Notifier`]: Deliver a change notification

pub mod checkpoint_store;
pub mod ip_source;
pub mod notifier;

pub use checkpoint_store::CheckpointStore;
pub use ip_source::IpSource;
pub use notifier::{Delivery, Notifier};
