//! Error types for Callsign
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

/// Result type alias for Callsign operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Callsign
#[derive(Error, Debug)]
pub enum Error {
    /// The IP lookup failed (transport, status or body)
    #[error("IP lookup failed: {0}")]
    Fetch(String),

    /// The fetched record carries no usable IP address
    #[error("Comparison failed: {0}")]
    Comparison(String),

    /// The checkpoint could not be read
    #[error("Checkpoint read failed: {0}")]
    StorageRead(String),

    /// The checkpoint could not be written
    #[error("Checkpoint write failed: {0}")]
    StorageWrite(String),

    /// The notification could not be delivered
    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an IP lookup error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a comparison error
    pub fn comparison(msg: impl Into<String>) -> Self {
        Self::Comparison(msg.into())
    }

    /// Create a checkpoint read error
    pub fn storage_read(msg: impl Into<String>) -> Self {
        Self::StorageRead(msg.into())
    }

    /// Create a checkpoint write error
    pub fn storage_write(msg: impl Into<String>) -> Self {
        Self::StorageWrite(msg.into())
    }

    /// Create a delivery error
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the run simply had nothing to report.
    ///
    /// Fetch and comparison failures stop the pipeline before anything is
    /// written or sent, so the process still terminates normally.
    pub fn is_nothing_to_report(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Comparison(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_to_report_covers_fetch_and_comparison_only() {
        assert!(Error::fetch("timeout").is_nothing_to_report());
        assert!(Error::comparison("missing ip").is_nothing_to_report());
        assert!(!Error::storage_write("read-only fs").is_nothing_to_report());
        assert!(!Error::delivery("HTTP 500").is_nothing_to_report());
        assert!(!Error::config("bad level").is_nothing_to_report());
    }

    #[test]
    fn display_includes_context() {
        let err = Error::delivery("HTTP 404 Not Found");
        assert_eq!(
            err.to_string(),
            "Notification delivery failed: HTTP 404 Not Found"
        );
    }
}
