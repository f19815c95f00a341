//! Test doubles and common utilities for pipeline contract tests
//!
//! This module provides minimal test doubles that record how the engine
//! drives each component, without any network access.

#![allow(dead_code)]

use callsign_core::error::{Error, Result};
use callsign_core::traits::{CheckpointStore, Delivery, IpSource, Notifier};
use callsign_core::{CallsignConfig, IpRecord};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpSource returning a fixed record, or failing
pub struct StaticIpSource {
    /// Record to return; `None` simulates a lookup failure
    record: Option<IpRecord>,
    /// Call counter for fetch()
    fetch_call_count: Arc<AtomicUsize>,
}

impl StaticIpSource {
    pub fn new(record: IpRecord) -> Self {
        Self {
            record: Some(record),
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose lookup always fails
    pub fn failing() -> Self {
        Self {
            record: None,
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times fetch() was called
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for StaticIpSource {
    async fn fetch(&self) -> Result<IpRecord> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        self.record
            .clone()
            .ok_or_else(|| Error::fetch("HTTP error: 503 Service Unavailable"))
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// A CheckpointStore on read-only storage: reads succeed, writes fail
#[derive(Clone, Default)]
pub struct ReadOnlyCheckpointStore {
    value: Option<String>,
    write_attempts: Arc<AtomicUsize>,
}

impl ReadOnlyCheckpointStore {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            write_attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times store() was called
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CheckpointStore for ReadOnlyCheckpointStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.value.clone())
    }

    async fn store(&self, _ip: &str) -> Result<()> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        Err(Error::storage_write("Read-only file system (os error 30)"))
    }
}

/// How a RecordingNotifier answers
#[derive(Debug, Clone, Copy)]
pub enum NotifierMode {
    Sends,
    Disabled,
    Fails,
}

/// A Notifier that records every record it was asked to deliver
#[derive(Clone)]
pub struct RecordingNotifier {
    mode: NotifierMode,
    notified: Arc<Mutex<Vec<IpRecord>>>,
}

impl RecordingNotifier {
    pub fn new(mode: NotifierMode) -> Self {
        Self {
            mode,
            notified: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of times notify() was called
    pub fn notify_call_count(&self) -> usize {
        self.notified.lock().unwrap().len()
    }

    /// Records passed to notify(), in call order
    pub fn notified(&self) -> Vec<IpRecord> {
        self.notified.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, record: &IpRecord) -> Result<Delivery> {
        self.notified.lock().unwrap().push(record.clone());
        match self.mode {
            NotifierMode::Sends => Ok(Delivery::Sent),
            NotifierMode::Disabled => Ok(Delivery::Disabled),
            NotifierMode::Fails => Err(Error::delivery("HTTP error: 500 Internal Server Error")),
        }
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}

/// The fully populated record used by the end-to-end scenarios
pub fn example_record() -> IpRecord {
    serde_json::from_value(serde_json::json!({
        "ip": "203.0.113.5",
        "asn": "AS64500",
        "org": "Example Org",
        "city": "Springfield",
        "region_code": "IL",
        "country_name": "United States",
        "latitude": 39.0,
        "longitude": -89.6,
        "version": "IPv4"
    }))
    .expect("example record deserializes")
}

/// Configuration with only the debug override chosen
pub fn config_with_debug(debug: bool) -> CallsignConfig {
    CallsignConfig {
        debug,
        ..CallsignConfig::default()
    }
}
