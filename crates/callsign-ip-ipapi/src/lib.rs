// # ipapi.co IP Source
//
// This crate provides an IpSource backed by the ipapi.co JSON API.
//
// ## Behavior
//
// - One GET per `fetch()`, no caching, no retry
// - Fixed identifying User-Agent header
// - Non-success status, transport error, unparsable body and ipapi error
//   bodies (`{"error": true, "reason": "..."}`) all become `Error::Fetch`
//
// ## API Reference
//
// - https://ipapi.co/api/#complete-location

use async_trait::async_trait;
use callsign_core::traits::IpSource;
use callsign_core::{Error, IpRecord, Result};
use serde_json::Value;
use std::time::Duration;

/// ipapi.co endpoint returning the caller's own IP as JSON
pub const IPAPI_URL: &str = "https://ipapi.co/json";

/// User-Agent sent with every lookup
pub const USER_AGENT: &str = "https://github.com/EthanC/Callsign";

/// Default HTTP timeout for lookups (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// IP source querying ipapi.co
#[derive(Debug, Clone)]
pub struct IpapiSource {
    /// URL to fetch the record from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl IpapiSource {
    /// Create a source for the public ipapi.co endpoint
    pub fn new() -> Self {
        Self::with_endpoint(IPAPI_URL)
    }

    /// Create a source for a custom endpoint (self-hosted mirror, tests)
    pub fn with_endpoint(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Endpoint this source queries
    pub fn endpoint(&self) -> &str {
        &self.url
    }
}

impl Default for IpapiSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpSource for IpapiSource {
    async fn fetch(&self) -> Result<IpRecord> {
        tracing::debug!("GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| Error::fetch(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(format!("HTTP error: {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::fetch(format!("Failed to read response: {}", e)))?;
        tracing::trace!("{}", body);

        parse_record(&body)
    }

    fn source_name(&self) -> &'static str {
        "ipapi"
    }
}

/// Parse an ipapi.co response body
fn parse_record(body: &str) -> Result<IpRecord> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| Error::fetch(format!("Failed to parse response: {}", e)))?;

    if json.get("error").and_then(Value::as_bool) == Some(true) {
        let reason = json
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or("unknown reason");
        return Err(Error::fetch(format!("ipapi returned an error: {}", reason)));
    }

    serde_json::from_value(json)
        .map_err(|e| Error::fetch(format!("Invalid response format: {}", e)))
}
