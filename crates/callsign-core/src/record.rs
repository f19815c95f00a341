//! IP lookup record
//!
//! [`IpRecord`] is the structured result of one IP/geolocation lookup. Every
//! field is optional; the accessors substitute the placeholder that is shown
//! to humans when the lookup service omitted a value.

use serde::Deserialize;
use std::net::IpAddr;

/// Placeholder for a missing IP address
pub const UNKNOWN_IP: &str = "0.0.0.0";

/// Placeholder for a missing IP version label
pub const UNKNOWN_VERSION: &str = "IP";

/// Placeholder for missing textual geolocation fields
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for missing coordinates
pub const UNKNOWN_COORDINATE: &str = "0";

/// Current public IP address and its geolocation metadata
///
/// Produced fresh by an [`IpSource`](crate::IpSource) on each run and never
/// mutated afterwards. Unknown keys in the lookup response are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IpRecord {
    /// Public IP address, as reported by the lookup service
    #[serde(default)]
    pub ip: Option<String>,

    /// Version label, e.g. `IPv4` or `IPv6`
    #[serde(default)]
    pub version: Option<String>,

    /// Autonomous system number, e.g. `AS64500`
    #[serde(default)]
    pub asn: Option<String>,

    /// Organization owning the address
    #[serde(default)]
    pub org: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub region_code: Option<String>,

    #[serde(default)]
    pub country_name: Option<String>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,
}

impl IpRecord {
    /// Create a record carrying only an IP address
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            ..Self::default()
        }
    }

    /// The IP address if it is present and parses as IPv4 or IPv6
    ///
    /// This is the value used for checkpoint comparison; the raw text is
    /// returned (not the normalized `IpAddr` form) so the checkpoint stores
    /// exactly what the lookup service reported.
    pub fn usable_ip(&self) -> Option<&str> {
        let ip = self.ip.as_deref()?;
        ip.parse::<IpAddr>().ok().map(|_| ip)
    }

    pub fn ip_or_placeholder(&self) -> &str {
        self.ip.as_deref().unwrap_or(UNKNOWN_IP)
    }

    pub fn version_or_placeholder(&self) -> &str {
        self.version.as_deref().unwrap_or(UNKNOWN_VERSION)
    }

    pub fn asn_or_placeholder(&self) -> &str {
        self.asn.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn org_or_placeholder(&self) -> &str {
        self.org.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn city_or_placeholder(&self) -> &str {
        self.city.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn region_code_or_placeholder(&self) -> &str {
        self.region_code.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn country_name_or_placeholder(&self) -> &str {
        self.country_name.as_deref().unwrap_or(UNKNOWN)
    }

    /// Latitude rendered for display, `0` when absent
    pub fn latitude_display(&self) -> String {
        format_coordinate(self.latitude)
    }

    /// Longitude rendered for display, `0` when absent
    pub fn longitude_display(&self) -> String {
        format_coordinate(self.longitude)
    }
}

/// Whole-number coordinates keep one decimal place (`39.0`, not `39`)
fn format_coordinate(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v.fract() == 0.0 => format!("{:.1}", v),
        Some(v) => v.to_string(),
        None => UNKNOWN_COORDINATE.to_string(),
    }
}
