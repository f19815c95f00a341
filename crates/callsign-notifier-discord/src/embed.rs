//! Discord webhook payload
//!
//! Serializable subset of the Discord "Execute Webhook" body and the
//! builder that turns an [`IpRecord`] into the change notification embed.

use callsign_core::IpRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Embed accent color
pub const EMBED_COLOR: u32 = 0x00C6A8;

pub const AUTHOR_NAME: &str = "Callsign";
pub const AUTHOR_URL: &str = "https://github.com/EthanC/Callsign";
pub const AUTHOR_ICON_URL: &str = "https://i.imgur.com/NgVYZcq.png";

pub const FOOTER_TEXT: &str = "ipapi";
pub const FOOTER_ICON_URL: &str = "https://i.imgur.com/54fjVje.png";

/// Body of a webhook execution
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebhookPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl WebhookPayload {
    /// Plain text message
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
        }
    }

    /// Single embed message
    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub color: u32,
    pub author: EmbedAuthor,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
    /// ISO 8601 timestamp shown next to the footer
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: String,
}

/// Build the change notification embed for a record
///
/// The address field always comes first. Unless `simple_mode` is set it is
/// followed by ASN, Organization, Location, Country and Coordinates, with
/// placeholders standing in for anything the lookup did not return.
pub fn build_embed(record: &IpRecord, simple_mode: bool, timestamp: DateTime<Utc>) -> Embed {
    let ip = record.ip_or_placeholder();

    let mut fields = vec![EmbedField::inline(
        format!("{} Address", record.version_or_placeholder()),
        format!("[{ip}](https://ipapi.co/?q={ip})"),
    )];

    if !simple_mode {
        let asn = record.asn_or_placeholder();
        let lat = record.latitude_display();
        let lng = record.longitude_display();

        fields.extend([
            EmbedField::inline(
                "ASN",
                format!("[{asn}](https://radar.cloudflare.com/routing/{asn})"),
            ),
            EmbedField::inline("Organization", record.org_or_placeholder()),
            EmbedField::inline(
                "Location",
                format!(
                    "{}, {}",
                    record.city_or_placeholder(),
                    record.region_code_or_placeholder()
                ),
            ),
            EmbedField::inline("Country", record.country_name_or_placeholder()),
            EmbedField::inline(
                "Coordinates",
                format!("[{lat}, {lng}](https://maps.google.com/?q={lat},{lng})"),
            ),
        ]);
    }

    Embed {
        color: EMBED_COLOR,
        author: EmbedAuthor {
            name: AUTHOR_NAME.to_string(),
            url: AUTHOR_URL.to_string(),
            icon_url: AUTHOR_ICON_URL.to_string(),
        },
        fields,
        footer: EmbedFooter {
            text: FOOTER_TEXT.to_string(),
            icon_url: FOOTER_ICON_URL.to_string(),
        },
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
