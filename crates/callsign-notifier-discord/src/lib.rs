// # Discord Webhook Notifier
//
// This crate provides a Discord webhook notifier for Callsign.
//
// ## Behavior
//
// - One embed per notification, built by [`embed::build_embed`]
// - No destination configured → `Delivery::Disabled`, no request at all
// - HTTP 429 → wait `retry_after` and resend, up to a fixed number of times
// - Any other failure → `Error::Delivery`, no retry
//
// ## Security Requirements
//
// - The webhook URL embeds a secret token and NEVER appears in logs
//
// ## API Reference
//
// - Execute Webhook: POST `/webhooks/:id/:token`
// - Rate limits: https://discord.com/developers/docs/topics/rate-limits

pub mod embed;

use async_trait::async_trait;
use callsign_core::traits::{Delivery, Notifier};
use callsign_core::{CallsignConfig, Error, IpRecord, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

pub use embed::{Embed, WebhookPayload, build_embed};

/// Default HTTP timeout for webhook requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Resends allowed after rate-limit responses before giving up
pub const DEFAULT_MAX_RATE_LIMIT_RETRIES: usize = 5;

/// Wait used when a 429 response carries no usable `retry_after`
const FALLBACK_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Longest single wait honored after a 429 response
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Discord webhook notifier
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the webhook URL.
#[derive(Clone)]
pub struct DiscordNotifier {
    /// Webhook URL; `None` disables notifications
    /// ⚠️ NEVER log this value
    webhook_url: Option<String>,

    /// Leave geolocation detail fields out of the embed
    simple_mode: bool,

    /// Resends allowed after rate-limit responses
    max_rate_limit_retries: usize,

    /// HTTP client for webhook requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the webhook URL
impl std::fmt::Debug for DiscordNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordNotifier")
            .field(
                "webhook_url",
                &self.webhook_url.as_ref().map(|_| "<REDACTED>"),
            )
            .field("simple_mode", &self.simple_mode)
            .field("max_rate_limit_retries", &self.max_rate_limit_retries)
            .finish()
    }
}

impl DiscordNotifier {
    /// Create a new Discord notifier
    ///
    /// # Parameters
    ///
    /// - `webhook_url`: Destination webhook; `None` disables notifications
    /// - `simple_mode`: If true, only the address field is sent
    pub fn new(webhook_url: Option<String>, simple_mode: bool) -> Self {
        Self {
            webhook_url: webhook_url.filter(|url| !url.is_empty()),
            simple_mode,
            max_rate_limit_retries: DEFAULT_MAX_RATE_LIMIT_RETRIES,
            client: http_client(),
        }
    }

    /// Create a notifier from the run configuration
    pub fn from_config(config: &CallsignConfig) -> Self {
        Self::new(config.notify_webhook_url.clone(), config.simple_mode)
    }

    /// Override how many times a rate-limited delivery is resent
    pub fn with_max_rate_limit_retries(mut self, retries: usize) -> Self {
        self.max_rate_limit_retries = retries;
        self
    }

    /// Whether a destination is configured
    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, record: &IpRecord) -> Result<Delivery> {
        let Some(ref url) = self.webhook_url else {
            tracing::info!("Discord webhook for notifications is not set");
            return Ok(Delivery::Disabled);
        };

        let payload =
            WebhookPayload::embed(build_embed(record, self.simple_mode, chrono::Utc::now()));

        execute_webhook(&self.client, url, &payload, self.max_rate_limit_retries).await?;
        Ok(Delivery::Sent)
    }

    fn notifier_name(&self) -> &'static str {
        "discord"
    }
}

/// HTTP client used for webhook requests
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(DEFAULT_HTTP_TIMEOUT)
        .build()
        .unwrap_or_default()
}

/// POST a payload to a webhook, waiting out rate limiting
///
/// A 429 response is retried after the delay the server asks for, at most
/// `max_rate_limit_retries` times. Every other non-success status and every
/// transport error is returned as [`Error::Delivery`] immediately.
pub async fn execute_webhook(
    client: &reqwest::Client,
    url: &str,
    payload: &WebhookPayload,
    max_rate_limit_retries: usize,
) -> Result<()> {
    let mut rate_limited = 0;

    loop {
        let response = client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::delivery(format!("HTTP request failed: {}", e.without_url())))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("Webhook accepted payload: {}", status);
            return Ok(());
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            if rate_limited >= max_rate_limit_retries {
                return Err(Error::delivery(format!(
                    "Rate limit exceeded after {} retries. Status: {}",
                    rate_limited, status
                )));
            }
            rate_limited += 1;

            let header_wait = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<f64>().ok());
            let body = response.text().await.unwrap_or_default();
            let wait = retry_after(&body, header_wait);

            tracing::warn!(
                "Webhook rate limited, retrying in {:?} (attempt {}/{})",
                wait,
                rate_limited,
                max_rate_limit_retries
            );
            tokio::time::sleep(wait).await;
            continue;
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        return match status.as_u16() {
            401 | 403 | 404 => Err(Error::delivery(format!(
                "Webhook rejected: check that the webhook URL is valid. Status: {}",
                status
            ))),
            400 => Err(Error::delivery(format!(
                "Webhook rejected payload: {} - {}",
                status, error_text
            ))),
            500..=599 => Err(Error::delivery(format!(
                "Discord server error (transient): {} - {}",
                status, error_text
            ))),
            _ => Err(Error::delivery(format!(
                "Webhook delivery failed: {} - {}",
                status, error_text
            ))),
        };
    }
}

/// Delay requested by a 429 response
///
/// Discord reports `retry_after` in seconds in the JSON body; the
/// `Retry-After` header is the fallback. The result never exceeds
/// [`MAX_RETRY_AFTER`].
fn retry_after(body: &str, header_secs: Option<f64>) -> Duration {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("retry_after").and_then(Value::as_f64))
        .or(header_secs)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or(FALLBACK_RETRY_AFTER)
        .min(MAX_RETRY_AFTER)
}
