//! Logging system initialization
//!
//! Console output goes through a `tracing_subscriber::fmt` layer filtered at
//! `LOG_LEVEL`. When a log webhook is configured, a second layer captures
//! every event at or above `LOG_DISCORD_WEBHOOK_LEVEL`; the captured lines
//! are posted to that webhook by [`WebhookLogSink::flush`] at the end of the
//! run.

use callsign_core::CallsignConfig;
use callsign_notifier_discord::{WebhookPayload, execute_webhook, http_client};
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Discord rejects `content` longer than this
const MAX_MESSAGE_CHARS: usize = 2000;

/// Rate-limit resends allowed for log delivery
const LOG_RATE_LIMIT_RETRIES: usize = 2;

/// Map a configured level name to a filter
///
/// Accepts the usual tracing names plus `success`, `warning` and `critical`.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" | "success" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" | "critical" => Some(LevelFilter::ERROR),
        _ => None,
    }
}

/// Initialize the global subscriber
///
/// # Returns
///
/// The log sink to flush before exit, when a log webhook is configured.
pub fn init_logging(config: &CallsignConfig) -> anyhow::Result<Option<WebhookLogSink>> {
    let console_level = parse_level(&config.log_level)
        .ok_or_else(|| anyhow::anyhow!("Invalid LOG_LEVEL: {}", config.log_level))?;

    let (sink, webhook_layer) = match config.log_webhook {
        Some(ref hook) => {
            let level = parse_level(&hook.level).ok_or_else(|| {
                anyhow::anyhow!("Invalid LOG_DISCORD_WEBHOOK_LEVEL: {}", hook.level)
            })?;
            let sink = WebhookLogSink::new(hook.url.clone());
            let layer = sink.layer().with_filter(level);
            (Some(sink), Some(layer))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(console_level))
        .with(webhook_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    if sink.is_some() {
        tracing::info!("Enabled logging to Discord webhook");
    }

    Ok(sink)
}

/// Buffered log destination posting to a webhook
#[derive(Clone)]
pub struct WebhookLogSink {
    /// ⚠️ NEVER log this value
    url: String,
    lines: Arc<Mutex<Vec<String>>>,
}

impl WebhookLogSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Layer feeding this sink
    pub fn layer(&self) -> WebhookLogLayer {
        WebhookLogLayer {
            lines: Arc::clone(&self.lines),
        }
    }

    /// Lines captured so far
    pub fn pending(&self) -> Vec<String> {
        self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    /// Post every captured line to the webhook
    ///
    /// Failures are reported on stderr; logging must never change the
    /// outcome of a run.
    pub async fn flush(&self) {
        let lines = match self.lines.lock() {
            Ok(mut lines) => std::mem::take(&mut *lines),
            Err(_) => return,
        };
        if lines.is_empty() {
            return;
        }

        let client = http_client();
        for message in pack_messages(&lines, MAX_MESSAGE_CHARS) {
            let payload = WebhookPayload::text(message);
            if let Err(e) =
                execute_webhook(&client, &self.url, &payload, LOG_RATE_LIMIT_RETRIES).await
            {
                eprintln!("Failed to send logs to Discord webhook: {}", e);
                return;
            }
        }
    }
}

impl std::fmt::Debug for WebhookLogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookLogSink")
            .field("url", &"<REDACTED>")
            .field("pending", &self.pending().len())
            .finish()
    }
}

/// Layer capturing formatted events into a [`WebhookLogSink`]
pub struct WebhookLogLayer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl<S: Subscriber> Layer<S> for WebhookLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        let line = format!(
            "{} {}: {}{}",
            metadata.level(),
            metadata.target(),
            visitor.message,
            visitor.fields
        );

        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }
}

/// Join lines into messages of at most `limit` characters
///
/// A single line longer than the limit is truncated.
fn pack_messages(lines: &[String], limit: usize) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = String::new();

    for line in lines {
        let line: String = line.chars().take(limit).collect();
        let needed = line.chars().count() + usize::from(!current.is_empty());

        if current.chars().count() + needed > limit && !current.is_empty() {
            messages.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(&line);
    }

    if !current.is_empty() {
        messages.push(current);
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_level_aliases() {
        assert_eq!(parse_level("SUCCESS"), Some(LevelFilter::INFO));
        assert_eq!(parse_level("Warning"), Some(LevelFilter::WARN));
        assert_eq!(parse_level("critical"), Some(LevelFilter::ERROR));
        assert_eq!(parse_level("trace"), Some(LevelFilter::TRACE));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn test_layer_captures_events_at_or_above_level() {
        let sink = WebhookLogSink::new("https://example.com/hook");
        let subscriber =
            tracing_subscriber::registry().with(sink.layer().with_filter(LevelFilter::WARN));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("not forwarded");
            tracing::warn!(ip = "203.0.113.5", "IP lookup slow");
            tracing::error!("IP lookup failed: timeout");
        });

        let lines = sink.pending();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("WARN "));
        assert!(lines[0].contains("IP lookup slow ip=203.0.113.5"));
        assert!(lines[1].contains("IP lookup failed: timeout"));
    }

    #[test]
    fn test_pack_messages_respects_limit() {
        let lines: Vec<String> = (0..5).map(|i| format!("line-{}", i)).collect();

        assert_eq!(
            pack_messages(&lines, 2000),
            vec!["line-0\nline-1\nline-2\nline-3\nline-4".to_string()]
        );
        assert_eq!(
            pack_messages(&lines, 13),
            vec![
                "line-0\nline-1".to_string(),
                "line-2\nline-3".to_string(),
                "line-4".to_string()
            ]
        );

        let long = vec!["x".repeat(30)];
        assert_eq!(pack_messages(&long, 10), vec!["x".repeat(10)]);
        assert!(pack_messages(&[], 10).is_empty());
    }

    #[tokio::test]
    async fn test_flush_posts_and_drains() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "content": "ERROR callsign: Checkpoint write failed"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let sink = WebhookLogSink::new(format!("{}/api/webhooks/1/abc", server.uri()));
        if let Ok(mut lines) = sink.lines.lock() {
            lines.push("ERROR callsign: Checkpoint write failed".to_string());
        }

        sink.flush().await;
        assert!(sink.pending().is_empty());

        // Nothing left to send
        sink.flush().await;
    }
}
