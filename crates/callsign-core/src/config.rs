//! Configuration types for Callsign
//!
//! The whole configuration is assembled once at startup from environment
//! variables and passed explicitly into each component.
//!
//! | Variable                    | Field                  | Default          |
//! |-----------------------------|------------------------|------------------|
//! | `LOG_LEVEL`                 | `log_level`            | `info`           |
//! | `LOG_DISCORD_WEBHOOK_URL`   | `log_webhook.url`      | unset            |
//! | `LOG_DISCORD_WEBHOOK_LEVEL` | `log_webhook.level`    | required if URL  |
//! | `DEBUG`                     | `debug`                | `false`          |
//! | `SIMPLE_MODE`               | `simple_mode`          | `false`          |
//! | `DISCORD_WEBHOOK_URL`       | `notify_webhook_url`   | unset            |
//! | `CHECKPOINT_PATH`           | `checkpoint_path`      | `checkpoint.txt` |

use std::path::PathBuf;

/// Default checkpoint file, relative to the working directory
pub const DEFAULT_CHECKPOINT_PATH: &str = "checkpoint.txt";

/// Default console log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted by `LOG_LEVEL` and `LOG_DISCORD_WEBHOOK_LEVEL`
pub const VALID_LOG_LEVELS: &[&str] = &[
    "trace", "debug", "info", "success", "warn", "warning", "error", "critical",
];

/// Main Callsign configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallsignConfig {
    /// Console log verbosity
    pub log_level: String,

    /// Optional secondary log destination
    pub log_webhook: Option<LogWebhookConfig>,

    /// Force every run to report a change
    pub debug: bool,

    /// Leave geolocation detail fields out of notifications
    pub simple_mode: bool,

    /// Notification destination; notifications are disabled when unset
    pub notify_webhook_url: Option<String>,

    /// Location of the checkpoint file
    pub checkpoint_path: PathBuf,
}

/// Secondary log destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogWebhookConfig {
    /// Webhook URL receiving log lines
    pub url: String,
    /// Minimum severity forwarded to the webhook
    pub level: String,
}

impl CallsignConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            log_level: default_log_level(),
            log_webhook: None,
            debug: false,
            simple_mode: false,
            notify_webhook_url: None,
            checkpoint_path: default_checkpoint_path(),
        }
    }

    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, crate::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, crate::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_webhook = match get("LOG_DISCORD_WEBHOOK_URL") {
            Some(url) => {
                let level = get("LOG_DISCORD_WEBHOOK_LEVEL").ok_or_else(|| {
                    crate::Error::config(
                        "LOG_DISCORD_WEBHOOK_LEVEL is required when LOG_DISCORD_WEBHOOK_URL is set",
                    )
                })?;
                Some(LogWebhookConfig { url, level })
            }
            None => None,
        };

        Ok(Self {
            log_level: get("LOG_LEVEL").unwrap_or_else(default_log_level),
            log_webhook,
            debug: get("DEBUG").is_some_and(|v| is_truthy(&v)),
            simple_mode: get("SIMPLE_MODE").is_some_and(|v| is_truthy(&v)),
            notify_webhook_url: get("DISCORD_WEBHOOK_URL"),
            checkpoint_path: get("CHECKPOINT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_checkpoint_path),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_level("LOG_LEVEL", &self.log_level)?;

        if let Some(ref hook) = self.log_webhook {
            validate_url("LOG_DISCORD_WEBHOOK_URL", &hook.url)?;
            validate_level("LOG_DISCORD_WEBHOOK_LEVEL", &hook.level)?;
        }

        if let Some(ref url) = self.notify_webhook_url {
            validate_url("DISCORD_WEBHOOK_URL", url)?;
        }

        if self.checkpoint_path.as_os_str().is_empty() {
            return Err(crate::Error::config("CHECKPOINT_PATH cannot be empty"));
        }

        Ok(())
    }
}

impl Default for CallsignConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Any non-empty value enables a flag, except the usual spellings of "off"
fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

fn validate_level(name: &str, level: &str) -> Result<(), crate::Error> {
    if VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(crate::Error::config(format!(
            "{} '{}' is not valid. Valid levels: {}",
            name,
            level,
            VALID_LOG_LEVELS.join(", ")
        )))
    }
}

fn validate_url(name: &str, url: &str) -> Result<(), crate::Error> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(crate::Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            name, url
        )))
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_checkpoint_path() -> PathBuf {
    PathBuf::from(DEFAULT_CHECKPOINT_PATH)
}
