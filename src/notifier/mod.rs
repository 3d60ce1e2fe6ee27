//! Notification channels for status transitions
//!
//! A [`Channel`] receives the human-readable message for an alertable
//! transition (`"DOWN: <url>"` / `"RECOVERED: <url>"`) and delivers it
//! somewhere. Delivery is fire-and-forget: the dispatcher logs failures and
//! the monitoring core never sees them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::{Transition, TransitionKind};

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors that can occur during channel operations
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid channel configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Remote endpoint rejected the notification
    #[error("Notification rejected with status {0}")]
    Rejected(u16),
}

/// Trait for notification channels
///
/// Implement this trait to deliver transition alerts to new destinations.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Get the channel name
    fn name(&self) -> &str;

    /// Deliver a transition alert for a site
    async fn notify(&self, url: &str, transition: &Transition) -> ChannelResult<()>;
}

// ============================================================================
// Webhook Channel
// ============================================================================

/// Webhook channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Webhook URL endpoint
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    10
}

impl WebhookConfig {
    /// Create a new webhook configuration
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: default_timeout(),
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("Webhook URL cannot be empty".to_string());
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err("Webhook URL must start with http:// or https://".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Payload posted by the webhook channel
///
/// ```json
/// {
///   "event": "failure",
///   "site": "https://example.com",
///   "message": "DOWN: https://example.com"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Transition kind ("failure" or "recovery")
    pub event: TransitionKind,

    /// Affected site URL
    pub site: String,

    /// Human-readable alert message
    pub message: String,
}

/// Webhook notification channel
///
/// Sends transition alerts as JSON payloads via HTTP POST. Any endpoint
/// accepting a JSON POST works, chat-bot relays included.
pub struct WebhookChannel {
    config: WebhookConfig,
    client: Client,
}

impl WebhookChannel {
    /// Create a new webhook channel
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::InvalidConfig`] when the configuration does
    /// not validate.
    pub fn new(config: WebhookConfig) -> ChannelResult<Self> {
        config.validate().map_err(ChannelError::InvalidConfig)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Create a simple webhook channel with just a URL
    pub fn from_url(url: impl Into<String>) -> ChannelResult<Self> {
        Self::new(WebhookConfig::new(url))
    }
}

#[async_trait]
impl Channel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn notify(&self, url: &str, transition: &Transition) -> ChannelResult<()> {
        let payload = WebhookPayload {
            event: transition.kind,
            site: url.to_string(),
            message: transition.kind.message(url),
        };

        let response = self
            .client
            .post(&self.config.url)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ChannelError::Rejected(response.status().as_u16()));
        }

        Ok(())
    }
}
