//! HTTP prober: one bounded GET per site per cycle
//!
//! The prober issues a single GET with a hard timeout and measures the
//! wall-clock latency from request start to response completion. Any
//! received response counts as up, whatever its status code; only
//! transport-level failures (DNS, connect, TLS, timeout) classify a probe
//! as failed. The status code is still captured for logs and metrics.
//!
//! Nothing escapes this boundary as an error: `probe()` always returns a
//! [`ProbeOutcome`], so one hung or misbehaving site can never take down
//! the scheduler.

use std::time::{Duration, Instant};

use reqwest::Client;

use crate::error::ProberError;
use crate::models::ProbeOutcome;

/// Default probe timeout
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Site prober with a shared HTTP client
#[derive(Clone)]
pub struct Prober {
    client: Client,
}

impl Prober {
    /// Create a prober with the given per-request timeout
    ///
    /// # Errors
    ///
    /// Returns [`ProberError::Client`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, ProberError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(format!("vigil/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Create a prober with the default timeout
    ///
    /// # Errors
    ///
    /// Returns [`ProberError::Client`] if the HTTP client cannot be built.
    pub fn with_defaults() -> Result<Self, ProberError> {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }

    /// Probe one site with a single GET request
    ///
    /// Latency covers the full exchange including the response body, so a
    /// slow body counts against the site the same way a slow handshake does.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        let start = Instant::now();

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                if e.is_timeout() {
                    tracing::debug!(url = %url, "Probe timed out");
                } else {
                    tracing::debug!(url = %url, error = %e, "Probe transport failure");
                }
                return ProbeOutcome::down();
            }
        };

        let status = response.status().as_u16();

        // Drain the body so latency reflects response completion
        if let Err(e) = response.bytes().await {
            tracing::debug!(url = %url, status = status, error = %e, "Probe body failed");
            return ProbeOutcome::down_with_status(status);
        }

        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(url = %url, status = status, latency_ms = latency_ms, "Probe completed");

        ProbeOutcome::up(latency_ms, status)
    }
}
