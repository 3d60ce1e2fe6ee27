//! Core data structures shared across the monitor
//!
//! This module defines the types that flow between the prober, the status
//! tracker, the registry and the reporting sinks: the per-site statistics,
//! the outcome of a single probe, and the transition events that drive
//! alerting.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// ============================================================================
// Site Status
// ============================================================================

/// Classified availability of a monitored site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SiteStatus {
    /// No probe has completed yet
    Unknown,

    /// Last probe received a response
    Up,

    /// Last probe failed at the transport level
    Down,
}

impl SiteStatus {
    /// Get string representation as shown on the dashboard and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Up => "UP",
            Self::Down => "DOWN",
        }
    }

    /// Lowercase label used for dashboard CSS classes
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl Default for SiteStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Site Stats
// ============================================================================

/// Rolling statistics for a single monitored site
///
/// One instance exists per registered site, owned by the registry and
/// mutated only through [`crate::tracker::apply_outcome`]. Invariant:
/// `failures <= total_checks` at all times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteStats {
    /// Number of completed probe cycles
    pub total_checks: u64,

    /// Number of failed probe cycles
    pub failures: u64,

    /// Current classification
    pub status: SiteStatus,

    /// Latency of the last successful probe, absent while DOWN or UNKNOWN
    pub last_latency_ms: Option<u64>,
}

impl SiteStats {
    /// Create fresh stats for a newly registered site
    pub fn new() -> Self {
        Self {
            total_checks: 0,
            failures: 0,
            status: SiteStatus::Unknown,
            last_latency_ms: None,
        }
    }

    /// Ratio of successful checks to total checks as a percentage,
    /// rounded to two decimal places. Zero checks yields 0.00.
    pub fn uptime_percent(&self) -> f64 {
        if self.total_checks == 0 {
            return 0.0;
        }
        let ratio = (self.total_checks - self.failures) as f64 / self.total_checks as f64;
        (ratio * 100.0 * 100.0).round() / 100.0
    }
}

impl Default for SiteStats {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Probe Outcome
// ============================================================================

/// Result of a single probe against one site
///
/// Produced by the prober, consumed by the status tracker. A response of any
/// HTTP status counts as `ok`; only transport-level failures (DNS, connect,
/// TLS, timeout) are `!ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Whether a response was received
    pub ok: bool,

    /// Wall-clock latency from request start to response completion
    pub latency_ms: Option<u64>,

    /// HTTP status code, when response headers were received
    pub http_status: Option<u16>,
}

impl ProbeOutcome {
    /// A successful probe with measured latency
    pub fn up(latency_ms: u64, http_status: u16) -> Self {
        Self {
            ok: true,
            latency_ms: Some(latency_ms),
            http_status: Some(http_status),
        }
    }

    /// A failed probe with no usable latency
    pub fn down() -> Self {
        Self {
            ok: false,
            latency_ms: None,
            http_status: None,
        }
    }

    /// A failed probe where headers arrived but the body did not complete
    pub fn down_with_status(http_status: u16) -> Self {
        Self {
            ok: false,
            latency_ms: None,
            http_status: Some(http_status),
        }
    }
}

// ============================================================================
// Transitions
// ============================================================================

/// Kind of alertable status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Site became unreachable (UP -> DOWN or UNKNOWN -> DOWN)
    Failure,

    /// Site became reachable again (DOWN -> UP)
    Recovery,
}

impl TransitionKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Failure => "failure",
            Self::Recovery => "recovery",
        }
    }

    /// Human-readable alert message for a site
    pub fn message(&self, url: &str) -> String {
        match self {
            Self::Failure => format!("DOWN: {url}"),
            Self::Recovery => format!("RECOVERED: {url}"),
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An alertable status change produced by one probe outcome
///
/// Only UP->DOWN, UNKNOWN->DOWN and DOWN->UP are emitted. UNKNOWN->UP is a
/// first classification, not a recovery, and produces no transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Status before the update
    pub from: SiteStatus,

    /// Status after the update
    pub to: SiteStatus,

    /// Alert classification of this change
    pub kind: TransitionKind,
}

// ============================================================================
// Probe Report
// ============================================================================

/// Everything the reporting sinks need to know about one completed cycle
///
/// Emitted by the scheduler after the tracker has applied an outcome, and
/// consumed by the dispatcher (log sink, notification channels). The core
/// update path performs no side effects itself.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Normalized site URL
    pub url: String,

    /// Raw probe outcome
    pub outcome: ProbeOutcome,

    /// Status after the update was applied
    pub status: SiteStatus,

    /// Alertable transition, if this cycle produced one
    pub transition: Option<Transition>,

    /// Local time the cycle completed, used for log line timestamps
    pub completed_at: DateTime<Local>,
}

// ============================================================================
// Snapshot
// ============================================================================

/// Point-in-time, read-only view of one site's stats
///
/// Each row is internally consistent (taken under the site's update lock);
/// rows of the same snapshot may reflect different instants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSnapshot {
    /// Normalized site URL
    pub url: String,

    /// Current classification
    pub status: SiteStatus,

    /// Latency of the last successful probe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_latency_ms: Option<u64>,

    /// Number of completed probe cycles
    pub total_checks: u64,

    /// Number of failed probe cycles
    pub failures: u64,

    /// Derived uptime percentage, two decimal places
    pub uptime_percent: f64,
}

impl SiteSnapshot {
    /// Build a snapshot row from a site's current stats
    pub fn from_stats(url: impl Into<String>, stats: &SiteStats) -> Self {
        Self {
            url: url.into(),
            status: stats.status,
            last_latency_ms: stats.last_latency_ms,
            total_checks: stats.total_checks,
            failures: stats.failures,
            uptime_percent: stats.uptime_percent(),
        }
    }
}
