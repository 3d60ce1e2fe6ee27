//! Prometheus metrics for the monitor
//!
//! Tracks probe counts by result, alertable transitions by kind, the number
//! of registered sites, and probe latency.
//!
//! Call [`init_metrics`] once at application startup. If initialization
//! fails or is skipped, all metric operations become no-ops.

use prometheus::{
    register_counter_vec, register_gauge, register_histogram, CounterVec, Encoder, Gauge,
    Histogram, TextEncoder,
};
use std::sync::OnceLock;

use crate::models::{ProbeOutcome, TransitionKind};

// ============================================================================
// Metrics Storage
// ============================================================================

/// Container for all monitor metrics
struct MonitorMetrics {
    probes_total: CounterVec,
    transitions_total: CounterVec,
    registered_sites: Gauge,
    probe_latency: Histogram,
}

/// Global storage for monitor metrics
static MONITOR_METRICS: OnceLock<MonitorMetrics> = OnceLock::new();

/// Flag to track if initialization was attempted
static METRICS_INIT_ATTEMPTED: OnceLock<bool> = OnceLock::new();

// ============================================================================
// Initialization
// ============================================================================

/// Initialize all Prometheus metrics
///
/// Should be called once at application startup; repeated calls are no-ops.
///
/// # Errors
///
/// Returns a description if any metric registration failed; the application
/// can continue without metrics.
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    if METRICS_INIT_ATTEMPTED.get().is_some() {
        return Ok(());
    }
    METRICS_INIT_ATTEMPTED.set(true).ok();

    let metrics = MonitorMetrics {
        probes_total: register_counter_vec!(
            "vigil_probes_total",
            "Total completed probes by result",
            &["result"]
        )?,
        transitions_total: register_counter_vec!(
            "vigil_transitions_total",
            "Total alertable status transitions by kind",
            &["kind"]
        )?,
        registered_sites: register_gauge!(
            "vigil_registered_sites",
            "Number of registered sites"
        )?,
        probe_latency: register_histogram!(
            "vigil_probe_latency_seconds",
            "Probe latency in seconds for successful probes",
            vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 8.0]
        )?,
    };

    MONITOR_METRICS
        .set(metrics)
        .map_err(|_| "Monitor metrics already initialized")?;

    tracing::info!("Prometheus metrics initialized");
    Ok(())
}

/// Check if metrics have been initialized
pub fn metrics_initialized() -> bool {
    MONITOR_METRICS.get().is_some()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record one completed probe
pub fn record_probe(outcome: &ProbeOutcome) {
    if let Some(m) = MONITOR_METRICS.get() {
        let result = if outcome.ok { "up" } else { "down" };
        m.probes_total.with_label_values(&[result]).inc();

        if let Some(latency_ms) = outcome.latency_ms {
            m.probe_latency.observe(latency_ms as f64 / 1000.0);
        }
    }
}

/// Record one alertable transition
pub fn record_transition(kind: TransitionKind) {
    if let Some(m) = MONITOR_METRICS.get() {
        m.transitions_total.with_label_values(&[kind.as_str()]).inc();
    }
}

/// Update the registered-sites gauge
pub fn set_registered_sites(count: usize) {
    if let Some(m) = MONITOR_METRICS.get() {
        m.registered_sites.set(count as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_are_noops_before_init() {
        // Must not panic even when init_metrics was never called
        record_probe(&ProbeOutcome::up(10, 200));
        record_probe(&ProbeOutcome::down());
        record_transition(TransitionKind::Failure);
        set_registered_sites(3);
    }

    #[test]
    fn test_encode_metrics_produces_text() {
        let text = encode_metrics().unwrap();
        // Output may be empty before registration, but encoding must succeed
        assert!(text.is_empty() || text.contains("#") || text.contains("vigil"));
    }
}
