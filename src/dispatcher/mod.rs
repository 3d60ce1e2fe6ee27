//! Report dispatcher: side effects for completed probe cycles
//!
//! The scheduler and tracker emit plain [`ProbeReport`] values; this task is
//! the only place where probe outcomes turn into side effects. It appends a
//! log line for every probe and routes alertable transitions to the
//! configured notification channels. Failures in either sink are logged and
//! dropped so the probe path stays unaffected.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::logsink::ProbeLog;
use crate::models::ProbeReport;
use crate::notifier::Channel;

/// Consumes probe reports and fans them out to the sinks
pub struct ReportDispatcher {
    log: Option<ProbeLog>,
    channels: Vec<Box<dyn Channel>>,
}

impl ReportDispatcher {
    /// Create a dispatcher with the given sinks
    pub fn new(log: Option<ProbeLog>, channels: Vec<Box<dyn Channel>>) -> Self {
        Self { log, channels }
    }

    /// Handle one report: log line, console trace, notifications
    async fn handle(&self, report: &ProbeReport) {
        match report.outcome.latency_ms {
            Some(ms) => tracing::info!(
                url = %report.url,
                status = %report.status,
                latency_ms = ms,
                http_status = report.outcome.http_status,
                "Probe completed"
            ),
            None => tracing::info!(
                url = %report.url,
                status = %report.status,
                "Probe completed"
            ),
        }

        if let Some(log) = &self.log {
            if let Err(e) = log.append(report) {
                tracing::warn!(
                    path = %log.path().display(),
                    error = %e,
                    "Failed to append probe log line"
                );
            }
        }

        if let Some(transition) = &report.transition {
            let message = transition.kind.message(&report.url);
            tracing::warn!(url = %report.url, kind = %transition.kind, "{message}");

            // Channels deliver in parallel; a slow webhook must not hold up
            // the others or the report queue
            let deliveries = self
                .channels
                .iter()
                .map(|channel| channel.notify(&report.url, transition));

            for (channel, result) in self
                .channels
                .iter()
                .zip(futures::future::join_all(deliveries).await)
            {
                if let Err(e) = result {
                    tracing::warn!(
                        channel = channel.name(),
                        url = %report.url,
                        error = %e,
                        "Notification delivery failed"
                    );
                }
            }
        }
    }

    /// Run the dispatcher until all report senders are dropped
    pub fn spawn(self, mut reports: mpsc::Receiver<ProbeReport>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(report) = reports.recv().await {
                self.handle(&report).await;
            }
            tracing::debug!("Report dispatcher stopped");
        })
    }
}
