//! Probe scheduler: fixed-interval cycles plus on-registration probes
//!
//! One ticking loop drives the whole monitor. Every tick spawns an
//! independent task per registered site, so a slow site never delays its
//! neighbours and a tick is never blocked by in-flight probes from the
//! previous one. Ordering per site is preserved by the registry entry
//! mutex: however many cycles overlap, their updates apply one at a time.
//!
//! The loop runs for the process lifetime; on shutdown the task is aborted
//! and outcomes of probes still in flight are simply discarded.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::RegistryError;
use crate::metrics;
use crate::models::ProbeReport;
use crate::prober::Prober;
use crate::registry::SiteRegistry;
use crate::tracker;

/// Default interval between probe rounds
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Drives probe-and-update cycles for every registered site
pub struct Monitor {
    registry: Arc<SiteRegistry>,
    prober: Prober,
    poll_interval: Duration,
    reports: mpsc::Sender<ProbeReport>,
}

impl Monitor {
    /// Create a new monitor
    ///
    /// Completed cycles are published on `reports` for the dispatcher;
    /// if the receiver is gone, reports are dropped silently.
    pub fn new(
        registry: Arc<SiteRegistry>,
        prober: Prober,
        poll_interval: Duration,
        reports: mpsc::Sender<ProbeReport>,
    ) -> Self {
        Self {
            registry,
            prober,
            poll_interval,
            reports,
        }
    }

    /// Run one probe-and-update cycle for a single site
    ///
    /// The network call happens outside any lock; the update itself is
    /// applied under the site's entry mutex so concurrent cycles for the
    /// same site serialize and counters stay consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SiteNotFound`] if the URL was never
    /// registered; callers must register before checking.
    pub async fn check_site(&self, url: &str) -> Result<ProbeReport, RegistryError> {
        let entry = self.registry.get(url).await?;

        let outcome = self.prober.probe(url).await;

        let (status, transition) = {
            let mut stats = entry.lock().await;
            let transition = tracker::apply_outcome(&mut stats, &outcome);
            (stats.status, transition)
        };

        metrics::record_probe(&outcome);
        if let Some(t) = &transition {
            metrics::record_transition(t.kind);
        }

        let report = ProbeReport {
            url: url.to_string(),
            outcome,
            status,
            transition,
            completed_at: Local::now(),
        };

        // Dispatcher gone means shutdown is underway; nothing to do
        let _ = self.reports.send(report.clone()).await;

        Ok(report)
    }

    /// Spawn an immediate out-of-band cycle for one site
    ///
    /// Used on registration so a new site is classified before the next
    /// dashboard render instead of sitting at UNKNOWN until the next tick.
    pub fn probe_now(self: &Arc<Self>, url: String) {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = monitor.check_site(&url).await {
                tracing::warn!(url = %url, error = %e, "Immediate probe skipped");
            }
        });
    }

    /// Probe every registered site, one detached task per site
    pub async fn run_cycle(self: &Arc<Self>) {
        let sites = self.registry.list().await;
        metrics::set_registered_sites(sites.len());

        for url in sites {
            let monitor = Arc::clone(self);
            tokio::spawn(async move {
                if let Err(e) = monitor.check_site(&url).await {
                    tracing::warn!(url = %url, error = %e, "Scheduled probe skipped");
                }
            });
        }
    }

    /// Start the ticking loop in the background
    ///
    /// The first tick fires immediately, so startup sites are probed right
    /// away. Abort the returned handle to stop scheduling; in-flight probes
    /// are discarded without corrupting stats.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            let mut timer = tokio::time::interval(poll_interval);

            tracing::info!(
                interval_secs = poll_interval.as_secs(),
                "Monitor scheduler started"
            );

            loop {
                timer.tick().await;
                self.run_cycle().await;
            }
        })
    }
}
