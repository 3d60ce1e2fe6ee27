//! vigil - HTTP uptime monitor
//!
//! Periodically probes a set of HTTP endpoints, records availability and
//! latency, and exposes the aggregated state through a live dashboard, a
//! JSON API and an append-only probe log.
//!
//! # Architecture
//!
//! - [`registry`] - normalized URLs mapped to tracked per-site stats
//! - [`prober`] - one bounded GET per site per cycle
//! - [`tracker`] - pure status-update policy and transition detection
//! - [`scheduler`] - fixed-interval probe rounds plus on-registration probes
//! - [`dispatcher`] - side effects: probe log and notification channels
//! - [`server`] - axum dashboard, API and metrics endpoint
//! - [`config`] - TOML/env configuration
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vigil::prelude::*;
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let registry = Arc::new(SiteRegistry::new());
//!     registry.register("example.com").await?;
//!
//!     let (reports, _rx) = mpsc::channel(64);
//!     let prober = Prober::new(config.probe_timeout())?;
//!     let monitor = Arc::new(Monitor::new(
//!         registry.clone(),
//!         prober,
//!         config.poll_interval(),
//!         reports,
//!     ));
//!     let _handle = monitor.start();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logsink;
pub mod metrics;
pub mod models;
pub mod notifier;
pub mod prober;
pub mod registry;
pub mod scheduler;
pub mod server;
pub mod tracker;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, RegistryError, Result};
    pub use crate::models::{ProbeOutcome, SiteSnapshot, SiteStats, SiteStatus, Transition};
    pub use crate::prober::Prober;
    pub use crate::registry::SiteRegistry;
    pub use crate::scheduler::Monitor;
}

// Direct re-exports for convenience
pub use models::{ProbeOutcome, SiteSnapshot, SiteStats, SiteStatus, Transition, TransitionKind};
