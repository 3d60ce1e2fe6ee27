use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vigil::config::Config;
use vigil::dispatcher::ReportDispatcher;
use vigil::logsink::ProbeLog;
use vigil::notifier::{Channel, WebhookChannel};
use vigil::prober::Prober;
use vigil::registry::{normalize_url, SiteRegistry};
use vigil::scheduler::Monitor;
use vigil::server::MonitorServer;

#[derive(Parser)]
#[command(
    name = "vigil",
    version,
    about = "HTTP uptime monitor with a live dashboard, probe log and transition alerting",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the monitor with the dashboard server
    Serve {
        /// Comma-separated list of sites to monitor from startup
        #[arg(short, long)]
        sites: Option<String>,

        /// Listening port for the dashboard (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Seconds between probe rounds
        #[arg(short, long)]
        interval: Option<u64>,

        /// Per-probe timeout in seconds
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Probe log file path ("none" disables the log)
        #[arg(long)]
        log_file: Option<String>,

        /// Webhook URL for transition alerts
        #[arg(long)]
        webhook: Option<String>,

        /// TOML configuration file (environment is used when absent)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Probe a single URL once and print the outcome
    Check {
        /// URL to probe (https:// is assumed when no scheme is given)
        url: String,

        /// Per-probe timeout in seconds
        #[arg(short, long, default_value = "5")]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    match cli.command {
        Commands::Serve {
            sites,
            port,
            interval,
            timeout,
            log_file,
            webhook,
            config,
        } => {
            serve(sites, port, interval, timeout, log_file, webhook, config).await?;
        }

        Commands::Check { url, timeout } => {
            check(url, timeout).await?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("vigil=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("vigil=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn serve(
    sites: Option<String>,
    port: Option<u16>,
    interval: Option<u64>,
    timeout: Option<u64>,
    log_file: Option<String>,
    webhook: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => Config::from_file(&path)?,
        None => Config::from_env()?,
    };

    // CLI flags win over file/environment
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(interval) = interval {
        config.monitor.poll_interval_secs = interval;
    }
    if let Some(timeout) = timeout {
        config.monitor.probe_timeout_secs = timeout;
    }
    if let Some(log_file) = log_file {
        config.sinks.log_file = match log_file.as_str() {
            "none" => None,
            path => Some(PathBuf::from(path)),
        };
    }
    if let Some(webhook) = webhook {
        config.sinks.webhook_url = Some(webhook);
    }
    if let Some(sites) = sites {
        config.monitor.startup_sites.extend(
            sites
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        );
    }

    config.validate()?;

    if let Err(e) = vigil::metrics::init_metrics() {
        tracing::warn!(error = %e, "Metrics initialization failed; continuing without metrics");
    }

    let registry = Arc::new(SiteRegistry::new());
    for site in &config.monitor.startup_sites {
        match registry.register(site).await {
            Ok(reg) if reg.created => {}
            Ok(_) => tracing::debug!(input = %site, "Duplicate startup site ignored"),
            Err(e) => tracing::warn!(input = %site, error = %e, "Skipping startup site"),
        }
    }
    vigil::metrics::set_registered_sites(registry.len().await);

    let mut channels: Vec<Box<dyn Channel>> = Vec::new();
    if let Some(url) = &config.sinks.webhook_url {
        match WebhookChannel::from_url(url.clone()) {
            Ok(channel) => channels.push(Box::new(channel)),
            Err(e) => tracing::warn!(error = %e, "Webhook channel disabled"),
        }
    }

    let log = config.sinks.log_file.as_ref().map(ProbeLog::new);

    let (reports_tx, reports_rx) = mpsc::channel(256);
    let dispatcher_handle = ReportDispatcher::new(log, channels).spawn(reports_rx);

    let prober = Prober::new(config.probe_timeout())?;
    let monitor = Arc::new(Monitor::new(
        registry.clone(),
        prober,
        config.poll_interval(),
        reports_tx,
    ));

    tracing::info!(
        sites = registry.len().await,
        interval_secs = config.monitor.poll_interval_secs,
        "Monitoring started"
    );

    let scheduler_handle = monitor.clone().start();

    let server = MonitorServer::new(config.server.clone(), registry, monitor);
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutdown signal received");
    };

    let result = server.start_with_shutdown(shutdown).await;

    // Stop scheduling; outcomes of in-flight probes are discarded
    scheduler_handle.abort();
    drop(dispatcher_handle);

    result?;
    Ok(())
}

async fn check(url: String, timeout: u64) -> Result<()> {
    let normalized = normalize_url(&url)?;
    let prober = Prober::new(std::time::Duration::from_secs(timeout))?;

    let outcome = prober.probe(&normalized).await;

    match (outcome.ok, outcome.latency_ms, outcome.http_status) {
        (true, Some(ms), Some(status)) => {
            println!("{normalized} UP ({status}) - {ms}ms");
        }
        (true, _, _) => {
            println!("{normalized} UP");
        }
        (false, _, Some(status)) => {
            println!("{normalized} DOWN (response aborted, status {status})");
        }
        (false, _, None) => {
            println!("{normalized} DOWN");
        }
    }

    Ok(())
}
