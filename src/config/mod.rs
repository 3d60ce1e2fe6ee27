//! Configuration management for the vigil monitor
//!
//! Configuration is loaded from a TOML file or from environment variables,
//! with CLI flags applied on top by the binary. Environment variables use
//! the `VIGIL_` prefix; the listening port additionally honors the bare
//! `PORT` variable common on hosting platforms.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Probe scheduling configuration
    pub monitor: MonitorConfig,

    /// Dashboard/API server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Probe log and notification sinks
    pub sinks: SinkConfig,
}

/// Probe scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between probe rounds
    pub poll_interval_secs: u64,

    /// Per-probe timeout in seconds
    pub probe_timeout_secs: u64,

    /// Sites registered at startup
    pub startup_sites: Vec<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
            probe_timeout_secs: 5,
            startup_sites: Vec::new(),
        }
    }
}

/// Dashboard/API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Listening port
    pub port: u16,

    /// Enable CORS for the API
    pub enable_cors: bool,

    /// Enable per-request tracing
    pub enable_request_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 3000,
            enable_cors: true,
            enable_request_logging: true,
        }
    }
}

impl ServerConfig {
    /// Bind address as a string suitable for a TCP listener
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

/// Probe log and notification sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Append-only probe log path; None disables the log sink
    pub log_file: Option<PathBuf>,

    /// Webhook endpoint for transition alerts; None disables notification
    pub webhook_url: Option<String>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            log_file: Some(PathBuf::from("logs.txt")),
            webhook_url: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let poll_interval_secs = std::env::var("VIGIL_POLL_INTERVAL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);

        let probe_timeout_secs = std::env::var("VIGIL_PROBE_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5);

        let startup_sites = std::env::var("VIGIL_SITES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let host = std::env::var("VIGIL_HOST").unwrap_or_else(|_| String::from("0.0.0.0"));

        let port = std::env::var("VIGIL_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);

        let log_file = match std::env::var("VIGIL_LOG_FILE") {
            Ok(v) if v.is_empty() => None,
            Ok(v) => Some(PathBuf::from(v)),
            Err(_) => Some(PathBuf::from("logs.txt")),
        };

        let webhook_url = std::env::var("VIGIL_WEBHOOK_URL").ok().filter(|v| !v.is_empty());

        let level = std::env::var("VIGIL_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));
        let format = std::env::var("VIGIL_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            monitor: MonitorConfig {
                poll_interval_secs,
                probe_timeout_secs,
                startup_sites,
            },
            server: ServerConfig {
                host,
                port,
                enable_cors: true,
                enable_request_logging: true,
            },
            logging: LoggingConfig { level, format },
            sinks: SinkConfig {
                log_file,
                webhook_url,
            },
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.monitor.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be greater than 0");
        }

        if self.monitor.probe_timeout_secs == 0 {
            anyhow::bail!("probe_timeout_secs must be greater than 0");
        }

        if let Some(url) = &self.sinks.webhook_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("webhook_url must start with http:// or https://");
            }
        }

        Ok(())
    }

    /// Get the poll interval as a Duration
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.monitor.poll_interval_secs)
    }

    /// Get the probe timeout as a Duration
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.monitor.probe_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.monitor.poll_interval_secs, 10);
        assert_eq!(config.monitor.probe_timeout_secs, 5);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.sinks.log_file, Some(PathBuf::from("logs.txt")));
    }

    #[test]
    fn test_zero_interval_is_invalid() {
        let mut config = Config::default();
        config.monitor.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_webhook_url_is_invalid() {
        let mut config = Config::default();
        config.sinks.webhook_url = Some(String::from("example.com/hook"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_helpers() {
        let config = Config::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_bind_address() {
        let config = Config::default();
        assert_eq!(config.server.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        for var in [
            "VIGIL_POLL_INTERVAL",
            "VIGIL_PROBE_TIMEOUT",
            "VIGIL_SITES",
            "VIGIL_HOST",
            "VIGIL_PORT",
            "PORT",
            "VIGIL_LOG_FILE",
            "VIGIL_WEBHOOK_URL",
        ] {
            std::env::remove_var(var);
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.monitor.poll_interval_secs, 10);
        assert_eq!(config.server.port, 3000);
        assert!(config.monitor.startup_sites.is_empty());
    }

    #[test]
    #[serial]
    fn test_from_env_port_override() {
        std::env::remove_var("VIGIL_PORT");
        std::env::set_var("PORT", "8123");

        let config = Config::from_env().unwrap();
        assert_eq!(config.server.port, 8123);

        std::env::remove_var("PORT");
    }

    #[test]
    #[serial]
    fn test_from_env_sites_list() {
        std::env::set_var("VIGIL_SITES", "example.com, https://foo.com ,");

        let config = Config::from_env().unwrap();
        assert_eq!(
            config.monitor.startup_sites,
            vec!["example.com".to_string(), "https://foo.com".to_string()]
        );

        std::env::remove_var("VIGIL_SITES");
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
            [monitor]
            poll_interval_secs = 30
            probe_timeout_secs = 8
            startup_sites = ["example.com"]

            [server]
            port = 8080

            [sinks]
            webhook_url = "https://hooks.example.com/alerts"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.monitor.poll_interval_secs, 30);
        assert_eq!(config.monitor.probe_timeout_secs, 8);
        assert_eq!(config.server.port, 8080);
        // Unspecified sections fall back to defaults
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.sinks.webhook_url.as_deref(),
            Some("https://hooks.example.com/alerts")
        );
    }
}
