//! Dashboard and API server
//!
//! Serves the HTML dashboard, the JSON API and the Prometheus metrics
//! endpoint over one axum router. The registry and the monitor are injected
//! explicitly; the server holds no monitoring state of its own.

pub mod api;
pub mod dashboard;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::registry::SiteRegistry;
use crate::scheduler::Monitor;

use api::create_router;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Site registry (snapshot source)
    pub registry: Arc<SiteRegistry>,

    /// Monitor, used to trigger immediate probes on registration
    pub monitor: Arc<Monitor>,

    /// Server start time
    pub start_time: Instant,
}

// ============================================================================
// Monitor Server
// ============================================================================

/// Dashboard/API server
pub struct MonitorServer {
    config: ServerConfig,
    state: AppState,
}

impl MonitorServer {
    /// Create a new server over the given registry and monitor
    pub fn new(config: ServerConfig, registry: Arc<SiteRegistry>, monitor: Arc<Monitor>) -> Self {
        let state = AppState {
            registry,
            monitor,
            start_time: Instant::now(),
        };

        Self { config, state }
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address();

        tracing::info!("Dashboard listening on http://{addr}");

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::BindError(e.to_string()))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Debug, Clone)]
pub enum ServerError {
    /// Failed to bind to address
    BindError(String),

    /// Server error
    ServeError(String),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BindError(msg) => write!(f, "Failed to bind: {}", msg),
            Self::ServeError(msg) => write!(f, "Server error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}
