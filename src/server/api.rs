//! REST API handlers for the dashboard server

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::metrics;
use crate::models::SiteSnapshot;

use super::dashboard;
use super::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Simple error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Snapshot of all monitored sites
#[derive(Debug, Serialize)]
pub struct SitesResponse {
    pub sites: Vec<SiteSnapshot>,
    pub total: usize,
}

/// Request to register a new site
#[derive(Debug, Deserialize)]
pub struct AddSiteRequest {
    pub url: String,
}

/// Response to a registration request
#[derive(Debug, Serialize)]
pub struct AddSiteResponse {
    pub url: String,
    pub created: bool,
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Dashboard
        .route("/", get(render_dashboard))
        // Health endpoint for platform liveness probing
        .route("/api/health", get(health_check))
        // Site endpoints
        .route("/api/sites", get(list_sites))
        .route("/api/sites", post(add_site))
        // Metrics
        .route("/metrics", get(export_metrics))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Render the HTML dashboard over the current snapshot
async fn render_dashboard(State(state): State<AppState>) -> axum::response::Response {
    let snapshot = state.registry.snapshot().await;

    match dashboard::render(&snapshot) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Dashboard render failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to render dashboard")),
            )
                .into_response()
        }
    }
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();

    Json(ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime,
    }))
}

/// List all monitored sites with their current stats
async fn list_sites(State(state): State<AppState>) -> impl IntoResponse {
    let sites = state.registry.snapshot().await;
    let total = sites.len();

    Json(ApiResponse::success(SitesResponse { sites, total }))
}

/// Register a site and trigger an immediate probe when newly created
async fn add_site(
    State(state): State<AppState>,
    Json(request): Json<AddSiteRequest>,
) -> axum::response::Response {
    match state.registry.register(&request.url).await {
        Ok(registration) => {
            if registration.created {
                metrics::set_registered_sites(state.registry.len().await);
                state.monitor.probe_now(registration.url.clone());
            }

            let status = if registration.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };

            (
                status,
                Json(ApiResponse::success(AddSiteResponse {
                    url: registration.url,
                    created: registration.created,
                })),
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

/// Export Prometheus metrics in text format
async fn export_metrics() -> axum::response::Response {
    match metrics::encode_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Metrics encoding failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to encode metrics")),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
