//! Unified error handling for the vigil crate
//!
//! Domain-specific errors live next to their modules; this module wraps them
//! into a single [`Error`] enum usable across module boundaries, plus the
//! crate-wide [`Result`] alias.

use std::io;
use thiserror::Error;

/// Errors raised by the site registry
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Input was empty after trimming
    #[error("Site URL is empty")]
    EmptyInput,

    /// Normalized input does not parse as an absolute URL
    #[error("Invalid site URL: {0}")]
    InvalidUrl(String),

    /// Lookup for a URL that was never registered
    #[error("Site not registered: {0}")]
    SiteNotFound(String),
}

/// Errors raised while constructing the prober
///
/// Probe execution itself never fails past the prober boundary: transport
/// errors are absorbed into `ProbeOutcome { ok: false, .. }`.
#[derive(Error, Debug)]
pub enum ProberError {
    /// HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Unified error type for the vigil crate
#[derive(Error, Debug)]
pub enum Error {
    /// Registry errors (registration, lookup)
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Prober construction errors
    #[error("Prober error: {0}")]
    Prober(#[from] ProberError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
