//! Site registry: normalized URLs mapped to tracked per-site state
//!
//! The registry owns every [`SiteStats`] in the process. The map itself sits
//! behind a readers-writer lock for concurrent access from the scheduler
//! loop, the add-site API and the snapshot reader; each entry additionally
//! carries its own mutex so that overlapping probe cycles for the *same*
//! site serialize their updates without sites blocking one another.
//!
//! Insertion order is preserved so the dashboard renders deterministically.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use url::Url;

use crate::error::RegistryError;
use crate::models::{SiteSnapshot, SiteStats};

/// Handle to one site's stats, lockable independently of the registry map
pub type SiteEntry = Arc<Mutex<SiteStats>>;

/// Result of a registration attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Normalized URL the site is stored under
    pub url: String,

    /// Whether this call created the entry (false on duplicate re-add)
    pub created: bool,
}

/// Normalize raw user input into the canonical site URL
///
/// Trims surrounding whitespace and prepends `https://` when the value does
/// not already start with `http`. The result must parse as an absolute URL.
///
/// # Errors
///
/// Returns [`RegistryError::EmptyInput`] for blank input and
/// [`RegistryError::InvalidUrl`] when the normalized value is not a URL.
pub fn normalize_url(raw: &str) -> Result<String, RegistryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::EmptyInput);
    }

    let normalized = if trimmed.starts_with("http") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    // Validate without rewriting: the stored key stays exactly as built,
    // so "example.com" registers as "https://example.com" with no added "/"
    Url::parse(&normalized).map_err(|_| RegistryError::InvalidUrl(normalized.clone()))?;

    Ok(normalized)
}

struct RegistryInner {
    /// Entries keyed by normalized URL
    sites: HashMap<String, SiteEntry>,

    /// Registration order, for deterministic listing
    order: Vec<String>,
}

/// Registry of all monitored sites
pub struct SiteRegistry {
    inner: RwLock<RegistryInner>,
}

impl SiteRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner {
                sites: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }

    /// Register a site from raw input
    ///
    /// Idempotent: re-adding a known URL returns `created: false` and leaves
    /// the existing stats untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the input cannot be normalized.
    pub async fn register(&self, raw: &str) -> Result<Registration, RegistryError> {
        let url = normalize_url(raw)?;

        let mut inner = self.inner.write().await;
        if inner.sites.contains_key(&url) {
            return Ok(Registration {
                url,
                created: false,
            });
        }

        inner
            .sites
            .insert(url.clone(), Arc::new(Mutex::new(SiteStats::new())));
        inner.order.push(url.clone());

        tracing::info!(url = %url, "Site registered");

        Ok(Registration { url, created: true })
    }

    /// List registered URLs in insertion order
    pub async fn list(&self) -> Vec<String> {
        self.inner.read().await.order.clone()
    }

    /// Look up the stats entry for a registered URL
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SiteNotFound`] for unknown URLs.
    pub async fn get(&self, url: &str) -> Result<SiteEntry, RegistryError> {
        self.inner
            .read()
            .await
            .sites
            .get(url)
            .cloned()
            .ok_or_else(|| RegistryError::SiteNotFound(url.to_string()))
    }

    /// Number of registered sites
    pub async fn len(&self) -> usize {
        self.inner.read().await.sites.len()
    }

    /// Whether no sites are registered
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.sites.is_empty()
    }

    /// Produce a read-only view of all sites in insertion order
    ///
    /// Each row is read under its site's update lock, so its fields always
    /// come from the same update. Rows of one snapshot may reflect different
    /// instants; cross-site consistency is not a goal.
    pub async fn snapshot(&self) -> Vec<SiteSnapshot> {
        let inner = self.inner.read().await;

        let mut rows = Vec::with_capacity(inner.order.len());
        for url in &inner.order {
            if let Some(entry) = inner.sites.get(url) {
                let stats = entry.lock().await;
                rows.push(SiteSnapshot::from_stats(url.clone(), &stats));
            }
        }
        rows
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SiteStatus;

    #[test]
    fn test_normalize_adds_scheme() {
        assert_eq!(normalize_url("example.com").unwrap(), "https://example.com");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize_url("  https://foo.com  ").unwrap(),
            "https://foo.com"
        );
    }

    #[test]
    fn test_normalize_keeps_http_scheme() {
        assert_eq!(
            normalize_url("http://insecure.example").unwrap(),
            "http://insecure.example"
        );
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(matches!(normalize_url("   "), Err(RegistryError::EmptyInput)));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize_url("not a url at all"),
            Err(RegistryError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_register_creates_fresh_stats() {
        let registry = SiteRegistry::new();
        let reg = registry.register("example.com").await.unwrap();

        assert!(reg.created);
        assert_eq!(reg.url, "https://example.com");

        let entry = registry.get("https://example.com").await.unwrap();
        let stats = entry.lock().await;
        assert_eq!(stats.total_checks, 0);
        assert_eq!(stats.status, SiteStatus::Unknown);
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let registry = SiteRegistry::new();
        registry.register("example.com").await.unwrap();

        // Mutate stats so we can verify they survive the duplicate add
        {
            let entry = registry.get("https://example.com").await.unwrap();
            let mut stats = entry.lock().await;
            stats.total_checks = 7;
            stats.status = SiteStatus::Up;
        }

        let reg = registry.register(" example.com ").await.unwrap();
        assert!(!reg.created);
        assert_eq!(registry.len().await, 1);

        let entry = registry.get("https://example.com").await.unwrap();
        let stats = entry.lock().await;
        assert_eq!(stats.total_checks, 7);
        assert_eq!(stats.status, SiteStatus::Up);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let registry = SiteRegistry::new();
        registry.register("b.example").await.unwrap();
        registry.register("a.example").await.unwrap();
        registry.register("c.example").await.unwrap();

        assert_eq!(
            registry.list().await,
            vec![
                "https://b.example".to_string(),
                "https://a.example".to_string(),
                "https://c.example".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_unknown_site_fails() {
        let registry = SiteRegistry::new();
        let result = registry.get("https://nope.example").await;
        assert!(matches!(result, Err(RegistryError::SiteNotFound(_))));
    }

    #[tokio::test]
    async fn test_snapshot_reflects_stats() {
        let registry = SiteRegistry::new();
        registry.register("one.example").await.unwrap();
        registry.register("two.example").await.unwrap();

        {
            let entry = registry.get("https://one.example").await.unwrap();
            let mut stats = entry.lock().await;
            stats.total_checks = 4;
            stats.failures = 1;
            stats.status = SiteStatus::Up;
            stats.last_latency_ms = Some(33);
        }

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].url, "https://one.example");
        assert_eq!(snapshot[0].uptime_percent, 75.00);
        assert_eq!(snapshot[0].last_latency_ms, Some(33));
        assert_eq!(snapshot[1].status, SiteStatus::Unknown);
        assert_eq!(snapshot[1].total_checks, 0);
    }
}
