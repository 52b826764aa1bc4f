//! Service Metrics
//!
//! Prometheus metrics describing the discovery service itself, exposed on
//! `/metrics` next to the discovery endpoint.

use crate::error::Result;
use crate::registry::TargetRegistry;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Metrics for the discovery service, held in a dedicated registry
#[derive(Clone)]
pub struct SdMetrics {
    registry: Registry,
    /// Current number of registered target groups
    pub targets: IntGauge,
    /// Target groups appended since start
    pub targets_added: IntCounter,
    /// Target groups removed since start
    pub targets_removed: IntCounter,
    /// API requests by operation and status code
    pub requests: IntCounterVec,
    /// Requests rejected for a missing or wrong bearer token
    pub unauthorized: IntCounter,
}

impl SdMetrics {
    /// Create and register all metrics
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let targets = IntGauge::new("http_sd_targets", "Number of registered target groups")?;
        let targets_added = IntCounter::new(
            "http_sd_targets_added_total",
            "Total number of target groups added",
        )?;
        let targets_removed = IntCounter::new(
            "http_sd_targets_removed_total",
            "Total number of target groups removed",
        )?;
        let requests = IntCounterVec::new(
            Opts::new("http_sd_requests_total", "API requests by operation and status"),
            &["operation", "status"],
        )?;
        let unauthorized = IntCounter::new(
            "http_sd_unauthorized_total",
            "Requests rejected for a missing or invalid bearer token",
        )?;

        registry.register(Box::new(targets.clone()))?;
        registry.register(Box::new(targets_added.clone()))?;
        registry.register(Box::new(targets_removed.clone()))?;
        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(unauthorized.clone()))?;

        Ok(Self {
            registry,
            targets,
            targets_added,
            targets_removed,
            requests,
            unauthorized,
        })
    }

    /// Count one API request
    pub fn observe_request(&self, operation: &str, status: u16) {
        let status = status.to_string();
        self.requests
            .with_label_values(&[operation, status.as_str()])
            .inc();
    }

    /// Record an insert that appended `added` groups
    pub fn record_added(&self, added: usize) {
        self.targets_added.inc_by(added as u64);
    }

    /// Record a removal that dropped `removed` groups
    pub fn record_removed(&self, removed: usize) {
        self.targets_removed.inc_by(removed as u64);
    }

    /// Sync the size gauge with the registry, called right before a scrape
    pub fn refresh(&self, registry: &TargetRegistry) {
        self.targets.set(registry.len() as i64);
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> Result<(String, Vec<u8>)> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok((encoder.format_type().to_string(), buffer))
    }
}

impl std::fmt::Debug for SdMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdMetrics")
            .field("targets", &self.targets.get())
            .finish()
    }
}
