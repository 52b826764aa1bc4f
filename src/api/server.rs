//! HTTP Service Discovery Server
//!
//! Binds the REST router, applies the transport layers and serves until a
//! shutdown signal arrives.

use crate::error::{Error, Result};
use crate::metrics::SdMetrics;
use crate::registry::TargetRegistry;
use axum::extract::DefaultBodyLimit;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use super::auth::ApiKey;
use super::rest::RestRouter;

// =============================================================================
// Server Configuration
// =============================================================================

/// Configuration for the API server
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// REST API bind address
    pub listen_addr: SocketAddr,
    /// Shared secret clients present as a bearer token
    pub api_key: ApiKey,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Max request body size
    pub max_body_size: usize,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            api_key: ApiKey::new(""),
            request_timeout_secs: 30,
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl ApiServerConfig {
    /// Build a config from a host/port pair and key
    pub fn new(host: &str, port: u16, api_key: ApiKey) -> Result<Self> {
        let ip = host
            .parse::<IpAddr>()
            .map_err(|e| Error::Configuration(format!("Invalid host {}: {}", host, e)))?;
        Ok(Self {
            listen_addr: SocketAddr::new(ip, port),
            api_key,
            ..Default::default()
        })
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::Configuration("API key must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Configuration(
                "Request timeout must be at least one second".into(),
            ));
        }
        if self.max_body_size == 0 {
            return Err(Error::Configuration("Max body size must be non-zero".into()));
        }
        Ok(())
    }
}

// =============================================================================
// API Server
// =============================================================================

/// Serves the discovery and management API
pub struct ApiServer {
    config: ApiServerConfig,
    registry: Arc<TargetRegistry>,
    metrics: SdMetrics,
    shutdown_tx: broadcast::Sender<()>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiServerConfig, registry: Arc<TargetRegistry>, metrics: SdMetrics) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            registry,
            metrics,
            shutdown_tx,
        }
    }

    /// Build the full application with transport layers applied
    pub fn app(&self) -> axum::Router {
        RestRouter::new(
            self.registry.clone(),
            self.metrics.clone(),
            self.config.api_key.clone(),
        )
        .build()
        .layer(DefaultBodyLimit::max(self.config.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(
            self.config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
    }

    /// Run the API server until shutdown is triggered
    pub async fn run(&self) -> Result<()> {
        self.config.validate()?;

        let listener = tokio::net::TcpListener::bind(self.config.listen_addr)
            .await
            .map_err(|e| Error::Internal(format!("Failed to bind REST server: {}", e)))?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(&self, listener: tokio::net::TcpListener) -> Result<()> {
        let app = self.app();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        info!("REST API listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("REST server shutting down");
            })
            .await
            .map_err(|e| Error::Internal(format!("REST server error: {}", e)))?;

        Ok(())
    }

    /// Trigger graceful shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Handle that triggers shutdown from another task
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }
}
