//! Prometheus HTTP Service Discovery Server
//!
//! Serves a dynamic target list to Prometheus `http_sd_configs`:
//!
//! ```yaml
//! scrape_configs:
//!   - job_name: 'http_sd_targets'
//!     http_sd_configs:
//!       - url: http://localhost:8000/targets
//!         refresh_interval: 30s
//!         authorization:
//!           type: Bearer
//!           credentials: your_secret_key
//! ```

use clap::Parser;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

use prometheus_http_sd::{
    ApiKey, ApiServer, ApiServerConfig, Error, RegistryEvent, Result, SdMetrics, TargetRegistry,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Prometheus HTTP Service Discovery Server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// API key clients must send as a bearer token
    #[arg(long, env = "HTTP_SD_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Host to bind the server to
    #[arg(long, env = "HTTP_SD_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind the server to
    #[arg(long, env = "HTTP_SD_PORT", default_value = "8000")]
    port: u16,

    /// Request timeout in seconds
    #[arg(long, env = "HTTP_SD_REQUEST_TIMEOUT", default_value = "30")]
    request_timeout_secs: u64,

    /// Max request body size in bytes
    #[arg(long, env = "HTTP_SD_MAX_BODY_SIZE", default_value = "10485760")]
    max_body_size: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args)?;

    info!("Starting Prometheus HTTP Service Discovery");
    info!("  Version: {}", prometheus_http_sd::VERSION);

    let mut config = ApiServerConfig::new(&args.host, args.port, ApiKey::new(args.api_key.clone()))?;
    config.request_timeout_secs = args.request_timeout_secs;
    config.max_body_size = args.max_body_size;
    config.validate()?;

    info!("Starting server on {}:{}", args.host, args.port);

    // Owned here for the process lifetime and injected into the API layer
    let registry = TargetRegistry::new();
    let metrics = SdMetrics::new()?;

    tokio::spawn(log_registry_events(registry.subscribe()));

    let server = ApiServer::new(config, registry, metrics);

    let shutdown = server.shutdown_handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        let _ = shutdown.send(());
    });

    server.run().await?;

    info!("Server shutdown complete");
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let directive = |s: &str| -> Result<Directive> {
        s.parse::<Directive>()
            .map_err(|e| Error::Configuration(format!("Invalid log directive {}: {}", s, e)))
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive(directive("hyper=warn")?)
        .add_directive(directive("tower=warn")?)
        .add_directive(directive("axum=info")?);

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }

    Ok(())
}

// =============================================================================
// Background Tasks
// =============================================================================

async fn log_registry_events(mut events: broadcast::Receiver<RegistryEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => debug!(
                event = %event,
                count = event.count(),
                total = event.total(),
                "Registry changed"
            ),
            Err(RecvError::Lagged(skipped)) => warn!("Registry event log lagged by {} events", skipped),
            Err(RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
