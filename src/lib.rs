//! Prometheus HTTP Service Discovery
//!
//! A dynamic target registry exposed over HTTP. Clients register and
//! deregister groups of scrape targets; Prometheus polls `GET /targets`
//! through its `http_sd_configs` to learn the current set.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       REST API (axum)                        │
//! │   GET/POST/DELETE /targets   DELETE /targets/all   /metrics  │
//! ├──────────────────────────────────────────────────────────────┤
//! │                 Bearer token middleware                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │                     Target Registry                          │
//! │     (single mutex, dedup on insert, first-match removal)     │
//! ├──────────────────────────────────────────────────────────────┤
//! │                Target Group (value type)                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`targets`]: Target group value type and wire format
//! - [`registry`]: Concurrent target registry and its events
//! - [`api`]: REST routes, authentication and the server
//! - [`metrics`]: Self-metrics of the service
//! - [`generator`]: Static targets file generation
//! - [`error`]: Error types and handling

pub mod api;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod registry;
pub mod targets;

// Re-export commonly used types
pub use api::{ApiKey, ApiServer, ApiServerConfig, RestRouter};
pub use error::{Error, Result};
pub use generator::{generate_targets, write_targets_file};
pub use metrics::SdMetrics;
pub use registry::{RegistryEvent, TargetRegistry};
pub use targets::{TargetGroup, TargetList};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
