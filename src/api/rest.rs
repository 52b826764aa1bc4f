//! REST API Handlers
//!
//! Implements the Prometheus HTTP service discovery endpoint and the
//! management endpoints clients use to register and deregister targets.
//!
//! | Method | Path           | Operation                      |
//! |--------|----------------|--------------------------------|
//! | GET    | `/targets`     | current target groups          |
//! | POST   | `/targets`     | add groups (201)               |
//! | DELETE | `/targets`     | remove matching groups         |
//! | DELETE | `/targets/all` | remove every group             |
//! | GET    | `/metrics`     | service metrics                |
//! | GET    | `/healthz`     | liveness, no auth              |

use super::auth::{require_bearer, ApiKey};
use crate::error::Error;
use crate::metrics::SdMetrics;
use crate::registry::TargetRegistry;
use crate::targets::{TargetGroup, TargetList};
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Header Prometheus sends with its configured refresh interval
pub const REFRESH_INTERVAL_HEADER: &str = "X-Prometheus-Refresh-Interval-Seconds";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Confirmation returned by mutating endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// =============================================================================
// REST Router
// =============================================================================

/// REST API router builder
pub struct RestRouter {
    registry: Arc<TargetRegistry>,
    metrics: SdMetrics,
    api_key: ApiKey,
}

impl RestRouter {
    /// Create a new REST router
    pub fn new(registry: Arc<TargetRegistry>, metrics: SdMetrics, api_key: ApiKey) -> Self {
        Self {
            registry,
            metrics,
            api_key,
        }
    }

    /// Build the Axum router
    pub fn build(self) -> Router {
        let state = AppState {
            registry: self.registry,
            metrics: self.metrics,
            api_key: self.api_key,
        };

        let discovery = Router::new()
            .route(
                "/targets",
                get(get_targets).post(add_targets).delete(remove_targets),
            )
            .route("/targets/all", delete(remove_all_targets))
            .route("/metrics", get(metrics_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

        Router::new()
            .merge(discovery)
            .route("/healthz", get(health_check))
            .with_state(state)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub(crate) registry: Arc<TargetRegistry>,
    pub(crate) metrics: SdMetrics,
    pub(crate) api_key: ApiKey,
}

// =============================================================================
// Handlers
// =============================================================================

/// Serve every registered target group to Prometheus
async fn get_targets(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(interval) = headers
        .get(REFRESH_INTERVAL_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        info!("Prometheus refresh interval: {} seconds", interval);
    }

    let groups: Vec<TargetGroup> = state.registry.snapshot();
    debug!(groups = groups.len(), "Serving target groups");
    state.metrics.observe_request("list", StatusCode::OK.as_u16());

    (StatusCode::OK, Json(groups))
}

/// Register target groups
async fn add_targets(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TargetList>, JsonRejection>,
) -> Response {
    let Json(list) = match payload {
        Ok(list) => list,
        Err(rejection) => return reject_body(&state, "insert", rejection),
    };

    let requested = list.len();
    let added = state.registry.insert(list.targets);
    state.metrics.record_added(added);
    state.metrics.observe_request("insert", StatusCode::CREATED.as_u16());

    info!(requested, added, "Added {} targets", added);
    (
        StatusCode::CREATED,
        Json(MessageResponse::new(format!("Added {} targets", added))),
    )
        .into_response()
}

/// Deregister specific target groups
async fn remove_targets(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TargetList>, JsonRejection>,
) -> Response {
    let Json(list) = match payload {
        Ok(list) => list,
        Err(rejection) => return reject_body(&state, "remove", rejection),
    };

    let removed = state.registry.remove(&list.targets);
    state.metrics.record_removed(removed);
    state.metrics.observe_request("remove", StatusCode::OK.as_u16());

    info!(requested = list.len(), removed, "Removed {} targets", removed);
    (
        StatusCode::OK,
        Json(MessageResponse::new(format!("Removed {} targets", removed))),
    )
        .into_response()
}

/// Deregister every target group
async fn remove_all_targets(State(state): State<AppState>) -> impl IntoResponse {
    let removed = state.registry.remove_all();
    state.metrics.record_removed(removed);
    state.metrics.observe_request("remove_all", StatusCode::OK.as_u16());

    info!("Removed all {} targets", removed);
    (
        StatusCode::OK,
        Json(MessageResponse::new(format!("Removed all {} targets", removed))),
    )
}

/// Health check
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Prometheus exposition of the service's own metrics
async fn metrics_handler(State(state): State<AppState>) -> Response {
    state.metrics.refresh(&state.registry);

    match state.metrics.render() {
        Ok((content_type, body)) => {
            (StatusCode::OK, [(CONTENT_TYPE, content_type)], body).into_response()
        }
        Err(e) => {
            error!("Metrics encoding failed: {}", e);
            (
                e.status_code(),
                Json(ApiErrorResponse {
                    error: e.code().into(),
                    message: e.to_string(),
                    details: None,
                }),
            )
                .into_response()
        }
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Turn a body decoding failure into a client error without touching the registry
fn reject_body(state: &AppState, operation: &str, rejection: JsonRejection) -> Response {
    let status = rejection.status();
    let err = Error::ApiValidation(rejection.body_text());
    warn!(operation, status = status.as_u16(), "Rejected request body: {}", err);
    state.metrics.observe_request(operation, status.as_u16());

    (
        status,
        Json(ApiErrorResponse {
            error: err.code().into(),
            message: "Request body must be {\"targets\": [{\"targets\": [...], \"labels\": {...}}]}"
                .into(),
            details: Some(err.to_string()),
        }),
    )
        .into_response()
}
