//! HTTP route handlers.
//!
//! - `GET /health`: liveness,
//! - `GET /upgrade`: on-demand query cycle, JSON snapshot,
//! - `GET /metrics`: Prometheus text rendering of the poller's gauges.

pub mod health;
pub mod metrics;
pub mod upgrade;

use axum::{Router, routing::get};

use crate::state::SharedState;

/// Builds the gateway router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/upgrade", get(upgrade::upgrade))
        .route("/metrics", get(metrics::metrics))
        .with_state(state)
}
