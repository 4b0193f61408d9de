//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use upgrade_monitor::{MetricsRegistry, SignalConnector};

/// Shared state held by the HTTP handlers.
///
/// This is wrapped in an [`Arc`] and passed to request handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Opens a fresh connection for every on-demand `/upgrade` request.
    pub connector: Arc<dyn SignalConnector>,
    /// Gauges written by the poller and rendered on `/metrics`.
    pub metrics: Arc<MetricsRegistry>,
    /// Per-call bound on remote queries.
    pub query_timeout: Duration,
}

/// Thread-safe alias for `AppState`.
pub type SharedState = Arc<AppState>;
