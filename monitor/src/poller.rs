//! Background poll loop.
//!
//! The [`Poller`] alternates between two states: idle (sleeping for the
//! configured interval) and polling (running one query cycle and, on
//! success, publishing the snapshot into the metrics registry). The sleep
//! starts only after a cycle has fully completed, so at most one cycle is in
//! flight at any time. Failures are logged and the loop carries on.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::{SignalConnector, fetch_snapshot};
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::metrics::MetricsRegistry;
use crate::snapshot::Snapshot;

/// Periodically refreshes the upgrade gauges.
pub struct Poller {
    connector: Arc<dyn SignalConnector>,
    metrics: Arc<MetricsRegistry>,
    query_timeout: Duration,
    interval: Duration,
    required_threshold: f64,
}

impl Poller {
    pub fn new(
        connector: Arc<dyn SignalConnector>,
        metrics: Arc<MetricsRegistry>,
        cfg: &MonitorConfig,
    ) -> Self {
        Self {
            connector,
            metrics,
            query_timeout: cfg.query_timeout,
            interval: cfg.poll_interval,
            required_threshold: cfg.required_threshold,
        }
    }

    /// Runs a single cycle: query, build, publish.
    ///
    /// Gauges are only touched when both queries succeeded.
    pub async fn poll_once(&self) -> Result<Snapshot, MonitorError> {
        tracing::info!("querying upgrade status for /metrics");
        let snapshot = fetch_snapshot(self.connector.as_ref(), self.query_timeout).await?;
        self.metrics.apply_snapshot(&snapshot);

        tracing::info!(
            app_version = snapshot.plan.app_version,
            upgrade_height = snapshot.plan.upgrade_height,
            scheduled = snapshot.plan.is_scheduled(),
            "upgrade metrics updated"
        );
        tracing::info!(
            "tally: {:.2}% of {} voting power signalled (required {:.0}%)",
            snapshot.tally.threshold_percent * 100.0,
            snapshot.tally.total_voting_power,
            self.required_threshold * 100.0,
        );

        Ok(snapshot)
    }

    /// Loops until `shutdown` is cancelled. The first cycle runs immediately.
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(
            "upgrade poller running with interval {}s",
            self.interval.as_secs()
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                res = self.poll_once() => {
                    if let Err(e) = res {
                        log_poll_failure(&e);
                    }
                }
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("upgrade poller stopped");
    }

    /// Spawns [`Poller::run`] onto the current Tokio runtime.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

/// Transient failures are expected noise; anything else points at a broken
/// setup that will fail on every tick.
fn log_poll_failure(err: &MonitorError) {
    if err.is_transient() {
        tracing::warn!("failed to refresh upgrade metrics: {err}");
    } else {
        tracing::error!("upgrade metrics cannot be refreshed: {err}");
    }
}
