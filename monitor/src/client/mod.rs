//! Clients for the remote signal query service.
//!
//! The pipeline talks to the node through two small traits:
//!
//! - [`SignalConnector`] opens a connection for one query cycle,
//! - [`SignalQuery`] issues the two read-only queries on that connection.
//!
//! [`grpc::GrpcConnector`] is the production implementation; tests plug in
//! in-process fakes. [`fetch_snapshot`] runs one full cycle on top of them.

pub mod grpc;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::MonitorError;
use crate::proto::{QueryGetUpgradeResponse, QueryVersionTallyResponse};
use crate::snapshot::Snapshot;

pub use grpc::GrpcConnector;

/// Read-only queries against a live connection.
#[async_trait]
pub trait SignalQuery: Send {
    /// Returns the currently signalled upgrade plan.
    async fn get_upgrade(&mut self) -> Result<QueryGetUpgradeResponse, MonitorError>;

    /// Returns the current signalling tally.
    async fn version_tally(&mut self) -> Result<QueryVersionTallyResponse, MonitorError>;
}

/// Factory for per-cycle connections.
///
/// Each call to [`SignalConnector::connect`] yields an independent
/// connection; it is closed when the returned box is dropped.
#[async_trait]
pub trait SignalConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn SignalQuery>, MonitorError>;
}

/// Runs one query cycle and builds a [`Snapshot`].
///
/// Connection setup and each query are individually bounded by `timeout`.
/// The plan query runs before the tally query; if either fails nothing is
/// returned, so callers never see a partial snapshot. The connection is
/// dropped on every exit path.
pub async fn fetch_snapshot(
    connector: &dyn SignalConnector,
    timeout: Duration,
) -> Result<Snapshot, MonitorError> {
    let mut conn = bounded("connect", timeout, connector.connect()).await?;

    let upgrade = bounded("GetUpgrade", timeout, conn.get_upgrade()).await?;
    let tally = bounded("VersionTally", timeout, conn.version_tally()).await?;

    Ok(Snapshot::from_responses(&upgrade, &tally))
}

async fn bounded<T, F>(
    operation: &'static str,
    timeout: Duration,
    fut: F,
) -> Result<T, MonitorError>
where
    F: Future<Output = Result<T, MonitorError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(res) => res,
        Err(_) => Err(MonitorError::Timeout {
            operation,
            timeout_ms: timeout.as_millis(),
        }),
    }
}
