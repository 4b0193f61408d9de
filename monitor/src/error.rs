//! Error taxonomy for the monitor pipeline.

use thiserror::Error;

/// Errors produced while configuring or running a query cycle.
///
/// `Configuration` is fatal at startup. The other variants abort a single
/// cycle: the poll loop logs them and waits for the next tick, the HTTP
/// facade turns them into a `500`.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Invalid endpoint address or other startup parameter.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The remote node could not be reached.
    #[error("connection error: {0}")]
    Connection(String),
    /// A remote call exceeded its per-call bound.
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u128,
    },
    /// The remote node answered with an application-level failure.
    #[error("{operation} failed: {message}")]
    RemoteQuery {
        operation: &'static str,
        message: String,
    },
}

impl MonitorError {
    /// Returns `true` for errors that only affect one query cycle.
    pub fn is_transient(&self) -> bool {
        !matches!(self, MonitorError::Configuration(_))
    }
}
