//! Top-level configuration for the upgrade monitor.
//!
//! This module aggregates configuration for:
//!
//! - the remote signal query endpoint (`EndpointAddress`),
//! - the per-call query timeout,
//! - the poll loop interval.
//!
//! Binaries build a `MonitorConfig` from their command line; tests usually
//! start from [`MonitorConfig::from_address`] and override fields.

use std::time::Duration;

use crate::address::EndpointAddress;
use crate::error::MonitorError;

/// Default bound on each remote query call.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default interval between two poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Fraction of voting power the network needs to signal before an upgrade
/// can be scheduled. Only used for reporting.
pub const DEFAULT_REQUIRED_THRESHOLD: f64 = 0.80;

/// Configuration for the polling pipeline.
#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Remote signal query service.
    pub endpoint: EndpointAddress,
    /// Timeout applied to each of the two queries in a cycle.
    pub query_timeout: Duration,
    /// Delay between the end of one poll cycle and the start of the next.
    pub poll_interval: Duration,
    /// Signalling threshold reported next to the tally in logs.
    pub required_threshold: f64,
}

impl MonitorConfig {
    /// Resolves `raw_addr` and fills the remaining fields with defaults.
    pub fn from_address(raw_addr: &str) -> Result<Self, MonitorError> {
        Ok(Self {
            endpoint: EndpointAddress::resolve(raw_addr)?,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            required_threshold: DEFAULT_REQUIRED_THRESHOLD,
        })
    }
}
