//! Upgrade monitor library crate.
//!
//! This crate provides the polling pipeline that watches a consensus node's
//! upgrade signalling:
//!
//! - endpoint address resolution and transport selection (`address`),
//! - signal query clients over gRPC (`client`, `proto`),
//! - the immutable upgrade snapshot and its builder (`snapshot`),
//! - Prometheus gauges mirroring the latest snapshot (`metrics`),
//! - the background poll loop (`poller`),
//! - and a top-level configuration (`config`).
//!
//! The `upgrade-gateway` binary composes these pieces behind an HTTP facade.

pub mod address;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod poller;
pub mod proto;
pub mod snapshot;

pub use address::EndpointAddress;
pub use client::{GrpcConnector, SignalConnector, SignalQuery, fetch_snapshot};
pub use config::{
    DEFAULT_POLL_INTERVAL, DEFAULT_QUERY_TIMEOUT, DEFAULT_REQUIRED_THRESHOLD, MonitorConfig,
};
pub use error::MonitorError;
pub use metrics::{MetricsRegistry, UpgradeMetrics};
pub use poller::Poller;
pub use snapshot::{Snapshot, UpgradePlan, VoteTally};
