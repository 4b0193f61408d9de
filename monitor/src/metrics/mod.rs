//! Metrics state for the upgrade monitor.
//!
//! This module defines the Prometheus gauges that mirror the latest
//! successful [`crate::snapshot::Snapshot`]. They live for the whole process
//! and are never marked stale: a scrape after a failed poll still reports the
//! previous cycle's values.
//!
//! Typical usage:
//!
//! ```ignore
//! use std::sync::Arc;
//! use upgrade_monitor::metrics::MetricsRegistry;
//!
//! let registry = Arc::new(MetricsRegistry::new()?);
//!
//! // Poll loop:
//! registry.apply_snapshot(&snapshot);
//!
//! // `/metrics` handler:
//! let body = registry.gather_text();
//! ```

pub mod prometheus;

pub use self::prometheus::{MetricsRegistry, TEXT_CONTENT_TYPE, UpgradeMetrics};
