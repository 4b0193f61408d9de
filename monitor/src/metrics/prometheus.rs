//! Prometheus-backed upgrade gauges.
//!
//! This module defines a [`MetricsRegistry`] that owns a Prometheus
//! registry and the six upgrade gauges. The poll loop writes them through
//! [`MetricsRegistry::apply_snapshot`]; the HTTP facade reads them through
//! [`MetricsRegistry::gather_text`].

use prometheus::{self, Encoder, Gauge, Opts, Registry, TextEncoder};

use crate::snapshot::Snapshot;

/// Content type of the Prometheus text exposition format.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Gauges describing the latest upgrade snapshot.
///
/// Each gauge is individually atomic; no lock spans the set, so a scrape
/// racing an update may observe a mix of old and new values.
#[derive(Clone)]
pub struct UpgradeMetrics {
    /// 1 if an upgrade height is scheduled, 0 otherwise.
    pub upgrade_status: Gauge,
    /// App version of the pending upgrade.
    pub upgrade_version: Gauge,
    /// Height at which the pending upgrade activates.
    pub upgrade_height: Gauge,
    /// Voting power that has signalled for the upgrade.
    pub tally_threshold_power: Gauge,
    /// Total eligible voting power.
    pub tally_total_voting_power: Gauge,
    /// Signalled fraction of voting power (0..1).
    pub tally_threshold_percent: Gauge,
}

impl UpgradeMetrics {
    /// Registers upgrade gauges into the given `Registry`.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let upgrade_status = gauge(
            registry,
            "upgrade_status",
            "Upgrade status as reported by the signal service: 1 if an upgrade height is scheduled, 0 otherwise",
        )?;
        let upgrade_version = gauge(registry, "upgrade_version", "Current upgrade version")?;
        let upgrade_height = gauge(
            registry,
            "upgrade_height",
            "Height at which the upgrade will take place",
        )?;
        let tally_threshold_power = gauge(
            registry,
            "tally_threshold_power",
            "Voting power that has signalled for the upgrade",
        )?;
        let tally_total_voting_power = gauge(
            registry,
            "tally_total_voting_power",
            "Total voting power eligible to signal",
        )?;
        let tally_threshold_percent = gauge(
            registry,
            "tally_threshold_percent",
            "Signalled voting power over total voting power (0..1)",
        )?;

        Ok(Self {
            upgrade_status,
            upgrade_version,
            upgrade_height,
            tally_threshold_power,
            tally_total_voting_power,
            tally_threshold_percent,
        })
    }

    /// Overwrites every gauge from `snapshot`.
    pub fn apply(&self, snapshot: &Snapshot) {
        let status = if snapshot.plan.is_scheduled() { 1.0 } else { 0.0 };
        self.upgrade_status.set(status);
        self.upgrade_version.set(snapshot.plan.app_version as f64);
        self.upgrade_height.set(snapshot.plan.upgrade_height as f64);
        self.tally_threshold_power
            .set(snapshot.tally.threshold_power as f64);
        self.tally_total_voting_power
            .set(snapshot.tally.total_voting_power as f64);
        self.tally_threshold_percent
            .set(snapshot.tally.threshold_percent);
    }
}

fn gauge(registry: &Registry, name: &str, help: &str) -> Result<Gauge, prometheus::Error> {
    let gauge = Gauge::with_opts(Opts::new(name, help))?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

/// Wrapper around a Prometheus registry and the upgrade gauges.
///
/// This is the handle shared (behind an [`std::sync::Arc`]) by the poll loop
/// and the HTTP facade.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,
    pub upgrade: UpgradeMetrics,
}

impl MetricsRegistry {
    /// Creates a registry whose metric names are prefixed with `celestia_`.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("celestia".to_string()), None)?;
        let upgrade = UpgradeMetrics::register(&registry)?;
        Ok(Self { registry, upgrade })
    }

    /// Publishes `snapshot`. This is the only mutation path for the gauges.
    pub fn apply_snapshot(&self, snapshot: &Snapshot) {
        self.upgrade.apply(snapshot);
    }

    /// Encodes all metrics in this registry into the Prometheus text format.
    pub fn gather_text(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("failed to encode Prometheus metrics: {e}");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{UpgradePlan, VoteTally};

    fn snapshot(app_version: u64, upgrade_height: i64, total: i64, threshold: i64) -> Snapshot {
        Snapshot {
            plan: UpgradePlan {
                app_version,
                upgrade_height,
            },
            tally: VoteTally::new(total, threshold),
        }
    }

    fn values(m: &UpgradeMetrics) -> [f64; 6] {
        [
            m.upgrade_status.get(),
            m.upgrade_version.get(),
            m.upgrade_height.get(),
            m.tally_threshold_power.get(),
            m.tally_total_voting_power.get(),
            m.tally_threshold_percent.get(),
        ]
    }

    #[test]
    fn upgrade_metrics_register_and_apply() {
        let registry = Registry::new();
        let metrics = UpgradeMetrics::register(&registry).expect("register metrics");

        metrics.apply(&snapshot(4, 500_000, 1000, 800));

        assert_eq!(values(&metrics), [1.0, 4.0, 500_000.0, 800.0, 1000.0, 0.8]);
        assert_eq!(registry.gather().len(), 6);
    }

    #[test]
    fn status_follows_upgrade_height() {
        let registry = MetricsRegistry::new().expect("create metrics registry");

        for (height, status) in [(0, 0.0), (1, 1.0), (42, 1.0), (i64::MAX, 1.0), (-5, 0.0)] {
            registry.apply_snapshot(&snapshot(2, height, 10, 1));
            assert_eq!(registry.upgrade.upgrade_status.get(), status, "height {height}");
        }
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let registry = MetricsRegistry::new().expect("create metrics registry");
        let snap = snapshot(5, 900, 300, 100);

        registry.apply_snapshot(&snap);
        let once = values(&registry.upgrade);
        let text_once = registry.gather_text();

        registry.apply_snapshot(&snap);
        assert_eq!(values(&registry.upgrade), once);
        assert_eq!(registry.gather_text(), text_once);
    }

    #[test]
    fn gather_text_lists_prefixed_gauges() {
        let registry = MetricsRegistry::new().expect("create metrics registry");
        let text = registry.gather_text();

        for name in [
            "celestia_upgrade_status 0",
            "celestia_upgrade_version 0",
            "celestia_upgrade_height 0",
            "celestia_tally_threshold_power 0",
            "celestia_tally_total_voting_power 0",
            "celestia_tally_threshold_percent 0",
        ] {
            assert!(text.contains(name), "missing {name:?} in:\n{text}");
        }
        assert!(text.contains("# TYPE celestia_upgrade_status gauge"));
    }

    #[test]
    fn zero_total_power_exports_nan() {
        let registry = MetricsRegistry::new().expect("create metrics registry");
        registry.apply_snapshot(&snapshot(3, 0, 0, 0));
        assert!(registry.upgrade.tally_threshold_percent.get().is_nan());
        assert!(registry.gather_text().contains("celestia_tally_threshold_percent NaN"));
    }
}
