//! Upgrade snapshot data model and builder.
//!
//! A [`Snapshot`] is the unit of output of one query cycle: the pending
//! upgrade plan plus the current vote tally, taken from the two responses of
//! the signal query service. It is built fresh on every successful cycle and
//! never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::proto::{QueryGetUpgradeResponse, QueryVersionTallyResponse};

/// Next planned application version and its activation height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradePlan {
    pub app_version: u64,
    /// Activation height, `0` when no upgrade is scheduled.
    pub upgrade_height: i64,
}

impl UpgradePlan {
    /// Returns `true` if an upgrade height has been scheduled.
    pub fn is_scheduled(&self) -> bool {
        self.upgrade_height > 0
    }
}

/// Stake-weighted signalling tally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    pub total_voting_power: i64,
    pub threshold_power: i64,
    /// `threshold_power / total_voting_power`, non-finite when the total is 0.
    pub threshold_percent: f64,
}

impl VoteTally {
    pub fn new(total_voting_power: i64, threshold_power: i64) -> Self {
        Self {
            total_voting_power,
            threshold_power,
            threshold_percent: threshold_power as f64 / total_voting_power as f64,
        }
    }
}

/// One consistent view of the upgrade plan and the vote tally.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub plan: UpgradePlan,
    pub tally: VoteTally,
}

impl Snapshot {
    /// Builds a snapshot from the two raw query responses.
    ///
    /// A missing upgrade message maps to an unscheduled plan at version 0.
    pub fn from_responses(
        upgrade: &QueryGetUpgradeResponse,
        tally: &QueryVersionTallyResponse,
    ) -> Self {
        let plan = upgrade
            .upgrade
            .as_ref()
            .map(|u| UpgradePlan {
                app_version: u.app_version,
                upgrade_height: u.upgrade_height,
            })
            .unwrap_or_default();

        Self {
            plan,
            tally: VoteTally::new(
                saturating_i64(tally.total_voting_power),
                saturating_i64(tally.threshold_power),
            ),
        }
    }
}

fn saturating_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
