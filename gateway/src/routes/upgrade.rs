use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use upgrade_monitor::{Snapshot, UpgradePlan, VoteTally, fetch_snapshot};

use crate::state::SharedState;

/// Response body for `GET /upgrade`.
///
/// ```json
/// {
///   "upgrade_data": { "upgrade": { "app_version": 4, "upgrade_height": 500000 } },
///   "tally_data": { "total_voting_power": 1000, "threshold_power": 800, "threshold_percent": 0.8 }
/// }
/// ```
///
/// A non-finite `threshold_percent` (zero total voting power) is written as
/// `null`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpgradeResponse {
    pub upgrade_data: UpgradeData,
    pub tally_data: VoteTally,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpgradeData {
    pub upgrade: UpgradePlan,
}

impl From<Snapshot> for UpgradeResponse {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            upgrade_data: UpgradeData {
                upgrade: snapshot.plan,
            },
            tally_data: snapshot.tally,
        }
    }
}

/// `GET /upgrade`
///
/// Runs a full query cycle against the node on every request, independent
/// of the poller and of the exported gauges.
pub async fn upgrade(
    State(state): State<SharedState>,
) -> Result<Json<UpgradeResponse>, (StatusCode, String)> {
    let snapshot = fetch_snapshot(state.connector.as_ref(), state.query_timeout)
        .await
        .map_err(|e| {
            tracing::warn!("failed to serve /upgrade: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get upgrade: {e}"),
            )
        })?;

    tracing::info!("HTTP request handled successfully: /upgrade");
    Ok(Json(snapshot.into()))
}
