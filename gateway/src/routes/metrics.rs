use axum::{extract::State, http::header, response::IntoResponse};

use upgrade_monitor::metrics::TEXT_CONTENT_TYPE;

use crate::state::SharedState;

/// `GET /metrics`
///
/// Renders the gauges exactly as the last successful poll left them. Never
/// contacts the node.
pub async fn metrics(State(state): State<SharedState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)],
        state.metrics.gather_text(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    use upgrade_monitor::{MonitorConfig, Poller};

    use crate::routes::testing::{StubNode, body_text, state};
    use crate::routes::upgrade::upgrade;

    #[tokio::test]
    async fn renders_defaults_before_first_poll() {
        let state = state(StubNode::new(None));

        let resp = metrics(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(TEXT_CONTENT_TYPE.as_bytes())
        );

        let body = body_text(resp).await;
        assert!(body.contains("celestia_upgrade_status 0"), "{body}");
        assert!(body.contains("celestia_tally_threshold_percent 0"), "{body}");
    }

    #[tokio::test]
    async fn scrape_keeps_last_values_when_node_times_out() {
        let node = StubNode::new(Some((4, 500_000, 1000, 800)));
        let state = state(node.clone());

        let mut cfg = MonitorConfig::from_address("127.0.0.1:9090").expect("valid address");
        cfg.query_timeout = state.query_timeout;
        let poller = Poller::new(node.clone(), state.metrics.clone(), &cfg);

        poller.poll_once().await.expect("first poll succeeds");
        let before = body_text(metrics(State(state.clone())).await.into_response()).await;
        assert!(before.contains("celestia_upgrade_status 1"), "{before}");
        assert!(before.contains("celestia_upgrade_version 4"), "{before}");
        assert!(before.contains("celestia_tally_threshold_percent 0.8"), "{before}");

        node.set(None);
        assert!(poller.poll_once().await.is_err());

        let resp = upgrade(State(state.clone())).await.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let after = body_text(metrics(State(state)).await.into_response()).await;
        assert_eq!(after, before);
    }
}
