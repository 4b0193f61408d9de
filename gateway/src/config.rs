//! Gateway configuration.
//!
//! Command-line flags (with environment fallbacks) are parsed into a
//! [`Cli`], then split into the HTTP listen settings ([`ApiConfig`]) and the
//! polling pipeline settings ([`MonitorConfig`]).

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;

use upgrade_monitor::{MonitorConfig, MonitorError};

/// Port used when `--server-port` is not given.
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Upgrade signalling monitor: JSON on /upgrade, Prometheus gauges on /metrics.
#[derive(Debug, Parser)]
#[command(name = "upgrade-gateway", version, about)]
pub struct Cli {
    /// gRPC server address with explicit port (e.g. host:443 or https://host:443).
    #[arg(long = "grpc-addr", env = "GRPC_ADDR")]
    pub grpc_addr: String,

    /// HTTP server port serving /upgrade and /metrics.
    #[arg(long = "server-port", env = "SERVER_PORT", default_value_t = DEFAULT_SERVER_PORT)]
    pub server_port: u16,

    /// Seconds between two metric refreshes.
    #[arg(long, default_value_t = 30 * 60)]
    pub poll_interval_secs: u64,

    /// Per-call bound on remote queries, in seconds.
    #[arg(long, default_value_t = 5)]
    pub query_timeout_secs: u64,

    /// Signalling threshold reported in poll logs (fraction of voting power).
    #[arg(long, default_value_t = upgrade_monitor::DEFAULT_REQUIRED_THRESHOLD)]
    pub required_threshold: f64,
}

/// Configuration for the API gateway HTTP server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
}

impl ApiConfig {
    /// Binds on all interfaces so container port mappings are reachable.
    pub fn on_port(port: u16) -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
        }
    }
}

impl Cli {
    /// Splits the flags into gateway and monitor settings.
    ///
    /// Fails with [`MonitorError::Configuration`] when the gRPC address is
    /// malformed or a duration is zero.
    pub fn into_configs(self) -> Result<(ApiConfig, MonitorConfig), MonitorError> {
        if self.poll_interval_secs == 0 {
            return Err(MonitorError::Configuration(
                "poll interval must be at least one second".to_string(),
            ));
        }
        if self.query_timeout_secs == 0 {
            return Err(MonitorError::Configuration(
                "query timeout must be at least one second".to_string(),
            ));
        }

        let mut monitor = MonitorConfig::from_address(&self.grpc_addr)?;
        monitor.poll_interval = Duration::from_secs(self.poll_interval_secs);
        monitor.query_timeout = Duration::from_secs(self.query_timeout_secs);
        monitor.required_threshold = self.required_threshold;

        Ok((ApiConfig::on_port(self.server_port), monitor))
    }
}
