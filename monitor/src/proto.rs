//! Wire messages of the `celestia.signal.v1.Query` service.
//!
//! Only the two read-only calls used by the monitor are modelled. The
//! messages are derived by hand so the crate builds without `protoc`.

/// Fully-qualified gRPC method paths.
pub const GET_UPGRADE_PATH: &str = "/celestia.signal.v1.Query/GetUpgrade";
pub const VERSION_TALLY_PATH: &str = "/celestia.signal.v1.Query/VersionTally";

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryGetUpgradeRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryGetUpgradeResponse {
    /// Pending upgrade, absent when none has been signalled.
    #[prost(message, optional, tag = "1")]
    pub upgrade: ::core::option::Option<Upgrade>,
}

/// A scheduled application upgrade.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Upgrade {
    #[prost(uint64, tag = "1")]
    pub app_version: u64,
    #[prost(int64, tag = "2")]
    pub upgrade_height: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryVersionTallyRequest {
    #[prost(uint64, tag = "1")]
    pub version: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryVersionTallyResponse {
    #[prost(uint64, tag = "1")]
    pub voting_power: u64,
    #[prost(uint64, tag = "2")]
    pub threshold_power: u64,
    #[prost(uint64, tag = "3")]
    pub total_voting_power: u64,
}
