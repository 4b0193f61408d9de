//! gRPC client for the signal query service.
//!
//! This implementation of [`SignalConnector`] dials the node with `tonic`.
//! Transport security follows [`EndpointAddress::secure`]:
//!
//! - `https://` addresses negotiate TLS against the native root store, with
//!   the server name (SNI and certificate check) set to the bare host;
//! - everything else uses an explicit plaintext `http://` channel.
//!
//! A fresh channel is opened per query cycle and closed when the returned
//! [`SignalQuery`] is dropped.

use std::time::Duration;

use async_trait::async_trait;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use super::{SignalConnector, SignalQuery};
use crate::address::EndpointAddress;
use crate::error::MonitorError;
use crate::proto::{
    GET_UPGRADE_PATH, QueryGetUpgradeRequest, QueryGetUpgradeResponse, QueryVersionTallyRequest,
    QueryVersionTallyResponse, VERSION_TALLY_PATH,
};

/// Connector that opens a `tonic` channel per cycle.
#[derive(Clone, Debug)]
pub struct GrpcConnector {
    address: EndpointAddress,
    connect_timeout: Duration,
}

impl GrpcConnector {
    pub fn new(address: EndpointAddress, connect_timeout: Duration) -> Self {
        Self {
            address,
            connect_timeout,
        }
    }

    pub fn address(&self) -> &EndpointAddress {
        &self.address
    }

    /// Builds the channel endpoint, attaching TLS settings when required.
    fn endpoint(&self) -> Result<Endpoint, MonitorError> {
        let uri = endpoint_uri(&self.address);
        let endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|e| MonitorError::Configuration(format!("invalid endpoint {uri}: {e}")))?
            .connect_timeout(self.connect_timeout);

        if !self.address.secure {
            tracing::debug!(%uri, "using plaintext transport");
            return Ok(endpoint);
        }

        let server_name = self.address.server_name().to_string();
        tracing::debug!(%uri, %server_name, "using TLS transport");
        let tls = ClientTlsConfig::new()
            .domain_name(server_name)
            .with_native_roots();
        endpoint
            .tls_config(tls)
            .map_err(|e| MonitorError::Configuration(format!("invalid TLS settings: {e}")))
    }
}

/// URI handed to `tonic`: the scheme is always explicit so the transport
/// never has to guess.
fn endpoint_uri(address: &EndpointAddress) -> String {
    let scheme = if address.secure { "https" } else { "http" };
    format!("{scheme}://{}", address.authority())
}

#[async_trait]
impl SignalConnector for GrpcConnector {
    async fn connect(&self) -> Result<Box<dyn SignalQuery>, MonitorError> {
        let endpoint = self.endpoint()?;
        let channel = endpoint.connect().await.map_err(|e| {
            MonitorError::Connection(format!(
                "failed to connect to {}: {}",
                self.address,
                error_chain(&e)
            ))
        })?;

        tracing::debug!(address = %self.address, "connected to signal query service");
        Ok(Box::new(GrpcSignalClient {
            inner: Grpc::new(channel),
        }))
    }
}

/// Live connection to the signal query service.
struct GrpcSignalClient {
    inner: Grpc<Channel>,
}

impl GrpcSignalClient {
    async fn unary<Req, Resp>(
        &mut self,
        operation: &'static str,
        path: &'static str,
        request: Req,
    ) -> Result<Resp, MonitorError>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        self.inner
            .ready()
            .await
            .map_err(|e| MonitorError::Connection(format!("{operation}: channel not ready: {e}")))?;

        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        let response = self
            .inner
            .unary(
                tonic::Request::new(request),
                PathAndQuery::from_static(path),
                codec,
            )
            .await
            .map_err(|status| MonitorError::RemoteQuery {
                operation,
                message: format!("{:?}: {}", status.code(), status.message()),
            })?;

        Ok(response.into_inner())
    }
}

#[async_trait]
impl SignalQuery for GrpcSignalClient {
    async fn get_upgrade(&mut self) -> Result<QueryGetUpgradeResponse, MonitorError> {
        self.unary("GetUpgrade", GET_UPGRADE_PATH, QueryGetUpgradeRequest {})
            .await
    }

    async fn version_tally(&mut self) -> Result<QueryVersionTallyResponse, MonitorError> {
        self.unary(
            "VersionTally",
            VERSION_TALLY_PATH,
            QueryVersionTallyRequest::default(),
        )
        .await
    }
}

/// Flattens an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector(raw: &str) -> GrpcConnector {
        let address = EndpointAddress::resolve(raw).expect("valid address");
        GrpcConnector::new(address, Duration::from_millis(500))
    }

    #[test]
    fn uri_scheme_follows_security_flag() {
        assert_eq!(
            endpoint_uri(connector("https://grpc.node:9090").address()),
            "https://grpc.node:9090"
        );
        assert_eq!(
            endpoint_uri(connector("grpc.node:9090").address()),
            "http://grpc.node:9090"
        );
        assert_eq!(
            endpoint_uri(connector("http://grpc.node:9090").address()),
            "http://grpc.node:9090"
        );
    }

    #[test]
    fn plaintext_endpoint_builds_without_tls() {
        let endpoint = connector("grpc.node:9090").endpoint().expect("plaintext endpoint");
        assert_eq!(endpoint.uri().scheme_str(), Some("http"));
    }

    #[test]
    fn tls_endpoint_builds_with_https_scheme() {
        let endpoint = connector("https://grpc.node:9090")
            .endpoint()
            .expect("TLS endpoint");
        assert_eq!(endpoint.uri().scheme_str(), Some("https"));
        assert_eq!(endpoint.uri().host(), Some("grpc.node"));
    }

    #[tokio::test]
    async fn closed_port_is_a_connection_error() {
        // Port 1 (tcpmux) is practically never listening.
        let result = connector("127.0.0.1:1").connect().await;
        match result {
            Err(MonitorError::Connection(msg)) => assert!(msg.contains("127.0.0.1:1")),
            Err(other) => panic!("expected connection error, got {other}"),
            Ok(_) => panic!("expected connection error, got a connection"),
        }
    }
}
