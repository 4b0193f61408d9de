//! Endpoint address resolution.
//!
//! Turns the user-supplied `--grpc-addr` value into a host/port pair and a
//! transport-security flag. Accepted forms:
//!
//! - `host:port` (plaintext),
//! - `http://host:port` (plaintext),
//! - `https://host:port` (TLS, server name checked against `host`).
//!
//! The port is never defaulted: an address without one is rejected.

use std::fmt;

use crate::error::MonitorError;

const SECURE_SCHEME: &str = "https://";
const PLAIN_SCHEME: &str = "http://";

/// Resolved address of the remote signal query service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointAddress {
    /// Host name or IP literal, without port.
    pub host: String,
    /// Port, always non-empty.
    pub port: String,
    /// Whether the connection must be negotiated over TLS.
    pub secure: bool,
}

impl EndpointAddress {
    /// Resolves a raw address string.
    pub fn resolve(raw: &str) -> Result<Self, MonitorError> {
        let raw = raw.trim();

        let (rest, secure) = if let Some(rest) = raw.strip_prefix(SECURE_SCHEME) {
            (rest, true)
        } else if let Some(rest) = raw.strip_prefix(PLAIN_SCHEME) {
            (rest, false)
        } else {
            (raw, false)
        };

        // Bracketed IPv6 literals carry colons of their own.
        let split = if rest.starts_with('[') {
            rest.find("]:").map(|i| (&rest[..=i], &rest[i + 2..]))
        } else {
            rest.rsplit_once(':')
        };

        let Some((host, port)) = split else {
            return Err(MonitorError::Configuration(format!(
                "port must be explicitly specified in the address (e.g., host:443), got {raw:?}"
            )));
        };

        if host.is_empty() || host == "[]" {
            return Err(MonitorError::Configuration(format!(
                "host must not be empty in address {raw:?}"
            )));
        }
        if port.is_empty() {
            return Err(MonitorError::Configuration(format!(
                "port must be explicitly specified in the address (e.g., host:443), got {raw:?}"
            )));
        }
        match port.parse::<u16>() {
            Ok(p) if p > 0 => {}
            _ => {
                return Err(MonitorError::Configuration(format!(
                    "port must be a number between 1 and 65535, got {port:?} in {raw:?}"
                )));
            }
        }

        Ok(Self {
            host: host.to_string(),
            port: port.to_string(),
            secure,
        })
    }

    /// `host:port`, without any scheme.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Host name used for TLS server-name validation (SNI).
    ///
    /// Brackets around IPv6 literals are stripped.
    pub fn server_name(&self) -> &str {
        self.host.trim_start_matches('[').trim_end_matches(']')
    }
}

impl fmt::Display for EndpointAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = if self.secure { SECURE_SCHEME } else { PLAIN_SCHEME };
        write!(f, "{scheme}{}", self.authority())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_prefix_selects_tls() {
        let addr = EndpointAddress::resolve("https://node.example:443").expect("valid address");
        assert_eq!(
            addr,
            EndpointAddress {
                host: "node.example".to_string(),
                port: "443".to_string(),
                secure: true,
            }
        );
        assert_eq!(addr.authority(), "node.example:443");
    }

    #[test]
    fn bare_and_http_addresses_are_plaintext() {
        for raw in ["node.example:443", "http://node.example:443"] {
            let addr = EndpointAddress::resolve(raw).expect("valid address");
            assert_eq!(addr.host, "node.example");
            assert_eq!(addr.port, "443");
            assert!(!addr.secure, "{raw} should not enable TLS");
        }
    }

    #[test]
    fn authority_never_contains_scheme() {
        let cases = [
            ("https://10.0.0.1:9090", true),
            ("http://grpc.node:9090", false),
            ("localhost:9090", false),
            ("https://[::1]:9090", true),
        ];
        for (raw, secure) in cases {
            let addr = EndpointAddress::resolve(raw).expect("valid address");
            assert_eq!(addr.secure, secure, "{raw}");
            assert!(!addr.authority().contains("://"), "{raw}");
            assert!(raw.ends_with(&addr.authority()), "{raw}");
        }
    }

    #[test]
    fn missing_port_is_a_configuration_error() {
        for raw in [
            "node.example",
            "https://node.example",
            "http://node.example",
            "",
            "https://[::1]",
            "[::1]",
        ] {
            let err = EndpointAddress::resolve(raw).expect_err("port is required");
            assert!(matches!(err, MonitorError::Configuration(_)), "{raw}: {err}");
        }
    }

    #[test]
    fn malformed_port_is_a_configuration_error() {
        for raw in [
            "node.example:abc",
            "node.example:99999",
            "node.example:0",
            "https://[::1]:http",
            "[::1]x:9090",
        ] {
            let err = EndpointAddress::resolve(raw).expect_err("port must be numeric");
            assert!(matches!(err, MonitorError::Configuration(_)), "{raw}: {err}");
        }
    }

    #[test]
    fn empty_host_or_port_is_rejected() {
        assert!(EndpointAddress::resolve(":9090").is_err());
        assert!(EndpointAddress::resolve("https://node.example:").is_err());
    }

    #[test]
    fn server_name_strips_ipv6_brackets() {
        let addr = EndpointAddress::resolve("https://[::1]:9090").expect("valid address");
        assert_eq!(addr.host, "[::1]");
        assert_eq!(addr.server_name(), "::1");
        assert_eq!(addr.to_string(), "https://[::1]:9090");
    }
}
