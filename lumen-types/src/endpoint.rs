//! Reachable device endpoints

use std::fmt;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::str::FromStr;

use crate::error::{Error, Result};

/// A reachable device endpoint
///
/// Holds a fully resolved host address and a port in 1..=65535. Endpoints
/// are immutable once constructed and compare structurally, so a device
/// entered by hand and the same device found by discovery are equal.
///
/// # Examples
///
/// ```
/// use lumen_types::Endpoint;
///
/// let endpoint = Endpoint::parse("192.168.1.50:55443").unwrap();
/// assert_eq!(endpoint.port(), 55443);
/// assert_eq!(endpoint.to_string(), "192.168.1.50:55443");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: IpAddr,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint from an already resolved address
    ///
    /// Port 0 is not a reachable port and is rejected.
    pub fn new(host: IpAddr, port: u16) -> Result<Self> {
        if port == 0 {
            return Err(Error::InvalidFormat("port must be in 1..=65535".into()));
        }
        Ok(Self { host, port })
    }

    /// Parse the canonical `host:port` form
    ///
    /// The host part may be a numeric address (including bracketed IPv6)
    /// or a hostname. Hostnames are resolved eagerly, which may block on
    /// the system resolver, and the first resolved address is pinned.
    /// Anything else - missing colon, empty host, non-numeric or
    /// out-of-range port, unresolvable host - fails with
    /// [`Error::InvalidFormat`].
    pub fn parse(text: &str) -> Result<Self> {
        // Numeric fast path, no resolver involved
        if let Ok(addr) = text.parse::<SocketAddr>() {
            return Self::new(addr.ip(), addr.port());
        }

        let (host, port) = text
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidFormat(format!("missing port in '{text}'")))?;

        if host.is_empty() {
            return Err(Error::InvalidFormat(format!("missing host in '{text}'")));
        }

        let port: u16 = port
            .parse()
            .map_err(|_| Error::InvalidFormat(format!("invalid port in '{text}'")))?;

        let resolved = (host, port)
            .to_socket_addrs()
            .map_err(|e| Error::InvalidFormat(format!("cannot resolve '{host}': {e}")))?
            .next()
            .ok_or_else(|| Error::InvalidFormat(format!("no addresses for '{host}'")))?;

        Self::new(resolved.ip(), port)
    }

    /// Resolved host address
    pub fn host(&self) -> IpAddr {
        self.host
    }

    /// Device port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Socket address for connecting
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr())
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_parse_numeric() {
        let endpoint = Endpoint::parse("192.168.1.50:55443").unwrap();
        assert_eq!(endpoint.host(), IpAddr::V4(Ipv4Addr::new(192, 168, 1, 50)));
        assert_eq!(endpoint.port(), 55443);
    }

    #[test]
    fn test_parse_resolves_hostname() {
        let endpoint = Endpoint::parse("localhost:8080").unwrap();
        assert!(endpoint.host().is_loopback());
        assert_eq!(endpoint.port(), 8080);
    }

    #[test]
    fn test_parse_ipv6() {
        let endpoint = Endpoint::parse("[::1]:55443").unwrap();
        assert!(endpoint.host().is_loopback());
        assert_eq!(endpoint.to_string(), "[::1]:55443");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in [
            "",
            "192.168.1.50",
            ":55443",
            "192.168.1.50:",
            "192.168.1.50:0",
            "192.168.1.50:65536",
            "192.168.1.50:abc",
            "no.such.host.invalid:80",
        ] {
            let result = Endpoint::parse(text);
            assert!(
                matches!(result, Err(Error::InvalidFormat(_))),
                "expected InvalidFormat for {text:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn test_new_rejects_port_zero() {
        let result = Endpoint::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_format_round_trips() {
        let endpoint = Endpoint::parse("10.0.0.7:1234").unwrap();
        let reparsed = Endpoint::parse(&endpoint.to_string()).unwrap();
        assert_eq!(endpoint, reparsed);
    }

    #[test]
    fn test_equality_across_construction_paths() {
        let parsed = Endpoint::parse("192.168.1.50:55443").unwrap();
        let built = Endpoint::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 50)), 55443).unwrap();
        assert_eq!(parsed, built);

        let other_port = Endpoint::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 50)), 55444).unwrap();
        assert_ne!(parsed, other_port);
    }

    #[test]
    fn test_from_str() {
        let endpoint: Endpoint = "192.168.1.50:55443".parse().unwrap();
        assert_eq!(endpoint.port(), 55443);
    }

    proptest! {
        #[test]
        fn test_parse_format_round_trip(a: u8, b: u8, c: u8, d: u8, port in 1u16..) {
            let text = format!("{a}.{b}.{c}.{d}:{port}");
            let endpoint = Endpoint::parse(&text).unwrap();
            prop_assert_eq!(endpoint.to_string(), text);
        }
    }
}
