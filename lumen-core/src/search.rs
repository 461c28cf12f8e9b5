//! SSDP search request and response handling
//!
//! Discovery is a single multicast search followed by a listen window.
//! Responses are line-oriented text:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Cache-Control: max-age=3600\r\n
//! Location: yeelight://192.168.1.50:55443\r\n
//! ...
//! ```
//!
//! A datagram that does not match is discarded without an error; the
//! search port sees plenty of unrelated SSDP traffic.

use lumen_types::Endpoint;
use tracing::trace;

use crate::constants::{ANNOUNCE_HEADER, LOCATION_SCHEME, RESPONSE_HEADER, SEARCH_REQUEST};

/// The fixed search request datagram
pub fn request() -> &'static [u8] {
    SEARCH_REQUEST.as_bytes()
}

/// Parse one received datagram into an endpoint sighting
///
/// A datagram is accepted only if its first line is a search response or
/// announce header and a `Location:` field carries a `yeelight://host:port`
/// URI that decodes into a valid [`Endpoint`]. Trailing NUL bytes from
/// fixed-size receive buffers are trimmed before matching. Returns `None`
/// for everything else.
pub fn parse_response(datagram: &[u8]) -> Option<Endpoint> {
    let end = datagram.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let text = std::str::from_utf8(&datagram[..end]).ok()?;

    let mut lines = text.lines();
    let header = lines.next()?;
    if header != RESPONSE_HEADER && header != ANNOUNCE_HEADER {
        trace!(header, "Discarding datagram with unrecognized header");
        return None;
    }

    let location = lines.find_map(|line| line.strip_prefix("Location:"))?;
    let address = location.trim().strip_prefix(LOCATION_SCHEME)?;

    match Endpoint::parse(address) {
        Ok(endpoint) => Some(endpoint),
        Err(e) => {
            trace!(address, error = %e, "Discarding malformed location");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_request_bytes() {
        let expected = b"M-SEARCH * HTTP/1.1\r\n\
                         HOST:239.255.255.250:1982\r\n\
                         MAN:\"ssdp:discover\"\r\n\
                         ST:wifi_bulb\r\n";
        assert_eq!(request(), expected.as_slice());
    }

    #[test]
    fn test_parse_search_response() {
        let datagram = b"HTTP/1.1 200 OK\r\n\
                         Cache-Control: max-age=3600\r\n\
                         Location: yeelight://192.168.1.50:55443\r\n\
                         Server: POSIX UPnP/1.0 YGLC/1\r\n";
        let endpoint = parse_response(datagram).unwrap();
        assert_eq!(endpoint.to_string(), "192.168.1.50:55443");
    }

    #[test]
    fn test_parse_announce() {
        let datagram = b"NOTIFY * HTTP/1.1\r\n\
                         Location: yeelight://192.168.1.50:55443\r\n";
        let endpoint = parse_response(datagram).unwrap();
        assert_eq!(endpoint.to_string(), "192.168.1.50:55443");
    }

    #[test]
    fn test_parse_trims_trailing_nuls() {
        let mut datagram = [0u8; 1024];
        let text = b"NOTIFY * HTTP/1.1\r\nLocation: yeelight://192.168.1.50:55443\r\n";
        datagram[..text.len()].copy_from_slice(text);

        let endpoint = parse_response(&datagram).unwrap();
        assert_eq!(endpoint.to_string(), "192.168.1.50:55443");
    }

    #[test]
    fn test_parse_rejects_unrecognized_header() {
        let datagram = b"HELLO * HTTP/1.1\r\n\
                         Location: yeelight://192.168.1.50:55443\r\n";
        assert!(parse_response(datagram).is_none());
    }

    #[test]
    fn test_parse_rejects_missing_location() {
        let datagram = b"HTTP/1.1 200 OK\r\nServer: POSIX UPnP/1.0 YGLC/1\r\n";
        assert!(parse_response(datagram).is_none());
    }

    #[test]
    fn test_parse_rejects_foreign_scheme() {
        let datagram = b"HTTP/1.1 200 OK\r\nLocation: http://192.168.1.50:55443\r\n";
        assert!(parse_response(datagram).is_none());
    }

    #[test]
    fn test_parse_rejects_invalid_endpoint() {
        let datagram = b"HTTP/1.1 200 OK\r\nLocation: yeelight://192.168.1.50:0\r\n";
        assert!(parse_response(datagram).is_none());
    }

    #[test]
    fn test_parse_rejects_non_utf8() {
        let datagram = [0xFFu8, 0xFE, 0x00];
        assert!(parse_response(&datagram).is_none());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(parse_response(&[]).is_none());
        assert!(parse_response(&[0u8; 16]).is_none());
    }
}
