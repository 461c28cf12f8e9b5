//! Protocol constants
//!
//! Wire-level constants for the Yeelight LAN protocol. The search group,
//! port and message templates must match device firmware byte for byte.

use std::net::Ipv4Addr;
use std::time::Duration;

/// SSDP search multicast group
pub const SEARCH_GROUP: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);

/// SSDP search port
pub const SEARCH_PORT: u16 = 1982;

/// Search request datagram
pub const SEARCH_REQUEST: &str = concat!(
    "M-SEARCH * HTTP/1.1\r\n",
    "HOST:239.255.255.250:1982\r\n",
    "MAN:\"ssdp:discover\"\r\n",
    "ST:wifi_bulb\r\n",
);

/// First line of a unicast search response
pub const RESPONSE_HEADER: &str = "HTTP/1.1 200 OK";

/// First line of an unsolicited announce
pub const ANNOUNCE_HEADER: &str = "NOTIFY * HTTP/1.1";

/// URI scheme carried in the `Location:` header of search responses
pub const LOCATION_SCHEME: &str = "yeelight://";

/// Shortest accepted discovery window
pub const MIN_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(1);

/// Longest accepted discovery window
pub const MAX_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(120);

/// Discovery window used when the caller does not pick one
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Receive buffer size for search responses
///
/// Some firmware pads responses to the full buffer with NUL bytes; the
/// parser trims them.
pub const RECV_BUFFER_SIZE: usize = 1024;

/// Default connect/write timeout for command delivery
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(3);
