//! Network presence gate
//!
//! Toggling is only allowed while the host is attached to the expected
//! local network; commanding a bulb across the WAN is never intended.
//! The gate is a narrow synchronous query - when attachment cannot be
//! determined it answers "not attached" rather than fail.

use tracing::debug;

/// Answers whether the host is attached to the expected network
pub trait NetworkGate: Send + Sync {
    /// `true` only when attachment to `expected` is positively known;
    /// indeterminate state reports `false`
    fn is_on_expected_network(&self, expected: &str) -> bool;
}

/// Strip the quote wrapping some platforms put around reported SSIDs
///
/// `"\"Home\""` becomes `"Home"`; anything unquoted passes through.
pub fn trim_quoted(ssid: &str) -> &str {
    ssid.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(ssid)
}

/// Gate backed by a caller-supplied SSID lookup
///
/// The embedder supplies the platform query for the currently attached
/// SSID; a lookup returning `None` (no wifi, no permission, query failed)
/// gates the toggle off.
///
/// # Examples
///
/// ```
/// use lumen::gate::{NetworkGate, SsidGate};
///
/// let gate = SsidGate::new(|| Some("\"Home\"".to_string()));
/// assert!(gate.is_on_expected_network("Home"));
/// assert!(!gate.is_on_expected_network("Office"));
/// ```
pub struct SsidGate<F> {
    lookup: F,
}

impl<F> SsidGate<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

impl<F> NetworkGate for SsidGate<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn is_on_expected_network(&self, expected: &str) -> bool {
        match (self.lookup)() {
            Some(current) => {
                let current = trim_quoted(&current);
                let attached = current == trim_quoted(expected);
                debug!("Attached to '{}', expecting '{}'", current, expected);
                attached
            }
            None => {
                debug!("Current network unknown, gating off");
                false
            }
        }
    }
}

/// Gate with a fixed answer, for examples and tests
pub struct FixedGate(pub bool);

impl NetworkGate for FixedGate {
    fn is_on_expected_network(&self, _expected: &str) -> bool {
        self.0
    }
}
