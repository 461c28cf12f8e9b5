//! Controller configuration
//!
//! Two persisted fields decide how the controller behaves: a static bulb
//! endpoint (absent means discover on demand) and the SSID of the network
//! the bulb lives on (absent means toggling is not applicable). On disk
//! this is TOML:
//!
//! ```toml
//! bulb = "192.168.1.50:55443"
//! network = "HomeWiFi"
//! ```

use std::path::Path;

use lumen_types::Endpoint;
use serde::Deserialize;

use crate::error::Result;

/// Controller configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToggleConfig {
    /// Known device endpoint; `None` discovers on demand
    pub static_bulb: Option<Endpoint>,
    /// SSID of the network the device lives on; `None` disables toggling
    pub home_network: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    bulb: Option<String>,
    network: Option<String>,
}

impl ToggleConfig {
    /// Parse from TOML text
    ///
    /// A present but malformed `bulb` address fails loading; both keys
    /// are optional.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text)?;
        let static_bulb = raw.bulb.as_deref().map(Endpoint::parse).transpose()?;
        Ok(Self {
            static_bulb,
            home_network: raw.network,
        })
    }

    /// Load from a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;

    use super::*;

    #[test]
    fn test_full_config() {
        let config = ToggleConfig::from_toml_str(
            "bulb = \"192.168.1.50:55443\"\nnetwork = \"HomeWiFi\"\n",
        )
        .unwrap();
        assert_eq!(
            config.static_bulb,
            Some(Endpoint::parse("192.168.1.50:55443").unwrap())
        );
        assert_eq!(config.home_network.as_deref(), Some("HomeWiFi"));
    }

    #[test]
    fn test_empty_config() {
        let config = ToggleConfig::from_toml_str("").unwrap();
        assert_eq!(config, ToggleConfig::default());
    }

    #[test]
    fn test_network_only() {
        let config = ToggleConfig::from_toml_str("network = \"HomeWiFi\"\n").unwrap();
        assert!(config.static_bulb.is_none());
        assert_eq!(config.home_network.as_deref(), Some("HomeWiFi"));
    }

    #[test]
    fn test_malformed_bulb_address_fails() {
        let result = ToggleConfig::from_toml_str("bulb = \"not-an-address\"\n");
        assert!(matches!(result, Err(Error::Types(_))));
    }

    #[test]
    fn test_malformed_toml_fails() {
        let result = ToggleConfig::from_toml_str("bulb = [1, 2");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
