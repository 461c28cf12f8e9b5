//! Target resolution and command delivery seams
//!
//! The controller reaches the network through two narrow traits so tests
//! can substitute doubles and embedders can swap transports. The
//! production implementations wrap the transport crate.

use std::time::Duration;

use async_trait::async_trait;
use lumen_core::constants::DEFAULT_DISCOVERY_TIMEOUT;
use lumen_transport::{Commander, Discoverer, DiscoveryEvent};
use lumen_types::Endpoint;
use tracing::debug;

use crate::error::Result;

/// Locates a device endpoint on demand
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceFinder: Send + Sync {
    /// First sighting of one discovery run; `Ok(None)` when the window
    /// elapses unanswered
    async fn find_first(&self) -> Result<Option<Endpoint>>;
}

/// Delivers one command payload to an endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandChannel: Send + Sync {
    async fn send(&self, endpoint: Endpoint, payload: String) -> Result<()>;
}

/// Production finder running one bounded SSDP search
pub struct SsdpFinder {
    timeout: Duration,
}

impl SsdpFinder {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_DISCOVERY_TIMEOUT,
        }
    }

    /// Set the discovery window
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SsdpFinder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceFinder for SsdpFinder {
    async fn find_first(&self) -> Result<Option<Endpoint>> {
        let mut run = Discoverer::new(self.timeout)?.start();

        while let Some(event) = run.next_event().await {
            match event {
                DiscoveryEvent::Sighting(endpoint) => {
                    debug!("Taking first sighting {}", endpoint);
                    run.cancel();
                    return Ok(Some(endpoint));
                }
                DiscoveryEvent::Completed | DiscoveryEvent::Cancelled => return Ok(None),
                DiscoveryEvent::Failed(e) => return Err(e.into()),
            }
        }

        Ok(None)
    }
}

/// Production channel delivering over TCP
pub struct TcpCommander {
    commander: Commander,
}

impl TcpCommander {
    pub fn new() -> Self {
        Self {
            commander: Commander::new(),
        }
    }
}

impl Default for TcpCommander {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandChannel for TcpCommander {
    async fn send(&self, endpoint: Endpoint, payload: String) -> Result<()> {
        self.commander.send(&endpoint, payload.as_bytes()).await?;
        Ok(())
    }
}
