//! # lumen
//!
//! Discover a Yeelight-protocol smart bulb on the local network and toggle
//! its power state, gated by a network presence check.
//!
//! ## Features
//!
//! - Bounded SSDP discovery with cancellation
//! - One-shot TCP command delivery, no pooling
//! - Single-flight orchestration with an explicit readiness model
//!
//! ## Quick Start
//!
//! ```no_run
//! use lumen::{FixedGate, ToggleConfig, ToggleController, TriggerReply};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ToggleConfig {
//!         static_bulb: None, // discover on demand
//!         home_network: Some("HomeWiFi".into()),
//!     };
//!
//!     let mut controller = ToggleController::new(config, FixedGate(true));
//!
//!     match controller.trigger() {
//!         TriggerReply::Accepted => {
//!             let outcome = controller.next_outcome().await;
//!             println!("{outcome:?}");
//!         }
//!         TriggerReply::Rejected(reason) => println!("rejected: {reason:?}"),
//!     }
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod gate;
pub mod target;

// Re-exports
pub use config::ToggleConfig;
pub use controller::{Readiness, RejectReason, ToggleController, ToggleOutcome, TriggerReply};
pub use error::{Error, Result};
pub use gate::{FixedGate, NetworkGate, SsidGate};
pub use target::{CommandChannel, DeviceFinder, SsdpFinder, TcpCommander};

// Re-export types
pub use lumen_core::Command;
pub use lumen_transport::{Commander, Discoverer, DiscoveryEvent};
pub use lumen_types::Endpoint;
