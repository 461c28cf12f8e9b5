//! Toggle orchestration
//!
//! [`ToggleController`] decides whether a toggle may run (network gate),
//! how the target endpoint is obtained (static configuration or a bounded
//! discovery), and guarantees at most one command in flight. All state
//! lives behind `&mut self` on the caller's task; background I/O reports
//! back over a completion channel, so no locking is involved.

use std::sync::Arc;

use lumen_core::Command;
use lumen_types::Endpoint;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::config::ToggleConfig;
use crate::error::Error;
use crate::gate::NetworkGate;
use crate::target::{CommandChannel, DeviceFinder, SsdpFinder, TcpCommander};

/// Externally observed controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The gate holds and nothing is in flight
    Ready,
    /// Nothing to act on: no expected network configured, or the host is
    /// away from it
    NotApplicable,
    /// A toggle is in flight
    Busy,
}

/// Immediate reply to a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReply {
    /// A toggle task was started; the outcome follows asynchronously
    Accepted,
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A toggle is already in progress
    Busy,
    /// Not configured, or away from the expected network
    NotApplicable,
}

/// Terminal outcome of an accepted trigger
#[derive(Debug)]
pub enum ToggleOutcome {
    /// The command payload was fully delivered
    Sent { endpoint: Endpoint },
    Failed(Error),
}

/// Single-flight toggle orchestrator
///
/// Requires a tokio runtime context; accepted triggers spawn one
/// background task each.
///
/// # Examples
///
/// ```no_run
/// use lumen::{FixedGate, ToggleConfig, ToggleController, TriggerReply};
///
/// #[tokio::main]
/// async fn main() {
///     let config = ToggleConfig {
///         static_bulb: None, // discover on demand
///         home_network: Some("HomeWiFi".into()),
///     };
///     let mut controller = ToggleController::new(config, FixedGate(true));
///
///     if let TriggerReply::Accepted = controller.trigger() {
///         let outcome = controller.next_outcome().await;
///         println!("{outcome:?}");
///     }
/// }
/// ```
pub struct ToggleController {
    config: ToggleConfig,
    gate: Box<dyn NetworkGate>,
    finder: Arc<dyn DeviceFinder>,
    commander: Arc<dyn CommandChannel>,
    inflight: Option<oneshot::Receiver<ToggleOutcome>>,
}

impl ToggleController {
    /// Create a controller with the production finder and commander
    pub fn new(config: ToggleConfig, gate: impl NetworkGate + 'static) -> Self {
        Self {
            config,
            gate: Box::new(gate),
            finder: Arc::new(SsdpFinder::new()),
            commander: Arc::new(TcpCommander::new()),
            inflight: None,
        }
    }

    /// Substitute the device finder
    pub fn with_finder(mut self, finder: impl DeviceFinder + 'static) -> Self {
        self.finder = Arc::new(finder);
        self
    }

    /// Substitute the command channel
    pub fn with_commander(mut self, commander: impl CommandChannel + 'static) -> Self {
        self.commander = Arc::new(commander);
        self
    }

    /// Replace the configuration
    ///
    /// Takes effect from the next readiness evaluation; an in-flight
    /// toggle keeps the target it already resolved.
    pub fn reload(&mut self, config: ToggleConfig) {
        debug!("Configuration reloaded");
        self.config = config;
    }

    /// Current readiness, evaluated against a fresh gate query
    pub fn readiness(&self) -> Readiness {
        if self.inflight.is_some() {
            return Readiness::Busy;
        }
        match &self.config.home_network {
            Some(network) if self.gate.is_on_expected_network(network) => Readiness::Ready,
            _ => Readiness::NotApplicable,
        }
    }

    /// Request a toggle
    ///
    /// Accepted only when [`Readiness::Ready`]. Acceptance starts one
    /// background task which resolves the target endpoint (static
    /// configuration, else the first discovery sighting) and delivers the
    /// toggle command; the terminal outcome is consumed via
    /// [`next_outcome`](Self::next_outcome) or
    /// [`poll_outcome`](Self::poll_outcome). A trigger during `Busy`
    /// never starts a second task.
    pub fn trigger(&mut self) -> TriggerReply {
        match self.readiness() {
            Readiness::Busy => {
                debug!("Trigger rejected: toggle already in progress");
                TriggerReply::Rejected(RejectReason::Busy)
            }
            Readiness::NotApplicable => {
                debug!("Trigger rejected: not applicable");
                TriggerReply::Rejected(RejectReason::NotApplicable)
            }
            Readiness::Ready => {
                let (tx, rx) = oneshot::channel();
                let static_bulb = self.config.static_bulb;
                let finder = self.finder.clone();
                let commander = self.commander.clone();

                tokio::spawn(async move {
                    let outcome = run_toggle(static_bulb, finder, commander).await;
                    let _ = tx.send(outcome);
                });

                self.inflight = Some(rx);
                info!("Toggle started");
                TriggerReply::Accepted
            }
        }
    }

    /// Await the outcome of the in-flight toggle
    ///
    /// Returns `None` when nothing is in flight. Consuming the outcome
    /// leaves `Busy`; the next readiness evaluation queries the gate
    /// fresh.
    pub async fn next_outcome(&mut self) -> Option<ToggleOutcome> {
        let rx = self.inflight.take()?;
        let outcome = match rx.await {
            Ok(outcome) => outcome,
            Err(_) => ToggleOutcome::Failed(Error::Interrupted),
        };
        log_outcome(&outcome);
        Some(outcome)
    }

    /// Non-blocking check for a completed toggle
    ///
    /// Returns `None` while the toggle is still running or nothing is in
    /// flight; event-loop callers can poll on their own schedule.
    pub fn poll_outcome(&mut self) -> Option<ToggleOutcome> {
        let rx = self.inflight.as_mut()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => ToggleOutcome::Failed(Error::Interrupted),
        };
        self.inflight = None;
        log_outcome(&outcome);
        Some(outcome)
    }
}

fn log_outcome(outcome: &ToggleOutcome) {
    match outcome {
        ToggleOutcome::Sent { endpoint } => info!("Toggle command sent to {}", endpoint),
        ToggleOutcome::Failed(e) => warn!("Toggle failed: {}", e),
    }
}

async fn run_toggle(
    static_bulb: Option<Endpoint>,
    finder: Arc<dyn DeviceFinder>,
    commander: Arc<dyn CommandChannel>,
) -> ToggleOutcome {
    let endpoint = match static_bulb {
        Some(endpoint) => {
            debug!("Using static endpoint {}", endpoint);
            endpoint
        }
        None => {
            debug!("No static endpoint, discovering");
            match finder.find_first().await {
                Ok(Some(endpoint)) => endpoint,
                Ok(None) => return ToggleOutcome::Failed(Error::NoDeviceFound),
                Err(e) => return ToggleOutcome::Failed(e),
            }
        }
    };

    let payload = match Command::toggle().to_wire() {
        Ok(payload) => payload,
        Err(e) => return ToggleOutcome::Failed(e.into()),
    };

    match commander.send(endpoint, payload).await {
        Ok(()) => ToggleOutcome::Sent { endpoint },
        Err(e) => ToggleOutcome::Failed(e),
    }
}
