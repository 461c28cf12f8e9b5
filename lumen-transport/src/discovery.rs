//! UDP device discovery
//!
//! A discovery run is one-shot: bind an ephemeral socket, send a single
//! search request to the multicast group, then collect responses until the
//! window elapses, the caller cancels, or the socket errors. A new run
//! requires a new [`Discoverer`].
//!
//! Events are delivered over a typed channel: zero or more
//! [`DiscoveryEvent::Sighting`]s in datagram order, then exactly one
//! terminal event. The socket is owned by the run's task for its whole
//! life and dropped on every exit path.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bytes::BytesMut;
use lumen_core::constants::{
    MAX_DISCOVERY_TIMEOUT, MIN_DISCOVERY_TIMEOUT, RECV_BUFFER_SIZE, SEARCH_GROUP, SEARCH_PORT,
};
use lumen_core::search;
use lumen_types::Endpoint;
use tokio::net::UdpSocket;
use tokio::sync::{Notify, mpsc};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

/// Events produced by one discovery run
///
/// A device may be sighted more than once per run (firmware answers a
/// search several times); de-duplication is the caller's concern.
#[derive(Debug)]
pub enum DiscoveryEvent {
    /// A device advertising the target protocol
    Sighting(Endpoint),
    /// The window elapsed normally
    Completed,
    /// The caller cancelled the run
    Cancelled,
    /// The socket failed
    Failed(Error),
}

/// One-shot bounded device discovery
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use lumen_transport::{Discoverer, DiscoveryEvent};
///
/// # async fn run() -> lumen_transport::Result<()> {
/// let mut run = Discoverer::new(Duration::from_secs(5))?.start();
/// while let Some(event) = run.next_event().await {
///     if let DiscoveryEvent::Sighting(endpoint) = event {
///         println!("found {endpoint}");
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct Discoverer {
    timeout: Duration,
    target: SocketAddr,
}

impl Discoverer {
    /// Create a discoverer with the given listen window
    ///
    /// The window must be between 1 second and 2 minutes.
    pub fn new(timeout: Duration) -> Result<Self> {
        if timeout < MIN_DISCOVERY_TIMEOUT || timeout > MAX_DISCOVERY_TIMEOUT {
            return Err(Error::TimeoutOutOfRange {
                got: timeout,
                min: MIN_DISCOVERY_TIMEOUT,
                max: MAX_DISCOVERY_TIMEOUT,
            });
        }
        Ok(Self {
            timeout,
            target: SocketAddr::from((SEARCH_GROUP, SEARCH_PORT)),
        })
    }

    /// Redirect the search to a specific address
    ///
    /// Discovery normally searches the well-known multicast group; tests
    /// and unusual network setups can point it elsewhere.
    pub fn with_target(mut self, target: SocketAddr) -> Self {
        self.target = target;
        self
    }

    /// Start the run, consuming the discoverer
    pub fn start(self) -> DiscoveryRun {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(RunShared {
            cancelled: AtomicBool::new(false),
            notify: Notify::new(),
            running: AtomicBool::new(true),
        });

        let worker = shared.clone();
        tokio::spawn(async move {
            let terminal = search_until_done(self.timeout, self.target, &worker, &tx).await;
            worker.running.store(false, Ordering::Release);
            let _ = tx.send(terminal);
        });

        DiscoveryRun { events: rx, shared }
    }
}

struct RunShared {
    cancelled: AtomicBool,
    notify: Notify,
    running: AtomicBool,
}

impl RunShared {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.notify.notify_one();
    }
}

/// A running discovery
pub struct DiscoveryRun {
    events: mpsc::UnboundedReceiver<DiscoveryEvent>,
    shared: Arc<RunShared>,
}

impl DiscoveryRun {
    /// Next event; `None` once the terminal event has been consumed
    pub async fn next_event(&mut self) -> Option<DiscoveryEvent> {
        self.events.recv().await
    }

    /// Cancel the run
    ///
    /// Idempotent and safe to call after the run has already finished; a
    /// pending receive is unblocked immediately.
    pub fn cancel(&self) {
        self.shared.cancel();
    }

    /// Whether a terminal outcome has not yet been reached
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Handle for cancelling the run from another task
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            shared: self.shared.clone(),
        }
    }
}

/// Cancels a [`DiscoveryRun`] from any task
#[derive(Clone)]
pub struct CancelHandle {
    shared: Arc<RunShared>,
}

impl CancelHandle {
    /// Cancel the run (idempotent)
    pub fn cancel(&self) {
        self.shared.cancel();
    }

    /// Whether the run has not yet reached a terminal outcome
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }
}

async fn search_until_done(
    window: Duration,
    target: SocketAddr,
    shared: &RunShared,
    events: &mpsc::UnboundedSender<DiscoveryEvent>,
) -> DiscoveryEvent {
    let socket = match UdpSocket::bind("0.0.0.0:0").await {
        Ok(socket) => socket,
        Err(e) => {
            warn!("Failed to bind discovery socket: {}", e);
            return DiscoveryEvent::Failed(Error::Discovery(e));
        }
    };

    debug!("Searching via {} for {:?}", target, window);

    if let Err(e) = socket.send_to(search::request(), target).await {
        warn!("Failed to send search request: {}", e);
        return DiscoveryEvent::Failed(Error::Discovery(e));
    }

    let deadline = Instant::now() + window;
    let mut buf = BytesMut::with_capacity(RECV_BUFFER_SIZE);
    buf.resize(RECV_BUFFER_SIZE, 0);

    loop {
        if shared.cancelled.load(Ordering::Acquire) {
            debug!("Search cancelled");
            return DiscoveryEvent::Cancelled;
        }

        tokio::select! {
            biased;

            _ = shared.notify.notified() => {
                debug!("Search cancelled");
                return DiscoveryEvent::Cancelled;
            }
            _ = events.closed() => {
                debug!("Event receiver dropped, stopping search");
                return DiscoveryEvent::Cancelled;
            }
            _ = sleep_until(deadline) => {
                debug!("Search window elapsed");
                return DiscoveryEvent::Completed;
            }
            received = socket.recv_from(&mut buf) => match received {
                Ok((n, src)) => {
                    trace!("Received {} bytes from {}", n, src);
                    if let Some(endpoint) = search::parse_response(&buf[..n]) {
                        debug!("Sighted {} (announced via {})", endpoint, src);
                        if events.send(DiscoveryEvent::Sighting(endpoint)).is_err() {
                            return DiscoveryEvent::Cancelled;
                        }
                    }
                }
                Err(e) => {
                    warn!("Receive failed: {}", e);
                    return DiscoveryEvent::Failed(Error::Discovery(e));
                }
            }
        }
    }
}
