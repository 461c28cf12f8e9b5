//! TCP command delivery
//!
//! A command travels over a fresh connection each time - devices are
//! toggled rarely and a pooled connection only adds failure modes. The
//! connection is closed on every exit path.

use std::net::SocketAddr;
use std::time::Duration;

use lumen_core::constants::DEFAULT_COMMAND_TIMEOUT;
use lumen_types::Endpoint;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpSocket, TcpStream};
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

/// One-shot command delivery to a device endpoint
///
/// # Examples
///
/// ```no_run
/// use lumen_transport::Commander;
/// use lumen_types::Endpoint;
///
/// # async fn run() -> lumen_transport::Result<()> {
/// let endpoint = Endpoint::parse("192.168.1.50:55443").unwrap();
/// Commander::new()
///     .send(&endpoint, b"{\"id\":0,\"method\":\"toggle\",\"params\":[]}\r\n")
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Commander {
    connect_timeout: Duration,
    write_timeout: Duration,
}

impl Commander {
    /// Create a commander with short default timeouts
    ///
    /// The timeouts are deliberately short: a toggle is an interactive
    /// action and must not stall its caller perceptibly.
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_COMMAND_TIMEOUT,
            write_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set write timeout
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Deliver `payload` to `endpoint` over a fresh connection
    ///
    /// Either the whole payload is written and flushed, or an error is
    /// returned; there is no partial success. The connection is closed
    /// before returning in every case.
    pub async fn send(&self, endpoint: &Endpoint, payload: &[u8]) -> Result<()> {
        let addr = endpoint.addr();

        debug!("Connecting to {}...", addr);

        let mut stream = timeout(self.connect_timeout, connect(addr))
            .await
            .map_err(|_| {
                warn!("Connect to {} timed out", addr);
                Error::ConnectTimeout
            })??;

        trace!(
            "Sending {} bytes: {:?}",
            payload.len(),
            String::from_utf8_lossy(payload)
        );

        timeout(self.write_timeout, write_all_flush(&mut stream, payload))
            .await
            .map_err(|_| {
                warn!("Write to {} timed out", addr);
                Error::WriteTimeout
            })??;

        // Graceful close; the command has already been flushed
        let _ = stream.shutdown().await;

        debug!("Command delivered to {}", addr);
        Ok(())
    }
}

impl Default for Commander {
    fn default() -> Self {
        Self::new()
    }
}

async fn connect(addr: SocketAddr) -> Result<TcpStream> {
    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4(),
        SocketAddr::V6(_) => TcpSocket::new_v6(),
    }
    .map_err(Error::Connection)?;

    socket.set_keepalive(true).map_err(Error::Connection)?;

    socket.connect(addr).await.map_err(Error::Connection)
}

async fn write_all_flush(stream: &mut TcpStream, payload: &[u8]) -> Result<()> {
    stream.write_all(payload).await.map_err(Error::Connection)?;
    stream.flush().await.map_err(Error::Connection)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    use super::*;

    const PAYLOAD: &[u8] = b"{\"id\":0,\"method\":\"toggle\",\"params\":[]}\r\n";

    #[tokio::test]
    async fn test_send_delivers_full_payload_and_closes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let accept = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            // read_to_end only returns once the peer has closed
            stream.read_to_end(&mut received).await.unwrap();
            received
        });

        let endpoint = Endpoint::new(addr.ip(), addr.port()).unwrap();
        Commander::new().send(&endpoint, PAYLOAD).await.unwrap();

        assert_eq!(accept.await.unwrap(), PAYLOAD);
    }

    #[tokio::test]
    async fn test_send_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = Endpoint::new(addr.ip(), addr.port()).unwrap();
        let result = Commander::new().send(&endpoint, PAYLOAD).await;

        assert!(matches!(result, Err(Error::Connection(_))));
    }

    #[tokio::test]
    async fn test_send_connect_timeout() {
        // Blackhole address; depending on the environment this surfaces as
        // a timeout or an unreachable error, either way the send fails
        let endpoint = Endpoint::parse("10.255.255.1:55443").unwrap();
        let result = Commander::new()
            .with_connect_timeout(Duration::from_millis(100))
            .send(&endpoint, PAYLOAD)
            .await;

        assert!(result.is_err());
    }
}
