//! Transport errors

use std::io;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Discovery window outside the accepted bounds
    #[error("Discovery timeout {got:?} outside {min:?}..={max:?}")]
    TimeoutOutOfRange {
        got: Duration,
        min: Duration,
        max: Duration,
    },

    #[error("Connection timeout")]
    ConnectTimeout,

    #[error("Write timeout")]
    WriteTimeout,

    /// Connecting to or writing at the device failed
    #[error("Connection failed: {0}")]
    Connection(#[source] io::Error),

    /// The discovery socket failed
    #[error("Discovery failed: {0}")]
    Discovery(#[source] io::Error),
}
