//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] lumen_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] lumen_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] lumen_types::Error),

    /// The discovery window elapsed with zero sightings; a normal outcome
    /// that callers typically answer by prompting for manual configuration
    #[error("No device found before the discovery window elapsed")]
    NoDeviceFound,

    /// The in-flight toggle task vanished without reporting
    #[error("Toggle interrupted")]
    Interrupted,

    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
