//! Error types for lumen-core

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Command could not be encoded
    #[error("Command encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
