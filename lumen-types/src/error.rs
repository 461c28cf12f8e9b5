pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed endpoint text
    #[error("Invalid device address: {0}")]
    InvalidFormat(String),
}
