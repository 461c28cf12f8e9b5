//! Type definitions for lumen

pub mod endpoint;
pub mod error;

pub use endpoint::Endpoint;
pub use error::{Error, Result};
