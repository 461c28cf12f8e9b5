//! Device command construction
//!
//! Commands are single-line JSON-RPC invocations terminated by CRLF:
//!
//! ```text
//! {"id":0,"method":"toggle","params":[]}\r\n
//! ```
//!
//! The device answers on the same connection, but a fire-and-forget caller
//! may close without reading.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// A single JSON-RPC device command
///
/// # Examples
///
/// ```
/// use lumen_core::Command;
///
/// let wire = Command::toggle().to_wire().unwrap();
/// assert_eq!(wire, "{\"id\":0,\"method\":\"toggle\",\"params\":[]}\r\n");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Command {
    id: u32,
    method: String,
    params: Vec<Value>,
}

impl Command {
    /// Create a parameterless command
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            id: 0,
            method: method.into(),
            params: Vec::new(),
        }
    }

    /// The power-toggle command
    pub fn toggle() -> Self {
        Self::new("toggle")
    }

    /// Replace the request id
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    /// Encode to the CRLF-terminated wire line
    pub fn to_wire(&self) -> Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push_str("\r\n");
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_toggle_wire_format() {
        let wire = Command::toggle().to_wire().unwrap();
        assert_eq!(wire, "{\"id\":0,\"method\":\"toggle\",\"params\":[]}\r\n");
    }

    #[test]
    fn test_with_id() {
        let wire = Command::toggle().with_id(7).to_wire().unwrap();
        assert_eq!(wire, "{\"id\":7,\"method\":\"toggle\",\"params\":[]}\r\n");
    }

    #[test]
    fn test_custom_method() {
        let wire = Command::new("get_prop").to_wire().unwrap();
        assert_eq!(wire, "{\"id\":0,\"method\":\"get_prop\",\"params\":[]}\r\n");
    }
}
