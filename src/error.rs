//! Error types for the fallible edges of the crate
//!
//! The grid engine itself never fails: validation failures, rejected submits and
//! structural no-ops are reported as outcomes. These errors cover clipboard
//! backends, text decoding, key parsing and replay scripts.

use std::fmt;

/// Error raised outside the core state machine
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// A column id that does not exist in the registry
    UnknownColumn(String),
    /// Key string that could not be parsed (e.g. "ctrl+shift+")
    InvalidKey(String),
    /// System clipboard unavailable or refused the operation
    Clipboard(String),
    /// Delimited text could not be decoded
    Parse { message: String, line: Option<usize> },
    /// Replay script could not be read or is malformed
    Script(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::UnknownColumn(id) => write!(f, "Unknown column id: {}", id),
            GridError::InvalidKey(key) => write!(f, "Invalid key: {}", key),
            GridError::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),
            GridError::Parse {
                message,
                line: Some(line),
            } => write!(f, "Parse error at line {}: {}", line, message),
            GridError::Parse {
                message,
                line: None,
            } => write!(f, "Parse error: {}", message),
            GridError::Script(msg) => write!(f, "Script error: {}", msg),
        }
    }
}

impl std::error::Error for GridError {}
