//! Clipboard payloads and backends
//!
//! The grid only produces and consumes [`ClipboardPayload`] values. Moving them
//! to and from an actual clipboard is the job of a [`ClipboardBackend`].

pub mod codec;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

pub use codec::{decode_entities, encode_html, encode_plain, escape_html, parse_html, parse_plain};

/// Clipboard content in the representations the grid understands
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain: Option<String>,
    /// Untyped text, used when neither html nor plain is present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ClipboardPayload {
    /// Encode a matrix in both representations
    pub fn from_matrix(matrix: &[Vec<String>], header: Option<&[String]>) -> Self {
        Self {
            html: Some(encode_html(matrix, header)),
            plain: Some(encode_plain(matrix)),
            text: None,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_none() && self.plain.is_none() && self.text.is_none()
    }

    /// Decode to a value matrix. HTML wins over plain, plain over text.
    pub fn decode(&self) -> Result<Vec<Vec<String>>, GridError> {
        if let Some(html) = &self.html {
            parse_html(html)
        } else if let Some(plain) = &self.plain {
            parse_plain(plain)
        } else if let Some(text) = &self.text {
            parse_plain(text)
        } else {
            Ok(vec![vec![String::new()]])
        }
    }
}

/// Something that can hold a clipboard payload
pub trait ClipboardBackend {
    fn write(&mut self, payload: &ClipboardPayload) -> Result<(), GridError>;
    fn read(&mut self) -> Result<ClipboardPayload, GridError>;
}

/// OS clipboard through arboard
///
/// HTML is written with the plain encoding as its alternate text. Reading only
/// returns text, which then decodes as plain.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardBackend for SystemClipboard {
    fn write(&mut self, payload: &ClipboardPayload) -> Result<(), GridError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| GridError::Clipboard(e.to_string()))?;

        let plain = payload.plain.as_deref().or(payload.text.as_deref());
        let result = match (&payload.html, plain) {
            (Some(html), alt) => clipboard.set_html(html.as_str(), alt),
            (None, Some(text)) => clipboard.set_text(text),
            (None, None) => clipboard.clear(),
        };
        result.map_err(|e| GridError::Clipboard(e.to_string()))
    }

    fn read(&mut self) -> Result<ClipboardPayload, GridError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| GridError::Clipboard(e.to_string()))?;
        let text = clipboard
            .get_text()
            .map_err(|e| GridError::Clipboard(e.to_string()))?;
        Ok(ClipboardPayload::plain(text))
    }
}

/// Process-local clipboard
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    payload: ClipboardPayload,
    writes: usize,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> &ClipboardPayload {
        &self.payload
    }

    /// Number of writes so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn write(&mut self, payload: &ClipboardPayload) -> Result<(), GridError> {
        self.payload = payload.clone();
        self.writes += 1;
        Ok(())
    }

    fn read(&mut self) -> Result<ClipboardPayload, GridError> {
        Ok(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_precedence() {
        let payload = ClipboardPayload {
            html: Some("<table><tr><td>html</td></tr></table>".to_string()),
            plain: Some("plain".to_string()),
            text: Some("text".to_string()),
        };
        assert_eq!(payload.decode().unwrap(), vec![vec!["html".to_string()]]);

        let payload = ClipboardPayload {
            html: None,
            ..payload
        };
        assert_eq!(payload.decode().unwrap(), vec![vec!["plain".to_string()]]);

        let payload = ClipboardPayload {
            plain: None,
            ..payload
        };
        assert_eq!(payload.decode().unwrap(), vec![vec!["text".to_string()]]);
    }

    #[test]
    fn test_empty_payload_decodes_to_single_blank() {
        let payload = ClipboardPayload::default();
        assert!(payload.is_empty());
        assert_eq!(payload.decode().unwrap(), vec![vec![String::new()]]);
    }

    #[test]
    fn test_memory_clipboard_round_trip() {
        let mut clipboard = MemoryClipboard::new();
        let payload = ClipboardPayload::from_matrix(&[vec!["a".to_string()]], None);
        clipboard.write(&payload).unwrap();
        assert_eq!(clipboard.read().unwrap(), payload);
        assert_eq!(clipboard.writes(), 1);
    }
}
