//! Error types for decoding, framing and the auxiliary transport.
//!
//! Port failures live next to the port traits in [`crate::app::ports`].

use core::fmt;

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload bytes are not UTF-8.
    Utf8,
    /// Payload is not valid JSON (carries the parser message).
    Json(String),
    /// Payload is valid JSON but not an object.
    NotAnObject,
    /// A required field is absent.
    MissingField(&'static str),
    /// A field has the wrong JSON type.
    WrongType(&'static str),
    /// A field is numeric but outside its accepted range.
    OutOfRange { field: &'static str, value: i64 },
    /// A voice command code outside the known vocabulary.
    UnknownVoiceCommand(i64),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => write!(f, "payload is not UTF-8"),
            Self::Json(msg) => write!(f, "invalid JSON: {msg}"),
            Self::NotAnObject => write!(f, "payload is not a JSON object"),
            Self::MissingField(field) => write!(f, "missing field '{field}'"),
            Self::WrongType(field) => write!(f, "field '{field}' has the wrong type"),
            Self::OutOfRange { field, value } => {
                write!(f, "field '{field}' out of range: {value}")
            }
            Self::UnknownVoiceCommand(code) => write!(f, "unknown voice command {code}"),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Frame errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// A line grew past the configured maximum before its delimiter arrived.
    Overflow { limit: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow { limit } => write!(f, "frame exceeds {limit} bytes"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum TransportError {
    /// The device could not be opened.
    Open { path: String, reason: String },
    /// A read or write on an open device failed.
    Io(std::io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, reason } => write!(f, "cannot open {path}: {reason}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl std::error::Error for TransportError {}
