//! # Error Types
//!
//! Errors raised by the foundational types. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Error while parsing an RFC 6901 JSON Pointer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PointerError {
    /// A non-empty pointer must begin with `/`.
    #[error("JSON pointer '{0}' must be empty or start with '/'")]
    MissingLeadingSlash(String),

    /// `~` must be followed by `0` or `1`.
    #[error("JSON pointer '{pointer}' has an invalid escape at byte {position}")]
    InvalidEscape {
        /// The pointer being parsed.
        pointer: String,
        /// Byte offset of the offending `~`.
        position: usize,
    },
}

/// A `type` name that is not one of the seven JSON types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown JSON type name '{0}'")]
pub struct UnknownJsonType(pub String);

/// Error while fingerprinting a schema document.
#[derive(Error, Debug)]
pub enum FingerprintError {
    /// The document could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
