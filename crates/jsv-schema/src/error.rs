//! # Error Types
//!
//! Two failure classes exist and only one of them is an error:
//!
//! - [`SchemaError`] — the schema document is malformed. Raised by the
//!   compiler; no partial tree is ever returned.
//! - A failed match is NOT an error. It is a
//!   [`ViolationRecord`](crate::ViolationRecord) inside a
//!   [`Verdict`](crate::Verdict).
//!
//! [`EngineError`] is the hard-failure side of the engine boundary.

use jsv_core::{FingerprintError, JsonType};
use thiserror::Error;

/// The schema document is structurally invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A schema (root or nested) is not a JSON object.
    #[error("schema at {} must be an object, found {found}", display_pointer(.pointer))]
    NotAnObject {
        /// JSON Pointer to the offending schema within the document.
        pointer: String,
        /// The type actually found.
        found: JsonType,
    },

    /// A recognized keyword has a value of the wrong shape.
    #[error("invalid '{keyword}' at {}: {reason}", display_pointer(.pointer))]
    InvalidKeyword {
        /// JSON Pointer to the keyword value.
        pointer: String,
        /// The keyword name.
        keyword: &'static str,
        /// What is wrong with the value.
        reason: String,
    },

    /// A keyword outside the supported set, under the strict policy.
    #[error("unknown keyword '{keyword}' at {}", display_pointer(.pointer))]
    UnknownKeyword {
        /// JSON Pointer to the keyword.
        pointer: String,
        /// The keyword name.
        keyword: String,
    },

    /// `properties` nesting exceeded the configured limit.
    #[error("schema nesting exceeds depth limit {limit} at {}", display_pointer(.pointer))]
    DepthExceeded {
        /// JSON Pointer to the schema past the limit.
        pointer: String,
        /// The configured maximum depth.
        limit: usize,
    },
}

impl SchemaError {
    /// JSON Pointer into the schema document where compilation failed.
    pub fn pointer(&self) -> &str {
        match self {
            Self::NotAnObject { pointer, .. }
            | Self::InvalidKeyword { pointer, .. }
            | Self::UnknownKeyword { pointer, .. }
            | Self::DepthExceeded { pointer, .. } => pointer,
        }
    }
}

/// A validation call that could not produce a verdict.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The schema failed to compile.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The schema could not be fingerprinted for the compile cache.
    #[error("fingerprint error: {0}")]
    Fingerprint(#[from] FingerprintError),

    /// The backing validator rejected the schema or failed internally.
    #[error("{engine} engine error: {reason}")]
    Backend {
        /// Name of the engine that failed.
        engine: &'static str,
        /// Backend-supplied description.
        reason: String,
    },
}

pub(crate) fn display_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "(root)".to_string()
    } else {
        format!("'{pointer}'")
    }
}
