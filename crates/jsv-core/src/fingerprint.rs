//! # Schema Fingerprints
//!
//! A [`SchemaFingerprint`] identifies a schema document by the SHA-256 of
//! its serialized bytes. It keys the compiled-schema cache.
//!
//! ## Invariant
//!
//! Keys are NOT sorted before hashing. Two documents that differ only in
//! `properties` declaration order compile to trees that report violations
//! in different orders, so they must not share a cache entry.

use std::fmt;

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::FingerprintError;

/// SHA-256 over the compact serialization of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaFingerprint([u8; 32]);

impl SchemaFingerprint {
    /// Fingerprint a schema document.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::Serialization`] if the document cannot
    /// be serialized.
    pub fn of(schema: &Value) -> Result<Self, FingerprintError> {
        let bytes = serde_json::to_vec(schema)?;
        let hash = Sha256::digest(&bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hash);
        Ok(Self(out))
    }

    /// The raw digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering of the digest.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for SchemaFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}
