//! # jsv-core — Foundational Types for the jsv Validation Engine
//!
//! Leaf crate of the workspace. It defines the vocabulary shared by the
//! schema compiler, the instance walker, the engine adapters, and the CLI.
//!
//! ## Key Design Principles
//!
//! 1. **Structured instance paths.** Violations locate their failure with an
//!    [`InstancePath`] of typed segments (object keys and array indices),
//!    rendered as an RFC 6901 JSON Pointer only at the display boundary.
//!
//! 2. **One JSON type vocabulary.** [`JsonType`] is the single definition of
//!    the seven type names a schema may expect. `integer` is a refinement of
//!    `number`: any number with a zero fractional part.
//!
//! 3. **Order-sensitive fingerprints.** [`SchemaFingerprint`] hashes the
//!    serialized schema document without reordering keys, because property
//!    declaration order determines violation order.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod fingerprint;
pub mod json_type;
pub mod path;

pub use error::{FingerprintError, PointerError, UnknownJsonType};
pub use fingerprint::SchemaFingerprint;
pub use json_type::JsonType;
pub use path::{InstancePath, PathSegment};
