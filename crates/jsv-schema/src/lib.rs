//! # jsv-schema — JSON Schema Validation Engine
//!
//! Compiles a schema document once into an immutable constraint tree and
//! validates any number of instances against it.
//!
//! ## Pipeline
//!
//! ```text
//! schema ──compile──▶ SchemaNode tree ──walk(instance)──▶ Vec<ViolationRecord> ──aggregate──▶ Verdict
//! ```
//!
//! - [`compile`] — the Schema Compiler. Rejects malformed documents with a
//!   [`SchemaError`] carrying the JSON Pointer of the offending keyword.
//! - [`walk`] — the Instance Walker. Depth-first, pure, cannot fail:
//!   mismatches are data, not errors.
//! - [`verdict`] — the Verdict Aggregator and the `{valid, errors}` shape.
//!
//! ## Supported Keywords
//!
//! `type` (string or array of type names), `minLength`, `properties`,
//! `required`. Annotation keywords are accepted and ignored; other keywords
//! follow [`UnknownKeywordPolicy`].
//!
//! ## Engines
//!
//! [`SchemaEngine`] puts this crate's engine ([`NativeEngine`]) and the
//! `jsonschema` crate ([`ReferenceEngine`]) behind one `validate(schema,
//! instance)` contract so callers never depend on a specific backend.
//!
//! ## Crate Policy
//!
//! - Depends only on `jsv-core` internally.
//! - Compiled trees are immutable and `Send + Sync`.
//! - No `.unwrap()` outside tests.

pub mod builder;
pub mod compile;
pub mod config;
pub mod engine;
pub mod error;
pub mod node;
pub mod reference;
pub mod validate;
pub mod verdict;
pub mod walk;

pub use builder::SchemaBuilder;
pub use compile::Compiler;
pub use config::{ConfigError, LengthPolicy, UnknownKeywordPolicy, ValidatorConfig};
pub use engine::{validate_or_reject, BoundValidator, NativeEngine, SchemaEngine};
pub use error::{EngineError, SchemaError};
pub use node::{NodeKind, SchemaNode};
pub use reference::ReferenceEngine;
pub use validate::{compile, validate, CompiledSchema};
pub use verdict::{aggregate, Verdict, ViolationRecord};
pub use walk::Walker;
