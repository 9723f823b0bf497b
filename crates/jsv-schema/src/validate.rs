//! # Compiled Schemas
//!
//! [`CompiledSchema`] is the handle callers hold: a constraint tree plus
//! the walker settings it was compiled under. Compile once, validate many
//! times.
//!
//! ## Thread Safety
//!
//! `CompiledSchema` is `Send + Sync` and never mutated after construction.
//! Wrap it in an `Arc` to validate from many threads without locking.

use jsv_core::InstancePath;
use serde_json::Value;

use crate::compile::Compiler;
use crate::config::ValidatorConfig;
use crate::error::SchemaError;
use crate::node::SchemaNode;
use crate::verdict::{aggregate, Verdict};
use crate::walk::Walker;

/// A schema document compiled into an immutable constraint tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSchema {
    root: SchemaNode,
    walker: Walker,
}

impl CompiledSchema {
    /// Compile `schema` under `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the document is malformed. No partial
    /// tree is returned.
    pub fn compile(schema: &Value, config: &ValidatorConfig) -> Result<Self, SchemaError> {
        let root = Compiler::new(config).compile(schema)?;
        Ok(Self {
            root,
            walker: Walker::new(config.length_policy),
        })
    }

    /// The root of the constraint tree.
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Validate `instance`. Never fails; a mismatch is reported in the
    /// returned verdict.
    pub fn validate(&self, instance: &Value) -> Verdict {
        let mut path = InstancePath::root();
        let violations = self.walker.walk(&self.root, instance, &mut path);
        tracing::trace!(violations = violations.len(), "validated instance");
        aggregate(violations)
    }

    /// Shorthand for `self.validate(instance).is_valid()`.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance).is_valid()
    }
}

/// Compile `schema` with the default configuration.
///
/// # Errors
///
/// Returns [`SchemaError`] if the document is malformed.
pub fn compile(schema: &Value) -> Result<CompiledSchema, SchemaError> {
    CompiledSchema::compile(schema, &ValidatorConfig::default())
}

/// One-shot compile and validate with the default configuration.
///
/// # Errors
///
/// Returns [`SchemaError`] if the schema is malformed. Instance mismatches
/// are reported in the `Ok` verdict.
pub fn validate(schema: &Value, instance: &Value) -> Result<Verdict, SchemaError> {
    Ok(compile(schema)?.validate(instance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LengthPolicy;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_simple_integer_instance() {
        let verdict = validate(&json!({"type": "integer"}), &json!(5)).unwrap();
        assert!(verdict.is_valid());
    }

    #[test]
    fn test_simple_string_instance() {
        assert!(validate(&json!({"type": "string"}), &json!("foo")).unwrap().is_valid());
    }

    #[test]
    fn test_number_where_string_expected() {
        let verdict = validate(&json!({"type": "string"}), &json!(5)).unwrap();
        assert!(!verdict.is_valid());
        assert_eq!(verdict.len(), 1);
        assert_eq!(verdict.violations()[0].keyword(), "type");
    }

    #[test]
    fn test_malformed_schema_is_error_not_verdict() {
        let err = validate(&json!({"required": "foo"}), &json!({})).unwrap_err();
        assert_eq!(err.pointer(), "/required");
    }

    #[test]
    fn test_revalidation_is_identical() {
        let schema = compile(&json!({"type": "string", "minLength": 4})).unwrap();
        assert_eq!(schema.validate(&json!("foo")), schema.validate(&json!("foo")));
    }

    #[test]
    fn test_config_length_policy_reaches_walker() {
        let config = ValidatorConfig {
            length_policy: LengthPolicy::Utf16CodeUnits,
            ..ValidatorConfig::default()
        };
        let schema = CompiledSchema::compile(&json!({"minLength": 2}), &config).unwrap();
        assert!(schema.is_valid(&json!("\u{1F600}")));
    }

    #[test]
    fn test_shared_across_threads() {
        let schema = Arc::new(
            compile(&json!({
                "type": "object",
                "properties": {"n": {"type": "integer"}},
                "required": ["n"]
            }))
            .unwrap(),
        );

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let schema = Arc::clone(&schema);
                std::thread::spawn(move || {
                    let good = schema.is_valid(&json!({"n": i}));
                    let bad = schema.is_valid(&json!({"n": "x"}));
                    (good, bad)
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), (true, false));
        }
    }
}
