//! # Validation Engines
//!
//! [`SchemaEngine`] is the one interface callers validate through:
//! `validate(schema, instance) -> Verdict`. Each backend is an
//! implementation of it:
//!
//! - [`NativeEngine`] — this crate's compiler and walker, with a
//!   compiled-tree cache keyed by [`SchemaFingerprint`].
//! - [`ReferenceEngine`](crate::ReferenceEngine) — the `jsonschema` crate.
//!
//! A call either yields a verdict or a hard failure ([`EngineError`]).
//! [`validate_or_reject`] and [`BoundValidator`] fold the hard failure into
//! a failing verdict for callers that only want `{valid, errors}`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use jsv_core::SchemaFingerprint;
use serde_json::Value;

use crate::config::ValidatorConfig;
use crate::error::EngineError;
use crate::validate::CompiledSchema;
use crate::verdict::Verdict;

/// Keyword of the record reported when a validation call cannot run.
pub const REJECTED_KEYWORD: &str = "schema";

/// A backend that validates instances against schema documents.
pub trait SchemaEngine: Send + Sync {
    /// Short backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// Validate `instance` against `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when no verdict can be produced, typically
    /// because the schema is malformed.
    fn validate(&self, schema: &Value, instance: &Value) -> Result<Verdict, EngineError>;

    /// Compile `schema` once for repeated validation, if this backend has
    /// a reusable compiled form. `None` means every call goes through
    /// [`validate`](Self::validate).
    fn prepare(&self, _schema: &Value) -> Option<Arc<CompiledSchema>> {
        None
    }
}

/// Validate, folding a hard failure into a single-record failing verdict.
pub fn validate_or_reject(engine: &dyn SchemaEngine, schema: &Value, instance: &Value) -> Verdict {
    match engine.validate(schema, instance) {
        Ok(verdict) => verdict,
        Err(e) => {
            tracing::debug!(engine = engine.name(), error = %e, "validation call rejected");
            Verdict::rejected(REJECTED_KEYWORD, e.to_string())
        }
    }
}

/// A schema bound to an engine: `validate(instance) -> Verdict`.
///
/// When the engine can [`prepare`](SchemaEngine::prepare) the schema, the
/// compiled tree is held here and instances are walked against it directly.
pub struct BoundValidator<'e> {
    engine: &'e dyn SchemaEngine,
    schema: Value,
    prepared: Option<Arc<CompiledSchema>>,
}

impl<'e> BoundValidator<'e> {
    pub fn new(engine: &'e dyn SchemaEngine, schema: Value) -> Self {
        let prepared = engine.prepare(&schema);
        Self {
            engine,
            schema,
            prepared,
        }
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Whether instances skip the engine and use a held compiled tree.
    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    /// Validate `instance`. Never fails.
    pub fn validate(&self, instance: &Value) -> Verdict {
        match &self.prepared {
            Some(compiled) => compiled.validate(instance),
            None => validate_or_reject(self.engine, &self.schema, instance),
        }
    }
}

/// This crate's compiler and walker behind [`SchemaEngine`].
///
/// When [`ValidatorConfig::cache_compiled`] is set, compiled trees are kept
/// per schema fingerprint, so repeated calls with the same document skip
/// compilation. Schema errors are not cached.
///
/// The cache is unbounded: it holds one tree per distinct document until
/// [`clear_cache`](Self::clear_cache). Callers validating many instances
/// against one schema should bind it with [`BoundValidator`], which skips
/// the per-call fingerprint.
#[derive(Debug, Default)]
pub struct NativeEngine {
    config: ValidatorConfig,
    cache: RwLock<HashMap<SchemaFingerprint, Arc<CompiledSchema>>>,
}

impl NativeEngine {
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Compile `schema`, or fetch it from the cache.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Schema`] if the document is malformed.
    pub fn compiled(&self, schema: &Value) -> Result<Arc<CompiledSchema>, EngineError> {
        if !self.config.cache_compiled {
            return Ok(Arc::new(CompiledSchema::compile(schema, &self.config)?));
        }

        let fingerprint = SchemaFingerprint::of(schema)?;
        {
            // A poisoned cache still holds only fully compiled trees.
            let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(hit) = cache.get(&fingerprint) {
                tracing::trace!(%fingerprint, "compiled schema cache hit");
                return Ok(Arc::clone(hit));
            }
        }

        let compiled = Arc::new(CompiledSchema::compile(schema, &self.config)?);
        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        // Another thread may have compiled the same document meanwhile.
        let shared = Arc::clone(cache.entry(fingerprint).or_insert(compiled));
        tracing::debug!(%fingerprint, cached = cache.len(), "compiled schema cached");
        Ok(shared)
    }

    /// Number of cached compiled trees.
    pub fn cached_count(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or_else(|e| e.into_inner().len())
    }

    /// Drop every cached tree.
    pub fn clear_cache(&self) {
        self.cache.write().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl SchemaEngine for NativeEngine {
    fn name(&self) -> &'static str {
        "native"
    }

    fn validate(&self, schema: &Value, instance: &Value) -> Result<Verdict, EngineError> {
        Ok(self.compiled(schema)?.validate(instance))
    }

    /// Malformed schemas are not prepared, so their error is reported on
    /// every call.
    fn prepare(&self, schema: &Value) -> Option<Arc<CompiledSchema>> {
        self.compiled(schema).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnknownKeywordPolicy;
    use serde_json::json;

    #[test]
    fn test_cache_reuses_compiled_tree() {
        let engine = NativeEngine::default();
        let schema = json!({"type": "string"});
        let a = engine.compiled(&schema).unwrap();
        let b = engine.compiled(&schema).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(engine.cached_count(), 1);
    }

    #[test]
    fn test_cache_disabled() {
        let engine = NativeEngine::new(ValidatorConfig {
            cache_compiled: false,
            ..ValidatorConfig::default()
        });
        let schema = json!({"type": "string"});
        let a = engine.compiled(&schema).unwrap();
        let b = engine.compiled(&schema).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(engine.cached_count(), 0);
    }

    #[test]
    fn test_schema_errors_are_not_cached() {
        let engine = NativeEngine::default();
        assert!(engine.validate(&json!({"minLength": -1}), &json!("x")).is_err());
        assert_eq!(engine.cached_count(), 0);
    }

    #[test]
    fn test_clear_cache() {
        let engine = NativeEngine::default();
        engine.compiled(&json!({})).unwrap();
        engine.clear_cache();
        assert_eq!(engine.cached_count(), 0);
    }

    #[test]
    fn test_validate_or_reject_folds_schema_error() {
        let engine = NativeEngine::new(ValidatorConfig {
            unknown_keywords: UnknownKeywordPolicy::Strict,
            ..ValidatorConfig::default()
        });
        let verdict = validate_or_reject(&engine, &json!({"maxLength": 2}), &json!("abc"));
        assert!(!verdict.is_valid());
        assert_eq!(verdict.len(), 1);
        assert_eq!(verdict.violations()[0].keyword(), REJECTED_KEYWORD);
        assert!(verdict.violations()[0].message().contains("maxLength"));
    }

    #[test]
    fn test_bound_validator_reuses_schema() {
        let engine = NativeEngine::default();
        let validator = BoundValidator::new(
            &engine,
            json!({"type": "object", "properties": {"foo": {"type": "string"}}}),
        );
        assert_eq!(validator.engine_name(), "native");
        assert!(validator.validate(&json!({"foo": "bar"})).is_valid());
        assert!(!validator.validate(&json!({"foo": 3})).is_valid());
        assert_eq!(engine.cached_count(), 1);
    }

    #[test]
    fn test_bound_validator_holds_compiled_tree() {
        let engine = NativeEngine::default();
        let validator = BoundValidator::new(&engine, json!({"type": "string", "minLength": 2}));
        assert!(validator.is_prepared());

        // Walks the held tree; the engine cache is not consulted again.
        engine.clear_cache();
        assert!(validator.validate(&json!("ab")).is_valid());
        assert!(!validator.validate(&json!("a")).is_valid());
        assert_eq!(engine.cached_count(), 0);
    }

    #[test]
    fn test_bound_validator_malformed_schema_rejects_each_call() {
        let engine = NativeEngine::default();
        let validator = BoundValidator::new(&engine, json!({"required": "foo"}));
        assert!(!validator.is_prepared());
        for _ in 0..2 {
            let verdict = validator.validate(&json!({}));
            assert_eq!(verdict.len(), 1);
            assert_eq!(verdict.violations()[0].keyword(), REJECTED_KEYWORD);
        }
    }

    #[test]
    fn test_engine_is_object_safe_and_shareable() {
        let engine: Arc<dyn SchemaEngine> = Arc::new(NativeEngine::default());
        let clone = Arc::clone(&engine);
        let verdict =
            std::thread::spawn(move || clone.validate(&json!({"type": "null"}), &json!(null)))
                .join()
                .unwrap()
                .unwrap();
        assert!(verdict.is_valid());
    }
}
