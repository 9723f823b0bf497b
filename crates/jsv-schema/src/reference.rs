//! # Reference Engine
//!
//! Wraps the `jsonschema` crate behind [`SchemaEngine`] so its results can
//! be compared with [`NativeEngine`](crate::NativeEngine) under the same
//! `{valid, errors}` contract.
//!
//! ## Offline Resolution
//!
//! Remote `$ref` resolution is not part of this engine. A retriever is
//! installed that never touches the network: every external URI resolves
//! to the permissive schema `{}`.
//!
//! ## Keyword Check
//!
//! The `jsonschema` crate accepts any keyword it does not know. With
//! [`ReferenceEngine::with_keyword_check`], each schema is first run through
//! this crate's [`Compiler`] so the [`UnknownKeywordPolicy`] and depth limit
//! of a [`ValidatorConfig`] apply to both backends alike. String lengths are
//! always counted in code points here.
//!
//! [`UnknownKeywordPolicy`]: crate::UnknownKeywordPolicy

use jsonschema::{Draft, Retrieve, Uri};
use jsv_core::InstancePath;
use serde_json::Value;

use crate::compile::Compiler;
use crate::config::ValidatorConfig;
use crate::engine::SchemaEngine;
use crate::error::EngineError;
use crate::verdict::{aggregate, Verdict, ViolationRecord};

/// Resolves every external `$ref` to `{}`.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(uri = uri.as_str(), "external $ref replaced with permissive schema");
        Ok(serde_json::json!({}))
    }
}

/// The `jsonschema` crate, pinned to one draft.
#[derive(Debug, Clone)]
pub struct ReferenceEngine {
    draft: Draft,
    keyword_check: Option<ValidatorConfig>,
}

impl ReferenceEngine {
    pub fn new(draft: Draft) -> Self {
        Self {
            draft,
            keyword_check: None,
        }
    }

    /// Compile every schema with `config` before handing it to the backend,
    /// rejecting what the native engine would reject.
    pub fn with_keyword_check(mut self, config: ValidatorConfig) -> Self {
        self.keyword_check = Some(config);
        self
    }

    pub fn draft(&self) -> Draft {
        self.draft
    }

    pub fn keyword_check(&self) -> Option<&ValidatorConfig> {
        self.keyword_check.as_ref()
    }
}

impl Default for ReferenceEngine {
    /// Draft 4, the dialect whose `type`/`required` semantics this
    /// workspace implements.
    fn default() -> Self {
        Self::new(Draft::Draft4)
    }
}

impl SchemaEngine for ReferenceEngine {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn validate(&self, schema: &Value, instance: &Value) -> Result<Verdict, EngineError> {
        if let Some(config) = &self.keyword_check {
            Compiler::new(config).compile(schema)?;
        }

        let mut opts = jsonschema::options();
        opts.with_draft(self.draft);
        opts.with_retriever(OfflineRetriever);

        let validator = opts.build(schema).map_err(|e| EngineError::Backend {
            engine: self.name(),
            reason: e.to_string(),
        })?;

        let violations: Vec<ViolationRecord> = validator
            .iter_errors(instance)
            .map(|e| {
                let pointer = e.instance_path.to_string();
                let path = InstancePath::resolve_pointer(&pointer, instance).unwrap_or_default();
                let schema_path = e.schema_path.to_string();
                let keyword = schema_path.rsplit('/').next().unwrap_or_default().to_string();
                ViolationRecord::new(path, keyword, e.to_string())
            })
            .collect();

        Ok(aggregate(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnknownKeywordPolicy;
    use crate::error::SchemaError;
    use serde_json::json;

    #[test]
    fn test_reference_type_mismatch() {
        let verdict = ReferenceEngine::default()
            .validate(&json!({"type": "string"}), &json!(5))
            .unwrap();
        assert!(!verdict.is_valid());
        assert_eq!(verdict.violations()[0].keyword(), "type");
    }

    #[test]
    fn test_reference_nested_path() {
        let verdict = ReferenceEngine::default()
            .validate(
                &json!({"type": "object", "properties": {"foo": {"type": "string"}}}),
                &json!({"foo": 3}),
            )
            .unwrap();
        assert_eq!(verdict.len(), 1);
        assert_eq!(verdict.violations()[0].path().to_pointer(), "/foo");
    }

    #[test]
    fn test_reference_required() {
        let verdict = ReferenceEngine::default()
            .validate(&json!({"type": "object", "required": ["foo"]}), &json!({"bar": 1}))
            .unwrap();
        assert!(!verdict.is_valid());
        assert_eq!(verdict.violations()[0].keyword(), "required");
    }

    #[test]
    fn test_reference_rejects_malformed_schema() {
        let err = ReferenceEngine::default()
            .validate(&json!({"type": 12}), &json!(null))
            .unwrap_err();
        assert!(matches!(err, EngineError::Backend { engine: "reference", .. }));
    }

    #[test]
    fn test_reference_strict_rejects_unknown_keyword() {
        let schema = json!({"type": "string", "format": "x-unknown"});
        let lenient = ReferenceEngine::default();
        assert!(lenient.validate(&schema, &json!("ab")).unwrap().is_valid());

        let strict = ReferenceEngine::default().with_keyword_check(ValidatorConfig {
            unknown_keywords: UnknownKeywordPolicy::Strict,
            ..ValidatorConfig::default()
        });
        let err = strict.validate(&schema, &json!("ab")).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Schema(SchemaError::UnknownKeyword { .. })
        ));
    }

    #[test]
    fn test_reference_keyword_check_applies_depth_limit() {
        let engine = ReferenceEngine::default().with_keyword_check(ValidatorConfig {
            max_depth: 1,
            ..ValidatorConfig::default()
        });
        let schema = json!({"properties": {"a": {"properties": {"b": {}}}}});
        let err = engine.validate(&schema, &json!({})).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Schema(SchemaError::DepthExceeded { .. })
        ));
    }
}
