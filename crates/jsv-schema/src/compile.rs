//! # Schema Compiler
//!
//! Translates a schema document into a [`SchemaNode`] tree. Keywords are
//! read in document order; the first malformed keyword aborts compilation
//! and no partial tree escapes.
//!
//! Nesting through `properties` is handled by recursion and bounded by
//! [`ValidatorConfig::max_depth`], so a pathological document fails with
//! [`SchemaError::DepthExceeded`] instead of exhausting the stack.

use indexmap::{IndexMap, IndexSet};
use jsv_core::{InstancePath, JsonType};
use serde_json::{Number, Value};

use crate::config::{UnknownKeywordPolicy, ValidatorConfig};
use crate::error::SchemaError;
use crate::node::SchemaNode;

pub(crate) const TYPE: &str = "type";
pub(crate) const MIN_LENGTH: &str = "minLength";
pub(crate) const PROPERTIES: &str = "properties";
pub(crate) const REQUIRED: &str = "required";

/// Keywords that carry no validation semantics. Accepted under every
/// [`UnknownKeywordPolicy`].
const ANNOTATIONS: &[&str] = &[
    "$schema",
    "$id",
    "id",
    "$comment",
    "title",
    "description",
    "default",
    "examples",
];

/// Compiles schema documents under one configuration.
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'c> {
    config: &'c ValidatorConfig,
}

impl<'c> Compiler<'c> {
    pub fn new(config: &'c ValidatorConfig) -> Self {
        Self { config }
    }

    /// Compile `schema` into a constraint tree.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if any schema in the document is not an
    /// object, a supported keyword has a malformed value, an unsupported
    /// keyword appears under [`UnknownKeywordPolicy::Strict`], or nesting
    /// exceeds the depth limit.
    pub fn compile(&self, schema: &Value) -> Result<SchemaNode, SchemaError> {
        let mut at = InstancePath::root();
        let root = self.compile_node(schema, &mut at, 0)?;
        tracing::debug!(
            nodes = root.node_count(),
            kind = ?root.kind(),
            "compiled schema"
        );
        Ok(root)
    }

    fn compile_node(
        &self,
        schema: &Value,
        at: &mut InstancePath,
        depth: usize,
    ) -> Result<SchemaNode, SchemaError> {
        if depth > self.config.max_depth {
            return Err(SchemaError::DepthExceeded {
                pointer: at.to_pointer(),
                limit: self.config.max_depth,
            });
        }

        let Value::Object(map) = schema else {
            return Err(SchemaError::NotAnObject {
                pointer: at.to_pointer(),
                found: JsonType::of(schema),
            });
        };

        let mut node = SchemaNode::any();
        for (keyword, value) in map {
            at.push(keyword.as_str());
            match keyword.as_str() {
                TYPE => node.type_expected = Some(parse_type(value, at)?),
                MIN_LENGTH => node.min_length = Some(parse_min_length(value, at)?),
                PROPERTIES => node.properties = self.compile_properties(value, at, depth)?,
                REQUIRED => node.required = parse_required(value, at)?,
                other if ANNOTATIONS.contains(&other) => {}
                other => match self.config.unknown_keywords {
                    UnknownKeywordPolicy::Ignore => {
                        tracing::debug!(keyword = other, pointer = %at, "ignoring unknown keyword");
                    }
                    UnknownKeywordPolicy::Strict => {
                        return Err(SchemaError::UnknownKeyword {
                            pointer: at.to_pointer(),
                            keyword: other.to_string(),
                        });
                    }
                },
            }
            at.pop();
        }

        node.classify();
        Ok(node)
    }

    fn compile_properties(
        &self,
        value: &Value,
        at: &mut InstancePath,
        depth: usize,
    ) -> Result<IndexMap<String, SchemaNode>, SchemaError> {
        let Value::Object(entries) = value else {
            return Err(invalid(
                PROPERTIES,
                at,
                format!("must be an object, found {}", JsonType::of(value)),
            ));
        };

        let mut properties = IndexMap::with_capacity(entries.len());
        for (name, child) in entries {
            at.push(name.as_str());
            let compiled = self.compile_node(child, at, depth + 1)?;
            at.pop();
            properties.insert(name.clone(), compiled);
        }
        Ok(properties)
    }
}

fn invalid(keyword: &'static str, at: &InstancePath, reason: impl Into<String>) -> SchemaError {
    SchemaError::InvalidKeyword {
        pointer: at.to_pointer(),
        keyword,
        reason: reason.into(),
    }
}

/// `"string"` or `["string", "null"]`.
fn parse_type(value: &Value, at: &mut InstancePath) -> Result<Vec<JsonType>, SchemaError> {
    match value {
        Value::String(name) => name
            .parse::<JsonType>()
            .map(|t| vec![t])
            .map_err(|e| invalid(TYPE, at, e.to_string())),
        Value::Array(names) if names.is_empty() => {
            Err(invalid(TYPE, at, "type list must not be empty"))
        }
        Value::Array(names) => {
            let mut types = Vec::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                at.push(i);
                let parsed = match name {
                    Value::String(s) => s.parse::<JsonType>().map_err(|e| invalid(TYPE, at, e.to_string())),
                    other => Err(invalid(
                        TYPE,
                        at,
                        format!("type names must be strings, found {}", JsonType::of(other)),
                    )),
                };
                at.pop();
                let parsed = parsed?;
                if !types.contains(&parsed) {
                    types.push(parsed);
                }
            }
            Ok(types)
        }
        other => Err(invalid(
            TYPE,
            at,
            format!("must be a string or an array of strings, found {}", JsonType::of(other)),
        )),
    }
}

/// A non-negative integer. `3.0` is accepted as `3`.
fn parse_min_length(value: &Value, at: &InstancePath) -> Result<u64, SchemaError> {
    let Value::Number(n) = value else {
        return Err(invalid(
            MIN_LENGTH,
            at,
            format!("must be a non-negative integer, found {}", JsonType::of(value)),
        ));
    };
    non_negative_integer(n)
        .ok_or_else(|| invalid(MIN_LENGTH, at, format!("must be a non-negative integer, found {n}")))
}

fn non_negative_integer(n: &Number) -> Option<u64> {
    if let Some(u) = n.as_u64() {
        return Some(u);
    }
    let f = n.as_f64()?;
    // Precision above 2^53 is lost in f64 anyway.
    if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

fn parse_required(value: &Value, at: &mut InstancePath) -> Result<IndexSet<String>, SchemaError> {
    let Value::Array(names) = value else {
        return Err(invalid(
            REQUIRED,
            at,
            format!("must be an array of strings, found {}", JsonType::of(value)),
        ));
    };

    let mut required = IndexSet::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        match name {
            Value::String(s) => {
                required.insert(s.clone());
            }
            other => {
                at.push(i);
                let err = invalid(
                    REQUIRED,
                    at,
                    format!("entries must be strings, found {}", JsonType::of(other)),
                );
                at.pop();
                return Err(err);
            }
        }
    }
    Ok(required)
}
