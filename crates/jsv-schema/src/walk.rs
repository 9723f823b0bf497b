//! # Instance Walker
//!
//! Matches an instance against a [`SchemaNode`] tree depth-first and
//! collects a [`ViolationRecord`] for every failed constraint.
//!
//! ## Evaluation Order
//!
//! Per node: `type`, then `minLength`, then `required` (declaration order),
//! then `properties` (declaration order, recursing into present keys).
//! A `type` mismatch records one violation and skips the rest of the node.
//!
//! Keywords that do not apply to the instance's type are skipped:
//! `minLength` on a number, `required` on a string. That is what makes a
//! schema without `type` permissive about the instance's shape.
//!
//! The walker has no failure mode. Every `serde_json::Value` is a valid
//! input; a shape the schema does not expect is a violation, not a fault.

use jsv_core::{InstancePath, JsonType};
use serde_json::Value;

use crate::compile::{MIN_LENGTH, REQUIRED, TYPE};
use crate::config::LengthPolicy;
use crate::node::{NodeKind, SchemaNode};
use crate::verdict::ViolationRecord;

/// Walks instances against compiled trees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Walker {
    length_policy: LengthPolicy,
}

impl Walker {
    pub fn new(length_policy: LengthPolicy) -> Self {
        Self { length_policy }
    }

    pub fn length_policy(&self) -> LengthPolicy {
        self.length_policy
    }

    /// Collect every violation of `node` by `instance`, located relative
    /// to `path`. `path` is restored to its original value on return.
    pub fn walk(
        &self,
        node: &SchemaNode,
        instance: &Value,
        path: &mut InstancePath,
    ) -> Vec<ViolationRecord> {
        let mut out = Vec::new();
        self.walk_into(node, instance, path, &mut out);
        out
    }

    fn walk_into(
        &self,
        node: &SchemaNode,
        instance: &Value,
        path: &mut InstancePath,
        out: &mut Vec<ViolationRecord>,
    ) {
        if node.kind() == NodeKind::Any {
            return;
        }
        tracing::trace!(path = %path, kind = ?node.kind(), "walking node");

        if !node.accepts_type(instance) {
            out.push(ViolationRecord::new(
                path.clone(),
                TYPE,
                type_message(node.type_expected().unwrap_or_default(), instance),
            ));
            return;
        }

        match instance {
            Value::String(s) => self.check_string(node, s, path, out),
            Value::Object(map) => self.check_object(node, map, path, out),
            _ => {}
        }
    }

    fn check_string(
        &self,
        node: &SchemaNode,
        s: &str,
        path: &InstancePath,
        out: &mut Vec<ViolationRecord>,
    ) {
        let Some(min) = node.min_length() else {
            return;
        };
        let len = self.length_policy.measure(s);
        if len < min {
            out.push(ViolationRecord::new(
                path.clone(),
                MIN_LENGTH,
                format!("string is too short ({len}), minimum {min}"),
            ));
        }
    }

    fn check_object(
        &self,
        node: &SchemaNode,
        map: &serde_json::Map<String, Value>,
        path: &mut InstancePath,
        out: &mut Vec<ViolationRecord>,
    ) {
        for name in node.required() {
            if !map.contains_key(name) {
                out.push(ViolationRecord::new(
                    path.child(name.as_str()),
                    REQUIRED,
                    format!("missing required property '{name}'"),
                ));
            }
        }

        for (name, child) in node.properties() {
            let Some(value) = map.get(name) else {
                continue;
            };
            path.push(name.as_str());
            self.walk_into(child, value, path, out);
            path.pop();
        }
    }
}

fn type_message(expected: &[JsonType], instance: &Value) -> String {
    let found = JsonType::of(instance);
    match expected {
        [single] => format!("expected {single}, found {found}"),
        many => {
            let names: Vec<&str> = many.iter().map(JsonType::as_str).collect();
            format!("expected one of [{}], found {found}", names.join(", "))
        }
    }
}
