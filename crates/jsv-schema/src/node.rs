//! # Constraint Tree
//!
//! [`SchemaNode`] is the compiled form of one schema object. Nodes are built
//! by the [`Compiler`](crate::Compiler), never mutated afterwards, and owned
//! by the [`CompiledSchema`](crate::CompiledSchema) handle.

use indexmap::{IndexMap, IndexSet};
use jsv_core::JsonType;
use serde_json::Value;

/// The dominant constraint family of a node.
///
/// Descriptive only: the walker evaluates every keyword a node carries,
/// whatever its kind. `Any` is the exception, and short-circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// No constraint. Every instance matches.
    Any,
    /// Only a `type` constraint.
    Type,
    /// `properties` and/or `required`.
    ObjectShape,
    /// `minLength`.
    StringConstraints,
}

/// One node of the compiled constraint tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub(crate) kind: NodeKind,
    pub(crate) type_expected: Option<Vec<JsonType>>,
    pub(crate) min_length: Option<u64>,
    pub(crate) properties: IndexMap<String, SchemaNode>,
    pub(crate) required: IndexSet<String>,
}

impl SchemaNode {
    /// A node that accepts everything.
    pub fn any() -> Self {
        Self {
            kind: NodeKind::Any,
            type_expected: None,
            min_length: None,
            properties: IndexMap::new(),
            required: IndexSet::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Accepted types, if `type` was present. Order follows the schema.
    pub fn type_expected(&self) -> Option<&[JsonType]> {
        self.type_expected.as_deref()
    }

    pub fn min_length(&self) -> Option<u64> {
        self.min_length
    }

    /// Child nodes in declaration order.
    pub fn properties(&self) -> &IndexMap<String, SchemaNode> {
        &self.properties
    }

    /// Required names in declaration order, duplicates collapsed.
    pub fn required(&self) -> &IndexSet<String> {
        &self.required
    }

    /// Whether `instance` satisfies this node's `type` constraint.
    /// Nodes without one accept every type.
    pub fn accepts_type(&self, instance: &Value) -> bool {
        match &self.type_expected {
            None => true,
            Some(types) => types.iter().any(|t| t.matches(instance)),
        }
    }

    /// Recompute `kind` from the fields that are set.
    pub(crate) fn classify(&mut self) {
        self.kind = if !self.properties.is_empty() || !self.required.is_empty() {
            NodeKind::ObjectShape
        } else if self.min_length.is_some() {
            NodeKind::StringConstraints
        } else if self.type_expected.is_some() {
            NodeKind::Type
        } else {
            NodeKind::Any
        };
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.properties.values().map(SchemaNode::node_count).sum::<usize>()
    }
}

impl Default for SchemaNode {
    fn default() -> Self {
        Self::any()
    }
}
