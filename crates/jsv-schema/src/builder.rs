//! # Schema Builder
//!
//! Programmatic construction of schema documents. The output of
//! [`SchemaBuilder::build`] is an ordinary `serde_json::Value`, identical to
//! the hand-written document, and goes through the compiler like any other.
//!
//! ```
//! use jsv_schema::SchemaBuilder;
//! use serde_json::json;
//!
//! let schema = SchemaBuilder::object()
//!     .property("foo", SchemaBuilder::string(), true)
//!     .build();
//! assert_eq!(schema, json!({
//!     "type": "object",
//!     "properties": {"foo": {"type": "string"}},
//!     "required": ["foo"]
//! }));
//! ```

use jsv_core::JsonType;
use serde_json::{Map, Value};

use crate::compile::{MIN_LENGTH, PROPERTIES, REQUIRED, TYPE};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaBuilder {
    json_type: Option<JsonType>,
    min_length: Option<u64>,
    properties: Vec<(String, SchemaBuilder)>,
    required: Vec<String>,
}

impl SchemaBuilder {
    /// `{}` — accepts anything.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn of_type(json_type: JsonType) -> Self {
        Self {
            json_type: Some(json_type),
            ..Self::default()
        }
    }

    pub fn object() -> Self {
        Self::of_type(JsonType::Object)
    }

    pub fn string() -> Self {
        Self::of_type(JsonType::String)
    }

    pub fn integer() -> Self {
        Self::of_type(JsonType::Integer)
    }

    pub fn number() -> Self {
        Self::of_type(JsonType::Number)
    }

    pub fn boolean() -> Self {
        Self::of_type(JsonType::Boolean)
    }

    pub fn null() -> Self {
        Self::of_type(JsonType::Null)
    }

    pub fn array() -> Self {
        Self::of_type(JsonType::Array)
    }

    /// Declare a property. Redeclaring a name replaces its schema in place
    /// and keeps its original position.
    pub fn property(mut self, name: impl Into<String>, schema: SchemaBuilder, required: bool) -> Self {
        let name = name.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = schema,
            None => self.properties.push((name.clone(), schema)),
        }
        if required && !self.required.contains(&name) {
            self.required.push(name);
        }
        self
    }

    pub fn min_length(mut self, min: u64) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Emit the schema document. Keys appear in the order `type`,
    /// `minLength`, `properties`, `required`; empty collections are omitted.
    pub fn build(&self) -> Value {
        let mut doc = Map::new();
        if let Some(t) = self.json_type {
            doc.insert(TYPE.to_string(), Value::String(t.as_str().to_string()));
        }
        if let Some(min) = self.min_length {
            doc.insert(MIN_LENGTH.to_string(), Value::from(min));
        }
        if !self.properties.is_empty() {
            let properties: Map<String, Value> = self
                .properties
                .iter()
                .map(|(name, child)| (name.clone(), child.build()))
                .collect();
            doc.insert(PROPERTIES.to_string(), Value::Object(properties));
        }
        if !self.required.is_empty() {
            let required = self.required.iter().cloned().map(Value::String).collect();
            doc.insert(REQUIRED.to_string(), Value::Array(required));
        }
        Value::Object(doc)
    }
}

impl From<SchemaBuilder> for Value {
    fn from(builder: SchemaBuilder) -> Self {
        builder.build()
    }
}
