//! # Instance Paths
//!
//! An [`InstancePath`] locates a value inside a JSON instance as a sequence
//! of object keys and array indices. The walker pushes and pops segments
//! while descending; violation records keep an owned snapshot.
//!
//! Paths render as RFC 6901 JSON Pointers (`/address/lines/0`). Parsing a
//! pointer back into typed segments needs the instance it points into,
//! because `/0` is an index into an array but a key into an object.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PointerError;

/// One step into a JSON instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array element by position.
    Index(usize),
    /// Object member by key.
    Key(String),
}

impl PathSegment {
    /// Escape this segment as a JSON Pointer reference token.
    pub fn to_pointer_token(&self) -> String {
        match self {
            Self::Index(i) => i.to_string(),
            Self::Key(k) => k.replace('~', "~0").replace('/', "~1"),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => f.write_str(k),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Location of a value within a JSON instance. Empty means the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstancePath(Vec<PathSegment>);

impl InstancePath {
    /// The root of the instance.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Whether this path addresses the root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Alias of [`is_root`](Self::is_root).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The segments from root to leaf.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Append a segment in place.
    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.0.push(segment.into());
    }

    /// Remove the last segment in place.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    /// A new path with `segment` appended.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut next = self.clone();
        next.push(segment);
        next
    }

    /// Render as an RFC 6901 JSON Pointer. The root renders as `""`.
    pub fn to_pointer(&self) -> String {
        self.0
            .iter()
            .map(|s| format!("/{}", s.to_pointer_token()))
            .collect()
    }

    /// Parse a JSON Pointer, typing each token by walking `instance`.
    ///
    /// A token becomes an [`PathSegment::Index`] when the value it indexes
    /// is an array and the token is a valid decimal index; otherwise it is a
    /// [`PathSegment::Key`]. Once the walk leaves the instance (the pointer
    /// names a missing member) the remaining tokens are keys.
    ///
    /// # Errors
    ///
    /// Returns [`PointerError`] if the pointer is not empty and does not
    /// start with `/`, or contains a `~` not followed by `0` or `1`.
    pub fn resolve_pointer(pointer: &str, instance: &Value) -> Result<Self, PointerError> {
        let tokens = pointer_tokens(pointer)?;
        let mut segments = Vec::with_capacity(tokens.len());
        let mut cursor = Some(instance);

        for token in tokens {
            let segment = match cursor {
                Some(Value::Array(items)) => match parse_index(&token) {
                    Some(i) => {
                        cursor = items.get(i);
                        PathSegment::Index(i)
                    }
                    None => {
                        cursor = None;
                        PathSegment::Key(token)
                    }
                },
                Some(Value::Object(map)) => {
                    cursor = map.get(&token);
                    PathSegment::Key(token)
                }
                _ => {
                    cursor = None;
                    PathSegment::Key(token)
                }
            };
            segments.push(segment);
        }

        Ok(Self(segments))
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

impl FromIterator<PathSegment> for InstancePath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Split a JSON Pointer into unescaped reference tokens.
fn pointer_tokens(pointer: &str) -> Result<Vec<String>, PointerError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = pointer.strip_prefix('/') else {
        return Err(PointerError::MissingLeadingSlash(pointer.to_string()));
    };

    let mut tokens = Vec::new();
    let mut offset = 1;
    for raw in rest.split('/') {
        let mut token = String::with_capacity(raw.len());
        let mut chars = raw.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c != '~' {
                token.push(c);
                continue;
            }
            match chars.next() {
                Some((_, '0')) => token.push('~'),
                Some((_, '1')) => token.push('/'),
                _ => {
                    return Err(PointerError::InvalidEscape {
                        pointer: pointer.to_string(),
                        position: offset + i,
                    })
                }
            }
        }
        tokens.push(token);
        offset += raw.len() + 1;
    }
    Ok(tokens)
}

/// RFC 6901 array index: `0` or a decimal without leading zeros.
fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
