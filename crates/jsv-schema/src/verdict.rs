//! # Verdicts
//!
//! The Verdict Aggregator folds the walker's violation list into the
//! `{valid, errors}` result callers consume.

use std::fmt;

use jsv_core::InstancePath;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationRecord {
    path: InstancePath,
    keyword: String,
    message: String,
}

impl ViolationRecord {
    pub fn new(path: InstancePath, keyword: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            keyword: keyword.into(),
            message: message.into(),
        }
    }

    /// Location of the failing value within the instance.
    pub fn path(&self) -> &InstancePath {
        &self.path
    }

    /// The keyword that failed (`type`, `minLength`, `required`, ...).
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ViolationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "  (root) [{}]: {}", self.keyword, self.message)
        } else {
            write!(f, "  {} [{}]: {}", self.path, self.keyword, self.message)
        }
    }
}

/// Serialized with both the segment array and its JSON Pointer rendering.
impl Serialize for ViolationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ViolationRecord", 4)?;
        s.serialize_field("path", &self.path)?;
        s.serialize_field("pointer", &self.path.to_pointer())?;
        s.serialize_field("keyword", &self.keyword)?;
        s.serialize_field("message", &self.message)?;
        s.end()
    }
}

/// Outcome of one validation call. `valid` iff there are no violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    valid: bool,
    #[serde(rename = "errors")]
    violations: Vec<ViolationRecord>,
}

impl Verdict {
    /// A passing verdict.
    pub fn pass() -> Self {
        Self {
            valid: true,
            violations: Vec::new(),
        }
    }

    /// A failing verdict with one root-level record. Used to report a
    /// validation call that could not run at all.
    pub fn rejected(keyword: impl Into<String>, message: impl Into<String>) -> Self {
        aggregate(vec![ViolationRecord::new(InstancePath::root(), keyword, message)])
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Violations in evaluation order.
    pub fn violations(&self) -> &[ViolationRecord] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_violations(self) -> Vec<ViolationRecord> {
        self.violations
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return f.write_str("valid");
        }
        write!(f, "invalid ({} violation(s))", self.violations.len())?;
        for v in &self.violations {
            write!(f, "\n{v}")?;
        }
        Ok(())
    }
}

/// Fold walker output into a verdict. Total; order is preserved.
pub fn aggregate(violations: Vec<ViolationRecord>) -> Verdict {
    Verdict {
        valid: violations.is_empty(),
        violations,
    }
}
