//! # Validator Configuration
//!
//! Knobs that change how schemas compile and how strings are measured.
//! Loadable from a YAML or JSON file; every field has a default, so an
//! empty file is a valid configuration.
//!
//! ```yaml
//! max_depth: 256
//! unknown_keywords: strict
//! length_policy: utf16_code_units
//! cache_compiled: false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bound on `properties` nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// What the compiler does with keywords it does not implement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownKeywordPolicy {
    /// Skip them; the schema is open to extension.
    #[default]
    Ignore,
    /// Reject the schema with [`SchemaError::UnknownKeyword`](crate::SchemaError::UnknownKeyword).
    Strict,
}

/// How `minLength` counts the length of a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthPolicy {
    /// Unicode scalar values. `"é"` (precomposed) is 1, `"😀"` is 1.
    #[default]
    CodePoints,
    /// UTF-16 code units, as JavaScript's `String.length`. `"😀"` is 2.
    Utf16CodeUnits,
}

impl LengthPolicy {
    /// Length of `s` under this policy.
    pub fn measure(&self, s: &str) -> u64 {
        let n = match self {
            Self::CodePoints => s.chars().count(),
            Self::Utf16CodeUnits => s.encode_utf16().count(),
        };
        n as u64
    }
}

/// Compiler and engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Maximum `properties` nesting depth accepted by the compiler.
    pub max_depth: usize,
    /// Treatment of unsupported keywords.
    pub unknown_keywords: UnknownKeywordPolicy,
    /// String length measure for `minLength`.
    pub length_policy: LengthPolicy,
    /// Whether [`NativeEngine`](crate::NativeEngine) caches compiled trees.
    pub cache_compiled: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            unknown_keywords: UnknownKeywordPolicy::default(),
            length_policy: LengthPolicy::default(),
            cache_compiled: true,
        }
    }
}

/// Error loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config '{path}': {source}")]
    Io {
        /// Path of the config file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid configuration document.
    #[error("invalid config '{path}': {reason}")]
    Parse {
        /// Path of the config file.
        path: String,
        /// Parser message.
        reason: String,
    },
}

impl ValidatorConfig {
    /// Parse a configuration from YAML (or JSON, which YAML accepts).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed input or unknown fields.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>")
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::parse(&content, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), ?config, "loaded validator config");
        Ok(config)
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        // An empty YAML document deserializes as null, not as an empty map.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.max_depth, 1000);
        assert_eq!(config.unknown_keywords, UnknownKeywordPolicy::Ignore);
        assert_eq!(config.length_policy, LengthPolicy::CodePoints);
        assert!(config.cache_compiled);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ValidatorConfig::from_yaml_str("unknown_keywords: strict\n").unwrap();
        assert_eq!(config.unknown_keywords, UnknownKeywordPolicy::Strict);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_json_config_accepted() {
        let config =
            ValidatorConfig::from_yaml_str(r#"{"length_policy": "utf16_code_units", "max_depth": 8}"#)
                .unwrap();
        assert_eq!(config.length_policy, LengthPolicy::Utf16CodeUnits);
        assert_eq!(config.max_depth, 8);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(ValidatorConfig::from_yaml_str("").unwrap(), ValidatorConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ValidatorConfig::from_yaml_str("max_dpeth: 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cache_compiled: false").unwrap();
        let config = ValidatorConfig::from_file(file.path()).unwrap();
        assert!(!config.cache_compiled);
    }

    #[test]
    fn test_missing_file() {
        let err = ValidatorConfig::from_file("/nonexistent/jsv.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_length_policies_differ_on_astral_chars() {
        let s = "a\u{1F600}";
        assert_eq!(LengthPolicy::CodePoints.measure(s), 2);
        assert_eq!(LengthPolicy::Utf16CodeUnits.measure(s), 3);
        assert_eq!(LengthPolicy::CodePoints.measure("foo"), 3);
    }
}
