//! # Document Loading
//!
//! Reads schema and instance documents from disk. `.yaml`/`.yml` files are
//! parsed as YAML and converted to the JSON data model; everything else is
//! parsed as JSON.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use jsv_core::InstancePath;
use serde_json::Value;

/// Load a JSON or YAML document.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;

    if is_yaml(path) {
        let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML in {}", path.display()))?;
        yaml_to_json_value(&yaml)
            .with_context(|| format!("YAML-to-JSON conversion failed for {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display()))
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

fn is_document(path: &Path) -> bool {
    is_yaml(path) || path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Expand directories into the sorted list of documents beneath them.
/// Plain file arguments are kept as given, whatever their extension.
pub fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            collect_documents(path, &mut found);
            found.sort();
            out.extend(found);
        } else {
            out.push(path.clone());
        }
    }
    out
}

fn collect_documents(dir: &Path, acc: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory");
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            collect_documents(&path, acc);
        } else if is_document(&path) {
            acc.push(path);
        }
    }
}

/// Convert a YAML document to the JSON data model.
///
/// Tags are dropped and the tagged value converted. Mapping keys must be
/// strings, numbers or booleans, and must stay distinct once rendered as
/// JSON object keys. Errors name the offending location as a JSON Pointer.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value> {
    convert(yaml, &mut InstancePath::root())
}

fn convert(yaml: &serde_yaml::Value, at: &mut InstancePath) -> Result<Value> {
    use serde_yaml::Value as Yaml;

    let value = match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => json_number(n)
            .ok_or_else(|| anyhow!("number {n} at {} has no JSON form", location(at)))?,
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                at.push(index);
                let converted = convert(item, at);
                at.pop();
                out.push(converted?);
            }
            Value::Array(out)
        }
        Yaml::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (key, item) in map {
                let Some(name) = object_key(key) else {
                    bail!("mapping key at {} is not a scalar: {key:?}", location(at));
                };
                if object.contains_key(&name) {
                    bail!("duplicate key '{name}' at {}", location(at));
                }
                at.push(name.as_str());
                let converted = convert(item, at);
                at.pop();
                object.insert(name, converted?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => convert(&tagged.value, at)?,
    };
    Ok(value)
}

fn json_number(n: &serde_yaml::Number) -> Option<Value> {
    if let Some(i) = n.as_i64() {
        Some(Value::from(i))
    } else if let Some(u) = n.as_u64() {
        Some(Value::from(u))
    } else {
        n.as_f64().and_then(serde_json::Number::from_f64).map(Value::Number)
    }
}

fn object_key(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn location(at: &InstancePath) -> String {
    if at.is_root() {
        "(root)".to_string()
    } else {
        at.to_pointer()
    }
}
