//! # Check-Schema Subcommand
//!
//! Compiles schema documents without validating anything, reporting the
//! first structural error in each.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use jsv_schema::{CompiledSchema, ValidatorConfig};

use crate::document::load_document;
use crate::CompileFlags;

/// Arguments for `jsv check-schema`.
#[derive(Args, Debug)]
pub struct CheckSchemaArgs {
    /// Schema documents (JSON or YAML).
    #[arg(value_name = "FILE", required = true)]
    pub schemas: Vec<PathBuf>,

    #[command(flatten)]
    pub compile: CompileFlags,
}

/// Execute `jsv check-schema`.
///
/// Returns exit code: 0 if every schema compiles, 1 otherwise. An
/// unreadable schema file counts as a failure, not an operational error.
pub fn run_check_schema(args: &CheckSchemaArgs, config: &ValidatorConfig) -> Result<u8> {
    let mut failed = 0usize;
    for path in &args.schemas {
        let outcome = load_document(path).and_then(|doc| {
            CompiledSchema::compile(&doc, config).map_err(anyhow::Error::from)
        });
        match outcome {
            Ok(compiled) => {
                println!(
                    "OK: {} ({} node(s), root {:?})",
                    path.display(),
                    compiled.root().node_count(),
                    compiled.root().kind()
                );
            }
            Err(e) => {
                failed += 1;
                println!("FAIL: {} — {e:#}", path.display());
            }
        }
    }
    Ok(u8::from(failed > 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsv_schema::UnknownKeywordPolicy;

    #[test]
    fn test_check_schema() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        std::fs::write(&good, r#"{"type": "string", "minLength": 2}"#).unwrap();
        std::fs::write(&bad, r#"{"minLength": -2}"#).unwrap();

        let args = |schemas| CheckSchemaArgs {
            schemas,
            compile: CompileFlags::default(),
        };
        let config = ValidatorConfig::default();
        assert_eq!(run_check_schema(&args(vec![good.clone()]), &config).unwrap(), 0);
        assert_eq!(run_check_schema(&args(vec![good, bad]), &config).unwrap(), 1);
    }

    #[test]
    fn test_strict_check_rejects_unknown_keyword() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.yaml");
        std::fs::write(&path, "type: string\nformat: email\n").unwrap();

        let args = CheckSchemaArgs {
            schemas: vec![path],
            compile: CompileFlags::default(),
        };
        let lenient = ValidatorConfig::default();
        let strict = ValidatorConfig {
            unknown_keywords: UnknownKeywordPolicy::Strict,
            ..ValidatorConfig::default()
        };
        assert_eq!(run_check_schema(&args, &lenient).unwrap(), 0);
        assert_eq!(run_check_schema(&args, &strict).unwrap(), 1);
    }
}
