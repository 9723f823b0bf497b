//! # Validate Subcommand
//!
//! Validates one or more documents against a schema and prints one line
//! per document (text) or a JSON array of `{instance, valid, errors}`
//! reports.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use jsv_schema::{
    BoundValidator, LengthPolicy, NativeEngine, ReferenceEngine, SchemaEngine, ValidatorConfig,
    Verdict,
};
use serde::Serialize;

use crate::document::{expand_paths, load_document};
use crate::CompileFlags;

/// Validation backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    /// The jsv compiler and walker.
    #[default]
    Native,
    /// The `jsonschema` crate, draft 4.
    Reference,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    #[default]
    Text,
    Json,
}

/// Arguments for `jsv validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema document (JSON or YAML).
    #[arg(long, short = 's', value_name = "FILE")]
    pub schema: PathBuf,

    /// Documents to validate. Directories are searched for .json/.yaml/.yml files.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Validation backend.
    #[arg(long, value_enum, default_value_t = EngineArg::Native)]
    pub engine: EngineArg,

    /// Output format.
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,

    #[command(flatten)]
    pub compile: CompileFlags,
}

/// One document's result.
#[derive(Debug, Serialize)]
pub struct InstanceReport {
    pub instance: String,
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// Build the engine selected on the command line.
///
/// Both backends honor the keyword policy and depth limit. The reference
/// backend counts string length in code points only, so asking it for
/// UTF-16 code units is an error rather than a silently different answer.
pub fn make_engine(choice: EngineArg, config: ValidatorConfig) -> Result<Box<dyn SchemaEngine>> {
    match choice {
        EngineArg::Native => Ok(Box::new(NativeEngine::new(config))),
        EngineArg::Reference => {
            if config.length_policy != LengthPolicy::CodePoints {
                bail!(
                    "the reference engine measures minLength in code points; \
                     length policy {:?} requires --engine native",
                    config.length_policy
                );
            }
            Ok(Box::new(ReferenceEngine::default().with_keyword_check(config)))
        }
    }
}

/// Execute `jsv validate`.
///
/// Returns exit code: 0 if every document is valid, 1 otherwise.
pub fn run_validate(args: &ValidateArgs, config: ValidatorConfig) -> Result<u8> {
    let schema = load_document(&args.schema).context("failed to load schema")?;
    let engine = make_engine(args.engine, config)?;
    let validator = BoundValidator::new(engine.as_ref(), schema);

    let reports = validate_paths(&validator, &expand_paths(&args.paths));
    tracing::info!(
        engine = validator.engine_name(),
        documents = reports.len(),
        "validation finished"
    );

    match args.format {
        FormatArg::Text => print!("{}", render_text(&reports)),
        FormatArg::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    let failed = reports.iter().filter(|r| !r.verdict.is_valid()).count();
    Ok(u8::from(failed > 0))
}

/// Validate each path. An unreadable document is reported as a failing
/// verdict rather than aborting the run.
pub fn validate_paths(validator: &BoundValidator<'_>, paths: &[PathBuf]) -> Vec<InstanceReport> {
    paths
        .iter()
        .map(|path| InstanceReport {
            instance: path.display().to_string(),
            verdict: validate_one(validator, path),
        })
        .collect()
}

fn validate_one(validator: &BoundValidator<'_>, path: &Path) -> Verdict {
    match load_document(path) {
        Ok(instance) => validator.validate(&instance),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable document");
            Verdict::rejected("document", format!("{e:#}"))
        }
    }
}

/// Text report: `OK:`/`FAIL:` per document, then a summary line.
pub fn render_text(reports: &[InstanceReport]) -> String {
    let mut out = String::new();
    let mut passed = 0usize;
    for report in reports {
        if report.verdict.is_valid() {
            passed += 1;
            out.push_str(&format!("OK: {}\n", report.instance));
        } else {
            out.push_str(&format!("FAIL: {}\n", report.instance));
            for v in report.verdict.violations() {
                out.push_str(&format!("{v}\n"));
            }
        }
    }
    out.push_str(&format!("\n{passed}/{} document(s) valid\n", reports.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsv_schema::UnknownKeywordPolicy;
    use serde_json::json;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn args(schema: PathBuf, paths: Vec<PathBuf>) -> ValidateArgs {
        ValidateArgs {
            schema,
            paths,
            engine: EngineArg::Native,
            format: FormatArg::Json,
            compile: CompileFlags::default(),
        }
    }

    #[test]
    fn test_run_validate_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(
            dir.path(),
            "schema.json",
            r#"{"type": "object", "properties": {"foo": {"type": "string"}}, "required": ["foo"]}"#,
        );
        let good = write(dir.path(), "good.json", r#"{"foo": "bar"}"#);
        let bad = write(dir.path(), "bad.yaml", "bar: foo\n");

        let config = ValidatorConfig::default;
        assert_eq!(run_validate(&args(schema.clone(), vec![good.clone()]), config()).unwrap(), 0);
        assert_eq!(run_validate(&args(schema, vec![good, bad]), config()).unwrap(), 1);
    }

    #[test]
    fn test_missing_schema_is_operational_error() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.json", "{}");
        let missing = dir.path().join("nope.json");
        let result = run_validate(&args(missing, vec![good]), ValidatorConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_unreadable_instance_is_failing_report() {
        let engine = NativeEngine::default();
        let validator = BoundValidator::new(&engine, json!({}));
        let reports = validate_paths(&validator, &[PathBuf::from("/nonexistent/x.json")]);
        assert_eq!(reports.len(), 1);
        assert!(!reports[0].verdict.is_valid());
        assert_eq!(reports[0].verdict.violations()[0].keyword(), "document");
    }

    #[test]
    fn test_report_serializes_flat() {
        let report = InstanceReport {
            instance: "a.json".into(),
            verdict: Verdict::pass(),
        };
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"instance": "a.json", "valid": true, "errors": []})
        );
    }

    #[test]
    fn test_render_text() {
        let engine = NativeEngine::default();
        let validator = BoundValidator::new(&engine, json!({"type": "string"}));
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.json", r#""ok""#);
        let b = write(dir.path(), "b.json", "5");
        let text = render_text(&validate_paths(&validator, &[a, b]));
        assert!(text.contains("OK: "));
        assert!(text.contains("FAIL: "));
        assert!(text.contains("(root) [type]: expected string, found integer"));
        assert!(text.ends_with("1/2 document(s) valid\n"));
    }

    #[test]
    fn test_reference_engine_selected() {
        let engine = make_engine(EngineArg::Reference, ValidatorConfig::default()).unwrap();
        assert_eq!(engine.name(), "reference");
    }

    #[test]
    fn test_strict_applies_to_both_engines() {
        let config = ValidatorConfig {
            unknown_keywords: UnknownKeywordPolicy::Strict,
            ..ValidatorConfig::default()
        };
        let schema = json!({"type": "string", "format": "x-unknown"});
        for choice in [EngineArg::Native, EngineArg::Reference] {
            let engine = make_engine(choice, config.clone()).unwrap();
            let validator = BoundValidator::new(engine.as_ref(), schema.clone());
            let verdict = validator.validate(&json!("ab"));
            assert!(!verdict.is_valid(), "{choice:?} accepted an unknown keyword");
            assert_eq!(verdict.violations()[0].keyword(), "schema");
        }
    }

    #[test]
    fn test_reference_engine_refuses_utf16_lengths() {
        let config = ValidatorConfig {
            length_policy: LengthPolicy::Utf16CodeUnits,
            ..ValidatorConfig::default()
        };
        assert!(make_engine(EngineArg::Native, config.clone()).is_ok());
        let err = make_engine(EngineArg::Reference, config).err().unwrap();
        assert!(err.to_string().contains("--engine native"));
    }

    #[test]
    fn test_run_validate_reference_with_utf16_is_operational_error() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "schema.json", r#"{"minLength": 2}"#);
        let doc = write(dir.path(), "doc.json", r#""ab""#);
        let mut cmd = args(schema, vec![doc]);
        cmd.engine = EngineArg::Reference;
        cmd.compile.length = Some(crate::LengthArg::Utf16);
        let config = crate::resolve_config(None, &cmd.compile).unwrap();
        assert!(run_validate(&cmd, config).is_err());
    }
}
