//! # jsv-cli — Command-Line Interface for the jsv Engine
//!
//! ## Subcommands
//!
//! - `jsv validate --schema <FILE> <PATH>...` — validate JSON/YAML
//!   documents (or every document under a directory) against a schema.
//! - `jsv check-schema <FILE>...` — compile schemas without validating.
//!
//! ```bash
//! jsv validate --schema person.schema.json people/
//! jsv validate --schema person.schema.json --engine reference --format json alice.yaml
//! jsv -v --config jsv.yaml check-schema person.schema.json
//! ```
//!
//! ## Exit Codes
//!
//! `0` everything valid, `1` at least one invalid document or schema,
//! `2` operational error (unreadable file, bad config).
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `jsv-schema`; no validation logic here.

pub mod check;
pub mod document;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use jsv_schema::{LengthPolicy, UnknownKeywordPolicy, ValidatorConfig};

/// `--length` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LengthArg {
    /// Unicode code points.
    CodePoints,
    /// UTF-16 code units.
    Utf16,
}

impl From<LengthArg> for LengthPolicy {
    fn from(arg: LengthArg) -> Self {
        match arg {
            LengthArg::CodePoints => LengthPolicy::CodePoints,
            LengthArg::Utf16 => LengthPolicy::Utf16CodeUnits,
        }
    }
}

/// Flags shared by every subcommand that compiles schemas. Each one, when
/// given, overrides the config file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CompileFlags {
    /// Reject schemas that use unsupported keywords.
    #[arg(long)]
    pub strict: bool,

    /// How `minLength` measures strings.
    #[arg(long, value_enum)]
    pub length: Option<LengthArg>,
}

/// Load the config file (if any) and apply command-line overrides.
pub fn resolve_config(config_path: Option<&Path>, flags: &CompileFlags) -> Result<ValidatorConfig> {
    let mut config = match config_path {
        Some(path) => ValidatorConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ValidatorConfig::default(),
    };
    if flags.strict {
        config.unknown_keywords = UnknownKeywordPolicy::Strict;
    }
    if let Some(length) = flags.length {
        config.length_policy = length.into();
    }
    Ok(config)
}
