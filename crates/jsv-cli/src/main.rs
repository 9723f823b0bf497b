//! # jsv CLI entry point
//!
//! Parses command-line arguments, installs tracing, and dispatches to the
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jsv_cli::check::{run_check_schema, CheckSchemaArgs};
use jsv_cli::resolve_config;
use jsv_cli::validate::{run_validate, ValidateArgs};

/// jsv — JSON Schema validation.
///
/// Validates JSON and YAML documents against schemas using the `type`,
/// `minLength`, `properties`, and `required` keywords.
#[derive(Parser, Debug)]
#[command(name = "jsv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML or JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate documents against a schema.
    Validate(ValidateArgs),

    /// Compile schemas and report structural errors.
    CheckSchema(CheckSchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "jsv starting");

    let result = match &cli.command {
        Commands::Validate(args) => resolve_config(cli.config.as_deref(), &args.compile)
            .and_then(|config| run_validate(args, config)),
        Commands::CheckSchema(args) => resolve_config(cli.config.as_deref(), &args.compile)
            .and_then(|config| run_check_schema(args, &config)),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
