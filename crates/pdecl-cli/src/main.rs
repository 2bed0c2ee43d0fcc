//! # pdecl CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pdecl_cli::load_policy;
use pdecl_cli::schema::{run_schema, SchemaArgs};
use pdecl_cli::tool::{run_tool, ToolArgs};

/// Plugin declaration checks.
///
/// Validates the JSON Schema documents that plugin tools declare for their
/// output, standalone or embedded in tool declaration files.
#[derive(Parser, Debug)]
#[command(name = "pdecl", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Shape policy file (YAML or JSON).
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Shape-check a JSON Schema document.
    Schema(SchemaArgs),

    /// Validate tool declaration files.
    Tool(ToolArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let result = load_policy(cli.policy.as_deref()).and_then(|policy| {
        tracing::debug!(?policy, "active shape policy");
        match &cli.command {
            Commands::Schema(args) => run_schema(args, &policy),
            Commands::Tool(args) => run_tool(args, &policy),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
