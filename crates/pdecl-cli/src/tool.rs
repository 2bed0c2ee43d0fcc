//! # Tool Subcommand
//!
//! Validate tool declaration files through a registry built from the
//! active policy.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pdecl_schema::{ShapePolicy, ToolDeclaration, ValidatorRegistry};

/// Arguments for the `pdecl tool` subcommand.
#[derive(Args, Debug)]
pub struct ToolArgs {
    /// JSON or YAML tool declaration files.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Validate every file, reporting each one. Unreadable or unparsable files
/// count as failures and do not stop the run.
pub fn run_tool(args: &ToolArgs, policy: &ShapePolicy) -> Result<u8> {
    let registry = ValidatorRegistry::with_policy(policy.clone());
    let mut failed = 0usize;

    for path in &args.paths {
        let outcome = ToolDeclaration::load(path).and_then(|decl| {
            tracing::debug!(tool = %decl.name, "validating declaration");
            decl.validate_with(&registry).map(|()| decl)
        });

        match outcome {
            Ok(decl) => println!("OK {} ({})", path.display(), decl.name),
            Err(e) => {
                failed += 1;
                println!("FAIL {}: {e}", path.display());
            }
        }
    }

    tracing::info!(total = args.paths.len(), failed, "tool declarations checked");
    Ok(u8::from(failed > 0))
}
