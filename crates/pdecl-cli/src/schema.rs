//! # Schema Subcommand
//!
//! Shape-check a bare JSON Schema document under the active policy.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pdecl_schema::{check_shape, load_document, ShapePolicy};
use serde_json::Value;

/// Arguments for the `pdecl schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// JSON or YAML schema document.
    pub path: PathBuf,
}

/// Check one schema file. Prints `OK` or the first violation.
pub fn run_schema(args: &SchemaArgs, policy: &ShapePolicy) -> Result<u8> {
    let schema: Value = load_document(&args.path)
        .with_context(|| format!("loading schema {}", args.path.display()))?;
    tracing::info!(
        path = %args.path.display(),
        depth = pdecl_core::depth(&schema),
        "checking schema shape"
    );

    match check_shape(&schema, policy) {
        Ok(()) => {
            println!("OK {}", args.path.display());
            Ok(0)
        }
        Err(violation) => {
            println!("FAIL {}: {violation}", args.path.display());
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_on(content: &str, policy: &ShapePolicy) -> u8 {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, content).unwrap();
        run_schema(&SchemaArgs { path }, policy).unwrap()
    }

    #[test]
    fn valid_schema_exits_zero() {
        let code = run_on(
            r#"{"type": "object", "properties": {"a": {"type": "string"}}}"#,
            &ShapePolicy::default(),
        );
        assert_eq!(code, 0);
    }

    #[test]
    fn invalid_schema_exits_one() {
        assert_eq!(run_on(r#"{"type": "mystery"}"#, &ShapePolicy::default()), 1);
    }

    #[test]
    fn policy_is_applied() {
        let schema = r#"{"properties": {}, "required": ["a"]}"#;
        assert_eq!(run_on(schema, &ShapePolicy::default()), 0);

        let strict = ShapePolicy {
            require_declared_properties: true,
            ..ShapePolicy::default()
        };
        assert_eq!(run_on(schema, &strict), 1);
    }

    #[test]
    fn unreadable_file_is_error() {
        let args = SchemaArgs {
            path: PathBuf::from("/nonexistent/schema.json"),
        };
        assert!(run_schema(&args, &ShapePolicy::default()).is_err());
    }
}
