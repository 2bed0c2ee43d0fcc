//! # pdecl-cli — Plugin Declaration Checks
//!
//! Provides the `pdecl` command-line interface.
//!
//! ## Subcommands
//!
//! - `pdecl schema <FILE>` — shape-check a bare JSON Schema document.
//! - `pdecl tool <FILE>...` — validate tool declaration files.
//!
//! Both accept JSON or YAML, and a `--policy` file selecting stricter
//! checks:
//!
//! ```bash
//! pdecl schema output.schema.json
//! pdecl --policy strict.yaml tool tools/*.yaml
//! ```
//!
//! Handlers return the process exit code: 0 when every input passed, 1
//! otherwise.

pub mod schema;
pub mod tool;

use std::path::Path;

use anyhow::{Context, Result};
use pdecl_schema::ShapePolicy;

/// Load the policy file if one was given, or the default policy.
pub fn load_policy(path: Option<&Path>) -> Result<ShapePolicy> {
    match path {
        Some(path) => ShapePolicy::load(path)
            .with_context(|| format!("loading policy {}", path.display())),
        None => Ok(ShapePolicy::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_policy_file_is_default() {
        assert_eq!(load_policy(None).unwrap(), ShapePolicy::default());
    }

    #[test]
    fn policy_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.yaml");
        std::fs::write(&path, "require_declared_properties: true\n").unwrap();
        assert!(load_policy(Some(&path)).unwrap().require_declared_properties);
    }

    #[test]
    fn bad_policy_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.yaml");
        std::fs::write(&path, "max_depth: many\n").unwrap();
        let err = load_policy(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("loading policy"));
    }
}
