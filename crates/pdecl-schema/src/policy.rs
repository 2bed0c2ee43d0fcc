//! # Shape Policy
//!
//! Tunable strictness for the schema shape check. The default policy is
//! the minimal contract: structural keyword checks only, with `required`
//! validated for shape. Stricter checks are opt-in.
//!
//! Policies are plain serde structs and load from YAML or JSON files:
//!
//! ```yaml
//! require_declared_properties: true
//! max_depth: 64
//! metaschema_check: false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::DocumentFormat;

/// Strictness settings for [`check_shape`](crate::check_shape).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShapePolicy {
    /// Every entry of `required` must also be a key of the sibling
    /// `properties` object.
    pub require_declared_properties: bool,

    /// Nesting depth (counted in sub-schemas, root is 0) beyond which the
    /// check fails instead of descending further. Unbounded when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Additionally require the schema to compile as a Draft 2020-12
    /// schema.
    pub metaschema_check: bool,
}

/// Error loading a [`ShapePolicy`].
#[derive(Error, Debug)]
pub enum PolicyError {
    /// The policy file could not be read.
    #[error("cannot read policy file '{path}': {source}")]
    Read {
        /// Path of the policy file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The policy document is not a valid policy.
    #[error("invalid policy '{origin}': {reason}")]
    Parse {
        /// File path, or `<inline>` for string input.
        origin: String,
        /// Parser message.
        reason: String,
    },
}

impl ShapePolicy {
    /// Parse a policy from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, PolicyError> {
        parse(text, DocumentFormat::Yaml, "<inline>")
    }

    /// Parse a policy from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, PolicyError> {
        parse(text, DocumentFormat::Json, "<inline>")
    }

    /// Load a policy file. `.json` files are parsed as JSON, anything else
    /// as YAML, the same rule [`load_document`](crate::load_document)
    /// follows.
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let origin = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| PolicyError::Read {
            path: origin.clone(),
            source,
        })?;

        let policy = parse(&content, DocumentFormat::from_path(path), &origin)?;
        tracing::debug!(path = %origin, ?policy, "loaded shape policy");
        Ok(policy)
    }
}

fn parse(text: &str, format: DocumentFormat, origin: &str) -> Result<ShapePolicy, PolicyError> {
    // An empty YAML document deserializes as null, not as an empty mapping.
    if format == DocumentFormat::Yaml && text.trim().is_empty() {
        return Ok(ShapePolicy::default());
    }
    format.parse(text).map_err(|reason| PolicyError::Parse {
        origin: origin.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_is_minimal_contract() {
        let policy = ShapePolicy::default();
        assert!(!policy.require_declared_properties);
        assert!(!policy.metaschema_check);
        assert_eq!(policy.max_depth, None);
    }

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let policy = ShapePolicy::from_yaml_str("require_declared_properties: true\n").unwrap();
        assert!(policy.require_declared_properties);
        assert_eq!(policy.max_depth, None);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(ShapePolicy::from_yaml_str("  \n").unwrap(), ShapePolicy::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ShapePolicy::from_yaml_str("max_dept: 3\n").unwrap_err();
        assert!(matches!(err, PolicyError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn json_policy_parses() {
        let policy =
            ShapePolicy::from_json_str(r#"{"max_depth": 8, "metaschema_check": true}"#).unwrap();
        assert_eq!(policy.max_depth, Some(8));
        assert!(policy.metaschema_check);
    }

    #[test]
    fn load_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("policy.json");
        std::fs::File::create(&json_path)
            .unwrap()
            .write_all(br#"{"max_depth": 4}"#)
            .unwrap();
        assert_eq!(ShapePolicy::load(&json_path).unwrap().max_depth, Some(4));

        let yaml_path = dir.path().join("policy.yaml");
        std::fs::write(&yaml_path, "max_depth: 5\nrequire_declared_properties: true\n").unwrap();
        let policy = ShapePolicy::load(&yaml_path).unwrap();
        assert_eq!(policy.max_depth, Some(5));
        assert!(policy.require_declared_properties);
    }

    #[test]
    fn explicit_null_depth_is_unbounded() {
        let policy = ShapePolicy::from_yaml_str("max_depth: null
").unwrap();
        assert_eq!(policy.max_depth, None);
        assert_eq!(policy, ShapePolicy::default());
    }

    #[test]
    fn load_reads_non_json_extensions_as_yaml() {
        let dir = tempfile::tempdir().unwrap();

        let yml_path = dir.path().join("policy.yml");
        std::fs::write(&yml_path, "max_depth: 6
").unwrap();
        assert_eq!(ShapePolicy::load(&yml_path).unwrap().max_depth, Some(6));

        let bare_path = dir.path().join("policy");
        std::fs::write(&bare_path, r#"{"metaschema_check": true}"#).unwrap();
        assert!(ShapePolicy::load(&bare_path).unwrap().metaschema_check);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let err = ShapePolicy::load(Path::new("/nonexistent/policy.yaml")).unwrap_err();
        assert!(matches!(err, PolicyError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/policy.yaml"));
    }
}
