//! # Tool Declarations
//!
//! Plugin tool declarations as loaded from manifest files. A tool may
//! declare the JSON Schema of its output; that field is tagged
//! `json_schema` and checked by the registry on validation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::format::DocumentFormat;
use crate::registry::{TaggedField, Validate, ValidationErrors, ValidatorRegistry, JSON_SCHEMA_TAG};

/// The output schema of a tool: a JSON Schema object.
///
/// Holds the raw value tree; nothing about its shape is guaranteed until
/// the declaration is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolOutputSchema(Value);

impl ToolOutputSchema {
    /// Wrap any value tree.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The schema as a value tree.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes self and returns the value tree.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Map<String, Value>> for ToolOutputSchema {
    fn from(map: Map<String, Value>) -> Self {
        Self(Value::Object(map))
    }
}

/// A tool exposed by a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    /// Tool name.
    pub name: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Schema of the tool's output. Not validated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<ToolOutputSchema>,
}

impl Validate for ToolDeclaration {
    fn tagged_fields(&self) -> Vec<TaggedField<'_>> {
        self.output_schema
            .iter()
            .map(|schema| TaggedField {
                field: "output_schema",
                tag: JSON_SCHEMA_TAG,
                value: schema.as_value(),
            })
            .collect()
    }
}

/// Error loading or validating a declaration.
#[derive(Error, Debug)]
pub enum DeclarationError {
    /// The document file could not be read.
    #[error("cannot read '{path}': {source}")]
    Read {
        /// Path to the document.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The document could not be parsed.
    #[error("cannot parse '{origin}': {reason}")]
    Parse {
        /// File path, or `<inline>` for string input.
        origin: String,
        /// Parser message.
        reason: String,
    },

    /// One or more tagged fields failed validation.
    #[error("declaration failed validation:\n{0}")]
    Invalid(#[from] ValidationErrors),
}

impl ToolDeclaration {
    /// Parse a declaration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, DeclarationError> {
        parse_document(text, DocumentFormat::Json, "<inline>")
    }

    /// Parse a declaration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, DeclarationError> {
        parse_document(text, DocumentFormat::Yaml, "<inline>")
    }

    /// Load a declaration file. `.json` files are parsed as JSON, anything
    /// else as YAML.
    pub fn load(path: &Path) -> Result<Self, DeclarationError> {
        load_document(path)
    }

    /// Validate against the process-wide registry.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        self.validate_with(ValidatorRegistry::global())
    }

    /// Validate against a specific registry.
    pub fn validate_with(&self, registry: &ValidatorRegistry) -> Result<(), DeclarationError> {
        registry.validate(self)?;
        Ok(())
    }
}

fn parse_document<T: serde::de::DeserializeOwned>(
    text: &str,
    format: DocumentFormat,
    origin: &str,
) -> Result<T, DeclarationError> {
    format.parse(text).map_err(|reason| DeclarationError::Parse {
        origin: origin.to_string(),
        reason,
    })
}

/// Load any deserializable document (a declaration, or a bare schema
/// value) from a JSON or YAML file, chosen by extension as for
/// [`ShapePolicy::load`](crate::ShapePolicy::load).
pub fn load_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DeclarationError> {
    let origin = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| DeclarationError::Read {
        path: origin.clone(),
        source,
    })?;
    tracing::debug!(path = %origin, bytes = content.len(), "loaded document");
    parse_document(&content, DocumentFormat::from_path(path), &origin)
}
