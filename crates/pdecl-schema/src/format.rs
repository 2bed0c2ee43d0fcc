//! # Document Formats
//!
//! One rule picks the parser for every file this crate loads, whether a
//! shape policy, a tool declaration or a bare schema: `.json` files are
//! JSON, anything else is YAML. YAML accepts JSON text too, so a JSON
//! document under an unexpected extension still loads.

use std::path::Path;

use serde::de::DeserializeOwned;

/// Parser selected for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from a file extension.
    pub(crate) fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }

    /// Deserialize `text`, returning the parser's message on failure.
    pub(crate) fn parse<T: DeserializeOwned>(self, text: &str) -> Result<T, String> {
        match self {
            Self::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        }
    }
}
