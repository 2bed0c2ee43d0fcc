//! # Metaschema Compile Check
//!
//! Optional, stricter companion to the shape check: builds a full
//! `jsonschema` validator (Draft 2020-12) from the schema value, which
//! validates it against the draft metaschema and compiles every keyword.
//!
//! Compilation never touches the network. `$ref` URIs that are not part of
//! the schema itself resolve to the permissive `{}` schema.

use jsonschema::{Retrieve, Uri};
use serde_json::Value;

/// Retriever that resolves every external reference locally.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        tracing::trace!(uri = uri.as_str(), "external $ref resolved to permissive schema");
        Ok(serde_json::json!({}))
    }
}

/// Compile `schema` as a Draft 2020-12 JSON Schema.
///
/// # Errors
///
/// Returns the compiler's message if the schema violates the metaschema or
/// any keyword cannot be compiled.
pub fn compiles_as_schema(schema: &Value) -> Result<(), String> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.with_retriever(OfflineRetriever);

    opts.build(schema).map(|_| ()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_object_schema_compiles() {
        let schema = json!({
            "type": "object",
            "properties": {"message": {"type": "string"}},
            "required": ["message"]
        });
        assert!(compiles_as_schema(&schema).is_ok());
    }

    #[test]
    fn bad_keyword_value_does_not_compile() {
        let err = compiles_as_schema(&json!({"minLength": "five"})).unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn external_ref_compiles_offline() {
        let schema = json!({
            "type": "object",
            "properties": {
                "item": {"$ref": "https://example.invalid/schemas/item.schema.json"}
            }
        });
        assert!(compiles_as_schema(&schema).is_ok());
    }
}
