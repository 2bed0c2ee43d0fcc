//! Repeated validation of a realistic tool output schema, and repeated
//! deep copies of a complex value. Ignored by default; run with
//! `cargo test -- --ignored` when profiling the copy-on-entry cost.

use std::time::Instant;

use pdecl_core::deep_copy;
use pdecl_schema::{ToolDeclaration, ToolOutputSchema, ValidatorRegistry};
use serde_json::{json, Value};

const ROUNDS: usize = 10_000;

fn realistic_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "message": {"type": "string", "description": "A text message"},
            "status": {"type": "number", "description": "Status code", "minimum": 0, "maximum": 999},
            "metadata": {
                "type": "object",
                "properties": {
                    "timestamp": {"type": "string", "format": "date-time"},
                    "source": {"type": "string"},
                    "tags": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["timestamp", "source"]
            },
            "results": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string"},
                        "value": {"type": "number"},
                        "enabled": {"type": "boolean"}
                    },
                    "required": ["id", "value"]
                }
            }
        },
        "required": ["message", "status"]
    })
}

#[test]
#[ignore]
fn repeated_declaration_validation() {
    let decl = ToolDeclaration {
        name: "report".to_string(),
        description: String::new(),
        output_schema: Some(ToolOutputSchema::new(realistic_schema())),
    };
    let registry = ValidatorRegistry::global();

    let started = Instant::now();
    for _ in 0..ROUNDS {
        decl.validate_with(registry).unwrap();
    }
    eprintln!("{ROUNDS} validations in {:?}", started.elapsed());
}

#[test]
#[ignore]
fn repeated_deep_copy() {
    let value = json!({
        "string_val": "test_string",
        "number_val": 42.5,
        "bool_val": true,
        "nested_map": {
            "inner_string": "inner_value",
            "inner_number": 123,
            "deep_nested": {
                "level3_string": "deep_value",
                "level3_array": ["array_item_1", "array_item_2", {"array_object_key": "array_object_value"}]
            }
        },
        "top_level_array": ["array_string", 456, {"array_map_key": "array_map_value"}, ["a", "b"]]
    });

    let started = Instant::now();
    for _ in 0..ROUNDS {
        assert_eq!(deep_copy(&value), value);
    }
    eprintln!("{ROUNDS} deep copies in {:?}", started.elapsed());
}
