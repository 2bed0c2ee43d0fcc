//! # pdecl-schema — Schema Shape Validation
//!
//! Validates the JSON Schema values embedded in plugin declarations, and the
//! registry that plugs that check into declaration validation.
//!
//! ## Shape Validation (`shape`)
//!
//! [`is_schema_shaped`] decides whether a value tree has the minimal shape
//! of a JSON Schema document (`type`, `properties`, `items`, `required`,
//! recursively). [`check_shape`] is the same check under a [`ShapePolicy`],
//! reporting the first [`ShapeViolation`] with its JSON Pointer.
//!
//! Every entry point deep-copies its input before walking it. The
//! validator is shared process-wide and may be called concurrently with
//! the same schema value, including values held in shared storage
//! ([`pdecl_core::SharedValue`]); each call only ever walks its own copy.
//!
//! ## Registry (`registry`)
//!
//! [`ValidatorRegistry`] maps tag names to [`FieldValidator`]s. The shape
//! check is registered under [`JSON_SCHEMA_TAG`]. Types implementing
//! [`Validate`] list their tagged fields; the registry runs each one and
//! collects field-addressable errors.
//!
//! ## Declarations (`declaration`)
//!
//! [`ToolDeclaration`] and [`ToolOutputSchema`], loadable from JSON or YAML.
//! Every loader in the crate reads `.json` files as JSON and anything else
//! as YAML.
//!
//! ## Crate Policy
//!
//! - Depends only on `pdecl-core` internally.
//! - Validators never panic on malformed input; failure is a return value.
//! - No recursion on the call stack over input trees, at any depth.
//! - No traversal over storage the current call does not own.

pub mod compile;
pub mod declaration;
mod format;
pub mod policy;
pub mod registry;
pub mod shape;

pub use compile::compiles_as_schema;
pub use declaration::{load_document, DeclarationError, ToolDeclaration, ToolOutputSchema};
pub use policy::{PolicyError, ShapePolicy};
pub use registry::{
    FieldError, FieldValidator, JsonSchemaCheck, TaggedField, Validate, ValidationErrors,
    ValidatorRegistry, JSON_SCHEMA_TAG,
};
pub use shape::{
    check_shape, check_shared_shape, is_schema_shaped, is_shared_schema_shaped, ShapeViolation,
    SCHEMA_TYPES,
};
