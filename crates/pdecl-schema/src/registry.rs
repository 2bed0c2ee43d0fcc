//! # Field Validator Registry
//!
//! Declarations mark fields for validation by tag name. A
//! [`ValidatorRegistry`] maps each tag to a [`FieldValidator`] and runs the
//! matching validator once per tagged field per validation pass, turning
//! failures into field-addressable [`FieldError`]s.
//!
//! The process-wide registry ([`ValidatorRegistry::global`]) is built once
//! and never mutated afterwards. Validators hold no mutable state, so the
//! registry is shared freely across threads.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::policy::ShapePolicy;
use crate::shape::check_shape;

/// Tag under which the schema shape check is registered.
pub const JSON_SCHEMA_TAG: &str = "json_schema";

/// A named predicate over one field value.
pub trait FieldValidator: Send + Sync {
    /// Tag name the validator is registered under.
    fn tag(&self) -> &str;

    /// Check a field value, describing the failure on error.
    fn check(&self, value: &Value) -> Result<(), String>;

    /// Boolean form of [`check`](Self::check).
    fn is_valid(&self, value: &Value) -> bool {
        self.check(value).is_ok()
    }
}

/// The `json_schema` validator: schema shape check with copy on entry.
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaCheck {
    policy: ShapePolicy,
}

impl JsonSchemaCheck {
    /// Create the validator with a specific policy.
    pub fn new(policy: ShapePolicy) -> Self {
        Self { policy }
    }

    /// The policy applied by this validator.
    pub fn policy(&self) -> &ShapePolicy {
        &self.policy
    }
}

impl FieldValidator for JsonSchemaCheck {
    fn tag(&self) -> &str {
        JSON_SCHEMA_TAG
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        check_shape(value, &self.policy).map_err(|v| v.to_string())
    }
}

/// A field selected for validation by a declaration.
#[derive(Debug, Clone, Copy)]
pub struct TaggedField<'a> {
    /// Field name, as reported in errors.
    pub field: &'static str,
    /// Tag of the validator to run.
    pub tag: &'static str,
    /// The field value.
    pub value: &'a Value,
}

/// Implemented by types whose fields carry validator tags.
pub trait Validate {
    /// The fields to validate in this pass. Absent optional fields are
    /// simply not listed.
    fn tagged_fields(&self) -> Vec<TaggedField<'_>>;
}

/// One failed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name.
    pub field: String,
    /// Tag of the validator that rejected it.
    pub tag: String,
    /// Validator's reason.
    pub reason: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}' failed '{}' validation: {}",
            self.field, self.tag, self.reason
        )
    }
}

/// All field failures from one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Returns the number of failed fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if no field failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns a slice of all field errors.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<FieldError> {
        self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

static GLOBAL: Lazy<ValidatorRegistry> = Lazy::new(ValidatorRegistry::with_defaults);

/// Map from tag name to validator.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Arc<dyn FieldValidator>>,
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

impl ValidatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in validators under the default policy.
    pub fn with_defaults() -> Self {
        Self::with_policy(ShapePolicy::default())
    }

    /// A registry with the built-in validators under `policy`.
    pub fn with_policy(policy: ShapePolicy) -> Self {
        let mut registry = Self::new();
        registry.register(JsonSchemaCheck::new(policy));
        registry
    }

    /// The process-wide registry with the built-in validators.
    pub fn global() -> &'static ValidatorRegistry {
        &GLOBAL
    }

    /// Register a validator under its tag, returning the one it replaces.
    pub fn register(
        &mut self,
        validator: impl FieldValidator + 'static,
    ) -> Option<Arc<dyn FieldValidator>> {
        let tag = validator.tag().to_string();
        self.validators.insert(tag, Arc::new(validator))
    }

    /// Look up a validator by tag.
    pub fn get(&self, tag: &str) -> Option<&Arc<dyn FieldValidator>> {
        self.validators.get(tag)
    }

    /// Registered tags, sorted alphabetically.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.validators.keys().map(|s| s.as_str()).collect();
        tags.sort();
        tags
    }

    /// Run the validator named by `field.tag` on `field.value`.
    ///
    /// An unregistered tag is reported as a failure of that field.
    pub fn check_field(&self, field: &TaggedField<'_>) -> Result<(), FieldError> {
        let outcome = match self.get(field.tag) {
            Some(validator) => validator.check(field.value),
            None => Err(format!("unknown validator tag '{}'", field.tag)),
        };
        outcome.map_err(|reason| FieldError {
            field: field.field.to_string(),
            tag: field.tag.to_string(),
            reason,
        })
    }

    /// Validate every tagged field of `item`, collecting all failures.
    pub fn validate<T: Validate + ?Sized>(&self, item: &T) -> Result<(), ValidationErrors> {
        let fields = item.tagged_fields();
        let errors: Vec<FieldError> = fields
            .iter()
            .filter_map(|field| self.check_field(field).err())
            .collect();

        tracing::debug!(
            fields = fields.len(),
            failed = errors.len(),
            "validated tagged fields"
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }
}
