//! # Schema Shape Validation
//!
//! Structural check that a value tree has the shape of a JSON Schema
//! document, restricted to the keywords plugin declarations rely on:
//! `type`, `properties`, `items` and `required`. This is not a JSON Schema
//! implementation: formats, `$ref`, combinators and pattern constraints are
//! not interpreted, and unrecognized keywords are ignored.
//!
//! ## Rules
//!
//! Applied to every schema object reachable through `properties` and
//! `items`:
//!
//! 1. The node is an object.
//! 2. `type`, if present, is a string naming a JSON Schema primitive type.
//! 3. `properties`, if present, is an object whose values are schema objects.
//! 4. `items`, if present, is a schema object, whatever `type` says.
//! 5. `required`, if present, is an array of strings.
//!
//! The first failing rule ends the check. A node's own keywords are
//! checked before its sub-schemas, which are visited depth-first with
//! `properties` (in key order) ahead of `items`.
//!
//! ## Copy on Entry
//!
//! The validator is registered once and shared by every caller. A schema
//! value handed to it may be reused across calls or live in shared storage,
//! so every entry point first takes a private copy (via
//! [`pdecl_core::deep_copy`] or [`SharedValue::snapshot`]) and only walks
//! that copy. No traversal ever runs over caller-owned storage.
//!
//! ## Depth
//!
//! Copying, walking and dropping all use explicit work stacks, so a schema
//! nested thousands of levels deep is checked like any other. A nesting
//! cap exists only when [`ShapePolicy::max_depth`] sets one.

use std::fmt;

use pdecl_core::{deep_copy, dispose, SharedValue, ValueKind};
use serde_json::{Map, Value};

use crate::compile::compiles_as_schema;
use crate::policy::ShapePolicy;

/// Primitive type names accepted for the `type` keyword.
pub const SCHEMA_TYPES: &[&str] = &[
    "object", "array", "string", "number", "boolean", "integer", "null",
];

/// The first rule a schema value broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeViolation {
    /// JSON Pointer to the offending node in the schema value.
    pub pointer: String,
    /// Human-readable description of the violation.
    pub reason: String,
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pointer.is_empty() {
            write!(f, "(root): {}", self.reason)
        } else {
            write!(f, "{}: {}", self.pointer, self.reason)
        }
    }
}

impl std::error::Error for ShapeViolation {}

/// Returns true if `value` is a schema object under the default policy.
///
/// Never panics. Any malformed input yields `false`.
pub fn is_schema_shaped(value: &Value) -> bool {
    check_shape(value, &ShapePolicy::default()).is_ok()
}

/// Returns true if the tree currently held by `shared` is a schema object
/// under the default policy.
///
/// The tree is copied under the read lock and checked after the lock is
/// released, so concurrent writers are neither blocked for the walk nor
/// observed by it.
pub fn is_shared_schema_shaped(shared: &SharedValue) -> bool {
    check_shared_shape(shared, &ShapePolicy::default()).is_ok()
}

/// Check `value` against the shape rules, reporting the first violation.
pub fn check_shape(value: &Value, policy: &ShapePolicy) -> Result<(), ShapeViolation> {
    check_private(deep_copy(value), policy)
}

/// Check a snapshot of `shared` against the shape rules.
pub fn check_shared_shape(
    shared: &SharedValue,
    policy: &ShapePolicy,
) -> Result<(), ShapeViolation> {
    check_private(shared.snapshot(), policy)
}

/// Walk a tree owned by the current call, then drop it without recursing.
fn check_private(schema: Value, policy: &ShapePolicy) -> Result<(), ShapeViolation> {
    let walked = ShapeWalker {
        policy,
        steps: Vec::new(),
    }
    .walk(&schema);

    let result = walked.and_then(|()| {
        if policy.metaschema_check {
            compiles_as_schema(&schema).map_err(|reason| ShapeViolation {
                pointer: String::new(),
                reason: format!("does not compile as a JSON Schema: {reason}"),
            })
        } else {
            Ok(())
        }
    });
    dispose(schema);

    match &result {
        Ok(()) => tracing::trace!("schema shape check passed"),
        Err(v) => tracing::debug!(pointer = %v.pointer, reason = %v.reason, "schema shape check failed"),
    }
    result
}

/// One edge from a schema to a sub-schema.
#[derive(Debug, Clone, Copy)]
enum Step<'v> {
    Property(&'v str),
    Items,
}

/// A sub-schema waiting to be checked.
struct Pending<'v> {
    node: &'v Value,
    /// Index into [`ShapeWalker::steps`] of the edge leading here; `None`
    /// for the root.
    at: Option<usize>,
    depth: usize,
}

/// Depth-first walker over an explicit stack.
///
/// Every edge taken is recorded once as `(parent edge, step)`, so the JSON
/// Pointer of a node is only rendered when it is reported.
struct ShapeWalker<'p, 'v> {
    policy: &'p ShapePolicy,
    steps: Vec<(Option<usize>, Step<'v>)>,
}

impl<'v> ShapeWalker<'_, 'v> {
    fn walk(&mut self, root: &'v Value) -> Result<(), ShapeViolation> {
        let mut pending = vec![Pending {
            node: root,
            at: None,
            depth: 0,
        }];

        while let Some(Pending { node, at, depth }) = pending.pop() {
            if let Some(max) = self.policy.max_depth {
                if depth > max {
                    return Err(self.violation(
                        at,
                        &[],
                        format!("schema nesting exceeds maximum depth of {max}"),
                    ));
                }
            }

            let Some(schema) = node.as_object() else {
                return Err(self.violation(
                    at,
                    &[],
                    format!("expected a schema object, found {}", ValueKind::of(node)),
                ));
            };

            if let Some(ty) = schema.get("type") {
                self.check_type(ty, at)?;
            }

            let properties = match schema.get("properties") {
                Some(properties) => Some(properties.as_object().ok_or_else(|| {
                    self.violation(
                        at,
                        &["properties"],
                        format!(
                            "properties must be an object, found {}",
                            ValueKind::of(properties)
                        ),
                    )
                })?),
                None => None,
            };

            if let Some(required) = schema.get("required") {
                self.check_required(required, properties, at)?;
            }

            // Pushed in reverse so properties pop first, in key order.
            if let Some(items) = schema.get("items") {
                pending.push(Pending {
                    node: items,
                    at: Some(self.step(at, Step::Items)),
                    depth: depth + 1,
                });
            }
            for (name, sub_schema) in properties.into_iter().flatten().rev() {
                pending.push(Pending {
                    node: sub_schema,
                    at: Some(self.step(at, Step::Property(name))),
                    depth: depth + 1,
                });
            }
        }

        Ok(())
    }

    fn check_type(&self, ty: &Value, at: Option<usize>) -> Result<(), ShapeViolation> {
        let reason = match ty.as_str() {
            Some(name) if SCHEMA_TYPES.contains(&name) => return Ok(()),
            Some(name) => format!("unrecognized type \"{name}\""),
            None => format!("type must be a string, found {}", ValueKind::of(ty)),
        };
        Err(self.violation(at, &["type"], reason))
    }

    fn check_required(
        &self,
        required: &Value,
        declared: Option<&Map<String, Value>>,
        at: Option<usize>,
    ) -> Result<(), ShapeViolation> {
        let Some(entries) = required.as_array() else {
            return Err(self.violation(
                at,
                &["required"],
                format!("required must be an array, found {}", ValueKind::of(required)),
            ));
        };

        for (index, entry) in entries.iter().enumerate() {
            let Some(name) = entry.as_str() else {
                return Err(self.violation(
                    at,
                    &["required", index.to_string().as_str()],
                    format!("required entries must be strings, found {}", ValueKind::of(entry)),
                ));
            };
            if self.policy.require_declared_properties
                && !declared.is_some_and(|props| props.contains_key(name))
            {
                return Err(self.violation(
                    at,
                    &["required", index.to_string().as_str()],
                    format!("required property \"{name}\" is not declared in properties"),
                ));
            }
        }
        Ok(())
    }

    fn step(&mut self, parent: Option<usize>, step: Step<'v>) -> usize {
        self.steps.push((parent, step));
        self.steps.len() - 1
    }

    /// Build a violation at the node reached by `at`, extended by `tail`.
    fn violation(&self, at: Option<usize>, tail: &[&str], reason: String) -> ShapeViolation {
        let mut segments: Vec<&str> = tail.iter().rev().copied().collect();
        let mut cursor = at;
        while let Some(index) = cursor {
            let (parent, step) = self.steps[index];
            match step {
                Step::Items => segments.push("items"),
                Step::Property(name) => {
                    segments.push(name);
                    segments.push("properties");
                }
            }
            cursor = parent;
        }
        segments.reverse();

        ShapeViolation {
            pointer: to_pointer(&segments),
            reason,
        }
    }
}

/// Render path segments as an RFC 6901 JSON Pointer.
fn to_pointer(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| format!("/{}", s.replace('~', "~0").replace('/', "~1")))
        .collect()
}
