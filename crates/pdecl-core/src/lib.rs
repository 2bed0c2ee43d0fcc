//! # pdecl-core — Value Tree Primitives
//!
//! The leaf crate of the pdecl workspace. Plugin declarations carry
//! dynamically-typed JSON documents (most importantly the output schema of a
//! tool), represented at runtime as a [`serde_json::Value`] tree. This crate
//! owns the primitives every other crate uses to handle those trees safely.
//!
//! ## Key Design Principles
//!
//! 1. **Deep copy is explicit.** [`deep_copy`] rebuilds every `Object` and
//!    `Array` node into fresh storage. Anything that walks a tree it does not
//!    exclusively own takes a copy first.
//!
//! 2. **Shared storage is a type.** Trees that several owners may mutate live
//!    behind [`SharedValue`]. The only way to read one is
//!    [`SharedValue::snapshot`], which copies under the read lock and hands
//!    back a private tree. Nothing iterates shared storage in place.
//!
//! 3. **Closed value kinds.** [`ValueKind`] mirrors the six JSON kinds so
//!    failure reasons name kinds without formatting whole values.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pdecl-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod value;

pub use value::{deep_copy, depth, dispose, SharedValue, ValueKind};
