//! # Value Trees — Deep Copy and Shared Storage
//!
//! Plugin declarations embed arbitrary JSON documents. A tree handed to a
//! validator may be reused across many calls, or may live in storage that
//! other threads mutate. This module provides the two primitives that make
//! such trees safe to inspect:
//!
//! - [`deep_copy`] produces a tree that shares no `Object` or `Array`
//!   storage with its source, at any depth.
//! - [`SharedValue`] wraps a tree that several owners may mutate. Readers
//!   never iterate it in place; they take a [`SharedValue::snapshot`].
//!
//! ## Invariant
//!
//! A traversal only ever runs over a tree owned by the traversing call.
//! Copying happens under the read lock, iteration happens after the lock is
//! released, over the private copy.
//!
//! None of the functions here recurse on the call stack. Nesting depth is
//! bounded only by memory: a tree thousands of levels deep is copied,
//! measured and dropped with an explicit work stack.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

/// Copy a value tree into freshly allocated storage.
///
/// Scalars (`null`, booleans, numbers, strings) are immutable by value and
/// are reproduced as equal values. Every `Object` becomes a new map and
/// every `Array` a new vector, built from deep copies of their children.
///
/// Containers are opened onto a heap-allocated stack and closed in
/// post-order, each finished copy attached to its parent, so input depth
/// never translates into call depth.
///
/// The input is only read, so concurrent calls over the same `&Value` are
/// sound. The value tree is a closed enum: there is no unknown kind that
/// would need a pass-through policy.
pub fn deep_copy(value: &Value) -> Value {
    let mut stack = match CopyFrame::open(value) {
        Opened::Container(frame) => vec![frame],
        Opened::Leaf(copied) => return copied,
    };

    while let Some(frame) = stack.last_mut() {
        match frame.next_child() {
            Some(child) => match CopyFrame::open(child) {
                Opened::Container(child_frame) => stack.push(child_frame),
                Opened::Leaf(copied) => frame.attach(copied),
            },
            None => {
                let Some(finished) = stack.pop().map(CopyFrame::finish) else {
                    break;
                };
                match stack.last_mut() {
                    Some(parent) => parent.attach(finished),
                    None => return finished,
                }
            }
        }
    }

    // The root frame is always the last one closed and returns above.
    Value::Null
}

/// A container whose copy is under construction.
enum CopyFrame<'a> {
    Array {
        source: std::slice::Iter<'a, Value>,
        built: Vec<Value>,
    },
    Object {
        source: serde_json::map::Iter<'a>,
        /// Key of the child currently being copied.
        key: String,
        built: Map<String, Value>,
    },
}

enum Opened<'a> {
    Container(CopyFrame<'a>),
    Leaf(Value),
}

impl<'a> CopyFrame<'a> {
    fn open(node: &'a Value) -> Opened<'a> {
        match node {
            Value::Null => Opened::Leaf(Value::Null),
            Value::Bool(b) => Opened::Leaf(Value::Bool(*b)),
            Value::Number(n) => Opened::Leaf(Value::Number(n.clone())),
            Value::String(s) => Opened::Leaf(Value::String(s.clone())),
            Value::Array(items) => Opened::Container(Self::Array {
                source: items.iter(),
                built: Vec::with_capacity(items.len()),
            }),
            Value::Object(map) => Opened::Container(Self::Object {
                source: map.iter(),
                key: String::new(),
                built: Map::new(),
            }),
        }
    }

    fn next_child(&mut self) -> Option<&'a Value> {
        match self {
            Self::Array { source, .. } => source.next(),
            Self::Object { source, key, .. } => source.next().map(|(name, child)| {
                key.clone_from(name);
                child
            }),
        }
    }

    fn attach(&mut self, copied: Value) {
        match self {
            Self::Array { built, .. } => built.push(copied),
            Self::Object { key, built, .. } => {
                built.insert(std::mem::take(key), copied);
            }
        }
    }

    fn finish(self) -> Value {
        match self {
            Self::Array { built, .. } => Value::Array(built),
            Self::Object { built, .. } => Value::Object(built),
        }
    }
}

/// Nesting depth of a value tree. Scalars have depth 0; an empty object or
/// array has depth 1.
pub fn depth(value: &Value) -> usize {
    let mut deepest = 0;
    let mut pending = vec![(value, 0usize)];
    while let Some((node, level)) = pending.pop() {
        match node {
            Value::Object(map) => {
                deepest = deepest.max(level + 1);
                pending.extend(map.values().map(|child| (child, level + 1)));
            }
            Value::Array(items) => {
                deepest = deepest.max(level + 1);
                pending.extend(items.iter().map(|child| (child, level + 1)));
            }
            _ => {}
        }
    }
    deepest
}

/// Drop a value tree without recursing.
///
/// `Value`'s own drop glue descends one call per nesting level. Children
/// are moved out onto a work stack first, so every container is empty by
/// the time it is dropped.
pub fn dispose(value: Value) {
    let mut pending = vec![value];
    while let Some(node) = pending.pop() {
        match node {
            Value::Array(items) => pending.extend(items),
            Value::Object(map) => pending.extend(map.into_iter().map(|(_, child)| child)),
            _ => {}
        }
    }
}

/// The six kinds a JSON value tree node can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classify a node.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// The JSON Schema name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value tree in storage shared between owners.
///
/// Cloning a `SharedValue` clones the handle, not the tree: all clones see
/// the same storage, and any of them may mutate it through
/// [`update`](Self::update). Reads go through [`snapshot`](Self::snapshot),
/// which returns an exclusively owned deep copy.
///
/// ## Thread Safety
///
/// `SharedValue` is `Send + Sync`. The write lock is only held for the
/// duration of an `update` closure, the read lock only for the duration of
/// one [`deep_copy`].
#[derive(Debug, Clone, Default)]
pub struct SharedValue {
    inner: Arc<RwLock<Value>>,
}

impl SharedValue {
    /// Place a tree into shared storage.
    pub fn new(value: Value) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Take a private deep copy of the current tree.
    pub fn snapshot(&self) -> Value {
        let guard = self.inner.read();
        deep_copy(&guard)
    }

    /// Mutate the shared tree in place under the write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut Value) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut guard)
    }

    /// Replace the shared tree, returning the previous one.
    pub fn replace(&self, value: Value) -> Value {
        std::mem::replace(&mut *self.inner.write(), value)
    }

    /// True if both handles refer to the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<Value> for SharedValue {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
