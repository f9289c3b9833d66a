// Copyright 2023 RisingWave Labs
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Views over dynamic JSON values.
//!
//! - [`Node`]: a read-only view used for navigation and coercion.
//! - [`NodeMut`]: a mutable view used for in-place edits.

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};

/// Backing value of the missing node.
static MISSING: Value = Value::Null;

/// The kind of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    /// Returns the kind of the given value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One navigation step: an object key or an array index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'k> {
    Field(&'k str),
    Index(usize),
}

impl<'k> From<&'k str> for Key<'k> {
    fn from(name: &'k str) -> Self {
        Key::Field(name)
    }
}

impl<'k> From<&'k String> for Key<'k> {
    fn from(name: &'k String) -> Self {
        Key::Field(name)
    }
}

impl From<usize> for Key<'_> {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

/// A read-only view over one JSON value.
///
/// Navigation with [`get`](Node::get) never fails: a key or index that does
/// not exist yields the *missing node*, on which every further `get` yields the
/// missing node again and every coercion fails. Use
/// [`checked_get`](Node::checked_get) to observe the failure instead.
///
/// ```
/// use json_doc_path::Document;
///
/// let doc: Document = r#"{"a": {"b": [1, 2]}}"#.parse().unwrap();
/// assert_eq!(doc.node().get("a").get("b").get(1).as_i64().unwrap(), 2);
/// assert!(doc.node().get("a").get("c").get(0).is_missing());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node<'a> {
    value: &'a Value,
}

impl<'a> From<&'a Value> for Node<'a> {
    fn from(value: &'a Value) -> Self {
        Node { value }
    }
}

/// Defines a `must_*` accessor that falls back to a default on error.
macro_rules! must {
    ($(#[$doc:meta])* $name:ident, $coerce:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(self, default: $ty) -> $ty {
            self.$coerce().unwrap_or(default)
        }
    };
}

impl<'a> Node<'a> {
    /// Returns the missing node.
    pub fn missing() -> Self {
        Node { value: &MISSING }
    }

    /// Returns `true` if this is the missing node rather than a value of the
    /// document. A JSON `null` in the document is not missing.
    pub fn is_missing(self) -> bool {
        std::ptr::eq(self.value, &MISSING)
    }

    /// Returns the wrapped value.
    pub fn value(self) -> &'a Value {
        self.value
    }

    /// Returns the kind of the wrapped value.
    pub fn kind(self) -> Kind {
        Kind::of(self.value)
    }

    /// Returns the child at the given key or index, or the missing node.
    pub fn get<'k>(self, key: impl Into<Key<'k>>) -> Node<'a> {
        self.checked_get(key).unwrap_or_else(Node::missing)
    }

    /// Returns the child at the given key or index.
    ///
    /// Returns `None` if this node is not the matching container or the child
    /// does not exist.
    pub fn checked_get<'k>(self, key: impl Into<Key<'k>>) -> Option<Node<'a>> {
        let child = match (self.value, key.into()) {
            (Value::Object(map), Key::Field(name)) => map.get(name),
            (Value::Array(array), Key::Index(index)) => array.get(index),
            _ => None,
        };
        child.map(Node::from)
    }

    /// Follows a sequence of keys and indices, yielding the missing node at the
    /// first step that does not exist.
    ///
    /// ```
    /// use json_doc_path::{Document, Key};
    ///
    /// let doc: Document = r#"{"a": [{"b": "c"}]}"#.parse().unwrap();
    /// let node = doc.node().get_in(&[Key::from("a"), Key::from(0), Key::from("b")]);
    /// assert_eq!(node.as_str().unwrap(), "c");
    /// ```
    pub fn get_in(self, keys: &[Key<'_>]) -> Node<'a> {
        self.checked_get_in(keys).unwrap_or_else(Node::missing)
    }

    /// Follows a sequence of keys and indices, returning `None` at the first
    /// step that does not exist.
    pub fn checked_get_in(self, keys: &[Key<'_>]) -> Option<Node<'a>> {
        keys.iter().try_fold(self, |node, key| node.checked_get(*key))
    }

    fn mismatch(self, expected: Kind) -> Error {
        let found = if self.is_missing() {
            "missing"
        } else {
            self.kind().as_str()
        };
        Error::TypeMismatch { expected, found }
    }

    fn as_number(self) -> Result<&'a Number> {
        match self.value {
            Value::Number(n) => Ok(n),
            _ => Err(self.mismatch(Kind::Number)),
        }
    }

    pub fn as_str(self) -> Result<&'a str> {
        self.value
            .as_str()
            .ok_or_else(|| self.mismatch(Kind::String))
    }

    /// Returns the UTF-8 bytes of a string value.
    pub fn as_bytes(self) -> Result<&'a [u8]> {
        self.as_str().map(str::as_bytes)
    }

    pub fn as_bool(self) -> Result<bool> {
        self.value
            .as_bool()
            .ok_or_else(|| self.mismatch(Kind::Bool))
    }

    /// Coerces any number to `i64`.
    ///
    /// Integers above `i64::MAX` wrap around, fractions are truncated and
    /// out-of-range floats saturate.
    pub fn as_i64(self) -> Result<i64> {
        let n = self.as_number()?;
        Ok(n.as_i64()
            .or_else(|| n.as_u64().map(|v| v as i64))
            .unwrap_or_else(|| number_to_f64(n) as i64))
    }

    /// Coerces any number to `u64`.
    ///
    /// Negative integers wrap around, fractions are truncated and
    /// out-of-range floats saturate.
    pub fn as_u64(self) -> Result<u64> {
        let n = self.as_number()?;
        Ok(n.as_u64()
            .or_else(|| n.as_i64().map(|v| v as u64))
            .unwrap_or_else(|| number_to_f64(n) as u64))
    }

    /// Coerces any number to `f64`, rounding to the nearest representable value.
    pub fn as_f64(self) -> Result<f64> {
        self.as_number().map(number_to_f64)
    }

    pub fn as_object(self) -> Result<&'a Map<String, Value>> {
        self.value
            .as_object()
            .ok_or_else(|| self.mismatch(Kind::Object))
    }

    pub fn as_array(self) -> Result<&'a [Value]> {
        match self.value {
            Value::Array(array) => Ok(array),
            _ => Err(self.mismatch(Kind::Array)),
        }
    }

    /// Returns the members of an object as nodes.
    pub fn members(self) -> Result<Vec<(&'a str, Node<'a>)>> {
        Ok(self
            .as_object()?
            .iter()
            .map(|(k, v)| (k.as_str(), Node::from(v)))
            .collect())
    }

    /// Returns the elements of an array as nodes.
    pub fn elements(self) -> Result<Vec<Node<'a>>> {
        Ok(self.as_array()?.iter().map(Node::from).collect())
    }

    must!(
        /// Returns the string, or `default` if this is not a string.
        must_str, as_str, &'a str
    );
    must!(must_bool, as_bool, bool);
    must!(
        /// Returns the number coerced to `i64`, or `default` if this is not a number.
        must_i64, as_i64, i64
    );
    must!(must_u64, as_u64, u64);
    must!(must_f64, as_f64, f64);

    /// Returns the array elements, or an empty slice if this is not an array.
    pub fn must_array(self) -> &'a [Value] {
        self.as_array().unwrap_or_default()
    }

    /// Returns the object, or an empty map if this is not an object.
    pub fn must_object(self) -> Cow<'a, Map<String, Value>> {
        match self.as_object() {
            Ok(map) => Cow::Borrowed(map),
            Err(_) => Cow::Owned(Map::new()),
        }
    }

    /// Returns the object members as nodes, or nothing if this is not an object.
    pub fn must_members(self) -> Vec<(&'a str, Node<'a>)> {
        self.members().unwrap_or_default()
    }

    /// Returns the array elements as nodes, or nothing if this is not an array.
    pub fn must_elements(self) -> Vec<Node<'a>> {
        self.elements().unwrap_or_default()
    }
}

impl Display for Node<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self.value, f)
    }
}

fn number_to_f64(n: &Number) -> f64 {
    // `as_f64` rejects values beyond the f64 range, which saturate to infinity here
    n.as_f64()
        .unwrap_or_else(|| n.to_string().parse().unwrap_or(f64::NAN))
}

/// A mutable view over one JSON value.
///
/// Edits through this view change the document it was taken from.
#[derive(Debug)]
pub struct NodeMut<'a> {
    value: &'a mut Value,
}

impl<'a> From<&'a mut Value> for NodeMut<'a> {
    fn from(value: &'a mut Value) -> Self {
        NodeMut { value }
    }
}

impl<'a> NodeMut<'a> {
    /// Returns a read-only view of the same value.
    pub fn as_node(&self) -> Node<'_> {
        Node::from(&*self.value)
    }

    /// Returns the wrapped value.
    pub fn value_mut(&mut self) -> &mut Value {
        &mut *self.value
    }

    /// Returns a mutable view of the child at the given key or index.
    pub fn get_mut<'k>(self, key: impl Into<Key<'k>>) -> Option<NodeMut<'a>> {
        let child = match (self.value, key.into()) {
            (Value::Object(map), Key::Field(name)) => map.get_mut(name),
            (Value::Array(array), Key::Index(index)) => array.get_mut(index),
            _ => None,
        };
        child.map(NodeMut::from)
    }

    /// Follows a sequence of keys and indices to a mutable view.
    pub fn get_in_mut(self, keys: &[Key<'_>]) -> Option<NodeMut<'a>> {
        keys.iter().try_fold(self, |node, key| node.get_mut(*key))
    }

    /// Writes `value` under `key`.
    ///
    /// Returns `false` and leaves the value untouched if this is not an object.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> bool {
        match self.value {
            Value::Object(map) => {
                map.insert(key.to_owned(), value.into());
                true
            }
            _ => false,
        }
    }

    /// Writes `value` at the end of `branch`, creating objects on the way.
    ///
    /// Any value along the branch that is not an object, including this one,
    /// is replaced by an empty object. An empty branch replaces this value.
    ///
    /// ```
    /// use json_doc_path::Document;
    /// use serde_json::json;
    ///
    /// let mut doc = Document::new();
    /// doc.node_mut().set_path(&["a", "b"], 1);
    /// doc.node_mut().set_path(&["a", "c"], 2);
    /// assert_eq!(doc.value(), &json!({"a": {"b": 1, "c": 2}}));
    /// ```
    pub fn set_path<S: AsRef<str>>(&mut self, branch: &[S], value: impl Into<Value>) {
        let Some((last, init)) = branch.split_last() else {
            *self.value = value.into();
            return;
        };
        let mut map = ensure_object(self.value);
        for segment in init {
            let child = map
                .entry(segment.as_ref())
                .or_insert_with(|| Value::Object(Map::new()));
            map = ensure_object(child);
        }
        map.insert(last.as_ref().to_owned(), value.into());
    }

    /// Removes `key` from an object and returns its value.
    ///
    /// Does nothing if this is not an object or the key does not exist.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        match self.value {
            Value::Object(map) => map.remove(key),
            _ => None,
        }
    }
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("replaced by an object above"),
    }
}
