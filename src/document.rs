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

use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    ast::JsonPath,
    error::Result,
    mutate,
    value::{Key, Node, NodeMut},
};

/// An owned JSON document.
///
/// Numbers keep their original text until they are coerced, so 64-bit
/// integers round-trip exactly.
///
/// A document serializes as its root value, so it can be embedded in other
/// serde types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    root: Value,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document holding an empty object.
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    /// Parses a document from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            root: serde_json::from_slice(bytes)?,
        })
    }

    /// Parses a document from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(Self {
            root: serde_json::from_reader(reader)?,
        })
    }

    /// Wraps an existing value.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn value(&self) -> &Value {
        &self.root
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Returns a read-only view of the root.
    pub fn node(&self) -> Node<'_> {
        Node::from(&self.root)
    }

    /// Returns a mutable view of the root.
    pub fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::from(&mut self.root)
    }

    /// Shorthand for `self.node().get(key)`.
    pub fn get<'k>(&self, key: impl Into<Key<'k>>) -> Node<'_> {
        self.node().get(key)
    }

    /// Writes `value` under `key` if the root is an object.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> bool {
        self.node_mut().set(key, value)
    }

    /// See [`NodeMut::set_path`].
    pub fn set_path<S: AsRef<str>>(&mut self, branch: &[S], value: impl Into<Value>) {
        self.node_mut().set_path(branch, value)
    }

    /// Removes `key` from the root object.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.node_mut().delete(key)
    }

    /// Resolves a path expression against the document.
    pub fn resolve(&self, path: &str) -> Result<Node<'_>> {
        let path = JsonPath::new(path)?;
        Ok(path.resolve(&self.root)?)
    }

    /// Overwrites the value of an existing object key, see [`mutate::replace`].
    pub fn replace(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let path = JsonPath::new(path)?;
        mutate::replace(&mut self.root, &path, value.into())
    }

    /// Appends a JSON fragment to the array at `path`, see [`mutate::insert`].
    pub fn insert_json(&mut self, path: &str, fragment: &[u8]) -> Result<()> {
        let path = JsonPath::new(path)?;
        let fragment = serde_json::from_slice(fragment)?;
        mutate::insert(&mut self.root, &path, fragment)
    }

    /// Serializes the document as compact JSON.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.root)?)
    }

    /// Serializes the document as JSON indented by two spaces.
    pub fn encode_pretty(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.root)?)
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Self::from_value(root)
    }
}

impl FromStr for Document {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_slice(s.as_bytes())
    }
}
