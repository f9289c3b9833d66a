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

use serde_json::Value;
use tracing::trace;

use crate::{
    ast::{steps_to_string, JsonPath, Step},
    value::Node,
};

pub type Result<T> = std::result::Result<T, Error>;

/// The error type returned when resolving a path against a document.
#[non_exhaustive]
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("path does not match a specific node")]
    NoSpecificNode,
    #[error("object does not contain key \"{0}\"")]
    NoKey(Box<str>),
    #[error("array index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("member accessor \"{0}\" can only be applied to an object")]
    MemberAccess(Box<str>),
    #[error("array accessor [{0}] can only be applied to an array")]
    ArrayAccess(usize),
    #[error("path left unparsed: {0}")]
    Unparsed(Box<str>),
}

impl Error {
    /// Returns `true` if the path addressed the whole document rather than a
    /// node inside it.
    ///
    /// Callers that operate on the whole document can treat this as success.
    pub fn is_no_specific_node(&self) -> bool {
        matches!(self, Error::NoSpecificNode)
    }
}

/// The result of [`JsonPath::locate`]: the node a path points to together with
/// the container it was found in.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a, 'p> {
    /// The object or array holding the target.
    pub parent: Node<'a>,
    /// The final step of the path, taken from `parent` to reach `target`.
    pub step: &'p Step,
    /// The node the path points to.
    pub target: Node<'a>,
}

impl JsonPath {
    /// Resolves the path against the given JSON value.
    ///
    /// A path without steps returns [`Error::NoSpecificNode`].
    pub fn resolve<'a>(&self, root: &'a Value) -> Result<Node<'a>> {
        if self.is_root() {
            return Err(Error::NoSpecificNode);
        }
        walk(root, &self.steps).map(Node::from)
    }

    /// Resolves the path and also returns the parent of the final node.
    pub fn locate<'a, 'p>(&'p self, root: &'a Value) -> Result<Located<'a, 'p>> {
        let (init, step) = self.split_last().ok_or(Error::NoSpecificNode)?;
        let parent = walk(root, init)?;
        let target = step_into(parent, step, &self.steps[init.len()..])?;
        Ok(Located {
            parent: Node::from(parent),
            step,
            target: Node::from(target),
        })
    }

    /// Resolves the path against the given JSON value for modification.
    ///
    /// A path without steps returns [`Error::NoSpecificNode`].
    pub fn resolve_mut<'a>(&self, root: &'a mut Value) -> Result<&'a mut Value> {
        if self.is_root() {
            return Err(Error::NoSpecificNode);
        }
        walk_mut(root, &self.steps)
    }
}

/// Follows `steps` from `root`. No steps returns `root` itself.
pub(crate) fn walk<'a>(root: &'a Value, steps: &[Step]) -> Result<&'a Value> {
    let mut current = root;
    for (i, step) in steps.iter().enumerate() {
        trace!(%step, depth = i, "resolving step");
        current = step_into(current, step, &steps[i..])?;
    }
    Ok(current)
}

/// Follows `steps` from `root` for modification. No steps returns `root` itself.
pub(crate) fn walk_mut<'a>(root: &'a mut Value, steps: &[Step]) -> Result<&'a mut Value> {
    let mut current = root;
    for (i, step) in steps.iter().enumerate() {
        trace!(%step, depth = i, "resolving step");
        current = step_into_mut(current, step, &steps[i..])?;
    }
    Ok(current)
}

/// Takes one step. `rest` starts with `step` and is only used for error reporting.
fn step_into<'a>(current: &'a Value, step: &Step, rest: &[Step]) -> Result<&'a Value> {
    match (current, step) {
        (Value::Object(map), Step::Field(name)) => {
            map.get(name).ok_or_else(|| Error::NoKey(name.as_str().into()))
        }
        (Value::Array(array), Step::Index(index)) => {
            array.get(*index).ok_or(Error::IndexOutOfBounds {
                index: *index,
                len: array.len(),
            })
        }
        (current, step) => Err(mismatch(current, step, rest)),
    }
}

fn step_into_mut<'a>(current: &'a mut Value, step: &Step, rest: &[Step]) -> Result<&'a mut Value> {
    match (current, step) {
        (Value::Object(map), Step::Field(name)) => map
            .get_mut(name)
            .ok_or_else(|| Error::NoKey(name.as_str().into())),
        (Value::Array(array), Step::Index(index)) => {
            let len = array.len();
            array
                .get_mut(*index)
                .ok_or(Error::IndexOutOfBounds { index: *index, len })
        }
        (current, step) => Err(mismatch(current, step, rest)),
    }
}

/// The error for a step that does not fit the value it is applied to.
fn mismatch(current: &Value, step: &Step, rest: &[Step]) -> Error {
    match (current, step) {
        (Value::Object(_), Step::Index(index)) => Error::ArrayAccess(*index),
        (Value::Array(_), Step::Field(name)) => Error::MemberAccess(name.as_str().into()),
        // a scalar has nothing left to descend into
        _ => Error::Unparsed(steps_to_string(rest).into()),
    }
}
