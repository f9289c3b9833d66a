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

//! The AST of a path expression.

use std::fmt::Display;
use std::fmt::Formatter;

/// A parsed path expression.
///
/// A path is an ordered list of [`Step`]s starting from the document root.
/// The textual form is a restricted dotted notation:
///
/// ```text
/// x.books[1].author
/// ```
///
/// where a leading `x` stands for the root and is dropped while parsing.
/// A path without steps addresses no specific node, see
/// [`EvalError::NoSpecificNode`](crate::EvalError::NoSpecificNode).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath {
    pub(crate) steps: Vec<Step>,
}

/// A single step of a [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// `.<name>` selects the member with the given name in an object.
    Field(String),
    /// `[<index>]` selects the 0-based `n-th` element in an array.
    Index(usize),
}

impl JsonPath {
    /// Creates a path from the given steps.
    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Returns the steps of the path.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns `true` if the path has no steps and therefore addresses the root
    /// rather than a specific node.
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Splits the path into the steps leading to the parent and the final step.
    ///
    /// Returns `None` for a path without steps.
    pub fn split_last(&self) -> Option<(&[Step], &Step)> {
        self.steps
            .split_last()
            .map(|(last, parent)| (parent, last))
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // a leading field named `x` would be read back as the root
        if matches!(self.steps.first(), Some(Step::Field(name)) if name == "x") {
            write!(f, "x.")?;
        }
        fmt_steps(&self.steps, f)
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(name) => write!(f, "{name}"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Writes steps in the textual path form, e.g. `a[1].b`.
pub(crate) fn fmt_steps(steps: &[Step], f: &mut Formatter<'_>) -> std::fmt::Result {
    for (i, step) in steps.iter().enumerate() {
        if i > 0 && matches!(step, Step::Field(_)) {
            write!(f, ".")?;
        }
        write!(f, "{step}")?;
    }
    Ok(())
}

/// Renders steps in the textual path form.
pub(crate) fn steps_to_string(steps: &[Step]) -> String {
    struct Steps<'a>(&'a [Step]);
    impl Display for Steps<'_> {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            fmt_steps(self.0, f)
        }
    }
    Steps(steps).to_string()
}
