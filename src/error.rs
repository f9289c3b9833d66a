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

use std::io;
use std::path::PathBuf;

use crate::{eval, parser, value::Kind};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type of document, mutation and file operations.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not access {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid path: {0}")]
    Syntax(#[from] parser::Error),
    #[error(transparent)]
    Path(#[from] eval::Error),
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: Kind, found: &'static str },
    #[error("{0}")]
    Rejected(Box<str>),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading or writing the file failed.
    Io,
    /// The document or a JSON fragment is malformed.
    Parse,
    /// The path expression is malformed, or continues past a scalar.
    PathSyntax,
    /// A key or index of the path does not exist.
    PathNotFound,
    /// The path has no steps, so it does not address a specific node.
    NoSpecificNode,
    /// A coercion was requested against a value of another kind.
    TypeMismatch,
    /// The mutation would add or overwrite something it must not.
    MutationRejected,
}

impl Error {
    /// Returns the classification of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io { .. } => ErrorKind::Io,
            Error::Json(_) => ErrorKind::Parse,
            Error::Syntax(_) => ErrorKind::PathSyntax,
            Error::Path(eval::Error::NoSpecificNode) => ErrorKind::NoSpecificNode,
            Error::Path(eval::Error::Unparsed(_)) => ErrorKind::PathSyntax,
            Error::Path(_) => ErrorKind::PathNotFound,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::Rejected(_) => ErrorKind::MutationRejected,
        }
    }

    pub(crate) fn rejected(message: impl Into<Box<str>>) -> Self {
        Error::Rejected(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}
