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

//! A JSON document bound to a file.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::{
    ast::JsonPath,
    document::Document,
    error::{Error, Result},
    mutate,
    value::Node,
};

/// How a document is laid out when written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Indented by two spaces.
    #[default]
    Pretty,
    /// No whitespace.
    Compact,
}

/// Options applied whenever a [`JsonFile`] saves its document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub format: Format,
    /// Append `\n` after the document.
    pub trailing_newline: bool,
}

impl WriteOptions {
    pub fn compact() -> Self {
        Self {
            format: Format::Compact,
            ..Self::default()
        }
    }

    pub fn with_trailing_newline(self, trailing_newline: bool) -> Self {
        Self {
            trailing_newline,
            ..self
        }
    }
}

/// A JSON file and its parsed document.
///
/// Every successful mutation rewrites the whole file. Writes take an exclusive
/// lock so concurrent [`write`](JsonFile::write) calls on a shared session
/// never interleave; the file is replaced in place without a rename, so other
/// processes reading it during a write may observe a truncated document.
///
/// ```no_run
/// use json_doc_path::JsonFile;
///
/// let mut file = JsonFile::open("books.json")?;
/// file.set_string("x[1].author", "Catniss")?;
/// file.add_json("x", br#"{"title": "New", "author": "Someone"}"#)?;
/// # Ok::<(), json_doc_path::Error>(())
/// ```
#[derive(Debug)]
pub struct JsonFile {
    path: PathBuf,
    document: Document,
    options: WriteOptions,
    lock: RwLock<()>,
}

impl JsonFile {
    /// Reads and parses the given file with default write options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, WriteOptions::default())
    }

    /// Reads and parses the given file.
    pub fn open_with(path: impl AsRef<Path>, options: WriteOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = fs::read(&path).map_err(Error::io(&path))?;
        let document = Document::from_slice(&data)?;
        debug!(path = %path.display(), bytes = data.len(), "opened JSON file");
        Ok(Self {
            path,
            document,
            options,
            lock: RwLock::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn options(&self) -> WriteOptions {
        self.options
    }

    /// Finds the node for the given path expression.
    pub fn get_node(&self, path: &str) -> Result<Node<'_>> {
        let path = JsonPath::new(path)?;
        Ok(path.resolve(self.document.value())?)
    }

    /// Finds the string for the given path expression.
    pub fn get_string(&self, path: &str) -> Result<&str> {
        self.get_node(path)?.as_str()
    }

    /// Changes the value of an existing key to a string and saves the file.
    pub fn set_string(&mut self, path: &str, value: &str) -> Result<()> {
        self.set_value(path, Value::String(value.to_owned()))
    }

    /// Changes the value of an existing key and saves the file.
    pub fn set_value(&mut self, path: &str, value: Value) -> Result<()> {
        let path = JsonPath::new(path)?;
        mutate::replace(self.document.value_mut(), &path, value)?;
        self.save()
    }

    /// Appends a JSON fragment to the array at the given path and saves the file.
    pub fn add_json(&mut self, path: &str, fragment: &[u8]) -> Result<()> {
        let path = JsonPath::new(path)?;
        let fragment = serde_json::from_slice(fragment)?;
        mutate::insert(self.document.value_mut(), &path, fragment)?;
        self.save()
    }

    /// Returns the whole document, indented.
    pub fn get_all(&self) -> Result<Vec<u8>> {
        self.document.encode_pretty()
    }

    /// Encodes the document in the configured format, without the trailing
    /// newline.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self.options.format {
            Format::Pretty => self.document.encode_pretty(),
            Format::Compact => self.document.encode(),
        }
    }

    /// Writes the current document according to the write options.
    pub fn save(&self) -> Result<()> {
        let mut data = self.encode()?;
        if self.options.trailing_newline {
            data.push(b'\n');
        }
        self.write(&data)
    }

    /// Replaces the file contents with `data`.
    pub fn write(&self, data: &[u8]) -> Result<()> {
        let _guard = self.lock.write();
        fs::write(&self.path, data).map_err(Error::io(&self.path))?;
        debug!(path = %self.path.display(), bytes = data.len(), "wrote JSON file");
        Ok(())
    }

    /// Reads the file again, discarding the in-memory document.
    pub fn reload(&mut self) -> Result<()> {
        let data = {
            let _guard = self.lock.read();
            fs::read(&self.path).map_err(Error::io(&self.path))?
        };
        self.document = Document::from_slice(&data)?;
        debug!(path = %self.path.display(), bytes = data.len(), "reloaded JSON file");
        Ok(())
    }
}

/// Finds the string at `path` in the given JSON file.
pub fn get_string(file: impl AsRef<Path>, path: &str) -> Result<String> {
    JsonFile::open(file)?.get_string(path).map(str::to_owned)
}

/// Changes the value at `path` in the given JSON file to a string.
pub fn set_string(file: impl AsRef<Path>, path: &str, value: &str) -> Result<()> {
    JsonFile::open(file)?.set_string(path, value)
}

/// Appends a JSON fragment to the array at `path` in the given JSON file.
pub fn add_json(file: impl AsRef<Path>, path: &str, fragment: &[u8]) -> Result<()> {
    JsonFile::open(file)?.add_json(path, fragment)
}
