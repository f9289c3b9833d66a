//! Dynamic JSON documents with path navigation and in-place file editing.
//!
//! A [`Document`] holds any JSON value. It can be navigated with [`Node`]
//! views, edited through [`NodeMut`] views, or addressed with a [`JsonPath`]
//! expression in a small dotted notation:
//!
//! ```text
//! x.books[1].author
//! ```
//!
//! - segments are separated by `.`;
//! - a segment may end with one `[<index>]`, or be just `[<index>]`;
//! - a leading `x` stands for the root.
//!
//! # Usage
//!
//! ```rust
//! use json_doc_path::Document;
//!
//! let mut doc: Document = r#"{"books": [{"author": "A"}, {"author": "B"}]}"#
//!     .parse()
//!     .unwrap();
//! assert_eq!(doc.resolve("x.books[1].author").unwrap().as_str().unwrap(), "B");
//!
//! doc.replace("books[1].author", "Catniss").unwrap();
//! doc.insert_json("books", br#"{"author": "C"}"#).unwrap();
//! assert_eq!(doc.node().get("books").must_array().len(), 3);
//! ```
//!
//! [`JsonFile`] binds a document to a file and saves it after every edit.

mod ast;
mod document;
mod error;
mod eval;
mod file;
pub mod mutate;
mod parser;
mod value;

pub use ast::{JsonPath, Step};
pub use document::Document;
pub use error::{Error, ErrorKind, Result};
pub use eval::{Error as EvalError, Located};
pub use file::{add_json, get_string, set_string, Format, JsonFile, WriteOptions};
pub use parser::Error as ParseError;
pub use value::{Key, Kind, Node, NodeMut};
