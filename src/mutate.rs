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

//! Path-addressed edits of a JSON value.
//!
//! Both operations only change existing structure: [`replace`] never adds a
//! key and [`insert`] only grows arrays.

use serde_json::Value;
use tracing::debug;

use crate::{
    ast::{JsonPath, Step},
    error::{Error, Result},
    eval::{self, walk_mut},
    value::Kind,
};

/// Overwrites the value of an existing object key.
///
/// The path up to its final step must lead to an object, and the final step
/// must name a key that already exists in it.
///
/// ```
/// use json_doc_path::{mutate, JsonPath};
/// use serde_json::json;
///
/// let mut value = json!({"books": [{"author": "?"}]});
/// let path = JsonPath::new("x.books[0].author").unwrap();
/// mutate::replace(&mut value, &path, json!("Catniss")).unwrap();
/// assert_eq!(value, json!({"books": [{"author": "Catniss"}]}));
/// ```
pub fn replace(root: &mut Value, path: &JsonPath, value: Value) -> Result<()> {
    let (init, last) = path.split_last().ok_or(eval::Error::NoSpecificNode)?;
    let parent = walk_mut(root, init)?;
    let parent_kind = Kind::of(parent);

    let Step::Field(key) = last else {
        return Err(Error::rejected(format!(
            "cannot set \"{path}\": the last step must be an object key, not {last}"
        )));
    };
    let Value::Object(map) = parent else {
        return Err(Error::rejected(format!(
            "cannot set \"{path}\": parent is {parent_kind}, not object"
        )));
    };
    let Some(slot) = map.get_mut(key.as_str()) else {
        return Err(Error::rejected(format!(
            "cannot set \"{path}\": key \"{key}\" does not exist"
        )));
    };

    debug!(%path, "replacing value");
    *slot = value;
    Ok(())
}

/// Appends `fragment` to the array at `path`.
///
/// A path without steps addresses the root. The target must be an array;
/// anything else that exists there is left alone and reported as rejected.
///
/// ```
/// use json_doc_path::{mutate, JsonPath};
/// use serde_json::json;
///
/// let mut value = json!({"list": [{"k": 1}]});
/// mutate::insert(&mut value, &JsonPath::new("list").unwrap(), json!({"k": 2})).unwrap();
/// assert_eq!(value, json!({"list": [{"k": 1}, {"k": 2}]}));
/// ```
pub fn insert(root: &mut Value, path: &JsonPath, fragment: Value) -> Result<()> {
    match walk_mut(root, path.steps())? {
        Value::Array(array) => {
            debug!(%path, len = array.len(), "appending to array");
            array.push(fragment);
            Ok(())
        }
        other => Err(Error::rejected(format!(
            "cannot add JSON data at \"{path}\": target is {}, not array",
            Kind::of(other)
        ))),
    }
}
