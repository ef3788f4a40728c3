//! Projects a completed [`Node`] tree into the generic document model.
//!
//! The loosely-typed model is [`serde_json::Value`]: nested maps, arrays and
//! scalars, for code that wants a dynamically-typed document instead of the
//! intermediate tree. [`project`] converts a tree directly, with no text
//! round-trip; [`Document`] covers the other interop direction, wrapping a
//! generic object parsed from text (or re-parsed from an encode) and
//! bridging back into typed values through serde_json.
//!
//! Trees built by the encoder never contain unresolved nodes below the
//! root, because canceled children are dropped before insertion. The
//! projector still skips any it is handed.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::{Error, Node, Options, Result};

/// Converts one node to a generic value, or `None` if it never resolved.
#[must_use]
pub fn project(node: &Node) -> Option<Value> {
    match node {
        Node::Unset => None,
        Node::Null => Some(Value::Null),
        Node::Bool(b) => Some(Value::Bool(*b)),
        Node::Int(i) => Some(Value::from(*i)),
        Node::Uint(u) => Some(Value::from(*u)),
        Node::Double(d) => Some(serde_json::Number::from_f64(*d).map_or(Value::Null, Value::Number)),
        Node::Float(f) => {
            Some(serde_json::Number::from_f64(f64::from(*f)).map_or(Value::Null, Value::Number))
        }
        Node::String(s) => Some(Value::String(s.clone())),
        Node::Array(items) => Some(Value::Array(items.iter().filter_map(project).collect())),
        Node::Map(entries) => Some(Value::Object(
            entries
                .iter()
                .filter_map(|(key, value)| project(value).map(|v| (key.clone(), v)))
                .collect(),
        )),
    }
}

/// A generic JSON document.
///
/// Wraps a loosely-typed object graph so downstream code handles encoded
/// values, parsed bytes and typed decoding uniformly.
///
/// # Examples
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use serde_prune::Document;
///
/// #[derive(Serialize, Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let doc = Document::from_encodable(&Point { x: 1, y: 2 })
///     .unwrap()
///     .expect("point resolves");
/// assert_eq!(doc.object()["x"], serde_json::json!(1));
///
/// let back: Point = doc.decode().unwrap();
/// assert_eq!(back, Point { x: 1, y: 2 });
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    object: Value,
}

impl Document {
    /// Wraps an already-built generic object.
    #[must_use]
    pub fn new(object: Value) -> Self {
        Document { object }
    }

    /// Encodes a value, renders it and re-parses the text into a generic
    /// object. Returns `Ok(None)` when the value encodes to nothing.
    pub fn from_encodable<T>(value: &T) -> Result<Option<Self>>
    where
        T: ?Sized + Serialize,
    {
        Self::from_encodable_with_options(value, Options::default())
    }

    /// Like [`Document::from_encodable`] with explicit encoding options.
    pub fn from_encodable_with_options<T>(value: &T, options: Options) -> Result<Option<Self>>
    where
        T: ?Sized + Serialize,
    {
        match crate::to_string_with_options(value, options)? {
            Some(text) => Ok(Some(text.parse()?)),
            None => Ok(None),
        }
    }

    /// Parses a document from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let object = serde_json::from_slice(bytes)?;
        Ok(Document { object })
    }

    /// The wrapped generic object.
    #[must_use]
    pub fn object(&self) -> &Value {
        &self.object
    }

    /// Consumes the document, returning the generic object.
    #[must_use]
    pub fn into_object(self) -> Value {
        self.object
    }

    /// Serializes the document back to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.object).map_err(Error::from)
    }

    /// Reconstructs a typed value from the generic object.
    pub fn decode<D: DeserializeOwned>(&self) -> Result<D> {
        serde_json::from_value(self.object.clone()).map_err(Error::from)
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let object = serde_json::from_str(s)?;
        Ok(Document { object })
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.object).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
