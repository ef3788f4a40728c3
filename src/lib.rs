//! # serde_prune
//!
//! A Serde JSON serializer with **cancelable nodes**: any value that encodes
//! to nothing vanishes from the output entirely, including the key that
//! referenced it in the parent object.
//!
//! ## How it works
//!
//! Encoding builds a mutable intermediate tree ([`Node`]) instead of writing
//! text directly. Every value gets a freshly allocated node that starts
//! unresolved; scalars resolve it with a single-shot write, containers
//! resolve it through their first resolved child. Whatever is still
//! unresolved when the tree is finalized is simply omitted:
//!
//! - `None` fields disappear instead of serializing as `null`
//! - empty arrays and maps disappear instead of serializing as `[]`/`{}`
//! - the effect cascades: a struct whose every field canceled cancels too
//!
//! A completed tree is rendered to JSON text, projected into a generic
//! [`serde_json::Value`], or both.
//!
//! ## Key Features
//!
//! - **Cancelable nodes**: values encoding to nothing vanish, keys included
//! - **Serde compatible**: works with `#[derive(Serialize)]` out of the box
//! - **Two outputs**: JSON text and a loosely-typed generic object model
//! - **Special-cased scalars**: timestamps encode as ISO-8601 strings,
//!   binary blobs as base64 strings
//! - **Contextual encoding**: a purpose tag and side-channel bag are
//!   threaded through every nested encode call for collaborators to read
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Serialize;
//! use serde_prune::to_string;
//!
//! #[derive(Serialize)]
//! struct Profile {
//!     name: String,
//!     email: Option<String>,
//!     aliases: Vec<String>,
//! }
//!
//! let profile = Profile {
//!     name: "Alice".to_string(),
//!     email: None,
//!     aliases: Vec::new(),
//! };
//!
//! // `email` and `aliases` both encode to nothing, so neither key appears.
//! let text = to_string(&profile).unwrap();
//! assert_eq!(text, Some(r#"{"name":"Alice"}"#.to_string()));
//! ```
//!
//! A value that cancels completely produces no output at all:
//!
//! ```rust
//! use serde_prune::to_string;
//!
//! let nothing: Vec<i32> = Vec::new();
//! assert_eq!(to_string(&nothing).unwrap(), None);
//! ```
//!
//! ## Generic objects
//!
//! ```rust
//! use serde::Serialize;
//! use serde_prune::to_value;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value = to_value(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(value, Some(serde_json::json!({"x": 1, "y": 2})));
//! ```
//!
//! ## Divergences from strict JSON emitters
//!
//! The output is parseable JSON, but the emitter differs from the usual
//! conventions in ways callers may rely on:
//!
//! - empty containers are omitted rather than emitted as `[]`/`{}`
//! - `None` is omitted rather than emitted as `null` (use `()` or
//!   [`serde_json::Value::Null`] for an explicit `null`)
//! - a CR+LF pair in a string escapes as the single unit `\r\n`
//! - no `\uXXXX` escaping; non-ASCII characters pass through verbatim

pub mod error;
pub mod node;
pub mod object;
pub mod options;
pub mod render;
pub mod ser;

pub use error::{Error, Result};
pub use node::Node;
pub use object::{project, Document};
pub use options::{current_options, Options, Purpose};
pub use render::{escape, render, unescape};
pub use ser::NodeSerializer;

use options::OptionsScope;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Encodes any `T: Serialize` into its intermediate node tree.
///
/// The returned root is unresolved when the value encoded to nothing.
///
/// # Errors
///
/// Returns an error if the value's `Serialize` implementation mixes
/// incompatible writes on one node or uses non-string map keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_node<T>(value: &T) -> Result<Node>
where
    T: ?Sized + Serialize,
{
    to_node_with_options(value, Options::default())
}

/// Like [`to_node`] with explicit encoding options.
///
/// The options are threaded unchanged through every nested encode call and
/// are visible to collaborators via [`current_options`] for the duration of
/// the encode.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_node_with_options<T>(value: &T, options: Options) -> Result<Node>
where
    T: ?Sized + Serialize,
{
    let _scope = OptionsScope::enter(options.clone());
    ser::encode(value, &options)
}

/// Serializes any `T: Serialize` to JSON text.
///
/// Returns `Ok(None)` when the value encodes to nothing.
///
/// # Examples
///
/// ```rust
/// use serde_prune::to_string;
///
/// assert_eq!(to_string(&42).unwrap(), Some("42".to_string()));
/// assert_eq!(to_string(&true).unwrap(), Some("true".to_string()));
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be encoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<Option<String>>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, Options::default())
}

/// Like [`to_string`] with explicit encoding options.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: Options) -> Result<Option<String>>
where
    T: ?Sized + Serialize,
{
    let node = to_node_with_options(value, options)?;
    Ok(render::render(&node))
}

/// Serializes any `T: Serialize` to JSON bytes.
///
/// Returns `Ok(None)` when the value encodes to nothing.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Option<Vec<u8>>>
where
    T: ?Sized + Serialize,
{
    Ok(to_string(value)?.map(String::into_bytes))
}

/// Serializes any `T: Serialize` to a writer.
///
/// A value that encodes to nothing writes nothing.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, Options::default())
}

/// Like [`to_writer`] with explicit encoding options.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: Options) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    if let Some(text) = to_string_with_options(value, options)? {
        writer
            .write_all(text.as_bytes())
            .map_err(|e| Error::io(&e.to_string()))?;
    }
    Ok(())
}

/// Converts any `T: Serialize` to a generic [`serde_json::Value`].
///
/// The node tree is projected directly, with no text round-trip. Returns
/// `Ok(None)` when the value encodes to nothing.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Option<serde_json::Value>>
where
    T: ?Sized + Serialize,
{
    to_value_with_options(value, Options::default())
}

/// Like [`to_value`] with explicit encoding options.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value_with_options<T>(value: &T, options: Options) -> Result<Option<serde_json::Value>>
where
    T: ?Sized + Serialize,
{
    let node = to_node_with_options(value, options)?;
    Ok(object::project(&node))
}

/// Deserializes an instance of type `T` from a string of JSON text.
///
/// Deserialization is delegated to serde_json; this crate only customizes
/// encoding. With `T = serde_json::Value` this is the text-to-generic-object
/// step.
///
/// # Examples
///
/// ```rust
/// use serde_prune::from_str;
///
/// let value: serde_json::Value = from_str(r#"{"a":1}"#).unwrap();
/// assert_eq!(value["a"], serde_json::json!(1));
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] if the input is not valid JSON or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(s).map_err(Error::from)
}

/// Deserializes an instance of type `T` from JSON bytes.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the input is not valid JSON or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(bytes).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        email: Option<String>,
    }

    #[test]
    fn encode_decode_round_trip() {
        let user = User {
            id: 7,
            name: "Alice".to_string(),
            email: Some("alice@example.com".to_string()),
        };
        let text = to_string(&user).unwrap().unwrap();
        let back: User = from_str(&text).unwrap();
        assert_eq!(user, back);
    }

    #[test]
    fn canceled_field_is_absent_not_null() {
        let user = User {
            id: 7,
            name: "Alice".to_string(),
            email: None,
        };
        let text = to_string(&user).unwrap().unwrap();
        assert_eq!(text, r#"{"id":7,"name":"Alice"}"#);
    }

    #[test]
    fn fully_canceled_value_yields_none() {
        #[derive(Serialize)]
        struct Empty {
            a: Option<i32>,
            b: Vec<i32>,
        }
        let empty = Empty { a: None, b: Vec::new() };
        assert_eq!(to_string(&empty).unwrap(), None);
        assert_eq!(to_value(&empty).unwrap(), None);
        assert_eq!(to_vec(&empty).unwrap(), None);
    }

    #[test]
    fn to_writer_writes_rendered_text() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &vec![1, 2, 3]).unwrap();
        assert_eq!(buffer, b"[1,2,3]");
    }

    #[test]
    fn to_writer_writes_nothing_when_canceled() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &Option::<i32>::None).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn text_and_value_paths_agree() {
        let user = User {
            id: 1,
            name: "Bo".to_string(),
            email: None,
        };
        let text = to_string(&user).unwrap().unwrap();
        let reparsed: serde_json::Value = from_str(&text).unwrap();
        assert_eq!(Some(reparsed), to_value(&user).unwrap());
    }
}
