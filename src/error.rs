//! Error types for pruning serialization.
//!
//! ## Error Categories
//!
//! - **Encoding state violations**: incompatible write operations mixed on a
//!   single node, which signals a malformed `Serialize` implementation
//! - **Key errors**: map keys that do not encode as strings
//! - **Parse errors**: malformed JSON fed to the text-to-object step
//! - **I/O errors**: writer failures during `to_writer`
//!
//! Encoding and parsing are deterministic transforms, so a failure on a given
//! input fails identically on retry. Callers receive either fully resolved
//! output or a descriptive failure; partial output is never returned.
//!
//! ## Examples
//!
//! ```rust
//! use serde_prune::{from_str, Error};
//!
//! let result: Result<serde_json::Value, Error> = from_str("{\"broken\":");
//! assert!(matches!(result, Err(Error::Parse(_))));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding or parsing.
#[derive(Debug, Error)]
pub enum Error {
    /// Incompatible write operations were mixed on a single node, e.g. a
    /// second single-value write, or an array append on a node already
    /// holding a scalar.
    #[error("invalid encoding state: cannot write {attempted} into a node already holding {existing}")]
    InvalidEncodingState {
        existing: &'static str,
        attempted: &'static str,
    },

    /// A map key encoded to something other than a string.
    #[error("map keys must encode as strings, found {0}")]
    NonStringKey(&'static str),

    /// Malformed text fed to the text-to-object step.
    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),

    /// IO error while writing serialized output.
    #[error("IO error: {0}")]
    Io(String),

    /// Generic message, used by the `serde` error bridges.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates an encoding-state error naming the node's existing tag and
    /// the tag of the rejected write.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_prune::Error;
    ///
    /// let err = Error::invalid_state("string", "array");
    /// assert!(err.to_string().contains("already holding string"));
    /// ```
    pub fn invalid_state(existing: &'static str, attempted: &'static str) -> Self {
        Error::InvalidEncodingState {
            existing,
            attempted,
        }
    }

    /// Creates an I/O error for writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
