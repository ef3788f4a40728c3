//! The mutable intermediate tree built during an encode pass.
//!
//! Every encode call builds one [`Node`] tree. A node starts [`Node::Unset`]
//! and transitions to exactly one concrete tag:
//!
//! - [`Node::set`] fixes a whole value once; a second call fails
//! - [`Node::push`] fixes the array tag, then appends repeatably
//! - [`Node::insert`] fixes the map tag, then inserts-or-overwrites repeatably
//!
//! A node still `Unset` when the tree is finalized is *cancelable*: it and
//! the map entry or array slot that referenced it vanish from output. This is
//! what lets a nested value encode to nothing without leaving a `null`
//! placeholder behind.
//!
//! ## Examples
//!
//! ```rust
//! use serde_prune::Node;
//!
//! let mut node = Node::new();
//! assert!(!node.is_resolved());
//!
//! node.insert("id", Node::Int(7)).unwrap();
//! node.insert("name", Node::String("Alice".into())).unwrap();
//! assert!(node.is_resolved());
//!
//! // The map tag is fixed now; a scalar write is rejected.
//! assert!(node.set(Node::Bool(true)).is_err());
//! ```

use indexmap::IndexMap;

use crate::{Error, Result};

/// One resolved or unresolved value in an encode pass.
///
/// Each child node is exclusively owned by its parent map entry or array
/// slot; the root is owned by the encoding operation. Ownership rules out a
/// node ever being linked to two parents, so no aliasing guard is needed.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Node {
    /// The initial placeholder tag. An `Unset` node is cancelable.
    #[default]
    Unset,
    Null,
    Array(Vec<Node>),
    Map(IndexMap<String, Node>),
    String(String),
    Int(i64),
    Uint(u64),
    Double(f64),
    Float(f32),
    Bool(bool),
}

impl Node {
    /// Creates a fresh unresolved node.
    #[must_use]
    pub fn new() -> Self {
        Node::Unset
    }

    /// Returns `true` once the node has been assigned a concrete tag.
    ///
    /// Parents consult this when finalizing: an unresolved child is omitted
    /// entirely rather than included as `null`.
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Node::Unset)
    }

    /// The name of the node's current tag, used in error messages.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Node::Unset => "unset",
            Node::Null => "null",
            Node::Array(_) => "array",
            Node::Map(_) => "map",
            Node::String(_) => "string",
            Node::Int(_) => "signed integer",
            Node::Uint(_) => "unsigned integer",
            Node::Double(_) => "double",
            Node::Float(_) => "float",
            Node::Bool(_) => "bool",
        }
    }

    /// Single-shot write of a whole value.
    ///
    /// Succeeds only while the node is still unresolved; any second write
    /// fails with [`Error::InvalidEncodingState`], including a second write
    /// of the same tag.
    pub fn set(&mut self, value: Node) -> Result<()> {
        match self {
            Node::Unset => {
                *self = value;
                Ok(())
            }
            _ => Err(Error::invalid_state(self.tag(), value.tag())),
        }
    }

    /// Appends a child, fixing the array tag on first use.
    ///
    /// Fails with [`Error::InvalidEncodingState`] if the node already holds
    /// anything other than an array.
    pub fn push(&mut self, child: Node) -> Result<()> {
        match self {
            Node::Unset => {
                *self = Node::Array(vec![child]);
                Ok(())
            }
            Node::Array(items) => {
                items.push(child);
                Ok(())
            }
            _ => Err(Error::invalid_state(self.tag(), "array")),
        }
    }

    /// Inserts-or-overwrites a keyed child, fixing the map tag on first use.
    ///
    /// Fails with [`Error::InvalidEncodingState`] if the node already holds
    /// anything other than a map.
    pub fn insert(&mut self, key: impl Into<String>, child: Node) -> Result<()> {
        match self {
            Node::Unset => {
                let mut entries = IndexMap::new();
                entries.insert(key.into(), child);
                *self = Node::Map(entries);
                Ok(())
            }
            Node::Map(entries) => {
                entries.insert(key.into(), child);
                Ok(())
            }
            _ => Err(Error::invalid_state(self.tag(), "map")),
        }
    }

    /// If the node holds a string, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the node holds a signed integer, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// If the node holds a bool, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the node holds an array, returns its elements. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    /// If the node holds a map, returns its entries. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Map(entries) => Some(entries),
            _ => None,
        }
    }
}
