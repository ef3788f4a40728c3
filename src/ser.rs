//! The structured encoder: builds a [`Node`] tree from any `T: Serialize`.
//!
//! ## Overview
//!
//! [`NodeSerializer`] walks a value through serde's three container views and
//! fills in a freshly allocated [`Node`] per value:
//!
//! - **Keyed** (`SerializeMap` / `SerializeStruct`): each field is encoded
//!   into its own child node, and the entry is inserted only if the child
//!   resolved. A field that encodes to nothing never appears, not even as
//!   `null`.
//! - **Sequential** (`SerializeSeq` / the tuple forms): same rule per
//!   element; canceled elements are dropped, never kept as holes.
//! - **Single value** (the scalar methods): each fixes the matching scalar
//!   tag through the node's single-shot write.
//!
//! Cancelation sources compose: `None` encodes to nothing, and a container
//! whose every entry canceled (or that reported none) encodes to nothing
//! itself, all the way up to the root. An explicit JSON `null` is still
//! available through `()` / `serialize_unit`.
//!
//! Two scalar kinds are re-encoded into specific string representations
//! rather than using their structural form: timestamps arrive here as their
//! ISO-8601 rendering (via chrono's serde support), and binary blobs passed
//! through `serialize_bytes` become base64 strings.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde::Serialize;
//! use serde_prune::to_string;
//!
//! #[derive(Serialize)]
//! struct Account {
//!     name: String,
//!     nickname: Option<String>,
//! }
//!
//! let account = Account { name: "Ada".into(), nickname: None };
//! assert_eq!(
//!     to_string(&account).unwrap(),
//!     Some(r#"{"name":"Ada"}"#.to_string()),
//! );
//! ```

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{ser, Serialize};

use crate::{Error, Node, Options, Result};

/// Encodes `value` into a fresh node tree under the given options.
pub(crate) fn encode<T>(value: &T, options: &Options) -> Result<Node>
where
    T: ?Sized + Serialize,
{
    value.serialize(NodeSerializer::new(options))
}

/// A `serde::Serializer` producing a [`Node`] tree.
///
/// The encoding options are threaded by reference into every nested
/// container unchanged; the serializer itself never reads them.
#[derive(Clone, Copy)]
pub struct NodeSerializer<'a> {
    options: &'a Options,
}

impl<'a> NodeSerializer<'a> {
    pub fn new(options: &'a Options) -> Self {
        NodeSerializer { options }
    }

    fn scalar(self, value: Node) -> Result<Node> {
        let mut node = Node::new();
        node.set(value)?;
        Ok(node)
    }
}

impl<'a> ser::Serializer for NodeSerializer<'a> {
    type Ok = Node;
    type Error = Error;

    type SerializeSeq = SeqEncoder<'a>;
    type SerializeTuple = SeqEncoder<'a>;
    type SerializeTupleStruct = SeqEncoder<'a>;
    type SerializeTupleVariant = VariantSeqEncoder<'a>;
    type SerializeMap = MapEncoder<'a>;
    type SerializeStruct = MapEncoder<'a>;
    type SerializeStructVariant = VariantMapEncoder<'a>;

    fn serialize_bool(self, v: bool) -> Result<Node> {
        self.scalar(Node::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Node> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Node> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Node> {
        self.scalar(Node::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Node> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Node> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Node> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Node> {
        self.scalar(Node::Uint(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Node> {
        self.scalar(Node::Float(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Node> {
        self.scalar(Node::Double(v))
    }

    fn serialize_char(self, v: char) -> Result<Node> {
        self.scalar(Node::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Node> {
        self.scalar(Node::String(v.to_string()))
    }

    /// Binary blobs become base64 string scalars, not numeric arrays.
    fn serialize_bytes(self, v: &[u8]) -> Result<Node> {
        self.scalar(Node::String(BASE64_STANDARD.encode(v)))
    }

    /// `None` encodes to nothing: the node stays unresolved and the parent
    /// slot that would have referenced it is omitted.
    fn serialize_none(self) -> Result<Node> {
        Ok(Node::Unset)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node> {
        self.scalar(Node::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        let inner = value.serialize(NodeSerializer::new(self.options))?;
        let mut node = Node::new();
        if inner.is_resolved() {
            node.insert(variant, inner)?;
        }
        Ok(node)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqEncoder {
            node: Node::new(),
            options: self.options,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(VariantSeqEncoder {
            variant,
            inner: Node::new(),
            options: self.options,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapEncoder {
            node: Node::new(),
            pending_key: None,
            options: self.options,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(MapEncoder {
            node: Node::new(),
            pending_key: None,
            options: self.options,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(VariantMapEncoder {
            variant,
            inner: Node::new(),
            options: self.options,
        })
    }
}

/// Sequential container view over one node.
///
/// The node's array tag is fixed by the first resolved element, so a
/// sequence that never resolves anything stays unresolved and cancels.
pub struct SeqEncoder<'a> {
    node: Node,
    options: &'a Options,
}

impl<'a> SeqEncoder<'a> {
    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let child = value.serialize(NodeSerializer::new(self.options))?;
        if child.is_resolved() {
            self.node.push(child)?;
        }
        Ok(())
    }
}

impl<'a> ser::SerializeSeq for SeqEncoder<'a> {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.node)
    }
}

impl<'a> ser::SerializeTuple for SeqEncoder<'a> {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.node)
    }
}

impl<'a> ser::SerializeTupleStruct for SeqEncoder<'a> {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.node)
    }
}

/// Sequential view for a tuple variant: the payload builds like a sequence,
/// then wraps in a single-entry map named after the variant. If the payload
/// cancels, the whole variant cancels.
pub struct VariantSeqEncoder<'a> {
    variant: &'static str,
    inner: Node,
    options: &'a Options,
}

impl<'a> ser::SerializeTupleVariant for VariantSeqEncoder<'a> {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let child = value.serialize(NodeSerializer::new(self.options))?;
        if child.is_resolved() {
            self.inner.push(child)?;
        }
        Ok(())
    }

    fn end(self) -> Result<Node> {
        let mut node = Node::new();
        if self.inner.is_resolved() {
            node.insert(self.variant, self.inner)?;
        }
        Ok(node)
    }
}

/// Keyed container view over one node.
///
/// The node's map tag is fixed by the first resolved entry; a keyed
/// container that never resolves a field stays unresolved and cancels.
pub struct MapEncoder<'a> {
    node: Node,
    pending_key: Option<String>,
    options: &'a Options,
}

impl<'a> MapEncoder<'a> {
    fn entry<T>(&mut self, key: String, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let child = value.serialize(NodeSerializer::new(self.options))?;
        if child.is_resolved() {
            self.node.insert(key, child)?;
        }
        Ok(())
    }
}

impl<'a> ser::SerializeMap for MapEncoder<'a> {
    type Ok = Node;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let encoded = key.serialize(NodeSerializer::new(self.options))?;
        match encoded {
            Node::String(s) => {
                self.pending_key = Some(s);
                Ok(())
            }
            other => Err(Error::NonStringKey(other.tag())),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.entry(key, value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.node)
    }
}

impl<'a> ser::SerializeStruct for MapEncoder<'a> {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.entry(key.to_string(), value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.node)
    }
}

/// Keyed view for a struct variant, wrapped like [`VariantSeqEncoder`].
pub struct VariantMapEncoder<'a> {
    variant: &'static str,
    inner: Node,
    options: &'a Options,
}

impl<'a> ser::SerializeStructVariant for VariantMapEncoder<'a> {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let child = value.serialize(NodeSerializer::new(self.options))?;
        if child.is_resolved() {
            self.inner.insert(key, child)?;
        }
        Ok(())
    }

    fn end(self) -> Result<Node> {
        let mut node = Node::new();
        if self.inner.is_resolved() {
            node.insert(self.variant, self.inner)?;
        }
        Ok(node)
    }
}
