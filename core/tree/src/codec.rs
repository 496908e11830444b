//! Self-describing binary serialization.
//!
//! Trees serialize to a small tagged-value container written with LEB128
//! varints. Each node becomes a map holding its kind discriminator, its
//! identity, one entry per field, and a block of annotations limited to
//! the kinds currently registered in the [`SerdesRegistry`]; unregistered
//! annotations are omitted, not errors.
//!
//! Decoding is tolerant where the data model is tolerant and fatal where
//! it is not: missing fields decode to their unset state and unknown
//! annotation tags are skipped, but a kind discriminator the consuming
//! schema does not know is a schema/version mismatch and fails with
//! [`FormatError::UnknownKind`]. Node identities are remapped to fresh
//! [`NodeId`]s on the way in, and link targets are rewritten through the
//! same map so they resolve within the decoded tree; targets that were
//! not part of the serialized tree decode as unresolved.

use std::io::{Cursor, Read, Write};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::errors::FormatError;
use crate::node::{NodeData, NodeId, TreeNode};
use crate::serdes::SerdesRegistry;

const TAG_NULL: u8 = 0x00;
const TAG_FALSE: u8 = 0x01;
const TAG_TRUE: u8 = 0x02;
const TAG_INT: u8 = 0x03;
const TAG_STR: u8 = 0x04;
const TAG_BYTES: u8 = 0x05;
const TAG_LIST: u8 = 0x06;
const TAG_MAP: u8 = 0x07;

const KEY_KIND: &str = "@kind";
const KEY_ID: &str = "@id";
const KEY_ERROR: &str = "@error";
const KEY_ANNOTATIONS: &str = "@annotations";

/// The container's value model. Maps preserve entry order so encoding is
/// deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Looks up a map entry by key; `None` for other value shapes.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries
                .iter()
                .find(|(entry_key, _)| entry_key == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Name of this value's shape, for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Bytes(_) => "byte string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

// --- wire format ----------------------------------------------------------

fn write_value(out: &mut Vec<u8>, value: &Value) -> Result<(), FormatError> {
    match value {
        Value::Null => out.push(TAG_NULL),
        Value::Bool(false) => out.push(TAG_FALSE),
        Value::Bool(true) => out.push(TAG_TRUE),
        Value::Int(value) => {
            out.push(TAG_INT);
            leb128::write::signed(out, *value)?;
        }
        Value::Str(value) => {
            out.push(TAG_STR);
            write_len_bytes(out, value.as_bytes())?;
        }
        Value::Bytes(value) => {
            out.push(TAG_BYTES);
            write_len_bytes(out, value)?;
        }
        Value::List(items) => {
            out.push(TAG_LIST);
            leb128::write::unsigned(out, items.len() as u64)?;
            for item in items {
                write_value(out, item)?;
            }
        }
        Value::Map(entries) => {
            out.push(TAG_MAP);
            leb128::write::unsigned(out, entries.len() as u64)?;
            for (key, item) in entries {
                write_len_bytes(out, key.as_bytes())?;
                write_value(out, item)?;
            }
        }
    }
    Ok(())
}

fn write_len_bytes(out: &mut Vec<u8>, bytes: &[u8]) -> Result<(), FormatError> {
    leb128::write::unsigned(out, bytes.len() as u64)?;
    out.write_all(bytes)?;
    Ok(())
}

fn read_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8, FormatError> {
    let mut byte = [0u8; 1];
    cursor
        .read_exact(&mut byte)
        .map_err(|_| FormatError::Truncated)?;
    Ok(byte[0])
}

fn read_unsigned(cursor: &mut Cursor<&[u8]>) -> Result<u64, FormatError> {
    leb128::read::unsigned(cursor).map_err(varint_error)
}

fn read_signed(cursor: &mut Cursor<&[u8]>) -> Result<i64, FormatError> {
    leb128::read::signed(cursor).map_err(varint_error)
}

fn varint_error(error: leb128::read::Error) -> FormatError {
    match error {
        leb128::read::Error::Overflow => FormatError::VarintOverflow,
        leb128::read::Error::IoError(_) => FormatError::Truncated,
    }
}

fn read_len_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Vec<u8>, FormatError> {
    let length = usize::try_from(read_unsigned(cursor)?).map_err(|_| FormatError::VarintOverflow)?;
    let mut bytes = vec![0u8; length];
    cursor
        .read_exact(&mut bytes)
        .map_err(|_| FormatError::Truncated)?;
    Ok(bytes)
}

fn read_string(cursor: &mut Cursor<&[u8]>) -> Result<String, FormatError> {
    Ok(String::from_utf8(read_len_bytes(cursor)?)?)
}

fn read_value(cursor: &mut Cursor<&[u8]>) -> Result<Value, FormatError> {
    let offset = cursor.position();
    let tag = read_u8(cursor)?;
    match tag {
        TAG_NULL => Ok(Value::Null),
        TAG_FALSE => Ok(Value::Bool(false)),
        TAG_TRUE => Ok(Value::Bool(true)),
        TAG_INT => Ok(Value::Int(read_signed(cursor)?)),
        TAG_STR => Ok(Value::Str(read_string(cursor)?)),
        TAG_BYTES => Ok(Value::Bytes(read_len_bytes(cursor)?)),
        TAG_LIST => {
            let count = read_unsigned(cursor)?;
            let mut items = Vec::new();
            for _ in 0..count {
                items.push(read_value(cursor)?);
            }
            Ok(Value::List(items))
        }
        TAG_MAP => {
            let count = read_unsigned(cursor)?;
            let mut entries = Vec::new();
            for _ in 0..count {
                let key = read_string(cursor)?;
                let value = read_value(cursor)?;
                entries.push((key, value));
            }
            Ok(Value::Map(entries))
        }
        tag => Err(FormatError::InvalidTag { tag, offset }),
    }
}

/// Encodes a [`Value`] to its wire form.
///
/// # Errors
///
/// Only if a varint write fails, which cannot happen for in-memory
/// buffers.
pub fn to_bytes(value: &Value) -> Result<Vec<u8>, FormatError> {
    let mut out = Vec::new();
    write_value(&mut out, value)?;
    Ok(out)
}

/// Decodes a [`Value`] from its wire form, rejecting trailing input.
///
/// # Errors
///
/// See [`FormatError`].
pub fn from_bytes(bytes: &[u8]) -> Result<Value, FormatError> {
    let mut cursor = Cursor::new(bytes);
    let value = read_value(&mut cursor)?;
    if cursor.position() != bytes.len() as u64 {
        return Err(FormatError::TrailingBytes);
    }
    Ok(value)
}

// --- node encoding --------------------------------------------------------

/// Serializes a tree to the binary container format.
///
/// # Errors
///
/// Fails only if a registered annotation fails to encode.
pub fn serialize(node: &dyn TreeNode, registry: &SerdesRegistry) -> Result<Vec<u8>, FormatError> {
    to_bytes(&encode_node(node, registry)?)
}

/// Encodes one node (and its owned closure) into the value model.
///
/// # Errors
///
/// Fails only if a registered annotation fails to encode.
pub fn encode_node(node: &dyn TreeNode, registry: &SerdesRegistry) -> Result<Value, FormatError> {
    let data = node.data();
    let mut entries = vec![
        (KEY_KIND.to_string(), Value::Str(node.kind_name().to_string())),
        (KEY_ID.to_string(), Value::Int(data.id.get() as i64)),
    ];
    if data.erroneous {
        entries.push((KEY_ERROR.to_string(), Value::Bool(true)));
    }
    for (name, field) in node.fields() {
        entries.push((name.to_string(), field.encode(registry)?));
    }
    let mut annotations = Vec::new();
    for entry in registry.iter() {
        if let Some(value) = data.annotations.get_raw(entry.type_id) {
            let bytes = (entry.encode)(value.as_ref())?;
            annotations.push((entry.tag.clone(), Value::Bytes(bytes)));
        }
    }
    if !annotations.is_empty() {
        entries.push((KEY_ANNOTATIONS.to_string(), Value::Map(annotations)));
    }
    Ok(Value::Map(entries))
}

// --- node decoding --------------------------------------------------------

/// State threaded through a decode: the registry for annotation tags and
/// the serialized-identity → fresh-identity map used to rewrite links.
pub struct DecodeContext<'a> {
    pub registry: &'a SerdesRegistry,
    ids: FxHashMap<u64, NodeId>,
}

impl<'a> DecodeContext<'a> {
    fn new(registry: &'a SerdesRegistry, root: &Value) -> Self {
        let mut ids = FxHashMap::default();
        collect_ids(root, &mut ids);
        DecodeContext { registry, ids }
    }

    pub(crate) fn remap(&self, serialized: u64) -> Option<NodeId> {
        self.ids.get(&serialized).copied()
    }
}

fn collect_ids(value: &Value, ids: &mut FxHashMap<u64, NodeId>) {
    match value {
        Value::Map(entries) => {
            for (key, item) in entries {
                if key == KEY_ID {
                    if let Value::Int(raw) = item {
                        ids.entry(*raw as u64).or_insert_with(NodeId::fresh);
                    }
                }
                collect_ids(item, ids);
            }
        }
        Value::List(items) => {
            for item in items {
                collect_ids(item, ids);
            }
        }
        _ => {}
    }
}

/// Field-level decoding, implemented for every type a schema field can
/// have.
pub trait Decode: Sized {
    /// Decodes one field value.
    ///
    /// # Errors
    ///
    /// See [`FormatError`].
    fn decode_field(value: &Value, ctx: &DecodeContext<'_>) -> Result<Self, FormatError>;
}

/// Kind-directed decoding for node types. Concrete kinds answer for their
/// own discriminator; refinement enums try each variant in turn and
/// answer `None` for kinds outside their subtree.
pub trait DecodeNode: Sized {
    /// Decodes a node map if `kind` belongs to this type's subtree.
    ///
    /// # Errors
    ///
    /// See [`FormatError`].
    fn decode_node(
        kind: &str,
        map: &Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Option<Self>, FormatError>;
}

/// Deserializes a tree from the binary container format.
///
/// # Errors
///
/// Fatal if the input is malformed or the root kind discriminator is
/// unknown to `T`'s schema; annotation tags missing from `registry` are
/// skipped silently.
pub fn deserialize<T: Decode>(bytes: &[u8], registry: &SerdesRegistry) -> Result<T, FormatError> {
    let value = from_bytes(bytes)?;
    let ctx = DecodeContext::new(registry, &value);
    T::decode_field(&value, &ctx)
}

/// Kind dispatch used by the generated `Decode` impls: reads the `@kind`
/// discriminator and fails with [`FormatError::UnknownKind`] when the
/// target schema does not recognize it.
///
/// # Errors
///
/// See [`FormatError`].
pub fn decode_kind_dispatch<T: DecodeNode>(
    value: &Value,
    ctx: &DecodeContext<'_>,
) -> Result<T, FormatError> {
    let kind = value
        .get(KEY_KIND)
        .and_then(Value::as_str)
        .ok_or(FormatError::UnexpectedValue {
            expected: "node map with a kind discriminator",
            found: value.type_name(),
        })?;
    match T::decode_node(kind, value, ctx)? {
        Some(node) => Ok(node),
        None => Err(FormatError::UnknownKind {
            kind: kind.to_string(),
        }),
    }
}

/// Restores a node's bookkeeping from its map: remapped identity, the
/// erroneous marker, and every annotation whose tag is registered.
/// Unknown tags are skipped, not errors.
///
/// # Errors
///
/// See [`FormatError`].
pub fn decode_node_data(map: &Value, ctx: &DecodeContext<'_>) -> Result<NodeData, FormatError> {
    let mut data = NodeData::new();
    if let Some(raw) = map.get(KEY_ID).and_then(Value::as_int) {
        if let Some(id) = ctx.remap(raw as u64) {
            data.id = id;
        }
    }
    if let Some(Value::Bool(true)) = map.get(KEY_ERROR) {
        data.erroneous = true;
    }
    if let Some(block) = map.get(KEY_ANNOTATIONS) {
        let Value::Map(entries) = block else {
            return Err(FormatError::UnexpectedValue {
                expected: "annotation map",
                found: block.type_name(),
            });
        };
        for (tag, item) in entries {
            let Value::Bytes(bytes) = item else {
                return Err(FormatError::UnexpectedValue {
                    expected: "annotation byte string",
                    found: item.type_name(),
                });
            };
            match ctx.registry.entry_for_tag(tag) {
                Some(entry) => {
                    let value = (entry.decode)(bytes)?;
                    data.annotations.insert_raw(entry.type_id, value);
                }
                None => debug!(tag = %tag, "skipping annotation with unregistered tag"),
            }
        }
    }
    Ok(data)
}

// --- Decode implementations for field types -------------------------------

impl<T: Decode> Decode for crate::edge::One<T> {
    fn decode_field(value: &Value, ctx: &DecodeContext<'_>) -> Result<Self, FormatError> {
        match value {
            Value::Null => Ok(crate::edge::One::empty()),
            _ => Ok(crate::edge::One::new(T::decode_field(value, ctx)?)),
        }
    }
}

impl<T: Decode> Decode for crate::edge::Maybe<T> {
    fn decode_field(value: &Value, ctx: &DecodeContext<'_>) -> Result<Self, FormatError> {
        match value {
            Value::Null => Ok(crate::edge::Maybe::empty()),
            _ => Ok(crate::edge::Maybe::new(T::decode_field(value, ctx)?)),
        }
    }
}

fn decode_sequence<T: Decode>(
    value: &Value,
    ctx: &DecodeContext<'_>,
) -> Result<Vec<T>, FormatError> {
    let Value::List(items) = value else {
        return Err(FormatError::UnexpectedValue {
            expected: "list of nodes",
            found: value.type_name(),
        });
    };
    let mut children = Vec::with_capacity(items.len());
    for item in items {
        children.push(T::decode_field(item, ctx)?);
    }
    Ok(children)
}

impl<T: Decode> Decode for crate::edge::Any<T> {
    fn decode_field(value: &Value, ctx: &DecodeContext<'_>) -> Result<Self, FormatError> {
        Ok(decode_sequence(value, ctx)?.into())
    }
}

impl<T: Decode> Decode for crate::edge::Many<T> {
    fn decode_field(value: &Value, ctx: &DecodeContext<'_>) -> Result<Self, FormatError> {
        Ok(decode_sequence(value, ctx)?.into())
    }
}

impl<T> Decode for crate::edge::Link<T> {
    fn decode_field(value: &Value, ctx: &DecodeContext<'_>) -> Result<Self, FormatError> {
        match value {
            Value::Null => Ok(crate::edge::Link::unresolved()),
            Value::Int(raw) => Ok(match ctx.remap(*raw as u64) {
                Some(target) => crate::edge::Link::to(target),
                // The target was not part of the serialized tree.
                None => crate::edge::Link::unresolved(),
            }),
            _ => Err(FormatError::UnexpectedValue {
                expected: "link target identity",
                found: value.type_name(),
            }),
        }
    }
}

impl Decode for i64 {
    fn decode_field(value: &Value, _ctx: &DecodeContext<'_>) -> Result<Self, FormatError> {
        value.as_int().ok_or(FormatError::UnexpectedValue {
            expected: "integer",
            found: value.type_name(),
        })
    }
}

impl Decode for bool {
    fn decode_field(value: &Value, _ctx: &DecodeContext<'_>) -> Result<Self, FormatError> {
        match value {
            Value::Bool(value) => Ok(*value),
            _ => Err(FormatError::UnexpectedValue {
                expected: "bool",
                found: value.type_name(),
            }),
        }
    }
}

impl Decode for String {
    fn decode_field(value: &Value, _ctx: &DecodeContext<'_>) -> Result<Self, FormatError> {
        value
            .as_str()
            .map(ToString::to_string)
            .ok_or(FormatError::UnexpectedValue {
                expected: "string",
                found: value.type_name(),
            })
    }
}
