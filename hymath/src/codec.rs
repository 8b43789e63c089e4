//! JSON wire format.
//!
//! Role
//! - [`OmArena::decode`] / [`OmArena::decode_value`] validate an external shape and build
//!   a new root from it, with every parent link set.
//! - [`OmArena::encode`] / [`OmArena::to_value`] write back the owned structure only;
//!   parent links never appear on the wire.
//!
//! Wire shape: `{"t": tag, ...fields, "a": {key: value}}` where the attribute map is keyed
//! by the canonical JSON encoding of a symbol node. Byte arrays travel as arrays of
//! integers in `0..=255`.
//!
//! ```
//! use hymath::arena::OmArena;
//!
//! let mut arena = OmArena::new();
//! let text = r#"{"t":"a","c":[{"t":"sy","n":"plus","cd":"arith1"},{"t":"i","v":1},{"t":"v","n":"x"}]}"#;
//! let sum = arena.decode(text).unwrap();
//! assert_eq!(arena.simple_encode(sum), "arith1.plus(1,x)");
//!
//! let again = arena.decode(&arena.encode(sum).unwrap()).unwrap();
//! assert!(arena.equals(sum, again, true));
//! ```
use log::trace;
use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::arena::{OmArena, OmNode};
use crate::error::{OmError, OmResult};
use crate::node::{Attribute, IntegerValue, NodeData, NodeId, NodeKind, NodeType};
use crate::shape::symbol_from_value;
use crate::validate::validate;

fn malformed(what: &str) -> OmError {
    OmError::Validation(format!("Malformed {what} in validated shape"))
}

impl OmArena {
    /// Parse JSON text, validate it and build a new tree.
    ///
    /// Malformed JSON yields [`OmError::Syntax`]; a well-formed shape that breaks the
    /// data model yields [`OmError::Validation`] with the first violation found.
    pub fn decode(&mut self, text: &str) -> OmResult<NodeId> {
        let value: Value = serde_json::from_str(text)?;
        self.decode_value(&value)
    }

    /// Validate an already-parsed shape and build a new tree from it.
    pub fn decode_value(&mut self, value: &Value) -> OmResult<NodeId> {
        validate(value)?;
        let root = self.instantiate(value)?;
        trace!("Decoded tree rooted at {root:?}");
        Ok(root)
    }

    /// Build nodes from a shape that already passed [`validate`].
    pub(crate) fn instantiate(&mut self, value: &Value) -> OmResult<NodeId> {
        let object = value.as_object().ok_or_else(|| malformed("object"))?;
        let node_type: NodeType = object
            .get("t")
            .and_then(Value::as_str)
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| malformed("type tag"))?;

        let field = |key: &str| object.get(key).ok_or_else(|| malformed(key));
        let kind = match node_type {
            NodeType::Integer => NodeKind::Integer(match field("v")? {
                Value::Number(n) => {
                    IntegerValue::from_number(n).ok_or_else(|| malformed("integer"))?
                }
                Value::String(s) => IntegerValue::Text(s.clone()),
                _ => return Err(malformed("integer")),
            }),
            NodeType::Float => {
                NodeKind::Float(field("v")?.as_f64().ok_or_else(|| malformed("float"))?)
            }
            NodeType::String => NodeKind::String(
                field("v")?
                    .as_str()
                    .ok_or_else(|| malformed("string"))?
                    .to_owned(),
            ),
            NodeType::ByteArray => NodeKind::ByteArray(
                field("v")?
                    .as_array()
                    .ok_or_else(|| malformed("byte array"))?
                    .iter()
                    .map(|b| {
                        b.as_u64()
                            .and_then(|b| u8::try_from(b).ok())
                            .ok_or_else(|| malformed("byte"))
                    })
                    .collect::<OmResult<_>>()?,
            ),
            NodeType::Symbol => NodeKind::Symbol(symbol_from_value(value)?),
            NodeType::Variable => NodeKind::Variable(
                field("n")?
                    .as_str()
                    .ok_or_else(|| malformed("variable name"))?
                    .to_owned(),
            ),
            NodeType::Application => NodeKind::Application(self.instantiate_all(field("c")?)?),
            NodeType::Binding => NodeKind::Binding {
                symbol: Some(self.instantiate(field("s")?)?),
                variables: self.instantiate_all(field("v")?)?,
                body: Some(self.instantiate(field("b")?)?),
            },
            NodeType::Error => NodeKind::Error {
                symbol: Some(self.instantiate(field("s")?)?),
                children: match object.get("c") {
                    Some(children) => self.instantiate_all(children)?,
                    None => Vec::new(),
                },
            },
        };

        let mut data = NodeData::new(kind);
        if let Some(map) = object.get("a").and_then(Value::as_object) {
            for (key, value) in map {
                let key = symbol_from_value(&serde_json::from_str::<Value>(key)?)?;
                let value = self.instantiate(value)?;
                match data.attributes.iter_mut().find(|attr| attr.key.matches(&key)) {
                    Some(existing) => {
                        // Colliding keys on the wire: the entry read last wins.
                        let shadowed = std::mem::replace(&mut existing.value, value);
                        self.discard(shadowed)?;
                    }
                    None => data.attributes.push(Attribute { key, value }),
                }
            }
        }

        Ok(self.insert(data))
    }

    fn instantiate_all(&mut self, values: &Value) -> OmResult<Vec<NodeId>> {
        values
            .as_array()
            .ok_or_else(|| malformed("list"))?
            .iter()
            .map(|value| self.instantiate(value))
            .collect()
    }

    /// Serialize the tree rooted at `id` to compact JSON text.
    pub fn encode(&self, id: NodeId) -> OmResult<String> {
        Ok(self.to_value(id)?.to_string())
    }

    /// Wire shape of the tree rooted at `id`.
    ///
    /// Refused for a stale id, and for a binding or error whose head or body slot was
    /// emptied by [`OmArena::remove`], since no valid shape describes such a node.
    pub fn to_value(&self, id: NodeId) -> OmResult<Value> {
        let Some(data) = self.data(id) else {
            return Err(OmError::OperationRefused(format!(
                "node {id:?} is not part of this arena"
            )));
        };
        let slot = |slot: Option<NodeId>, what: &str| match slot {
            Some(id) => self.to_value(id),
            None => Err(OmError::OperationRefused(format!(
                "cannot encode a {} without its {what}",
                data.kind.node_type()
            ))),
        };
        let all = |ids: &[NodeId]| -> OmResult<Vec<Value>> {
            ids.iter().map(|&id| self.to_value(id)).collect()
        };

        let mut object = Map::new();
        object.insert("t".into(), data.kind.node_type().tag().into());
        match &data.kind {
            NodeKind::Integer(IntegerValue::Native(v)) => {
                object.insert("v".into(), (*v).into());
            }
            NodeKind::Integer(IntegerValue::Text(v)) => {
                object.insert("v".into(), v.clone().into());
            }
            NodeKind::Float(v) => {
                let number = serde_json::Number::from_f64(*v).ok_or_else(|| {
                    OmError::Validation("OpenMath floats must be finite".into())
                })?;
                object.insert("v".into(), Value::Number(number));
            }
            NodeKind::String(v) => {
                object.insert("v".into(), v.clone().into());
            }
            NodeKind::ByteArray(bytes) => {
                object.insert("v".into(), bytes.iter().map(|&b| Value::from(b)).collect());
            }
            NodeKind::Symbol(symbol) => return self.with_attributes(symbol.to_value(), data),
            NodeKind::Variable(name) => {
                object.insert("n".into(), name.clone().into());
            }
            NodeKind::Application(children) => {
                object.insert("c".into(), Value::Array(all(children)?));
            }
            NodeKind::Binding {
                symbol,
                variables,
                body,
            } => {
                object.insert("s".into(), slot(*symbol, "head symbol")?);
                object.insert("v".into(), Value::Array(all(variables)?));
                object.insert("b".into(), slot(*body, "body")?);
            }
            NodeKind::Error { symbol, children } => {
                object.insert("s".into(), slot(*symbol, "head symbol")?);
                object.insert("c".into(), Value::Array(all(children)?));
            }
        }
        self.with_attributes(Value::Object(object), data)
    }

    fn with_attributes(&self, mut value: Value, data: &NodeData) -> OmResult<Value> {
        if data.attributes.is_empty() {
            return Ok(value);
        }
        let mut map = Map::new();
        for attr in &data.attributes {
            map.insert(attr.key.encode(), self.to_value(attr.value)?);
        }
        if let Some(object) = value.as_object_mut() {
            object.insert("a".into(), Value::Object(map));
        }
        Ok(value)
    }
}

/// Serializes the node's owned structure in the wire format.
impl Serialize for OmNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.arena()
            .to_value(self.id())
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}
