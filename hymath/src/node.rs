//! Node representation of OpenMath objects.
//!
//! Role
//! - [`NodeKind`] is the closed sum type over the nine OpenMath object kinds; its
//!   structural children are [`NodeId`] handles into an [`OmArena`](crate::arena::OmArena).
//! - [`Symbol`] and [`IntegerValue`] are the validated payloads shared by nodes and
//!   attribute keys.
//! - [`Location`] names the slot a node occupies inside its parent.
//!
//! Ownership
//! - A node owns its children, bound variables, head symbol, body and attribute
//!   values. The parent back-reference stored next to each node never owns anything
//!   and is never serialized.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIs, EnumIter, EnumString, IntoStaticStr};

use crate::error::{OmError, OmResult};
use crate::ident::{is_identifier, is_integer_text};

slotmap::new_key_type! {
    /// Stable handle to a node stored in an [`OmArena`](crate::arena::OmArena).
    ///
    /// Two handles are equal iff they designate the literal same node, which is how
    /// identity (`same_object_as`) is expressed.
    pub struct NodeId;
}

/// Type tag of a node, as written in the `t` field of the wire format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, EnumIter, EnumString, AsRefStr, IntoStaticStr,
)]
pub enum NodeType {
    #[strum(serialize = "i")]
    Integer,
    #[strum(serialize = "f")]
    Float,
    #[strum(serialize = "st")]
    String,
    #[strum(serialize = "ba")]
    ByteArray,
    #[strum(serialize = "sy")]
    Symbol,
    #[strum(serialize = "v")]
    Variable,
    #[strum(serialize = "a")]
    Application,
    #[strum(serialize = "bi")]
    Binding,
    #[strum(serialize = "e")]
    Error,
}

impl NodeType {
    /// The wire tag (`i`, `f`, `st`, `ba`, `sy`, `v`, `a`, `bi`, `e`).
    #[inline]
    pub fn tag(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Payload of an integer node.
///
/// Values that fit an `i64` are usually stored natively; larger values (or values
/// that were supplied as text) keep their decimal text. The two forms are distinct
/// on the wire and under equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntegerValue {
    Native(i64),
    Text(String),
}

impl IntegerValue {
    /// Build a textual integer, checking it against `^[+-]?[0-9]+$`.
    pub fn text(s: impl Into<String>) -> OmResult<Self> {
        let s = s.into();
        if is_integer_text(&s) {
            Ok(IntegerValue::Text(s))
        } else {
            Err(OmError::Validation(format!("Not an integer: {s}")))
        }
    }

    /// Integer carried by a JSON number, if it has no fractional part.
    ///
    /// `1e3` and `1.0` are integers here; the text of a value beyond `i64` is its
    /// plain decimal expansion.
    pub fn from_number(n: &serde_json::Number) -> Option<Self> {
        if let Some(v) = n.as_i64() {
            return Some(IntegerValue::Native(v));
        }
        if n.is_u64() {
            return Some(IntegerValue::Text(n.to_string()));
        }
        let v = n.as_f64()?;
        if !v.is_finite() || v.fract() != 0.0 {
            return None;
        }
        if v >= i64::MIN as f64 && v < i64::MAX as f64 {
            Some(IntegerValue::Native(v as i64))
        } else {
            Some(IntegerValue::Text(format!("{v:.0}")))
        }
    }

    /// Numeric value as a float (lossy for large textual integers).
    pub fn to_f64(&self) -> f64 {
        match self {
            IntegerValue::Native(v) => *v as f64,
            IntegerValue::Text(s) => s.parse::<f64>().unwrap_or(f64::NAN),
        }
    }
}

impl From<i64> for IntegerValue {
    fn from(value: i64) -> Self {
        IntegerValue::Native(value)
    }
}

impl From<i32> for IntegerValue {
    fn from(value: i32) -> Self {
        IntegerValue::Native(value.into())
    }
}

impl fmt::Display for IntegerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegerValue::Native(v) => write!(f, "{v}"),
            IntegerValue::Text(s) => f.write_str(s),
        }
    }
}

/// A content-dictionary qualified symbol: `cd.name`, optionally with a base uri.
///
/// Symbol identity for attribute lookups is the `(name, cd)` pair; the uri is kept
/// for serialization but never takes part in key matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    name: String,
    cd: String,
    uri: Option<String>,
}

impl Symbol {
    /// Create a symbol, validating both identifiers.
    pub fn new(name: impl Into<String>, cd: impl Into<String>) -> OmResult<Self> {
        let (name, cd) = (name.into(), cd.into());
        if !is_identifier(&name) {
            return Err(OmError::Validation(format!(
                "Invalid identifier as symbol name: {name}"
            )));
        }
        if !is_identifier(&cd) {
            return Err(OmError::Validation(format!(
                "Invalid identifier as symbol CD: {cd}"
            )));
        }
        Ok(Self {
            name,
            cd,
            uri: None,
        })
    }

    /// Attach a content-dictionary base uri.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cd(&self) -> &str {
        &self.cd
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Canonical key identity: same name and same content dictionary.
    #[inline]
    pub fn matches(&self, other: &Symbol) -> bool {
        self.name == other.name && self.cd == other.cd
    }

    /// Wire shape of this symbol (`{"t":"sy","n":…,"cd":…}`).
    pub fn to_value(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("t".into(), NodeType::Symbol.tag().into());
        map.insert("n".into(), self.name.clone().into());
        map.insert("cd".into(), self.cd.clone().into());
        if let Some(uri) = &self.uri {
            map.insert("uri".into(), uri.clone().into());
        }
        serde_json::Value::Object(map)
    }

    /// Canonical JSON encoding, used as the attribute key on the wire.
    pub fn encode(&self) -> String {
        self.to_value().to_string()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.cd, self.name)
    }
}

/// One entry of an attribute map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: Symbol,
    pub value: NodeId,
}

/// Kind and payload of a node.
///
/// Head symbols and bodies live in `Option` slots because [`remove`] may empty them.
///
/// [`remove`]: crate::arena::OmArena::remove
#[derive(Debug, Clone, PartialEq, EnumIs)]
pub enum NodeKind {
    Integer(IntegerValue),
    Float(f64),
    String(String),
    ByteArray(Vec<u8>),
    Symbol(Symbol),
    Variable(String),
    /// Operator first, operands after.
    Application(Vec<NodeId>),
    Binding {
        symbol: Option<NodeId>,
        variables: Vec<NodeId>,
        body: Option<NodeId>,
    },
    Error {
        symbol: Option<NodeId>,
        children: Vec<NodeId>,
    },
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Integer(_) => NodeType::Integer,
            NodeKind::Float(_) => NodeType::Float,
            NodeKind::String(_) => NodeType::String,
            NodeKind::ByteArray(_) => NodeType::ByteArray,
            NodeKind::Symbol(_) => NodeType::Symbol,
            NodeKind::Variable(_) => NodeType::Variable,
            NodeKind::Application(_) => NodeType::Application,
            NodeKind::Binding { .. } => NodeType::Binding,
            NodeKind::Error { .. } => NodeType::Error,
        }
    }

    /// Application or error children; empty for every other kind.
    pub fn children(&self) -> &[NodeId] {
        match self {
            NodeKind::Application(children) | NodeKind::Error { children, .. } => children,
            _ => &[],
        }
    }

    /// Bound variables of a binding; empty for every other kind.
    pub fn variables(&self) -> &[NodeId] {
        match self {
            NodeKind::Binding { variables, .. } => variables,
            _ => &[],
        }
    }

    /// Head symbol slot of a binding or error.
    pub fn symbol(&self) -> Option<NodeId> {
        match self {
            NodeKind::Binding { symbol, .. } | NodeKind::Error { symbol, .. } => *symbol,
            _ => None,
        }
    }

    /// Body slot of a binding.
    pub fn body(&self) -> Option<NodeId> {
        match self {
            NodeKind::Binding { body, .. } => *body,
            _ => None,
        }
    }

    /// Structural children in the order children, head symbol, bound variables, body.
    pub fn structural_children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children()
            .iter()
            .copied()
            .chain(self.symbol())
            .chain(self.variables().iter().copied())
            .chain(self.body())
    }
}

/// Storage record for one node inside the arena.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) parent: Option<NodeId>,
}

impl NodeData {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
            parent: None,
        }
    }

    /// Every owned child: structural children, then attribute values.
    pub(crate) fn owned_children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.kind
            .structural_children()
            .chain(self.attributes.iter().map(|attr| attr.value))
    }
}

/// The slot a node occupies in its parent.
///
/// Textual form: `c<i>` (i-th application/error child), `v<i>` (i-th bound
/// variable), `s` (head symbol), `b` (binding body), or the canonical JSON encoding
/// of an attribute key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    Child(usize),
    Variable(usize),
    Symbol,
    Body,
    Attribute(Symbol),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Child(i) => write!(f, "c{i}"),
            Location::Variable(i) => write!(f, "v{i}"),
            Location::Symbol => f.write_str("s"),
            Location::Body => f.write_str("b"),
            Location::Attribute(key) => f.write_str(&key.encode()),
        }
    }
}

impl FromStr for Location {
    type Err = OmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index = |digits: &str| {
            digits
                .parse::<usize>()
                .map_err(|_| OmError::Syntax(format!("Invalid location index in `{s}`")))
        };

        match s {
            "s" => Ok(Location::Symbol),
            "b" => Ok(Location::Body),
            _ if s.starts_with('{') => {
                let value: serde_json::Value = serde_json::from_str(s)?;
                crate::validate::validate_attribute_key(s, &value)?;
                Ok(Location::Attribute(crate::shape::symbol_from_value(&value)?))
            }
            _ => match s.split_at_checked(1) {
                Some(("c", digits)) => Ok(Location::Child(index(digits)?)),
                Some(("v", digits)) => Ok(Location::Variable(index(digits)?)),
                _ => Err(OmError::Syntax(format!("Unknown location tag `{s}`"))),
            },
        }
    }
}
