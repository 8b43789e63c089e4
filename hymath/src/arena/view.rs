use std::fmt;

use crate::arena::{OmArena, compare_nodes};
use crate::node::{IntegerValue, NodeData, NodeId, NodeKind, NodeType, Symbol};

/// Borrowed read view of one node of an [`OmArena`].
///
/// Views are cheap to copy and expose the read API consumers of the tree rely on:
/// type tag, payload, structural children and attributes. Equality on views is
/// structural equality with attributes considered.
#[derive(Clone, Copy)]
pub struct OmNode<'a> {
    arena: &'a OmArena,
    id: NodeId,
    data: &'a NodeData,
}

impl<'a> OmNode<'a> {
    #[inline]
    pub(crate) fn new(arena: &'a OmArena, id: NodeId, data: &'a NodeData) -> Self {
        Self { arena, id, data }
    }

    #[inline]
    fn view(&self, id: NodeId) -> Option<OmNode<'a>> {
        self.arena.get(id)
    }

    fn views(&self, ids: &[NodeId]) -> Vec<OmNode<'a>> {
        ids.iter().filter_map(|&id| self.view(id)).collect()
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn arena(&self) -> &'a OmArena {
        self.arena
    }

    #[inline]
    pub fn kind(&self) -> &'a NodeKind {
        &self.data.kind
    }

    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.data.kind.node_type()
    }

    pub fn integer(&self) -> Option<&'a IntegerValue> {
        match &self.data.kind {
            NodeKind::Integer(value) => Some(value),
            _ => None,
        }
    }

    pub fn float(&self) -> Option<f64> {
        match self.data.kind {
            NodeKind::Float(value) => Some(value),
            _ => None,
        }
    }

    pub fn string(&self) -> Option<&'a str> {
        match &self.data.kind {
            NodeKind::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn bytes(&self) -> Option<&'a [u8]> {
        match &self.data.kind {
            NodeKind::ByteArray(value) => Some(value),
            _ => None,
        }
    }

    /// Symbol payload, for symbol nodes.
    pub fn as_symbol(&self) -> Option<&'a Symbol> {
        match &self.data.kind {
            NodeKind::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Name of a symbol or variable.
    pub fn name(&self) -> Option<&'a str> {
        match &self.data.kind {
            NodeKind::Symbol(symbol) => Some(symbol.name()),
            NodeKind::Variable(name) => Some(name),
            _ => None,
        }
    }

    pub fn cd(&self) -> Option<&'a str> {
        self.as_symbol().map(Symbol::cd)
    }

    pub fn uri(&self) -> Option<&'a str> {
        self.as_symbol().and_then(Symbol::uri)
    }

    /// Application elements (operator first) or error children.
    pub fn children(&self) -> Vec<OmNode<'a>> {
        self.views(self.data.kind.children())
    }

    pub fn variables(&self) -> Vec<OmNode<'a>> {
        self.views(self.data.kind.variables())
    }

    /// Head symbol of a binding or error.
    pub fn symbol(&self) -> Option<OmNode<'a>> {
        self.data.kind.symbol().and_then(|id| self.view(id))
    }

    pub fn body(&self) -> Option<OmNode<'a>> {
        self.data.kind.body().and_then(|id| self.view(id))
    }

    pub fn parent(&self) -> Option<OmNode<'a>> {
        self.data.parent.and_then(|id| self.view(id))
    }

    /// Attribute entries in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&'a Symbol, OmNode<'a>)> + 'a {
        let arena = self.arena;
        self.data
            .attributes
            .iter()
            .filter_map(move |attr| Some((&attr.key, arena.get(attr.value)?)))
    }

    pub fn has_attributes(&self) -> bool {
        !self.data.attributes.is_empty()
    }
}

impl PartialEq for OmNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        compare_nodes(*self, *other, true)
    }
}

impl fmt::Debug for OmNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OmNode")
            .field("id", &self.id)
            .field("type", &self.node_type())
            .field("text", &self.arena.simple_encode(self.id))
            .finish()
    }
}

/// Compact text rendering (attributes dropped).
impl fmt::Display for OmNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.arena.simple_encode(self.id))
    }
}
