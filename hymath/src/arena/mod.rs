//! Arena-backed storage for OpenMath trees.
//!
//! Role
//! - Own every node of any number of trees in a single [`slotmap::SlotMap`], addressed by
//!   stable [`NodeId`] handles. Ownership edges (children, variables, head symbol, body,
//!   attribute values) and parent back-references are both plain ids, so there is no
//!   reference cycle and identity comparison is id comparison.
//! - Nodes detached by [`OmArena::remove`] or [`OmArena::replace_with`] stay in the arena
//!   as independent roots until [`OmArena::discard`] frees them.
//!
//! Example
//! ```
//! use hymath::arena::OmArena;
//!
//! let mut arena = OmArena::new();
//! let plus = arena.symbol("plus", "arith1", None).unwrap();
//! let one = arena.integer(1).unwrap();
//! let two = arena.integer(2).unwrap();
//! let sum = arena.application(&[plus, one, two]).unwrap();
//!
//! let view = arena.get(sum).unwrap();
//! assert_eq!(view.children().len(), 3);
//! assert_eq!(arena.simple_encode(sum), "arith1.plus(1,2)");
//! ```
mod factory;
mod view;

pub use view::OmNode;

use log::debug;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::error::{OmError, OmResult};
use crate::node::{NodeData, NodeId, NodeKind};

/// Store holding OpenMath nodes and their parent links.
#[derive(Debug, Clone, Default)]
pub struct OmArena {
    nodes: SlotMap<NodeId, NodeData>,
}

impl OmArena {
    /// Create a new, empty arena.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Number of live nodes across all trees.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return `true` if `id` designates a live node of this arena.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Borrow a read view of a node.
    ///
    /// # Panics
    /// If `id` was discarded or belongs to another arena. Use [`OmArena::get`] for a
    /// fallible lookup.
    #[track_caller]
    pub fn node(&self, id: NodeId) -> OmNode<'_> {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale or foreign node id {id:?}"),
        }
    }

    /// Borrow a read view of a node, or `None` if `id` is not live.
    pub fn get(&self, id: NodeId) -> Option<OmNode<'_>> {
        self.nodes.get(id).map(|data| OmNode::new(self, id, data))
    }

    /// Kind and payload of a node.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id).map(|data| &data.kind)
    }

    /// Structural parent of a node, `None` for roots.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    /// Topmost ancestor of `id` (possibly `id` itself).
    pub fn root(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Return `true` if `ancestor` is `id` or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    #[inline]
    pub(crate) fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    #[inline]
    pub(crate) fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// Insert a detached node and make it the parent of every node it owns.
    pub(crate) fn insert(&mut self, data: NodeData) -> NodeId {
        let owned: SmallVec<[NodeId; 8]> = data.owned_children().collect();
        let id = self.nodes.insert(data);
        for child in owned {
            if let Some(child) = self.nodes.get_mut(child) {
                child.parent = Some(id);
            }
        }
        id
    }

    /// Free a detached tree and every node it owns.
    ///
    /// Refused for a node that still has a parent; [`OmArena::remove`] it first.
    pub fn discard(&mut self, root: NodeId) -> OmResult<()> {
        let Some(data) = self.nodes.get(root) else {
            return Ok(());
        };
        if data.parent.is_some() {
            return Err(OmError::OperationRefused(
                "cannot discard a node that is still attached to a parent".into(),
            ));
        }

        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(root);
        let mut freed = 0usize;
        while let Some(id) = stack.pop() {
            if let Some(data) = self.nodes.remove(id) {
                stack.extend(data.owned_children());
                freed += 1;
            }
        }
        debug!("Discarded tree rooted at {root:?} ({freed} nodes freed)");
        Ok(())
    }

    /// Deep copy of the tree rooted at `id`, rebuilt through the codec so that the
    /// copy is validated and carries fresh parent links throughout.
    ///
    /// The copy is a new root; no node of it is the same object as any node of the
    /// original.
    pub fn copy(&mut self, id: NodeId) -> OmResult<NodeId> {
        let value = self.to_value(id)?;
        self.decode_value(&value)
    }

    /// Identity comparison: `true` iff both ids designate the literal same node.
    #[inline]
    pub fn same_object_as(&self, a: NodeId, b: NodeId) -> bool {
        a == b && self.contains(a)
    }

    /// Structural equality of two nodes of this arena, ignoring parent links.
    ///
    /// An absent attribute map equals an empty one; with `consider_attributes` false
    /// attribute maps are ignored on both sides.
    pub fn equals(&self, a: NodeId, b: NodeId, consider_attributes: bool) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(a), Some(b)) => compare_nodes(a, b, consider_attributes),
            _ => false,
        }
    }
}

/// Compare two node views for structural equality, possibly across arenas.
///
/// Attribute maps are compared as maps keyed by symbol name and content dictionary,
/// independently of entry order.
pub fn compare_nodes(a: OmNode<'_>, b: OmNode<'_>, consider_attributes: bool) -> bool {
    let slot = |x: Option<OmNode<'_>>, y: Option<OmNode<'_>>| match (x, y) {
        (None, None) => true,
        (Some(x), Some(y)) => compare_nodes(x, y, consider_attributes),
        _ => false,
    };
    let all = |xs: Vec<OmNode<'_>>, ys: Vec<OmNode<'_>>| {
        xs.len() == ys.len()
            && xs
                .into_iter()
                .zip(ys)
                .all(|(x, y)| compare_nodes(x, y, consider_attributes))
    };

    let same_structure = match (a.kind(), b.kind()) {
        (NodeKind::Integer(x), NodeKind::Integer(y)) => x == y,
        (NodeKind::Float(x), NodeKind::Float(y)) => x == y,
        (NodeKind::String(x), NodeKind::String(y)) => x == y,
        (NodeKind::ByteArray(x), NodeKind::ByteArray(y)) => x == y,
        (NodeKind::Symbol(x), NodeKind::Symbol(y)) => x == y,
        (NodeKind::Variable(x), NodeKind::Variable(y)) => x == y,
        (NodeKind::Application(_), NodeKind::Application(_)) => all(a.children(), b.children()),
        (NodeKind::Binding { .. }, NodeKind::Binding { .. }) => {
            slot(a.symbol(), b.symbol())
                && all(a.variables(), b.variables())
                && slot(a.body(), b.body())
        }
        (NodeKind::Error { .. }, NodeKind::Error { .. }) => {
            slot(a.symbol(), b.symbol()) && all(a.children(), b.children())
        }
        _ => false,
    };
    if !same_structure {
        return false;
    }
    if !consider_attributes {
        return true;
    }

    let (attrs_a, attrs_b): (Vec<_>, Vec<_>) = (a.attributes().collect(), b.attributes().collect());
    attrs_a.len() == attrs_b.len()
        && attrs_a.iter().all(|(key, value)| {
            attrs_b
                .iter()
                .find(|(other, _)| key.matches(other))
                .is_some_and(|(_, other)| compare_nodes(*value, *other, true))
        })
}
