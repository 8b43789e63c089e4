//! Iterative queries over structural descendants.
//!
//! Structural children of a node are, in order: application or error children, the
//! head symbol, the bound variables and the body. Attribute values are not structural
//! children and are never visited.
//!
//! Traversal uses an explicit stack (no recursion), so arbitrarily deep trees are safe.
//!
//! Example: collect every variable occurrence
//! ```
//! use hymath::arena::OmArena;
//!
//! let mut arena = OmArena::new();
//! let e = arena.simple_decode("f(x,logic1.forall[y,g(y)])").unwrap();
//! let names: Vec<_> = arena
//!     .descendants_satisfying(e, |n| n.node_type().is_variable())
//!     .into_iter()
//!     .filter_map(|id| arena.get(id)?.name())
//!     .collect();
//! assert_eq!(names, ["f", "x", "y", "g", "y"]);
//! ```
use smallvec::SmallVec;

use crate::arena::{OmArena, OmNode};
use crate::node::NodeId;

/// Pre-order iterator over a node and its structural descendants.
pub struct Descendants<'a> {
    arena: &'a OmArena,
    stack: SmallVec<[NodeId; 32]>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = OmNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.stack.pop()?;
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            let len = self.stack.len();
            self.stack.extend(node.kind().structural_children());
            self.stack[len..].reverse();
            return Some(node);
        }
    }
}

impl OmArena {
    /// `id` followed by all its structural descendants, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack = SmallVec::new();
        stack.push(id);
        Descendants { arena: self, stack }
    }

    /// Immediate structural children of `id` accepted by `filter`.
    pub fn children_satisfying(
        &self,
        id: NodeId,
        mut filter: impl FnMut(OmNode<'_>) -> bool,
    ) -> Vec<NodeId> {
        let Some(kind) = self.kind(id) else {
            return Vec::new();
        };
        kind.structural_children()
            .filter(|&child| self.get(child).is_some_and(&mut filter))
            .collect()
    }

    /// `id` and its structural descendants accepted by `filter`, in pre-order.
    pub fn descendants_satisfying(
        &self,
        id: NodeId,
        mut filter: impl FnMut(OmNode<'_>) -> bool,
    ) -> Vec<NodeId> {
        self.descendants(id)
            .filter(|&node| filter(node))
            .map(|node| node.id())
            .collect()
    }

    /// Whether `id` or one of its structural descendants is accepted by `filter`.
    pub fn has_descendant_satisfying(
        &self,
        id: NodeId,
        mut filter: impl FnMut(OmNode<'_>) -> bool,
    ) -> bool {
        self.descendants(id).any(|node| filter(node))
    }
}
