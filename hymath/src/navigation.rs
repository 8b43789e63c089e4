//! Upward and downward navigation, and in-place structural edits.
//!
//! Every edit keeps the parent links consistent: once an operation returns, each node
//! with a parent occupies exactly one slot of that parent. Detached nodes become
//! independent roots of the same arena.
use log::debug;

use crate::arena::OmArena;
use crate::error::{OmError, OmResult};
use crate::node::{Location, NodeId, NodeKind};

impl OmArena {
    /// Slot of `parent` currently holding `id`, looked up by identity.
    fn locate_in(&self, parent: NodeId, id: NodeId) -> Option<Location> {
        let parent = self.data(parent)?;
        let kind = &parent.kind;
        if let Some(i) = kind.children().iter().position(|&c| c == id) {
            return Some(Location::Child(i));
        }
        if self.kind(id).is_some_and(NodeKind::is_variable) {
            if let Some(i) = kind.variables().iter().position(|&v| v == id) {
                return Some(Location::Variable(i));
            }
        }
        if kind.symbol() == Some(id) {
            return Some(Location::Symbol);
        }
        if kind.body() == Some(id) {
            return Some(Location::Body);
        }
        parent
            .attributes
            .iter()
            .find(|attr| attr.value == id)
            .map(|attr| Location::Attribute(attr.key.clone()))
    }

    /// Which slot of its parent `id` occupies, or `None` for a root.
    pub fn find_in_parent(&self, id: NodeId) -> Option<Location> {
        self.locate_in(self.parent(id)?, id)
    }

    /// The node held in slot `location` of `id`, if any.
    pub fn find_child(&self, id: NodeId, location: &Location) -> Option<NodeId> {
        let data = self.data(id)?;
        match location {
            Location::Child(i) => data.kind.children().get(*i).copied(),
            Location::Variable(i) => data.kind.variables().get(*i).copied(),
            Location::Symbol => data.kind.symbol(),
            Location::Body => data.kind.body(),
            Location::Attribute(key) => data
                .attributes
                .iter()
                .find(|attr| attr.key.matches(key))
                .map(|attr| attr.value),
        }
    }

    /// Path of slots leading from `ancestor` (or from the root when `ancestor` is `None`
    /// or not an ancestor of `id`) down to `id`.
    ///
    /// ```
    /// use hymath::arena::OmArena;
    /// use hymath::node::Location;
    ///
    /// let mut arena = OmArena::new();
    /// let root = arena.simple_decode("f(g(x))").unwrap();
    /// let inner = arena.index(root, &[Location::Child(1), Location::Child(1)]).unwrap();
    /// assert_eq!(arena.get(inner).and_then(|n| n.name()), Some("x"));
    /// assert_eq!(arena.address(inner, None), vec![Location::Child(1), Location::Child(1)]);
    /// ```
    pub fn address(&self, id: NodeId, ancestor: Option<NodeId>) -> Vec<Location> {
        let stop = ancestor.filter(|&ancestor| self.is_ancestor_or_self(ancestor, id));
        let mut path = Vec::new();
        let mut current = id;
        while Some(current) != stop {
            let Some(parent) = self.parent(current) else {
                break;
            };
            let Some(location) = self.locate_in(parent, current) else {
                break;
            };
            path.push(location);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Follow `address` down from `id`; `None` as soon as a step finds nothing.
    pub fn index(&self, id: NodeId, address: &[Location]) -> Option<NodeId> {
        address
            .iter()
            .try_fold(id, |node, location| self.find_child(node, location))
    }

    /// Rewrite one slot of `parent`: `Some` overwrites it, `None` empties it (splicing
    /// sequences and deleting attribute entries).
    fn write_slot(&mut self, parent: NodeId, location: &Location, node: Option<NodeId>) -> bool {
        let Some(data) = self.data_mut(parent) else {
            return false;
        };

        fn write_seq(seq: &mut Vec<NodeId>, i: usize, node: Option<NodeId>) -> bool {
            if i >= seq.len() {
                return false;
            }
            match node {
                Some(node) => seq[i] = node,
                None => {
                    seq.remove(i);
                }
            }
            true
        }

        match (location, &mut data.kind) {
            (
                Location::Child(i),
                NodeKind::Application(children) | NodeKind::Error { children, .. },
            ) => write_seq(children, *i, node),
            (Location::Variable(i), NodeKind::Binding { variables, .. }) => {
                write_seq(variables, *i, node)
            }
            (
                Location::Symbol,
                NodeKind::Binding { symbol, .. } | NodeKind::Error { symbol, .. },
            ) => {
                *symbol = node;
                true
            }
            (Location::Body, NodeKind::Binding { body, .. }) => {
                *body = node;
                true
            }
            (Location::Attribute(key), _) => {
                let Some(pos) = data.attributes.iter().position(|attr| attr.key.matches(key))
                else {
                    return false;
                };
                match node {
                    Some(node) => data.attributes[pos].value = node,
                    None => {
                        data.attributes.remove(pos);
                    }
                }
                true
            }
            _ => false,
        }
    }

    /// Detach `id` from its parent, making it a new root.
    ///
    /// Returns `false` (and does nothing) if `id` already is a root.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let Some(location) = self.locate_in(parent, id) else {
            return false;
        };
        if !self.write_slot(parent, &location, None) {
            return false;
        }
        if let Some(data) = self.data_mut(id) {
            data.parent = None;
        }
        debug!("Removed {id:?} from slot {location} of {parent:?}");
        true
    }

    /// Install `other` in the slot occupied by `id`.
    ///
    /// `other` is first detached from wherever it sits. On success the displaced `id` is
    /// returned as a new root. `Ok(None)` means nothing happened: `id` is a root, or `id`
    /// and `other` are the same node.
    ///
    /// Refused, without any change, when the slot is a head symbol and `other` is not a
    /// symbol, when the slot is a bound variable and `other` is not a variable, or when
    /// `other` is `id` itself or one of its ancestors.
    pub fn replace_with(&mut self, id: NodeId, other: NodeId) -> OmResult<Option<NodeId>> {
        if id == other || !self.contains(other) {
            return Ok(None);
        }
        let Some(parent) = self.parent(id) else {
            return Ok(None);
        };
        let Some(location) = self.locate_in(parent, id) else {
            return Ok(None);
        };

        let other_kind = self.kind(other);
        match location {
            Location::Symbol if !other_kind.is_some_and(NodeKind::is_symbol) => {
                return Err(OmError::OperationRefused(
                    "the head of a binding or error must be a symbol".into(),
                ));
            }
            Location::Variable(_) if !other_kind.is_some_and(NodeKind::is_variable) => {
                return Err(OmError::OperationRefused(
                    "bound variables can only be replaced by variables".into(),
                ));
            }
            _ => {}
        }
        if self.is_ancestor_or_self(other, id) {
            return Err(OmError::OperationRefused(
                "cannot replace a node with one of its ancestors".into(),
            ));
        }

        self.remove(other);
        // Detaching `other` may have shifted the index of `id` among its siblings.
        let location = self.locate_in(parent, id).unwrap_or(location);
        if !self.write_slot(parent, &location, Some(other)) {
            return Ok(None);
        }
        if let Some(data) = self.data_mut(other) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.data_mut(id) {
            data.parent = None;
        }
        debug!("Replaced {id:?} with {other:?} in slot {location} of {parent:?}");
        Ok(Some(id))
    }
}
