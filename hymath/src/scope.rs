//! Free variables and capture-avoiding substitution.
//!
//! A variable occurrence is free at a position unless some binding on the parent chain
//! of that position binds its name. The capture checks below are computed on the
//! hypothetical tree in which the substitution already happened, so no check ever
//! mutates the tree; only substitutions that pass are carried out.
use std::collections::BTreeSet;

use log::debug;

use crate::arena::OmArena;
use crate::error::OmResult;
use crate::node::{Location, NodeId, NodeKind};

/// A bound-variable slot whose content is taken to be another name.
#[derive(Clone, Copy)]
struct SlotOverride<'a> {
    binding: NodeId,
    index: usize,
    name: &'a str,
}

impl OmArena {
    /// Names of the variables occurring free in `id`.
    ///
    /// Application and error children are traversed; a binding contributes the free
    /// variables of its body minus its bound names. Head symbols and attribute values
    /// contribute nothing.
    ///
    /// ```
    /// use hymath::arena::OmArena;
    ///
    /// let mut arena = OmArena::new();
    /// let e = arena.simple_decode("logic1.forall[x,f(x,y)]").unwrap();
    /// assert_eq!(arena.free_variables(e).into_iter().collect::<Vec<_>>(), ["f", "y"]);
    /// ```
    pub fn free_variables(&self, id: NodeId) -> BTreeSet<String> {
        let mut free = BTreeSet::new();
        let Some(kind) = self.kind(id) else {
            return free;
        };
        match kind {
            NodeKind::Variable(name) => {
                free.insert(name.clone());
            }
            NodeKind::Application(children) | NodeKind::Error { children, .. } => {
                for &child in children {
                    free.extend(self.free_variables(child));
                }
            }
            NodeKind::Binding { body, .. } => {
                if let Some(body) = *body {
                    let bound = self.bound_names(id, None);
                    free.extend(
                        self.free_variables(body)
                            .into_iter()
                            .filter(|name| !bound.contains(name)),
                    );
                }
            }
            _ => {}
        }
        free
    }

    /// Names bound by a binding node, honouring a pending slot override.
    fn bound_names(&self, binding: NodeId, slot: Option<SlotOverride<'_>>) -> BTreeSet<String> {
        let Some(kind) = self.kind(binding) else {
            return BTreeSet::new();
        };
        kind.variables()
            .iter()
            .enumerate()
            .filter_map(|(i, &var)| match slot {
                Some(slot) if slot.binding == binding && slot.index == i => {
                    Some(slot.name.to_owned())
                }
                _ => self.kind(var).and_then(|kind| match kind {
                    NodeKind::Variable(name) => Some(name.clone()),
                    _ => None,
                }),
            })
            .collect()
    }

    /// Walk the parent chain starting at `start` (inclusive), stopping after `upto`, and
    /// report whether some binding on it binds a name of `free`.
    fn captured_from(
        &self,
        start: Option<NodeId>,
        free: &BTreeSet<String>,
        upto: Option<NodeId>,
        slot: Option<SlotOverride<'_>>,
    ) -> bool {
        if free.is_empty() {
            return false;
        }
        let mut walk = start;
        while let Some(node) = walk {
            if self.kind(node).is_some_and(NodeKind::is_binding) {
                let bound = self.bound_names(node, slot);
                if free.iter().any(|name| bound.contains(name)) {
                    return true;
                }
            }
            if Some(node) == upto {
                break;
            }
            walk = self.parent(node);
        }
        false
    }

    /// `true` unless a variable free in `id` is bound by a binding on its parent chain,
    /// looking no further up than `upto` (inclusive) when it is given.
    pub fn is_free(&self, id: NodeId, upto: Option<NodeId>) -> bool {
        if Some(id) == upto {
            return true;
        }
        let free = self.free_variables(id);
        !self.captured_from(self.parent(id), &free, upto, None)
    }

    /// `true` if some descendant of `id` reachable through children, head symbols and
    /// binding bodies equals `target` and is free with respect to the whole tree there.
    pub fn occurs_free(&self, id: NodeId, target: NodeId) -> bool {
        if self.equals(id, target, true) && self.is_free(id, None) {
            return true;
        }
        let Some(kind) = self.kind(id) else {
            return false;
        };
        if kind
            .symbol()
            .is_some_and(|symbol| self.equals(symbol, target, true))
        {
            return true;
        }
        if kind.body().is_some_and(|body| self.occurs_free(body, target)) {
            return true;
        }
        kind.children()
            .iter()
            .any(|&child| self.occurs_free(child, target))
    }

    /// Whether `replacement` could take the place of `subtree` without any of its free
    /// variables becoming bound there, looking no further up than `upto`.
    ///
    /// Also `false` when the slot of `subtree` cannot hold `replacement` at all: a head
    /// symbol slot takes only symbols, a bound-variable slot only variables. The tree is
    /// never modified.
    pub fn is_free_to_replace(
        &self,
        replacement: NodeId,
        subtree: NodeId,
        upto: Option<NodeId>,
    ) -> bool {
        if replacement == subtree {
            return true;
        }
        let Some(parent) = self.parent(subtree) else {
            return true;
        };
        let Some(location) = self.find_in_parent(subtree) else {
            return true;
        };
        let Some(kind) = self.kind(replacement) else {
            return false;
        };

        let slot = match (&location, kind) {
            (Location::Symbol, NodeKind::Symbol(_)) => None,
            (Location::Symbol, _) => return false,
            (Location::Variable(index), NodeKind::Variable(name)) => Some(SlotOverride {
                binding: parent,
                index: *index,
                name,
            }),
            (Location::Variable(_), _) => return false,
            _ => None,
        };
        if Some(subtree) == upto {
            return true;
        }

        let free = self.free_variables(replacement);
        !self.captured_from(Some(parent), &free, upto, slot)
    }

    /// Replace every free occurrence of `original` inside `id` with a copy of
    /// `replacement`, judging freeness within `id` itself.
    ///
    /// See [`OmArena::replace_free_within`].
    pub fn replace_free(
        &mut self,
        id: NodeId,
        original: NodeId,
        replacement: NodeId,
    ) -> OmResult<NodeId> {
        self.replace_free_within(id, original, replacement, Some(id))
    }

    /// Replace every free occurrence of `original` inside `id` with a copy of
    /// `replacement`, judging freeness up to `upto` (the whole tree when `None`).
    ///
    /// Occurrences where the copy would have a free variable captured are left as they
    /// are. Matching subtrees are not searched further; other nodes are searched through
    /// their head symbol, body, bound variables and children, in that order. Attribute
    /// values are never visited. Displaced occurrences are discarded.
    ///
    /// `original` and `replacement` are read once, before the walk starts, so either may
    /// be a node of the tree being rewritten. A stale `original` or `replacement` leaves
    /// the tree unchanged.
    ///
    /// Returns the node now at the position of `id`: `id` itself, unless `id` is a root
    /// that matches `original`, in which case the result is a fresh copy of
    /// `replacement` and the tree of `id` is left untouched.
    ///
    /// ```
    /// use hymath::arena::OmArena;
    ///
    /// let mut arena = OmArena::new();
    /// let e = arena.simple_decode("f(x,logic1.forall[y,g(x,y)])").unwrap();
    /// let x = arena.variable("x").unwrap();
    /// let z = arena.variable("z").unwrap();
    /// let e = arena.replace_free(e, x, z).unwrap();
    /// assert_eq!(arena.simple_encode(e), "f(z,logic1.forall[y,g(z,y)])");
    /// ```
    pub fn replace_free_within(
        &mut self,
        id: NodeId,
        original: NodeId,
        replacement: NodeId,
        upto: Option<NodeId>,
    ) -> OmResult<NodeId> {
        if !self.contains(original) || !self.contains(replacement) {
            return Ok(id);
        }
        let original = self.copy(original)?;
        let replacement = match self.copy(replacement) {
            Ok(replacement) => replacement,
            Err(error) => {
                self.discard(original)?;
                return Err(error);
            }
        };

        let result = self.substitute_free(id, original, replacement, upto);
        self.discard(original)?;
        self.discard(replacement)?;
        result
    }

    /// Walk of [`OmArena::replace_free_within`] over detached `original` and
    /// `replacement` snapshots.
    fn substitute_free(
        &mut self,
        id: NodeId,
        original: NodeId,
        replacement: NodeId,
        upto: Option<NodeId>,
    ) -> OmResult<NodeId> {
        if self.equals(id, original, true) && self.is_free(id, upto) {
            if !self.is_free_to_replace(replacement, id, upto) {
                debug!("Kept {id:?}: substituting {replacement:?} there would capture a variable");
                return Ok(id);
            }
            let copy = self.copy(replacement)?;
            if self.parent(id).is_none() {
                return Ok(copy);
            }
            if let Some(displaced) = self.replace_with(id, copy)? {
                self.discard(displaced)?;
            }
            debug!("Substituted {copy:?} for free occurrence {id:?}");
            return Ok(copy);
        }

        let Some(kind) = self.kind(id) else {
            return Ok(id);
        };
        let visit: Vec<NodeId> = kind
            .symbol()
            .into_iter()
            .chain(kind.body())
            .chain(kind.variables().iter().copied())
            .chain(kind.children().iter().copied())
            .collect();
        for node in visit {
            self.substitute_free(node, original, replacement, upto)?;
        }
        Ok(id)
    }
}
