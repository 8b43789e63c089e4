//! Validating constructors for new trees.
//!
//! Node arguments are copied into the new tree, never moved: the caller's trees are
//! left exactly as they were and the result is an independent root.
use serde_json::Value;

use crate::arena::OmArena;
use crate::error::OmResult;
use crate::node::{IntegerValue, NodeId};
use crate::shape;

impl OmArena {
    fn shapes(&self, ids: &[NodeId]) -> OmResult<Vec<Value>> {
        ids.iter().map(|&id| self.to_value(id)).collect()
    }

    /// Integer node from a native integer or an [`IntegerValue::text`].
    pub fn integer(&mut self, value: impl Into<IntegerValue>) -> OmResult<NodeId> {
        let shape = shape::integer(value)?;
        self.instantiate(&shape)
    }

    /// Float node; NaN and infinities are rejected.
    pub fn float(&mut self, value: f64) -> OmResult<NodeId> {
        let shape = shape::float(value)?;
        self.instantiate(&shape)
    }

    pub fn string(&mut self, value: impl Into<String>) -> OmResult<NodeId> {
        let shape = shape::string(value)?;
        self.instantiate(&shape)
    }

    pub fn bytearray(&mut self, value: &[u8]) -> OmResult<NodeId> {
        let shape = shape::bytearray(value)?;
        self.instantiate(&shape)
    }

    pub fn symbol(&mut self, name: &str, cd: &str, uri: Option<&str>) -> OmResult<NodeId> {
        let shape = shape::symbol(name, cd, uri)?;
        self.instantiate(&shape)
    }

    pub fn variable(&mut self, name: &str) -> OmResult<NodeId> {
        let shape = shape::variable(name)?;
        self.instantiate(&shape)
    }

    /// Application of `nodes[0]` to `nodes[1..]`. At least one node is required.
    pub fn application(&mut self, nodes: &[NodeId]) -> OmResult<NodeId> {
        let shape = shape::application(self.shapes(nodes)?)?;
        self.instantiate(&shape)
    }

    /// Copy of `node` carrying the given attribute entries on top of its own.
    ///
    /// Each key must be a symbol node. A key matching an existing attribute by name
    /// and content dictionary replaces it.
    pub fn attribution(&mut self, node: NodeId, entries: &[(NodeId, NodeId)]) -> OmResult<NodeId> {
        let entries = entries
            .iter()
            .map(|&(key, value)| Ok((self.to_value(key)?, self.to_value(value)?)))
            .collect::<OmResult<Vec<_>>>()?;
        let shape = shape::attribution(self.to_value(node)?, entries)?;
        self.instantiate(&shape)
    }

    /// Binding of `variables` in `body` under the head symbol `head`.
    pub fn binding(&mut self, head: NodeId, variables: &[NodeId], body: NodeId) -> OmResult<NodeId> {
        let shape = shape::binding(
            self.to_value(head)?,
            self.shapes(variables)?,
            self.to_value(body)?,
        )?;
        self.instantiate(&shape)
    }

    pub fn error(&mut self, head: NodeId, children: &[NodeId]) -> OmResult<NodeId> {
        let shape = shape::error(self.to_value(head)?, self.shapes(children)?)?;
        self.instantiate(&shape)
    }
}
