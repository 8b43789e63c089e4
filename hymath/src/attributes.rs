//! Attribute store.
//!
//! Entries are keyed by symbol identity: two keys are the same key iff their name and
//! content dictionary agree. The uri of a key is stored with the entry but plays no
//! part in lookups.
use log::debug;

use crate::arena::OmArena;
use crate::error::{OmError, OmResult};
use crate::node::{Attribute, NodeId, Symbol};

impl OmArena {
    /// Value attached to `id` under `key`.
    pub fn get_attribute(&self, id: NodeId, key: &Symbol) -> Option<NodeId> {
        self.data(id)?
            .attributes
            .iter()
            .find(|attr| attr.key.matches(key))
            .map(|attr| attr.value)
    }

    /// Delete the entry for `key` and return its value, now detached as a root.
    pub fn remove_attribute(&mut self, id: NodeId, key: &Symbol) -> Option<NodeId> {
        let value = self.get_attribute(id, key)?;
        self.remove(value);
        debug!("Removed attribute {key} from {id:?}");
        Some(value)
    }

    /// Attach `value` to `id` under `key`.
    ///
    /// `value` is detached from any tree it belongs to first. A previous value for the
    /// same key is detached and returned. Refused when `value` is `id` or one of its
    /// ancestors.
    ///
    /// ```
    /// use hymath::arena::OmArena;
    /// use hymath::node::Symbol;
    ///
    /// let mut arena = OmArena::new();
    /// let x = arena.variable("x").unwrap();
    /// let real = arena.symbol("R", "setname1", None).unwrap();
    /// let key = Symbol::new("type", "sts").unwrap();
    ///
    /// arena.set_attribute(x, key.clone(), real).unwrap();
    /// assert_eq!(arena.get_attribute(x, &key), Some(real));
    /// assert_eq!(arena.parent(real), Some(x));
    /// ```
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        key: Symbol,
        value: NodeId,
    ) -> OmResult<Option<NodeId>> {
        if !self.contains(id) || !self.contains(value) {
            return Err(OmError::OperationRefused(
                "attribute owner and value must both be live nodes".into(),
            ));
        }
        if self.is_ancestor_or_self(value, id) {
            return Err(OmError::OperationRefused(
                "an attribute value cannot be its owner or an ancestor of it".into(),
            ));
        }

        let previous = self.remove_attribute(id, &key);
        self.remove(value);
        debug!("Set attribute {key} on {id:?} to {value:?}");
        if let Some(data) = self.data_mut(id) {
            data.attributes.push(Attribute { key, value });
        }
        if let Some(data) = self.data_mut(value) {
            data.parent = Some(id);
        }
        Ok(previous.filter(|&previous| previous != value))
    }
}
