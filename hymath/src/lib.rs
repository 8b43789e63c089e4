//! Hymath: OpenMath expression trees.
//!
//! Trees of integers, floats, strings, byte arrays, symbols, variables, applications,
//! bindings and error objects, each optionally carrying attributes keyed by symbols.
//! Trees are validated on construction, serialized to and from the JSON wire format or
//! a compact text syntax, edited in place with consistent parent links, and analysed
//! for free variables with capture-avoiding substitution.
//!
//! Storage shape
//!  - All nodes live in an [`OmArena`](arena::OmArena) and are addressed by
//!    [`NodeId`](node::NodeId) handles; a node's parent is stored as an id, so upward
//!    navigation never creates ownership cycles and identity is id equality.
//!  - An arena holds any number of trees. Nodes detached by an edit become new roots of
//!    the same arena until they are discarded.
//!
//! Threading
//!  - An arena is a plain value: share it read-only, or give one owner the right to
//!    mutate it. Mutating operations take `&mut self`.
//!
//! Example
//! ```
//! use hymath::prelude::*;
//!
//! let mut arena = OmArena::new();
//!
//! // forall x. x + y, from the compact syntax
//! let e = arena.simple_decode("logic1.forall[x,arith1.plus(x,y)]").unwrap();
//! assert_eq!(arena.free_variables(e).into_iter().collect::<Vec<_>>(), ["y"]);
//!
//! // substituting x for the free y would capture it, so the tree is left alone
//! let y = arena.variable("y").unwrap();
//! let x = arena.variable("x").unwrap();
//! let e = arena.replace_free(e, y, x).unwrap();
//! assert_eq!(arena.simple_encode(e), "logic1.forall[x,arith1.plus(x,y)]");
//!
//! // JSON round trip
//! let json = arena.encode(e).unwrap();
//! let back = arena.decode(&json).unwrap();
//! assert!(arena.equals(e, back, true));
//! assert!(!arena.same_object_as(e, back));
//! ```

/// Arena store, read views, factories, equality and copy.
pub mod arena;
/// Attribute get/set/remove keyed by symbol identity.
pub mod attributes;
/// JSON wire format: decode and encode.
pub mod codec;
/// Error taxonomy shared by every fallible operation.
pub mod error;
/// Numeric evaluation of simple expressions.
pub mod evaluate;
/// Identifier grammar and the identifier escaping utility.
pub mod ident;
/// Parent-slot lookup, addresses, removal and replacement.
pub mod navigation;
/// Node kinds, symbols, integers and location tags.
pub mod node;
/// Free variables and capture-avoiding substitution.
pub mod scope;
/// Validated builders for untyped wire shapes.
pub mod shape;
/// Compact text syntax: tokenizer, parser and printer.
pub mod simple;
/// Structural validation of untyped shapes.
pub mod validate;
/// Descendant queries over structural children.
pub mod walker;
/// XML rendering.
pub mod xml;

pub mod prelude {
    //! Convenient re-exports for end users.
    //!
    //! - The arena and its node views
    //! - Node kinds, symbols, integer payloads and location tags
    //! - Errors and the result alias
    pub use crate::arena::{OmArena, OmNode, compare_nodes};
    pub use crate::error::{OmError, OmResult};
    pub use crate::evaluate::{EvalValue, Evaluation};
    pub use crate::ident::{decode_identifier, encode_as_identifier, is_identifier};
    pub use crate::node::{IntegerValue, Location, NodeId, NodeKind, NodeType, Symbol};
    pub use crate::validate::validate;
}
