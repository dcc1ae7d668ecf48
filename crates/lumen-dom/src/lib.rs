//! Lumen DOM - Document tree
//!
//! Arena-allocated element tree that the scripting layer mutates.
//! Nodes are addressed by [`NodeId`] and never freed; a removed node is
//! simply detached from its parent.

mod node;
mod tree;
mod document;
mod error;

pub use node::{Node, Attribute, StyleProperty};
pub use tree::{DomTree, Descendants};
pub use document::Document;
pub use error::DomError;

use std::fmt;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena index of this node
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}
