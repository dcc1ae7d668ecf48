//! DOM errors

use crate::NodeId;

/// Errors raised by tree operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("{0} does not exist")]
    InvalidNode(NodeId),

    #[error("cannot insert {child} into {parent}: it would create a cycle")]
    Hierarchy { parent: NodeId, child: NodeId },

    #[error("cannot append to {0}: node is detached from the document")]
    Detached(NodeId),
}
