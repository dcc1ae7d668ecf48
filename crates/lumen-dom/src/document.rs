//! Document - High-level document API

use crate::{DomError, DomTree, Node, NodeId};

/// Document: a DOM tree with a distinguished root element
#[derive(Debug, Clone)]
pub struct Document {
    tree: DomTree,
    root: NodeId,
}

impl Document {
    /// Create a document whose root element has the given tag
    pub fn new(root_tag: &str) -> Self {
        let mut tree = DomTree::new();
        let root = tree.create_element(root_tag);
        Self { tree, root }
    }

    /// Root element
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Get a node
    pub fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.tree.node(id)
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create an element and append it to `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        self.tree.node(parent)?;
        let id = self.tree.create_element(tag);
        self.tree.append_child(parent, id)?;
        Ok(id)
    }

    /// Whether the node is reachable from the root
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.tree.is_inclusive_ancestor(self.root, id)
    }

    /// Get element by ID (depth-first, document order)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.descendants(self.root)
            .find(|(_, node)| node.id() == Some(id))
            .map(|(node_id, _)| node_id)
    }

    /// Query selector: `#id` or a bare tag name
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            return self.get_element_by_id(id);
        }
        self.tree.descendants(self.root)
            .find(|(_, node)| node.has_tag(selector))
            .map(|(node_id, _)| node_id)
    }

    /// All connected elements with the given tag, in document order
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.tree.descendants(self.root)
            .filter(|(_, node)| node.has_tag(tag))
            .map(|(id, _)| id)
            .collect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("html")
    }
}
