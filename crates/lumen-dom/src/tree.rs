//! DOM Tree (arena-based allocation)

use crate::{DomError, Node, NodeId};

/// Arena-based DOM tree
///
/// Nodes are never deallocated. Detaching a node clears its parent link and
/// removes it from the parent's child list; the node keeps its own subtree.
#[derive(Debug, Default, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new empty DOM tree
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::element(tag));
        id
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Get a node or fail with [`DomError::InvalidNode`]
    pub fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.get(id).ok_or(DomError::InvalidNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.get_mut(id).ok_or(DomError::InvalidNode(id))
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of a node, in order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Check whether `ancestor` is `id` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A child that is already attached elsewhere is moved.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::Hierarchy { parent, child });
        }

        self.detach(child)?;
        tracing::trace!(%parent, %child, "append child");
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Detach a node from its parent. Returns false if it had no parent.
    pub fn detach(&mut self, id: NodeId) -> Result<bool, DomError> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(false);
        };
        tracing::trace!(%parent, child = %id, "detach");
        self.node_mut(parent)?.children.retain(|&c| c != id);
        self.node_mut(id)?.parent = None;
        Ok(true)
    }

    /// Text content of a node
    pub fn text(&self, id: NodeId) -> Result<&str, DomError> {
        Ok(&self.node(id)?.text)
    }

    /// Replace the text content of a node
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        self.node_mut(id)?.text = text.into();
        Ok(())
    }

    /// Get an attribute
    pub fn attribute(&self, id: NodeId, name: &str) -> Result<Option<&str>, DomError> {
        Ok(self.node(id)?.get_attr(name))
    }

    /// Set an attribute. Returns the previous value.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Option<String>, DomError> {
        Ok(self.node_mut(id)?.set_attr(name, value.into()))
    }

    /// Get an inline style value
    pub fn style(&self, id: NodeId, property: &str) -> Result<Option<&str>, DomError> {
        Ok(self.node(id)?.get_style(property))
    }

    /// Set an inline style value. Returns the previous value.
    pub fn set_style(
        &mut self,
        id: NodeId,
        property: &str,
        value: impl Into<String>,
    ) -> Result<Option<String>, DomError> {
        Ok(self.node_mut(id)?.set_style(property, value.into()))
    }

    /// Pre-order traversal starting at (and including) `root`
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let stack = if self.get(root).is_some() { vec![root] } else { Vec::new() };
        Descendants { tree: self, stack }
    }
}

/// Depth-first, document-order iterator over a subtree
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let id = self.stack.pop()?;
        let node = tree.get(id)?;
        self.stack.extend(node.children.iter().rev().copied());
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let root = tree.create_element("html");
        let a = tree.create_element("div");
        let b = tree.create_element("p");
        tree.append_child(root, a).unwrap();
        tree.append_child(a, b).unwrap();
        (tree, root, a, b)
    }

    #[test]
    fn test_append_child_links_both_ways() {
        let (tree, root, a, b) = sample();
        assert_eq!(tree.children(root), &[a]);
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(b), Some(a));
    }

    #[test]
    fn test_append_moves_attached_child() {
        let (mut tree, root, a, b) = sample();
        tree.append_child(root, b).unwrap();
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(root), &[a, b]);
    }

    #[test]
    fn test_append_rejects_cycle() {
        let (mut tree, root, _a, b) = sample();
        assert_eq!(
            tree.append_child(b, root),
            Err(DomError::Hierarchy { parent: b, child: root })
        );
        assert!(tree.append_child(b, b).is_err());
    }

    #[test]
    fn test_detach() {
        let (mut tree, root, a, _b) = sample();
        assert_eq!(tree.detach(a), Ok(true));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.detach(a), Ok(false));
    }

    #[test]
    fn test_descendants_document_order() {
        let (mut tree, root, a, b) = sample();
        let c = tree.create_element("span");
        tree.append_child(root, c).unwrap();
        let order: Vec<NodeId> = tree.descendants(root).map(|(id, _)| id).collect();
        assert_eq!(order, vec![root, a, b, c]);
    }

    #[test]
    fn test_invalid_node() {
        let mut tree = DomTree::new();
        let bogus = NodeId(42);
        assert_eq!(tree.set_text(bogus, "x"), Err(DomError::InvalidNode(bogus)));
        assert_eq!(tree.descendants(bogus).count(), 0);
    }
}
