//! DOM Node
//!
//! Every node is an element: tag, attributes, text and inline styles.
//! Text is carried on the element itself rather than in separate text nodes.

use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (None if root or detached)
    pub parent: Option<NodeId>,
    /// Ordered children
    pub children: Vec<NodeId>,
    /// Tag name as written by the producer
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: Vec<Attribute>,
    /// Text content
    pub text: String,
    /// Inline style declarations in insertion order
    pub styles: Vec<StyleProperty>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            tag: tag.to_string(),
            attrs: Vec::new(),
            text: String::new(),
            styles: Vec::new(),
        }
    }

    /// Check the tag name, ignoring ASCII case
    #[inline]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing an existing entry in place.
    /// Returns the previous value.
    pub fn set_attr(&mut self, name: &str, value: String) -> Option<String> {
        for attr in self.attrs.iter_mut() {
            if attr.name == name {
                return Some(std::mem::replace(&mut attr.value, value));
            }
        }
        self.attrs.push(Attribute { name: name.to_string(), value });
        None
    }

    /// The `id` attribute, if any
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    /// Get an inline style value
    pub fn get_style(&self, property: &str) -> Option<&str> {
        self.styles.iter()
            .find(|s| s.property == property)
            .map(|s| s.value.as_str())
    }

    /// Set an inline style value. Returns the previous value.
    pub fn set_style(&mut self, property: &str, value: String) -> Option<String> {
        for decl in self.styles.iter_mut() {
            if decl.property == property {
                return Some(std::mem::replace(&mut decl.value, value));
            }
        }
        self.styles.push(StyleProperty { property: property.to_string(), value });
        None
    }
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Inline style declaration (`property: value`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleProperty {
    pub property: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut node = Node::element("div");
        assert_eq!(node.set_attr("class", "x".into()), None);
        assert_eq!(node.set_attr("title", "t".into()), None);
        assert_eq!(node.set_attr("class", "y".into()), Some("x".to_string()));

        assert_eq!(node.attrs.len(), 2);
        assert_eq!(node.attrs[0].name, "class");
        assert_eq!(node.get_attr("class"), Some("y"));
    }

    #[test]
    fn test_styles() {
        let mut node = Node::element("p");
        node.set_style("color", "red".into());
        node.set_style("color", "blue".into());
        assert_eq!(node.styles.len(), 1);
        assert_eq!(node.get_style("color"), Some("blue"));
        assert_eq!(node.get_style("margin"), None);
    }

    #[test]
    fn test_has_tag_case_insensitive() {
        let node = Node::element("SCRIPT");
        assert!(node.has_tag("script"));
        assert!(!node.has_tag("style"));
    }
}
