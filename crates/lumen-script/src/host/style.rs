//! Inline style declaration wrapper

use super::{HostContext, HostIdentity, HostObject};
use crate::error::ScriptError;
use crate::value::Value;
use lumen_dom::NodeId;
use std::fmt;

/// `element.style`
#[derive(Clone)]
pub struct StyleHandle {
    node: NodeId,
    ctx: HostContext,
}

impl StyleHandle {
    pub(crate) fn new(node: NodeId, ctx: HostContext) -> Self {
        Self { node, ctx }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

/// Map a script property name to a CSS property name.
///
/// `background_color` and `backgroundColor` both become `background-color`.
pub fn css_property_name(property: &str) -> String {
    let mut name = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        match c {
            '_' => name.push('-'),
            c if c.is_ascii_uppercase() => {
                name.push('-');
                name.push(c.to_ascii_lowercase());
            }
            c => name.push(c),
        }
    }
    name
}

impl HostObject for StyleHandle {
    fn class_name(&self) -> &'static str {
        "CSSStyleDeclaration"
    }

    fn identity(&self) -> HostIdentity {
        HostIdentity::Style(self.node)
    }

    fn get(&self, property: &str) -> Result<Value, ScriptError> {
        let name = css_property_name(property);
        let node = self.node;
        let value = self.ctx
            .read(|doc| doc.tree().style(node, &name).map(|v| v.map(str::to_string)))??;
        Ok(value.map_or(Value::Undefined, Value::from))
    }

    fn set(&self, property: &str, value: Value) -> Result<(), ScriptError> {
        let name = css_property_name(property);
        let node = self.node;
        let value = value.to_string();
        self.ctx.mutate(|doc| doc.tree_mut().set_style(node, &name, value).map(drop))
    }
}

impl fmt::Debug for StyleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Style").field(&self.node).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_property_name() {
        assert_eq!(css_property_name("color"), "color");
        assert_eq!(css_property_name("background_color"), "background-color");
        assert_eq!(css_property_name("backgroundColor"), "background-color");
        assert_eq!(css_property_name("border_topWidth"), "border-top-width");
    }
}
