//! Element wrapper

use super::{HostContext, HostIdentity, HostObject, StyleHandle, arg, cannot_assign, no_such_property, require_args};
use crate::error::ScriptError;
use crate::events::ListenerMap;
use crate::value::Value;
use lumen_dom::{DomError, NodeId};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Script-visible element
///
/// Clones share the listener table, so a wrapper obtained from any lookup of
/// the same node sees every registered listener.
#[derive(Clone)]
pub struct ElementHandle {
    inner: Rc<ElementInner>,
}

struct ElementInner {
    node: NodeId,
    ctx: HostContext,
    listeners: RefCell<ListenerMap>,
}

impl ElementHandle {
    pub(crate) fn new(node: NodeId, ctx: HostContext) -> Self {
        Self {
            inner: Rc::new(ElementInner {
                node,
                ctx,
                listeners: RefCell::new(ListenerMap::default()),
            }),
        }
    }

    pub fn node(&self) -> NodeId {
        self.inner.node
    }

    pub fn add_listener(&self, event: &str, listener: Value) {
        tracing::trace!(node = %self.node(), event, "add listener");
        self.inner.listeners.borrow_mut().add(event, listener);
    }

    /// Listeners registered for `event`, copied out in registration order
    pub fn listeners(&self, event: &str) -> Vec<Value> {
        self.inner.listeners.borrow().get(event).to_vec()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.listeners.borrow().get(event).len()
    }

    pub fn text_content(&self) -> Result<String, ScriptError> {
        let node = self.node();
        self.inner.ctx.read(|doc| doc.tree().text(node).map(str::to_string))?
            .map_err(ScriptError::from)
    }

    pub fn set_text_content(&self, text: &str) -> Result<(), ScriptError> {
        let node = self.node();
        self.inner.ctx.mutate(|doc| doc.tree_mut().set_text(node, text))
    }

    pub fn tag_name(&self) -> Result<String, ScriptError> {
        let node = self.node();
        self.inner.ctx.read(|doc| doc.node(node).map(|n| n.tag.to_ascii_uppercase()))?
            .map_err(ScriptError::from)
    }

    pub fn get_attribute(&self, name: &str) -> Result<Option<String>, ScriptError> {
        let node = self.node();
        self.inner.ctx
            .read(|doc| doc.tree().attribute(node, name).map(|v| v.map(str::to_string)))?
            .map_err(ScriptError::from)
    }

    pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), ScriptError> {
        let node = self.node();
        self.inner.ctx.mutate(|doc| doc.tree_mut().set_attribute(node, name, value).map(drop))
    }

    /// Append `child` as the last child; the receiver must be connected
    pub fn append_child(&self, child: &ElementHandle) -> Result<(), ScriptError> {
        let parent = self.node();
        let child = child.node();
        self.inner.ctx.mutate(|doc| {
            if !doc.is_connected(parent) {
                return Err(DomError::Detached(parent));
            }
            doc.tree_mut().append_child(parent, child)
        })
    }

    /// Detach from the parent. Returns false (and signals nothing) if already detached.
    pub fn remove(&self) -> Result<bool, ScriptError> {
        let node = self.node();
        self.inner.ctx.mutate_if(|doc| doc.tree_mut().detach(node))
    }

    pub fn style(&self) -> StyleHandle {
        StyleHandle::new(self.node(), self.inner.ctx.clone())
    }

    /// Bind a method to this receiver
    fn method<F>(&self, name: &str, f: F) -> Value
    where
        F: Fn(&ElementHandle, &[Value]) -> Result<Value, ScriptError> + 'static,
    {
        let receiver = self.clone();
        Value::native(name, move |args| f(&receiver, args))
    }
}

impl HostObject for ElementHandle {
    fn class_name(&self) -> &'static str {
        "Element"
    }

    fn identity(&self) -> HostIdentity {
        HostIdentity::Element(self.node())
    }

    fn get(&self, property: &str) -> Result<Value, ScriptError> {
        let value = match property {
            "textContent" => Value::from(self.text_content()?),
            "tagName" => Value::from(self.tag_name()?),
            "id" => Value::from(self.get_attribute("id")?.unwrap_or_default()),
            "style" => Value::host(self.style()),
            "setAttribute" => self.method(property, |el, args| {
                require_args("setAttribute", args, 2)?;
                el.set_attribute(&args[0].to_string(), &args[1].to_string())?;
                Ok(Value::Undefined)
            }),
            "getAttribute" => self.method(property, |el, args| {
                require_args("getAttribute", args, 1)?;
                Ok(el.get_attribute(&args[0].to_string())?.map_or(Value::Null, Value::from))
            }),
            "appendChild" => self.method(property, |el, args| {
                let child = arg(args, 0);
                let handle = match child {
                    Value::Host(host) => host.as_element(),
                    _ => None,
                };
                let Some(handle) = handle else {
                    return Err(ScriptError::type_error(format!(
                        "appendChild expects an Element, got {}",
                        child.type_name()
                    )));
                };
                el.append_child(handle)?;
                Ok(child.clone())
            }),
            "remove" => self.method(property, |el, _| {
                el.remove()?;
                Ok(Value::Undefined)
            }),
            "addEventListener" => self.method(property, |el, args| {
                require_args("addEventListener", args, 2)?;
                el.add_listener(&args[0].to_string(), args[1].clone());
                Ok(Value::Undefined)
            }),
            _ => return Err(no_such_property(self.class_name(), property)),
        };
        Ok(value)
    }

    fn set(&self, property: &str, value: Value) -> Result<(), ScriptError> {
        match property {
            "textContent" => self.set_text_content(&value.to_string()),
            "id" => self.set_attribute("id", &value.to_string()),
            _ => Err(cannot_assign(self.class_name(), property)),
        }
    }

    fn as_element(&self) -> Option<&ElementHandle> {
        Some(self)
    }
}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Element").field(&self.node()).finish()
    }
}
