//! Document wrapper

use super::{HostContext, HostIdentity, HostObject, cannot_assign, no_such_property, require_args};
use crate::error::ScriptError;
use crate::value::Value;
use std::fmt;

/// The `document` global
#[derive(Clone)]
pub struct DocumentHandle {
    ctx: HostContext,
}

impl DocumentHandle {
    pub fn new(ctx: HostContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &HostContext {
        &self.ctx
    }

    pub fn get_element_by_id(&self, id: &str) -> Result<Value, ScriptError> {
        let node = self.ctx.read(|doc| doc.get_element_by_id(id))?;
        Ok(self.ctx.element_value(node))
    }

    pub fn query_selector(&self, selector: &str) -> Result<Value, ScriptError> {
        let node = self.ctx.read(|doc| doc.query_selector(selector))?;
        Ok(self.ctx.element_value(node))
    }

    /// New detached element. Not a visible change, so nothing is signalled.
    pub fn create_element(&self, tag: &str) -> Result<Value, ScriptError> {
        let node = self.ctx.write(|doc| Ok(doc.create_element(tag)))?;
        Ok(self.ctx.element_value(Some(node)))
    }

    fn method<F>(&self, name: &str, f: F) -> Value
    where
        F: Fn(&DocumentHandle, &str) -> Result<Value, ScriptError> + 'static,
    {
        let receiver = self.clone();
        let method = name.to_string();
        Value::native(name, move |args| {
            require_args(&method, args, 1)?;
            f(&receiver, &args[0].to_string())
        })
    }
}

impl HostObject for DocumentHandle {
    fn class_name(&self) -> &'static str {
        "Document"
    }

    fn identity(&self) -> HostIdentity {
        HostIdentity::Document
    }

    fn get(&self, property: &str) -> Result<Value, ScriptError> {
        match property {
            "getElementById" => Ok(self.method(property, DocumentHandle::get_element_by_id)),
            "querySelector" => Ok(self.method(property, DocumentHandle::query_selector)),
            "createElement" => Ok(self.method(property, DocumentHandle::create_element)),
            "documentElement" => {
                let root = self.ctx.read(|doc| doc.root())?;
                Ok(self.ctx.element_value(Some(root)))
            }
            _ => Err(no_such_property(self.class_name(), property)),
        }
    }

    fn set(&self, property: &str, _value: Value) -> Result<(), ScriptError> {
        Err(cannot_assign(self.class_name(), property))
    }
}

impl fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Document")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_dom::Document;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn handle() -> DocumentHandle {
        let mut doc = Document::new("html");
        let root = doc.root();
        let body = doc.append_element(root, "body").unwrap();
        let p = doc.append_element(body, "p").unwrap();
        doc.tree_mut().set_attribute(p, "id", "intro").unwrap();
        DocumentHandle::new(HostContext::new(Rc::new(RefCell::new(doc)), Rc::new(|| {})))
    }

    #[test]
    fn test_lookup_returns_cached_wrapper() {
        let doc = handle();
        let a = doc.get_element_by_id("intro").unwrap();
        let b = doc.query_selector("#intro").unwrap();
        let c = doc.query_selector("p").unwrap();
        assert!(a.strict_equals(&b));
        assert!(b.strict_equals(&c));
    }

    #[test]
    fn test_missing_element_is_null() {
        let doc = handle();
        assert!(matches!(doc.get_element_by_id("missing"), Ok(Value::Null)));
        assert!(matches!(doc.query_selector("table"), Ok(Value::Null)));
    }

    #[test]
    fn test_create_element_is_detached() {
        let doc = handle();
        let Value::Host(el) = doc.create_element("span").unwrap() else {
            panic!("Expected host object");
        };
        let node = el.as_element().unwrap().node();
        assert!(!doc.context().read(|d| d.is_connected(node)).unwrap());
    }

    #[test]
    fn test_document_is_read_only() {
        let doc = handle();
        assert!(doc.set("title", Value::from("x")).is_err());
    }
}
