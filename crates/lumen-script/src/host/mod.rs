//! Host Object Model
//!
//! Scriptable wrappers over document nodes. Every wrapper shares one
//! [`HostContext`], which owns the document handle, the change callback and
//! the per-node wrapper cache.

mod document;
mod element;
mod style;

pub use document::DocumentHandle;
pub use element::ElementHandle;
pub use style::{StyleHandle, css_property_name};

use super::error::ScriptError;
use super::value::Value;
use lumen_dom::{Document, DomError, NodeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Document shared between the host and the script runtime
pub type SharedDocument = Rc<RefCell<Document>>;

/// Zero-argument callback invoked after every visible mutation
pub type ChangeCallback = Rc<dyn Fn()>;

/// What a host wrapper stands for; `===` compares these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostIdentity {
    Document,
    Element(NodeId),
    Style(NodeId),
}

/// Object exposed to scripts by the host
pub trait HostObject: fmt::Debug {
    /// Class name shown when the object is stringified
    fn class_name(&self) -> &'static str;

    fn identity(&self) -> HostIdentity;

    /// Read a property. Methods are returned as callables bound to `self`.
    fn get(&self, property: &str) -> Result<Value, ScriptError>;

    fn set(&self, property: &str, value: Value) -> Result<(), ScriptError>;

    fn as_element(&self) -> Option<&ElementHandle> {
        None
    }
}

pub(crate) fn no_such_property(class: &str, property: &str) -> ScriptError {
    ScriptError::type_error(format!("no such property '{property}' on {class}"))
}

pub(crate) fn cannot_assign(class: &str, property: &str) -> ScriptError {
    ScriptError::type_error(format!("cannot assign to '{property}' on {class}"))
}

/// Argument `index`, or Undefined when the caller passed fewer
pub(crate) fn arg(args: &[Value], index: usize) -> &Value {
    const UNDEFINED: &Value = &Value::Undefined;
    args.get(index).unwrap_or(UNDEFINED)
}

pub(crate) fn require_args(method: &str, args: &[Value], count: usize) -> Result<(), ScriptError> {
    if args.len() < count {
        return Err(ScriptError::type_error(format!(
            "{method} requires {count} argument(s), got {}",
            args.len()
        )));
    }
    Ok(())
}

/// State shared by every wrapper of one runtime
#[derive(Clone)]
pub struct HostContext {
    inner: Rc<ContextInner>,
}

struct ContextInner {
    document: SharedDocument,
    on_change: ChangeCallback,
    wrappers: RefCell<HashMap<NodeId, ElementHandle>>,
}

impl HostContext {
    pub fn new(document: SharedDocument, on_change: ChangeCallback) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                document,
                on_change,
                wrappers: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn document(&self) -> &SharedDocument {
        &self.inner.document
    }

    /// Run `f` against a shared borrow of the document
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> Result<R, ScriptError> {
        let document = self.inner.document.try_borrow().map_err(|_| ScriptError::DocumentBusy)?;
        Ok(f(&document))
    }

    /// Run `f` against an exclusive borrow without signalling a change
    pub fn write<R>(
        &self,
        f: impl FnOnce(&mut Document) -> Result<R, DomError>,
    ) -> Result<R, ScriptError> {
        let mut document = self.inner.document.try_borrow_mut().map_err(|_| ScriptError::DocumentBusy)?;
        Ok(f(&mut document)?)
    }

    /// Apply a visible mutation, then signal the change.
    ///
    /// The borrow is released before the callback runs.
    pub fn mutate<R>(
        &self,
        f: impl FnOnce(&mut Document) -> Result<R, DomError>,
    ) -> Result<R, ScriptError> {
        let result = self.write(f)?;
        self.notify();
        Ok(result)
    }

    /// Like [`mutate`](Self::mutate), but signals only when `f` reports a change
    pub fn mutate_if(
        &self,
        f: impl FnOnce(&mut Document) -> Result<bool, DomError>,
    ) -> Result<bool, ScriptError> {
        let changed = self.write(f)?;
        if changed {
            self.notify();
        }
        Ok(changed)
    }

    pub fn notify(&self) {
        tracing::trace!("document changed");
        (self.inner.on_change)();
    }

    /// The cached wrapper for `node`, created on first use
    pub fn element(&self, node: NodeId) -> ElementHandle {
        if let Some(handle) = self.inner.wrappers.borrow().get(&node) {
            return handle.clone();
        }
        let handle = ElementHandle::new(node, self.clone());
        self.inner.wrappers.borrow_mut().insert(node, handle.clone());
        handle
    }

    /// Wrap an optional lookup result; absent nodes become Null
    pub fn element_value(&self, node: Option<NodeId>) -> Value {
        match node {
            Some(node) => Value::host(self.element(node)),
            None => Value::Null,
        }
    }

    /// Drop every cached wrapper along with its listeners
    pub fn clear_wrappers(&self) {
        let wrappers = std::mem::take(&mut *self.inner.wrappers.borrow_mut());
        drop(wrappers);
    }
}

impl fmt::Debug for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostContext")
            .field("wrappers", &self.inner.wrappers.borrow().len())
            .finish()
    }
}
