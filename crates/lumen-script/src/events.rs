//! Event Dispatch
//!
//! Listeners are stored per element wrapper and invoked synchronously in
//! registration order. A failing listener is logged and recorded; the rest
//! still run.

use super::error::ScriptError;
use super::host::ElementHandle;
use super::interpreter::Interpreter;
use super::object::ScriptObject;
use super::value::Value;
use lumen_dom::NodeId;

/// Listeners keyed by event name, in first-registration order
#[derive(Debug, Default)]
pub struct ListenerMap {
    entries: Vec<(Box<str>, Vec<Value>)>,
}

impl ListenerMap {
    pub fn add(&mut self, event: &str, listener: Value) {
        match self.entries.iter_mut().find(|(name, _)| &**name == event) {
            Some((_, listeners)) => listeners.push(listener),
            None => self.entries.push((event.into(), vec![listener])),
        }
    }

    pub fn get(&self, event: &str) -> &[Value] {
        self.entries
            .iter()
            .find(|(name, _)| &**name == event)
            .map(|(_, listeners)| listeners.as_slice())
            .unwrap_or(&[])
    }

    /// Event names with at least one listener
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| &**name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of one dispatch
#[derive(Debug)]
pub struct DispatchOutcome {
    pub event: String,
    pub target: NodeId,
    /// Listeners invoked, failed ones included
    pub invoked: usize,
    pub errors: Vec<ScriptError>,
}

impl DispatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Invoke every `event` listener on `element`.
///
/// The listener list is copied before the first call, so listeners added
/// during the dispatch wait for the next one.
pub fn dispatch(interpreter: &Interpreter, element: &ElementHandle, event: &str) -> DispatchOutcome {
    let listeners = element.listeners(event);
    tracing::debug!(target_node = %element.node(), event, listeners = listeners.len(), "dispatch");

    let mut outcome = DispatchOutcome {
        event: event.to_string(),
        target: element.node(),
        invoked: 0,
        errors: Vec::new(),
    };

    for listener in &listeners {
        let mut bag = ScriptObject::new();
        bag.set("type", Value::from(event));
        bag.set("target", Value::host(element.clone()));

        outcome.invoked += 1;
        if let Err(err) = interpreter.call(listener, &[Value::object(bag)]) {
            tracing::warn!(target_node = %element.node(), event, "listener failed: {}", err);
            outcome.errors.push(err);
        }
    }

    outcome
}
