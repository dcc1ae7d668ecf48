//! Script Objects
//!
//! Plain property bags used for namespaces such as `console` and for the
//! event argument passed to listeners.

use super::value::Value;
use std::collections::HashMap;

/// Property bag
#[derive(Debug, Clone, Default)]
pub struct ScriptObject {
    properties: HashMap<Box<str>, Value>,
}

impl ScriptObject {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, key: &str) -> Option<&Value> { self.properties.get(key) }
    pub fn set(&mut self, key: &str, value: Value) { self.properties.insert(key.into(), value); }
    pub fn has(&self, key: &str) -> bool { self.properties.contains_key(key) }
    pub fn keys(&self) -> impl Iterator<Item = &str> { self.properties.keys().map(|k| &**k) }
    pub fn len(&self) -> usize { self.properties.len() }
    pub fn is_empty(&self) -> bool { self.properties.is_empty() }
}
