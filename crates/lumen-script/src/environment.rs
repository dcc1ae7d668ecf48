//! Variable Environments
//!
//! Scopes form a parent chain. The global scope is the root; blocks and
//! function calls push child scopes.

use super::error::ScriptError;
use super::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a scope
#[derive(Clone, Default)]
pub struct Environment {
    scope: Rc<RefCell<Scope>>,
}

#[derive(Default)]
struct Scope {
    vars: HashMap<Box<str>, Value>,
    parent: Option<Environment>,
}

impl Environment {
    /// Create a root (global) scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a nested scope
    pub fn child(&self) -> Self {
        Self {
            scope: Rc::new(RefCell::new(Scope {
                vars: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    pub fn parent(&self) -> Option<Environment> {
        self.scope.borrow().parent.clone()
    }

    /// Resolve a name through the scope chain
    pub fn get(&self, name: &str) -> Result<Value, ScriptError> {
        let mut env = self.clone();
        loop {
            let next = {
                let scope = env.scope.borrow();
                if let Some(value) = scope.vars.get(name) {
                    return Ok(value.clone());
                }
                scope.parent.clone()
            };
            match next {
                Some(parent) => env = parent,
                None => return Err(ScriptError::UndefinedVariable(name.to_string())),
            }
        }
    }

    /// Bind a name in this scope, shadowing outer bindings; returns the value
    pub fn set(&self, name: &str, value: Value) -> Value {
        self.scope.borrow_mut().vars.insert(name.into(), value.clone());
        value
    }

    /// Write to the nearest scope that binds `name`; unknown names land in
    /// this scope. Returns the value.
    pub fn assign(&self, name: &str, value: Value) -> Value {
        let target = self.owner(name).unwrap_or_else(|| self.clone());
        target.set(name, value)
    }

    pub fn has(&self, name: &str) -> bool {
        self.owner(name).is_some()
    }

    pub fn has_local(&self, name: &str) -> bool {
        self.scope.borrow().vars.contains_key(name)
    }

    /// Remove every binding in this scope
    pub fn clear(&self) {
        let vars = std::mem::take(&mut self.scope.borrow_mut().vars);
        drop(vars);
    }

    /// Whether both handles refer to the same scope
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.scope, &other.scope)
    }

    /// Clear a finished call scope unless something outside it still holds it.
    ///
    /// Closures bound in the scope capture it, so they would keep it alive
    /// forever; they do not count as outside holders unless their own value
    /// is shared elsewhere.
    pub fn release(&self) {
        let captured_by_own_bindings = {
            let scope = self.scope.borrow();
            scope
                .vars
                .values()
                .filter(|value| match value {
                    Value::Function(function) => {
                        Rc::strong_count(function) == 1 && function.env.ptr_eq(self)
                    }
                    _ => false,
                })
                .count()
        };
        if Rc::strong_count(&self.scope) == 1 + captured_by_own_bindings {
            self.clear();
        }
    }

    fn owner(&self, name: &str) -> Option<Environment> {
        let mut env = self.clone();
        loop {
            if env.has_local(name) {
                return Some(env);
            }
            env = env.parent()?;
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.scope.borrow();
        let mut names: Vec<&str> = scope.vars.keys().map(|k| &**k).collect();
        names.sort_unstable();
        f.debug_struct("Environment")
            .field("vars", &names)
            .field("nested", &scope.parent.is_some())
            .finish()
    }
}
