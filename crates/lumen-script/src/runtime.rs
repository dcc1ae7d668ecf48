//! Script Runtime
//!
//! One global scope with `document` and `console` installed, bound to a
//! shared document and a change callback.

use super::ast::Program;
use super::config::ScriptConfig;
use super::console::install_console;
use super::environment::Environment;
use super::error::ScriptError;
use super::events::{DispatchOutcome, dispatch};
use super::host::{DocumentHandle, ElementHandle, HostContext, SharedDocument};
use super::interpreter::Interpreter;
use super::lexer::tokenize;
use super::parser::Parser;
use super::value::Value;
use lumen_dom::NodeId;
use std::rc::Rc;

/// Script runtime with the document APIs installed
pub struct Runtime {
    interpreter: Interpreter,
    global: Environment,
    document: DocumentHandle,
}

impl Runtime {
    /// Create a runtime over `document`; `on_change` runs after every visible mutation
    pub fn new(document: SharedDocument, on_change: impl Fn() + 'static) -> Self {
        Self::with_config(document, on_change, ScriptConfig::default())
    }

    pub fn with_config(
        document: SharedDocument,
        on_change: impl Fn() + 'static,
        config: ScriptConfig,
    ) -> Self {
        tracing::debug!(
            max_call_depth = config.max_call_depth,
            max_nesting_depth = config.max_nesting_depth,
            "creating script runtime"
        );

        let ctx = HostContext::new(document, Rc::new(on_change));
        let document = DocumentHandle::new(ctx);
        let global = Environment::new();
        global.set("document", Value::host(document.clone()));
        install_console(&global);

        Self {
            interpreter: Interpreter::new(config),
            global,
            document,
        }
    }

    /// Tokenize, parse and evaluate one script block in the global scope
    pub fn execute(&self, source: &str) -> Result<Value, ScriptError> {
        tracing::debug!(len = source.len(), "executing script");
        let program = Parser::with_max_depth(tokenize(source)?, self.interpreter.config().max_nesting_depth)
            .parse()?;
        self.eval_program(&program)
    }

    pub fn eval_program(&self, program: &Program) -> Result<Value, ScriptError> {
        self.interpreter.eval(program, &self.global)
    }

    /// Fire `event` at the element for `node`
    pub fn dispatch(&self, event: &str, node: NodeId) -> DispatchOutcome {
        dispatch(&self.interpreter, &self.element(node), event)
    }

    /// The cached wrapper for `node`
    pub fn element(&self, node: NodeId) -> ElementHandle {
        self.document.context().element(node)
    }

    pub fn document(&self) -> &SharedDocument {
        self.document.context().document()
    }

    pub fn global(&self) -> &Environment {
        &self.global
    }

    pub fn config(&self) -> &ScriptConfig {
        self.interpreter.config()
    }

    /// Expose a host function as a global
    pub fn define_native<F>(&self, name: &str, f: F)
    where
        F: Fn(&[Value]) -> Result<Value, ScriptError> + 'static,
    {
        self.global.set(name, Value::native(name, f));
    }

    /// Call a script or host callable from the host side
    pub fn call(&self, function: &Value, args: &[Value]) -> Result<Value, ScriptError> {
        self.interpreter.call(function, args)
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        // wrappers and closures point back at the context and global scope
        self.document.context().clear_wrappers();
        self.global.clear();
    }
}
