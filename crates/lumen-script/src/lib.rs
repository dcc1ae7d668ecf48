//! Lumen Script - Embedded scripting engine
//!
//! A small tree-walking interpreter for a JavaScript-like subset, able to
//! mutate a [`lumen_dom::Document`] and react to events.
//!
//! Features:
//! - Lexer and recursive-descent parser with source spans
//! - Declarations, assignment, `if`/`else`, equality, function literals
//! - Host objects: `document`, elements and their inline style
//! - Synchronous event dispatch with per-listener error isolation
//! - Console API routed to `tracing`

mod token;
mod lexer;
mod ast;
mod parser;
mod error;
mod value;
mod object;
mod environment;
mod interpreter;
mod host;
mod events;
mod console;
mod config;
mod runtime;

pub use token::{Token, TokenKind, Span};
pub use lexer::{Lexer, tokenize};
pub use ast::{Program, Stmt, StmtKind, Expr, ExprKind, AssignTarget, BinaryOp};
pub use parser::{Parser, parse, parse_source};
pub use error::ScriptError;
pub use value::{Value, NativeFunction, ScriptFunction, format_number};
pub use object::ScriptObject;
pub use environment::Environment;
pub use interpreter::Interpreter;
pub use host::{
    HostObject, HostIdentity, HostContext, SharedDocument, ChangeCallback,
    DocumentHandle, ElementHandle, StyleHandle, css_property_name,
};
pub use events::{ListenerMap, DispatchOutcome, dispatch};
pub use config::{DEFAULT_MAX_NESTING_DEPTH, ScriptConfig};
pub use runtime::Runtime;

use lumen_dom::Document;
use std::cell::RefCell;
use std::rc::Rc;

/// Evaluate a script against an empty document
pub fn eval(code: &str) -> Result<Value, ScriptError> {
    let runtime = Runtime::new(Rc::new(RefCell::new(Document::default())), || {});
    runtime.execute(code)
}
