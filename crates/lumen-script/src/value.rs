//! Script Values
//!
//! Primitives are copied by value; objects, host wrappers and functions are
//! shared references whose identity is observable through `===`.

use super::ast::Stmt;
use super::environment::Environment;
use super::error::ScriptError;
use super::host::HostObject;
use super::object::ScriptObject;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Signature of host-provided callables
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, ScriptError>;

/// Script value
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    /// Property bag
    Object(Rc<RefCell<ScriptObject>>),
    /// Host Object Model wrapper
    Host(Rc<dyn HostObject>),
    /// Callable registered by the host
    Native(NativeFunction),
    /// Callable defined by a function literal
    Function(Rc<ScriptFunction>),
}

/// Host-provided callable
#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    func: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ScriptError> + 'static,
    {
        Self { name: name.into(), func: Rc::new(func) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, ScriptError> {
        (self.func)(args)
    }

    pub fn ptr_eq(&self, other: &NativeFunction) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// Closure created from a function literal
pub struct ScriptFunction {
    pub params: Vec<Box<str>>,
    pub body: Rc<[Stmt]>,
    /// Scope the literal was evaluated in
    pub env: Environment,
}

impl fmt::Debug for ScriptFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptFunction")
            .field("params", &self.params)
            .field("statements", &self.body.len())
            .finish()
    }
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn host(object: impl HostObject + 'static) -> Self {
        Value::Host(Rc::new(object))
    }

    pub fn object(object: ScriptObject) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    pub fn native<F>(name: &str, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ScriptError> + 'static,
    {
        Value::Native(NativeFunction::new(name, func))
    }

    /// `typeof`-style name; host objects report their class
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::Host(host) => host.class_name(),
            Value::Native(_) | Value::Function(_) => "function",
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Native(_) | Value::Function(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Truthiness used by conditionals
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Object(_) | Value::Host(_) | Value::Native(_) | Value::Function(_) => true,
        }
    }

    /// Numeric conversion for loose equality
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => if *b { 1.0 } else { 0.0 },
            Value::Number(n) => *n,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
            _ => f64::NAN,
        }
    }

    /// `===`
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Host(a), Value::Host(b)) => a.identity() == b.identity(),
            (Value::Native(a), Value::Native(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// `==`: strict equality, plus `null == undefined` and numeric
    /// comparison across number/string/boolean
    pub fn loose_equals(&self, other: &Value) -> bool {
        if std::mem::discriminant(self) == std::mem::discriminant(other) {
            return self.strict_equals(other);
        }
        match (self, other) {
            (a, b) if a.is_nullish() && b.is_nullish() => true,
            (a, b) if a.is_nullish() || b.is_nullish() => false,
            (
                Value::Number(_) | Value::String(_) | Value::Bool(_),
                Value::Number(_) | Value::String(_) | Value::Bool(_),
            ) => self.to_number() == other.to_number(),
            _ => false,
        }
    }
}

/// Number formatting as scripts display it
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::Object(_) => f.write_str("[object Object]"),
            Value::Host(host) => write!(f, "[object {}]", host.class_name()),
            Value::Native(native) => write!(f, "function {}() {{ [native code] }}", native.name()),
            Value::Function(_) => f.write_str("function () { [script code] }"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Object(obj) => match obj.try_borrow() {
                Ok(obj) => {
                    let mut keys: Vec<&str> = obj.keys().collect();
                    keys.sort_unstable();
                    f.debug_tuple("Object").field(&keys).finish()
                }
                Err(_) => f.write_str("Object(<borrowed>)"),
            },
            Value::Host(host) => f.debug_tuple("Host").field(host).finish(),
            Value::Native(native) => native.fmt(f),
            Value::Function(func) => func.fmt(f),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::Number(n) }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::String(s.into()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::String(s.into()) }
}

impl From<NativeFunction> for Value {
    fn from(native: NativeFunction) -> Self { Value::Native(native) }
}
