//! Tree-walking Evaluator
//!
//! Executes a [`Program`] directly from the AST. Statements yield the value
//! of their last evaluated expression; `if` branches run in the enclosing
//! scope; function calls run in a fresh child scope.

use super::ast::{AssignTarget, BinaryOp, Expr, ExprKind, Program, Stmt, StmtKind};
use super::config::ScriptConfig;
use super::environment::Environment;
use super::error::ScriptError;
use super::value::{ScriptFunction, Value};
use std::cell::Cell;
use std::rc::Rc;

/// Script interpreter
#[derive(Debug, Default)]
pub struct Interpreter {
    config: ScriptConfig,
    depth: Cell<usize>,
}

/// Releases one level of call depth when dropped
struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

impl Interpreter {
    pub fn new(config: ScriptConfig) -> Self {
        Self { config, depth: Cell::new(0) }
    }

    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    /// Current nesting of script function calls
    pub fn call_depth(&self) -> usize {
        self.depth.get()
    }

    /// Evaluate a program; the result is the value of the last statement
    pub fn eval(&self, program: &Program, env: &Environment) -> Result<Value, ScriptError> {
        self.exec_block(&program.body, env)
    }

    pub fn exec_block(&self, body: &[Stmt], env: &Environment) -> Result<Value, ScriptError> {
        let mut last = Value::Undefined;
        for stmt in body {
            last = self.exec_stmt(stmt, env)?;
        }
        Ok(last)
    }

    fn exec_stmt(&self, stmt: &Stmt, env: &Environment) -> Result<Value, ScriptError> {
        match &stmt.kind {
            StmtKind::Declaration { name, init } => {
                let value = match init {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::Undefined,
                };
                Ok(env.set(name, value))
            }
            StmtKind::If { test, consequent, alternate } => {
                if self.eval_expr(test, env)?.is_truthy() {
                    self.exec_block(consequent, env)
                } else if let Some(alternate) = alternate {
                    self.exec_block(alternate, env)
                } else {
                    Ok(Value::Undefined)
                }
            }
            StmtKind::Expression(expr) => self.eval_expr(expr, env),
        }
    }

    pub fn eval_expr(&self, expr: &Expr, env: &Environment) -> Result<Value, ScriptError> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::String(s) => Ok(Value::from(&**s)),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Identifier(name) => env.get(name),

            ExprKind::Assignment { target, value } => match target {
                AssignTarget::Identifier(name) => {
                    let value = self.eval_expr(value, env)?;
                    Ok(env.assign(name, value))
                }
                AssignTarget::Member { object, property } => {
                    // receiver first, then the right-hand side
                    let receiver = self.eval_expr(object, env)?;
                    let value = self.eval_expr(value, env)?;
                    self.set_member(&receiver, property, value.clone())?;
                    Ok(value)
                }
            },

            ExprKind::Binary { operator, left, right } => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                let result = match operator {
                    BinaryOp::Equal => left.loose_equals(&right),
                    BinaryOp::StrictEqual => left.strict_equals(&right),
                };
                Ok(Value::Bool(result))
            }

            ExprKind::Member { object, property } => {
                let receiver = self.eval_expr(object, env)?;
                self.get_member(&receiver, property)
            }

            ExprKind::Call { callee, arguments } => {
                let function = self.eval_expr(callee, env)?;
                let args = arguments
                    .iter()
                    .map(|arg| self.eval_expr(arg, env))
                    .collect::<Result<Vec<_>, _>>()?;
                if !function.is_callable() {
                    return Err(ScriptError::type_error(format!(
                        "{} is not callable",
                        callee.describe()
                    )));
                }
                self.call(&function, &args)
            }

            ExprKind::Function { params, body } => Ok(Value::Function(Rc::new(ScriptFunction {
                params: params.clone(),
                body: Rc::clone(body),
                env: env.clone(),
            }))),
        }
    }

    /// Invoke a callable value
    pub fn call(&self, function: &Value, args: &[Value]) -> Result<Value, ScriptError> {
        match function {
            Value::Native(native) => native.call(args),
            Value::Function(function) => {
                let _guard = self.enter()?;
                let scope = function.env.child();
                for (i, param) in function.params.iter().enumerate() {
                    scope.set(param, args.get(i).cloned().unwrap_or(Value::Undefined));
                }
                let result = self.exec_block(&function.body, &scope);
                scope.release();
                result.map(|_| Value::Undefined)
            }
            other => Err(ScriptError::type_error(format!(
                "{} is not callable",
                other.type_name()
            ))),
        }
    }

    fn enter(&self) -> Result<DepthGuard<'_>, ScriptError> {
        let depth = self.depth.get();
        if depth >= self.config.max_call_depth {
            return Err(ScriptError::CallDepthExceeded(self.config.max_call_depth));
        }
        self.depth.set(depth + 1);
        Ok(DepthGuard { depth: &self.depth })
    }

    pub fn get_member(&self, receiver: &Value, property: &str) -> Result<Value, ScriptError> {
        match receiver {
            Value::Host(host) => host.get(property),
            Value::Object(object) => object
                .borrow()
                .get(property)
                .cloned()
                .ok_or_else(|| ScriptError::type_error(format!("no such property '{property}'"))),
            Value::Undefined | Value::Null => Err(ScriptError::type_error(format!(
                "cannot read property '{property}' of {receiver}"
            ))),
            other => Err(ScriptError::type_error(format!(
                "no such property '{property}' on {}",
                other.type_name()
            ))),
        }
    }

    pub fn set_member(&self, receiver: &Value, property: &str, value: Value) -> Result<(), ScriptError> {
        match receiver {
            Value::Host(host) => host.set(property, value),
            Value::Object(object) => {
                object.borrow_mut().set(property, value);
                Ok(())
            }
            other => Err(ScriptError::type_error(format!(
                "cannot assign property '{property}' of {}",
                other.type_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn run(src: &str) -> Result<Value, ScriptError> {
        let program = parse_source(src)?;
        Interpreter::default().eval(&program, &Environment::new())
    }

    #[test]
    fn test_declaration_then_reference() {
        assert!(matches!(run("let x = 5; x"), Ok(Value::Number(n)) if n == 5.0));
    }

    #[test]
    fn test_undefined_variable() {
        assert_eq!(
            run("let x = 5; y").unwrap_err(),
            ScriptError::UndefinedVariable("y".into())
        );
    }

    #[test]
    fn test_if_branches() {
        assert!(matches!(run("let r; if (0) { r = 'a' } else { r = 'b' }; r"), Ok(Value::String(s)) if &*s == "b"));
        assert!(matches!(run("let r; if (1) { r = 'a' } else { r = 'b' }; r"), Ok(Value::String(s)) if &*s == "a"));
        assert!(matches!(run("if ('') 1"), Ok(Value::Undefined)));
    }

    #[test]
    fn test_branch_declarations_leak_to_enclosing_scope() {
        assert!(matches!(run("if (true) { let inner = 3 }; inner"), Ok(Value::Number(n)) if n == 3.0));
    }

    #[test]
    fn test_equality() {
        assert!(matches!(run("1 == '1'"), Ok(Value::Bool(true))));
        assert!(matches!(run("1 === '1'"), Ok(Value::Bool(false))));
        assert!(matches!(run("null == x"), Err(ScriptError::UndefinedVariable(_))));
        assert!(matches!(run("let u; u == null"), Ok(Value::Bool(true))));
    }

    #[test]
    fn test_function_closure() {
        let src = "let count = 0; let bump = function (by) { count = by }; bump(7); count";
        assert!(matches!(run(src), Ok(Value::Number(n)) if n == 7.0));
    }

    #[test]
    fn test_missing_argument_is_undefined() {
        let src = "let seen = 1; let f = function (a) { seen = a }; f(); seen";
        assert!(matches!(run(src), Ok(Value::Undefined)));
    }

    #[test]
    fn test_params_do_not_leak() {
        let src = "let f = function (p) { let local = p }; f(1); local";
        assert!(matches!(run(src), Err(ScriptError::UndefinedVariable(name)) if name == "local"));
    }

    #[test]
    fn test_not_callable() {
        let err = run("let x = 1; x()").unwrap_err();
        assert_eq!(err, ScriptError::Type("x is not callable".into()));
    }

    #[test]
    fn test_member_on_null() {
        let err = run("let x = null; x.y").unwrap_err();
        assert!(err.to_string().contains("cannot read property 'y' of null"), "{err}");
    }

    #[test]
    fn test_assign_to_primitive_member() {
        let err = run("let x = 1; x.y = 2").unwrap_err();
        assert!(err.to_string().contains("cannot assign"), "{err}");
    }

    #[test]
    fn test_call_scope_is_released() {
        use std::cell::RefCell;
        use std::rc::Weak;

        let env = Environment::new();
        let seen: Rc<RefCell<Vec<Weak<ScriptFunction>>>> = Rc::default();
        let sink = seen.clone();
        env.set("watch", Value::native("watch", move |args| {
            if let Some(Value::Function(f)) = args.first() {
                sink.borrow_mut().push(Rc::downgrade(f));
            }
            Ok(Value::Undefined)
        }));

        let src = "let kept; \
                   let outer = function (keep) { let inner = function () { }; watch(inner); if (keep) { kept = inner } }; \
                   outer(false); outer(true)";
        Interpreter::default().eval(&parse_source(src).unwrap(), &env).unwrap();

        let seen = seen.borrow();
        assert!(seen[0].upgrade().is_none());
        // escaped through `kept`, so its scope survives
        let kept = seen[1].upgrade().unwrap();
        assert!(kept.env.has_local("inner"));
    }

    #[test]
    fn test_recursion_limit() {
        let interp = Interpreter::new(ScriptConfig { max_call_depth: 16, ..ScriptConfig::default() });
        let env = Environment::new();
        let program = parse_source("let f = function () { f() }; f()").unwrap();
        assert_eq!(interp.eval(&program, &env).unwrap_err(), ScriptError::CallDepthExceeded(16));
        assert_eq!(interp.call_depth(), 0);
    }
}
