//! Abstract Syntax Tree
//!
//! Tree-shaped, owned top-down. Function bodies are reference counted so a
//! closure value can share them with the program that defined it.
//!
//! Every node records its `height` (1 for a leaf), computed from its direct
//! children when it is built, so the parser can reject trees too deep to walk
//! without recursing over them.

use super::token::Span;
use std::rc::Rc;

/// A parsed script
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
    pub height: u32,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        let height = kind.height();
        Self { kind, span, height }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `let`/`var`/`const` name (= init)?
    Declaration { name: Box<str>, init: Option<Expr> },
    If { test: Expr, consequent: Vec<Stmt>, alternate: Option<Vec<Stmt>> },
    Expression(Expr),
}

impl StmtKind {
    fn height(&self) -> u32 {
        let children = match self {
            StmtKind::Declaration { init, .. } => init.as_ref().map_or(0, |e| e.height),
            StmtKind::If { test, consequent, alternate } => test
                .height
                .max(block_height(consequent))
                .max(alternate.as_deref().map_or(0, block_height)),
            StmtKind::Expression(expr) => expr.height,
        };
        children + 1
    }
}

fn block_height(body: &[Stmt]) -> u32 {
    body.iter().map(|s| s.height).max().unwrap_or(0)
}

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub height: u32,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        let height = kind.height();
        Self { kind, span, height }
    }

    /// Short source-like rendering of callee/target expressions for messages
    pub fn describe(&self) -> String {
        match &self.kind {
            ExprKind::Identifier(name) => name.to_string(),
            ExprKind::Member { object, property } => format!("{}.{}", object.describe(), property),
            ExprKind::Call { callee, .. } => format!("{}(...)", callee.describe()),
            ExprKind::Function { .. } => "function".into(),
            ExprKind::Number(n) => n.to_string(),
            ExprKind::String(s) => format!("{s:?}"),
            ExprKind::Bool(b) => b.to_string(),
            ExprKind::Null => "null".into(),
            ExprKind::Assignment { .. } | ExprKind::Binary { .. } => "expression".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Assignment { target: AssignTarget, value: Box<Expr> },
    Binary { operator: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Member { object: Box<Expr>, property: Box<str> },
    Call { callee: Box<Expr>, arguments: Vec<Expr> },
    Function { params: Vec<Box<str>>, body: Rc<[Stmt]> },
    Identifier(Box<str>),
    Number(f64),
    String(Box<str>),
    Bool(bool),
    Null,
}

impl ExprKind {
    fn height(&self) -> u32 {
        let children = match self {
            ExprKind::Assignment { target, value } => target.height().max(value.height),
            ExprKind::Binary { left, right, .. } => left.height.max(right.height),
            ExprKind::Member { object, .. } => object.height,
            ExprKind::Call { callee, arguments } => {
                arguments.iter().map(|a| a.height).fold(callee.height, u32::max)
            }
            ExprKind::Function { body, .. } => block_height(body),
            _ => 0,
        };
        children + 1
    }
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Identifier(Box<str>),
    Member { object: Box<Expr>, property: Box<str> },
}

impl AssignTarget {
    fn height(&self) -> u32 {
        match self {
            AssignTarget::Identifier(_) => 0,
            AssignTarget::Member { object, .. } => object.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp { Equal, StrictEqual }
