//! Script Parser
//!
//! Recursive descent with one token of lookahead:
//!
//! ```text
//! program    := statement*
//! statement  := decl | ifstmt | exprstmt          (each optionally followed by ';')
//! decl       := ("let"|"var"|"const") IDENT ("=" expr)?
//! ifstmt     := "if" "(" expr ")" block ("else" block)?
//! block      := "{" statement* "}" | statement ";"?
//! expr       := equality ("=" expr)?               (lhs must be IDENT or member)
//! equality   := member (("==" | "===") member)*
//! member     := primary ("." IDENT | "(" args ")")*
//! primary    := NUMBER | STRING | "true" | "false" | "null" | IDENT | "(" expr ")"
//!             | "function" "(" params ")" "{" statement* "}"
//! ```
//!
//! Nesting is capped: both the parser's own recursion and the height of the
//! tree it builds stay within `max_depth`, so neither parsing nor evaluation
//! can run out of stack.

use super::ast::{AssignTarget, BinaryOp, Expr, ExprKind, Program, Stmt, StmtKind};
use super::config::DEFAULT_MAX_NESTING_DEPTH;
use super::error::ScriptError;
use super::lexer::tokenize;
use super::token::{Span, Token, TokenKind};

/// Parse a token sequence into a program
pub fn parse(tokens: Vec<Token>) -> Result<Program, ScriptError> {
    Parser::new(tokens).parse()
}

/// Tokenize and parse source text
pub fn parse_source(source: &str) -> Result<Program, ScriptError> {
    parse(tokenize(source)?)
}

/// Script Parser
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: u32,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_max_depth(tokens, DEFAULT_MAX_NESTING_DEPTH)
    }

    pub fn with_max_depth(tokens: Vec<Token>, max_depth: usize) -> Self {
        let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
        Self { tokens, pos: 0, end, depth: 0, max_depth }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    fn current_span(&self) -> Span {
        self.current().map(|t| t.span).unwrap_or(Span::new(self.end, self.end))
    }

    fn previous_span(&self) -> Span {
        self.pos.checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or_default()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Token, ScriptError> {
        if self.check(kind) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.unexpected(kind.describe()))
    }

    fn unexpected(&self, expected: &str) -> ScriptError {
        match self.current() {
            Some(token) => ScriptError::syntax(
                format!("expected {expected}, found '{}'", token.text),
                token.span,
            ),
            None => ScriptError::syntax(
                format!("expected {expected}, found end of input"),
                Span::new(self.end, self.end),
            ),
        }
    }

    fn too_deep(&self) -> ScriptError {
        ScriptError::syntax(
            format!("nesting too deep (limit {})", self.max_depth),
            self.current_span(),
        )
    }

    /// Run `parse` one nesting level down
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ScriptError>,
    ) -> Result<T, ScriptError> {
        if self.depth >= self.max_depth {
            return Err(self.too_deep());
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Build an expression node, rejecting trees taller than the limit
    fn expr(&self, kind: ExprKind, span: Span) -> Result<Expr, ScriptError> {
        let expr = Expr::new(kind, span);
        if expr.height as usize > self.max_depth {
            return Err(self.too_deep());
        }
        Ok(expr)
    }

    fn stmt(&self, kind: StmtKind, span: Span) -> Result<Stmt, ScriptError> {
        let stmt = Stmt::new(kind, span);
        if stmt.height as usize > self.max_depth {
            return Err(self.too_deep());
        }
        Ok(stmt)
    }

    /// Parse a complete program
    pub fn parse(mut self) -> Result<Program, ScriptError> {
        let body = self.parse_statements()?;

        // parse_statements stops at a closing brace; at top level it is unmatched
        if let Some(token) = self.current() {
            return Err(ScriptError::syntax(format!("unexpected '{}'", token.text), token.span));
        }

        let span = match (body.first(), body.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::default(),
        };
        Ok(Program { body, span })
    }

    fn parse_statements(&mut self) -> Result<Vec<Stmt>, ScriptError> {
        let mut body = Vec::new();
        while self.current().is_some() && !self.check(TokenKind::RBrace) {
            body.push(self.parse_statement()?);
            self.eat(TokenKind::Semicolon);
        }
        Ok(body)
    }

    fn parse_statement(&mut self) -> Result<Stmt, ScriptError> {
        match self.current_kind() {
            Some(TokenKind::Declaration) => self.parse_declaration(),
            Some(TokenKind::If) => self.parse_if_statement(),
            _ => {
                let expr = self.parse_expression()?;
                let span = expr.span;
                self.stmt(StmtKind::Expression(expr), span)
            }
        }
    }

    fn parse_declaration(&mut self) -> Result<Stmt, ScriptError> {
        let start = self.current_span();
        self.advance(); // let / var / const
        let name = self.consume(TokenKind::Identifier)?.text;
        let init = if self.eat(TokenKind::Eq) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.stmt(
            StmtKind::Declaration { name, init },
            start.merge(self.previous_span()),
        )
    }

    fn parse_if_statement(&mut self) -> Result<Stmt, ScriptError> {
        let start = self.current_span();
        self.advance(); // if
        self.consume(TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.consume(TokenKind::RParen)?;
        let consequent = self.parse_block()?;
        let alternate = if self.eat(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };

        self.stmt(
            StmtKind::If { test, consequent, alternate },
            start.merge(self.previous_span()),
        )
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, ScriptError> {
        self.nested(Self::parse_block_body)
    }

    fn parse_block_body(&mut self) -> Result<Vec<Stmt>, ScriptError> {
        if self.eat(TokenKind::LBrace) {
            let body = self.parse_statements()?;
            self.consume(TokenKind::RBrace)?;
            Ok(body)
        } else {
            let stmt = self.parse_statement()?;
            // lets `if (c) a = 1; else a = 2;` reach the else
            self.eat(TokenKind::Semicolon);
            Ok(vec![stmt])
        }
    }

    fn parse_expression(&mut self) -> Result<Expr, ScriptError> {
        self.nested(Self::parse_assignment)
    }

    fn parse_assignment(&mut self) -> Result<Expr, ScriptError> {
        let left = self.parse_equality()?;

        if !self.check(TokenKind::Eq) {
            return Ok(left);
        }

        let span = left.span;
        let target = match left.kind {
            ExprKind::Identifier(name) => AssignTarget::Identifier(name),
            ExprKind::Member { object, property } => AssignTarget::Member { object, property },
            _ => return Err(ScriptError::syntax("invalid assignment target", span)),
        };
        self.advance(); // =
        let value = self.parse_expression()?;
        let span = span.merge(value.span);

        self.expr(ExprKind::Assignment { target, value: Box::new(value) }, span)
    }

    fn parse_equality(&mut self) -> Result<Expr, ScriptError> {
        let mut left = self.parse_member()?;

        loop {
            let operator = match self.current_kind() {
                Some(TokenKind::EqEq) => BinaryOp::Equal,
                Some(TokenKind::EqEqEq) => BinaryOp::StrictEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_member()?;
            let span = left.span.merge(right.span);
            left = self.expr(
                ExprKind::Binary { operator, left: Box::new(left), right: Box::new(right) },
                span,
            )?;
        }

        Ok(left)
    }

    fn parse_member(&mut self) -> Result<Expr, ScriptError> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.eat(TokenKind::Dot) {
                let name = self.consume(TokenKind::Identifier)?;
                let span = expr.span.merge(name.span);
                expr = self.expr(
                    ExprKind::Member { object: Box::new(expr), property: name.text },
                    span,
                )?;
            } else if self.eat(TokenKind::LParen) {
                let arguments = self.parse_arguments()?;
                let close = self.consume(TokenKind::RParen)?;
                let span = expr.span.merge(close.span);
                expr = self.expr(
                    ExprKind::Call { callee: Box::new(expr), arguments },
                    span,
                )?;
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ScriptError> {
        let mut args = Vec::new();

        if !self.check(TokenKind::RParen) {
            args.push(self.parse_expression()?);
            while self.eat(TokenKind::Comma) {
                args.push(self.parse_expression()?);
            }
        }

        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, ScriptError> {
        let Some(token) = self.current().cloned() else {
            return Err(self.unexpected("expression"));
        };
        let span = token.span;

        let kind = match token.kind {
            TokenKind::Number => {
                let value = token.text.parse::<f64>()
                    .map_err(|_| ScriptError::syntax("invalid number literal", span))?;
                ExprKind::Number(value)
            }
            TokenKind::String => ExprKind::String(strip_quotes(&token.text).into()),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Null => ExprKind::Null,
            TokenKind::Identifier => ExprKind::Identifier(token.text),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.consume(TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::Function => return self.parse_function_expression(),
            _ => return Err(self.unexpected("expression")),
        };

        self.advance();
        Ok(Expr::new(kind, span))
    }

    fn parse_function_expression(&mut self) -> Result<Expr, ScriptError> {
        let start = self.current_span();
        self.advance(); // function
        self.consume(TokenKind::LParen)?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            params.push(self.consume(TokenKind::Identifier)?.text);
            while self.eat(TokenKind::Comma) {
                params.push(self.consume(TokenKind::Identifier)?.text);
            }
        }
        self.consume(TokenKind::RParen)?;

        self.consume(TokenKind::LBrace)?;
        let body = self.nested(Self::parse_statements)?;
        self.consume(TokenKind::RBrace)?;

        self.expr(
            ExprKind::Function { params, body: body.into() },
            start.merge(self.previous_span()),
        )
    }
}

/// Literal text between the surrounding quotes
fn strip_quotes(text: &str) -> &str {
    if text.len() >= 2 { &text[1..text.len() - 1] } else { text }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Program {
        parse_source(src).unwrap()
    }

    fn single_expr(src: &str) -> Expr {
        let program = parse_ok(src);
        assert_eq!(program.body.len(), 1);
        match &program.body[0].kind {
            StmtKind::Expression(expr) => expr.clone(),
            other => panic!("Expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_declaration() {
        let program = parse_ok("let x = 5; var y");
        assert_eq!(program.body.len(), 2);
        match &program.body[0].kind {
            StmtKind::Declaration { name, init: Some(init) } => {
                assert_eq!(&**name, "x");
                assert_eq!(init.kind, ExprKind::Number(5.0));
            }
            other => panic!("Expected declaration, got {other:?}"),
        }
        assert!(matches!(&program.body[1].kind, StmtKind::Declaration { init: None, .. }));
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let expr = single_expr("a = b = c");
        let ExprKind::Assignment { target, value } = expr.kind else {
            panic!("Expected assignment");
        };
        assert_eq!(target, AssignTarget::Identifier("a".into()));
        assert!(matches!(
            value.kind,
            ExprKind::Assignment { target: AssignTarget::Identifier(ref n), .. } if &**n == "b"
        ));
    }

    #[test]
    fn test_member_call_chain() {
        let expr = single_expr("a.b.c()");
        let ExprKind::Call { callee, arguments } = expr.kind else {
            panic!("Expected call");
        };
        assert!(arguments.is_empty());
        assert_eq!(callee.describe(), "a.b.c");
    }

    #[test]
    fn test_call_arguments() {
        let expr = single_expr("el.setAttribute('class', \"x\")");
        let ExprKind::Call { arguments, .. } = expr.kind else {
            panic!("Expected call");
        };
        assert_eq!(arguments[0].kind, ExprKind::String("class".into()));
        assert_eq!(arguments[1].kind, ExprKind::String("x".into()));
    }

    #[test]
    fn test_member_assignment_target() {
        let expr = single_expr("document.getElementById(\"a\").textContent = \"hi\"");
        let ExprKind::Assignment { target: AssignTarget::Member { property, .. }, .. } = expr.kind else {
            panic!("Expected member assignment");
        };
        assert_eq!(&*property, "textContent");
    }

    #[test]
    fn test_if_else_forms() {
        let program = parse_ok("if (x) { a = 1; b = 2 } else c = 3; d");
        assert_eq!(program.body.len(), 2);
        let StmtKind::If { consequent, alternate, .. } = &program.body[0].kind else {
            panic!("Expected if");
        };
        assert_eq!(consequent.len(), 2);
        assert_eq!(alternate.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_single_statement_branch_with_semicolon() {
        let program = parse_ok("if (x) a = 1; else a = 2;");
        assert_eq!(program.body.len(), 1);
        assert!(matches!(&program.body[0].kind, StmtKind::If { alternate: Some(_), .. }));
    }

    #[test]
    fn test_else_if_chain() {
        let program = parse_ok("if (a) x = 1 else if (b) x = 2 else x = 3");
        let StmtKind::If { alternate: Some(alternate), .. } = &program.body[0].kind else {
            panic!("Expected if/else");
        };
        assert!(matches!(alternate[0].kind, StmtKind::If { alternate: Some(_), .. }));
    }

    #[test]
    fn test_equality_is_left_associative() {
        let expr = single_expr("a == b === c");
        let ExprKind::Binary { operator, left, .. } = expr.kind else {
            panic!("Expected binary");
        };
        assert_eq!(operator, BinaryOp::StrictEqual);
        assert!(matches!(left.kind, ExprKind::Binary { operator: BinaryOp::Equal, .. }));
    }

    #[test]
    fn test_function_literal() {
        let expr = single_expr("function (event, extra) { x = 1; y = 2 }");
        let ExprKind::Function { params, body } = expr.kind else {
            panic!("Expected function");
        };
        let names: Vec<&str> = params.iter().map(|p| &**p).collect();
        assert_eq!(names, vec!["event", "extra"]);
        assert_eq!(body.len(), 2);
    }

    #[test]
    fn test_parenthesized() {
        let expr = single_expr("(a)");
        assert_eq!(expr.kind, ExprKind::Identifier("a".into()));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let src = "let el = document.querySelector('#a'); if (el) { el.style.color = 'red' } else x = null";
        assert_eq!(parse_ok(src), parse_ok(src));
    }

    #[test]
    fn test_missing_paren() {
        let err = parse_source("if (x { }").unwrap_err();
        assert!(matches!(err, ScriptError::Syntax { .. }));
        assert!(err.to_string().contains("')'"), "{err}");
    }

    #[test]
    fn test_stray_closing_brace() {
        assert!(matches!(parse_source("a }"), Err(ScriptError::Syntax { .. })));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = parse_source("1 = 2").unwrap_err();
        assert!(err.to_string().contains("invalid assignment target"));
    }

    #[test]
    fn test_unexpected_end_of_input() {
        let err = parse_source("let").unwrap_err();
        assert!(err.to_string().contains("end of input"), "{err}");
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let limited = |src: &str, max| Parser::with_max_depth(tokenize(src).unwrap(), max).parse();

        assert!(limited(&nested(6), 8).is_ok());
        let err = limited(&nested(8), 8).unwrap_err();
        assert!(err.to_string().contains("nesting too deep (limit 8)"), "{err}");
    }

    #[test]
    fn test_chain_height_is_limited() {
        let limited = |src: &str, max| Parser::with_max_depth(tokenize(src).unwrap(), max).parse();
        let chain = |n: usize| format!("a{}", ".b".repeat(n));

        // the member chain sits under a statement node
        assert!(limited(&chain(6), 8).is_ok());
        assert!(limited(&chain(8), 8).is_err());
        assert!(limited(&format!("1{}", " == 1".repeat(8)), 8).is_err());
        assert!(limited(&format!("f{}", "()".repeat(8)), 8).is_err());
    }

    #[test]
    fn test_node_heights() {
        let program = parse_ok("a.b = c");
        // statement > assignment > member > identifier
        assert_eq!(program.body[0].height, 4);
        let program = parse_ok("if (x) { if (y) { z } }");
        assert_eq!(program.body[0].height, 4);
    }

    #[test]
    fn test_empty_program() {
        assert!(parse_ok("").body.is_empty());
        assert!(parse_ok("   \n ").body.is_empty());
    }
}
