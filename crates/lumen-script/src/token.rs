//! Token Types
//!
//! Token definitions for the script subset.

use std::fmt;

/// Source span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Token with kind, matched text and span
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Box<str>,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: &str, span: Span) -> Self {
        Self { kind, text: text.into(), span }
    }
}

/// Token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Number,
    String,

    Identifier,

    // Keywords
    Declaration, // let / var / const
    If,
    Else,
    True,
    False,
    Null,
    Function,

    // Punctuators and operators
    EqEqEq,    // ===
    EqEq,      // ==
    Eq,        // =
    Dot,       // .
    Comma,     // ,
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Semicolon, // ;
}

impl TokenKind {
    /// Check if this is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(self,
            TokenKind::Declaration | TokenKind::If | TokenKind::Else |
            TokenKind::True | TokenKind::False | TokenKind::Null |
            TokenKind::Function
        )
    }

    /// Human-readable description used in syntax errors
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Identifier => "identifier",
            TokenKind::Declaration => "declaration keyword",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Null => "'null'",
            TokenKind::Function => "'function'",
            TokenKind::EqEqEq => "'==='",
            TokenKind::EqEq => "'=='",
            TokenKind::Eq => "'='",
            TokenKind::Dot => "'.'",
            TokenKind::Comma => "','",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Semicolon => "';'",
        }
    }
}

/// Keywords lookup table
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        "let" | "var" | "const" => Some(TokenKind::Declaration),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "null" => Some(TokenKind::Null),
        "function" => Some(TokenKind::Function),
        _ => None,
    }
}
