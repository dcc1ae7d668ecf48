//! Script Lexer
//!
//! Turns source text into tokens. The lexer is an iterator: it yields tokens
//! lazily and stops for good after the first error.

use super::error::ScriptError;
use super::token::{Token, TokenKind, Span, keyword_from_str};

/// Tokenize a whole source string
pub fn tokenize(source: &str) -> Result<Vec<Token>, ScriptError> {
    Lexer::new(source).collect()
}

/// Script Lexer
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    done: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0, done: false }
    }

    /// Get current byte position
    pub fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn make(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(
            kind,
            &self.source[start..self.pos],
            Span::new(start as u32, self.pos as u32),
        )
    }

    /// Scan the next token; `None` at end of input
    pub fn next_token(&mut self) -> Option<Result<Token, ScriptError>> {
        self.skip_whitespace();

        let start = self.pos;
        let c = self.peek()?;

        let token = match c {
            '0'..='9' => Ok(self.scan_number(start)),
            '"' | '\'' => self.scan_string(c, start),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.scan_identifier(start)),
            _ => self.scan_punctuator(c, start),
        };
        Some(token)
    }

    fn scan_number(&mut self, start: usize) -> Token {
        self.consume_digits();
        // A fraction needs at least one digit after the dot
        if self.peek_byte_at(0) == Some(b'.') && matches!(self.peek_byte_at(1), Some(b'0'..=b'9')) {
            self.pos += 1;
            self.consume_digits();
        }
        self.make(TokenKind::Number, start)
    }

    fn consume_digits(&mut self) {
        while matches!(self.peek_byte_at(0), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
    }

    /// String literal: everything up to the matching quote, taken verbatim
    fn scan_string(&mut self, quote: char, start: usize) -> Result<Token, ScriptError> {
        let body = start + 1;
        match self.source[body..].find(quote) {
            Some(len) => {
                self.pos = body + len + 1;
                Ok(self.make(TokenKind::String, start))
            }
            None => Err(ScriptError::Lex {
                message: "unterminated string literal".into(),
                span: Span::new(start as u32, self.source.len() as u32),
            }),
        }
    }

    fn scan_identifier(&mut self, start: usize) -> Token {
        while matches!(self.peek_byte_at(0), Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')) {
            self.pos += 1;
        }
        let word = &self.source[start..self.pos];
        let kind = keyword_from_str(word).unwrap_or(TokenKind::Identifier);
        self.make(kind, start)
    }

    fn scan_punctuator(&mut self, c: char, start: usize) -> Result<Token, ScriptError> {
        let kind = match c {
            '=' => {
                if self.source[start..].starts_with("===") {
                    self.pos += 3;
                    TokenKind::EqEqEq
                } else if self.source[start..].starts_with("==") {
                    self.pos += 2;
                    TokenKind::EqEq
                } else {
                    self.pos += 1;
                    TokenKind::Eq
                }
            }
            '.' | ',' | '(' | ')' | '{' | '}' | ';' => {
                self.pos += 1;
                match c {
                    '.' => TokenKind::Dot,
                    ',' => TokenKind::Comma,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    _ => TokenKind::Semicolon,
                }
            }
            _ => {
                return Err(ScriptError::Lex {
                    message: format!("unexpected character {c:?}"),
                    span: Span::new(start as u32, (start + c.len_utf8()) as u32),
                });
            }
        };
        Ok(self.make(kind, start))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_token();
        if matches!(item, None | Some(Err(_))) {
            self.done = true;
        }
        item
    }
}
