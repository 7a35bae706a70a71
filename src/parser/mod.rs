// Author: Dustin Pilgrim
// License: MIT

use crate::lexer::{Lexer, Position, Token};
use crate::TorError;
use crate::ast::{RawMember, RawNode, RawValue};
use crate::utils::is_identifier;

mod document;
mod value;

/// Deepest `struct(`/`sequence(` nesting accepted inside one value.
pub const MAX_NESTING: usize = 128;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peek: Option<Token>,
    peek_pos: Position,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Result<Self, TorError> {
        let mut lexer = Lexer::new(input);
        let peek = Some(lexer.next_token()?);
        let peek_pos = lexer.token_start();
        Ok(Self { lexer, peek, peek_pos, depth: 0 })
    }

    pub(crate) fn bump(&mut self) -> Result<Token, TorError> {
        let curr = self.peek.take().ok_or(TorError::UnexpectedEof {
            message: "Unexpected end of input".into(),
            offset: self.peek_pos.offset,
            line: self.peek_pos.line,
            column: self.peek_pos.column,
            hint: None,
            code: Some(201),
        })?;
        self.peek = Some(self.lexer.next_token()?);
        self.peek_pos = self.lexer.token_start();
        Ok(curr)
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.peek.as_ref()
    }

    /// Start position of the token returned by `peek`.
    pub(crate) fn position(&self) -> Position {
        self.peek_pos
    }

    pub(crate) fn expect(&mut self, expected: Token, what: &str) -> Result<Token, TorError> {
        let pos = self.position();
        let token = self.bump()?;
        if token != expected {
            return Err(unexpected(&token, pos, what));
        }
        Ok(token)
    }

    /// Consume a word that must be an identifier (`[A-Za-z][A-Za-z0-9_]*`).
    pub(crate) fn expect_identifier(&mut self, what: &str) -> Result<String, TorError> {
        let pos = self.position();
        match self.bump()? {
            Token::Word(word) if is_identifier(&word) => Ok(word),
            Token::Word(word) => Err(TorError::InvalidToken {
                token: word,
                offset: pos.offset,
                line: pos.line,
                column: pos.column,
                hint: Some(format!("Expected {}; identifiers may only contain letters, digits and '_'", what)),
                code: Some(203),
            }),
            other => Err(unexpected(&other, pos, what)),
        }
    }

    /// Step into a compound value that starts at `pos`.
    pub(crate) fn enter(&mut self, pos: Position) -> Result<(), TorError> {
        if self.depth >= MAX_NESTING {
            return Err(TorError::SyntaxError {
                message: format!("Values nested deeper than {} levels", MAX_NESTING),
                offset: pos.offset,
                line: pos.line,
                column: pos.column,
                hint: Some("Flatten the struct or sequence".into()),
                code: Some(207),
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Parse a whole file: one or more objects or comment blocks, then end of input.
    pub fn parse_document(&mut self) -> Result<Vec<RawNode>, TorError> {
        document::parse_document(self)
    }

    /// Parse exactly one object definition and nothing else.
    pub fn parse_single_object(&mut self) -> Result<RawNode, TorError> {
        let node = document::parse_object(self)?;
        self.expect(Token::Eof, "end of input after object")?;
        Ok(node)
    }

    /// Parse a lone value such as `struct(x: 1.0 mm)`.
    pub fn parse_single_value(&mut self) -> Result<RawValue, TorError> {
        let value = value::parse_value(self)?;
        self.expect(Token::Eof, "end of input after value")?;
        Ok(value)
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Word(w) => format!("'{}'", w),
        Token::Quoted(s) => format!("\"{}\"", s),
        Token::Float(n) => format!("{:?}", n),
        Token::Int(n) => n.to_string(),
        Token::Comment(_) => "a comment".into(),
        Token::LParen => "'('".into(),
        Token::RParen => "')'".into(),
        Token::Colon => "':'".into(),
        Token::Comma => "','".into(),
        Token::Eof => "end of input".into(),
    }
}

pub(crate) fn unexpected(token: &Token, pos: Position, expected: &str) -> TorError {
    if *token == Token::Eof {
        return TorError::UnexpectedEof {
            message: format!("Expected {}", expected),
            offset: pos.offset,
            line: pos.line,
            column: pos.column,
            hint: Some("Check for unbalanced parentheses".into()),
            code: Some(201),
        };
    }
    TorError::SyntaxError {
        message: format!("Expected {}, got {}", expected, describe(token)),
        offset: pos.offset,
        line: pos.line,
        column: pos.column,
        hint: None,
        code: Some(202),
    }
}
