// Author: Dustin Pilgrim
// License: MIT

use std::str::Chars;
use crate::TorError;

mod scanner;
mod tokenizer;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- literals ---
    /// Bare token: a letter followed by letters, digits, `_`, `-` or `.`.
    Word(String),
    /// Double-quoted string, quotes stripped, contents kept verbatim.
    Quoted(String),
    Float(f64),
    Int(i64),

    // --- trivia that is kept ---
    /// A single `//` line, prefix included.
    Comment(String),

    // --- structure ---
    LParen,
    RParen,
    Colon,
    Comma,

    Eof,
}

/// Where a token starts. `offset` counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

pub struct Lexer<'a> {
    input: Chars<'a>,
    peek: Option<char>,
    offset: usize,
    line: usize,
    column: usize,
    start: Position,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer {
            input: input.chars(),
            peek: None,
            offset: 0,
            line: 1,
            column: 1,
            start: Position { offset: 0, line: 1, column: 1 },
        };
        lexer.peek = lexer.input.next();
        lexer
    }

    /// Position of the next unread character.
    pub fn position(&self) -> Position {
        Position {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    /// Position at which the most recently returned token started.
    pub fn token_start(&self) -> Position {
        self.start
    }

    pub fn next_token(&mut self) -> Result<Token, TorError> {
        tokenizer::next_token(self)
    }
}
