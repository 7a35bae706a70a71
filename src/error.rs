// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

/// The main error type for Tor lexing, parsing and object-model access.
#[derive(Debug, Clone, PartialEq)]
pub enum TorError {
    SyntaxError {
        message: String,
        offset: usize,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    InvalidToken {
        token: String,
        offset: usize,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    UnexpectedEof {
        message: String,
        offset: usize,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a quoted string is not closed on the line it opens.
    UnclosedString {
        quote: char,
        offset: usize,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised for characters that cannot start any token.
    UnexpectedCharacter {
        character: char,
        offset: usize,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// The parse tree does not have the shape the model builder expects.
    StructuralError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Two entities (or two members of one object) share a name.
    NameCollision {
        name: String,
        offset: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    TypeError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    NotFound {
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    FileError {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

impl TorError {
    /// Character offset into the source for errors raised while reading text.
    pub fn offset(&self) -> Option<usize> {
        match self {
            TorError::SyntaxError { offset, .. }
            | TorError::InvalidToken { offset, .. }
            | TorError::UnexpectedEof { offset, .. }
            | TorError::UnclosedString { offset, .. }
            | TorError::UnexpectedCharacter { offset, .. }
            | TorError::NameCollision { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<u32> {
        match self {
            TorError::SyntaxError { code, .. }
            | TorError::InvalidToken { code, .. }
            | TorError::UnexpectedEof { code, .. }
            | TorError::UnclosedString { code, .. }
            | TorError::UnexpectedCharacter { code, .. }
            | TorError::StructuralError { code, .. }
            | TorError::NameCollision { code, .. }
            | TorError::TypeError { code, .. }
            | TorError::NotFound { code, .. }
            | TorError::FileError { code, .. } => *code,
        }
    }
}

fn suffix(hint: &Option<String>, code: &Option<u32>) -> String {
    format!(
        "{}{}",
        hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
        code.map_or(String::new(), |c| format!(" Code: {}", c))
    )
}

impl fmt::Display for TorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TorError::SyntaxError { message, offset, line, column, hint, code } =>
                write!(f, "[TOR] Syntax Error at {}:{} (offset {}): {}{}",
                    line, column, offset, message, suffix(hint, code)),
            TorError::InvalidToken { token, offset, line, column, hint, code } =>
                write!(f, "[TOR] Invalid Token '{}' at {}:{} (offset {}){}",
                    token, line, column, offset, suffix(hint, code)),
            TorError::UnexpectedEof { message, offset, line, column, hint, code } =>
                write!(f, "[TOR] Unexpected EOF at {}:{} (offset {}): {}{}",
                    line, column, offset, message, suffix(hint, code)),
            TorError::UnclosedString { quote, offset, line, column, hint, code } =>
                write!(f, "[TOR] Unclosed string starting with '{}' at {}:{} (offset {}){}",
                    quote, line, column, offset, suffix(hint, code)),
            TorError::UnexpectedCharacter { character, offset, line, column, hint, code } =>
                write!(f, "[TOR] Unexpected character '{}' at {}:{} (offset {}){}",
                    character, line, column, offset, suffix(hint, code)),
            TorError::StructuralError { message, hint, code } =>
                write!(f, "[TOR] Structural Error: {}{}", message, suffix(hint, code)),
            TorError::NameCollision { name, offset, hint, code } =>
                write!(f, "[TOR] Name '{}' defined twice (offset {}){}",
                    name, offset, suffix(hint, code)),
            TorError::TypeError { message, hint, code } =>
                write!(f, "[TOR] Type Error: {}{}", message, suffix(hint, code)),
            TorError::NotFound { path, hint, code } =>
                write!(f, "[TOR] Path '{}' not found{}", path, suffix(hint, code)),
            TorError::FileError { message, path, hint, code } =>
                write!(f, "[TOR] File Error '{}': {}{}", path, message, suffix(hint, code)),
        }
    }
}

impl std::error::Error for TorError {}
