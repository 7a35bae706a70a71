use super::*;
use super::scanner::{bump, peek_second, skip_whitespace, take_digits};

pub(super) fn next_token(lexer: &mut Lexer) -> Result<Token, TorError> {
    skip_whitespace(lexer);
    lexer.start = lexer.position();

    match lexer.peek {
        Some('(') => tokenize_symbol(lexer, Token::LParen),
        Some(')') => tokenize_symbol(lexer, Token::RParen),
        Some(':') => tokenize_symbol(lexer, Token::Colon),
        Some(',') => tokenize_symbol(lexer, Token::Comma),
        Some('/') if peek_second(lexer) == Some('/') => tokenize_comment(lexer),
        Some('"') => tokenize_quoted(lexer),
        Some(c) if starts_number(lexer, c) => tokenize_number(lexer),
        Some(c) if c.is_ascii_alphabetic() => tokenize_word(lexer),
        Some(ch) => tokenize_unexpected_char(lexer, ch),
        None => Ok(Token::Eof),
    }
}

fn starts_number(lexer: &Lexer, c: char) -> bool {
    match c {
        '0'..='9' => true,
        '.' => peek_second(lexer).is_some_and(|d| d.is_ascii_digit()),
        '+' | '-' => {
            let mut rest = lexer.input.clone();
            match rest.next() {
                Some(d) if d.is_ascii_digit() => true,
                Some('.') => rest.next().is_some_and(|d| d.is_ascii_digit()),
                _ => false,
            }
        }
        _ => false,
    }
}

fn tokenize_symbol(lexer: &mut Lexer, token: Token) -> Result<Token, TorError> {
    bump(lexer);
    Ok(token)
}

fn tokenize_comment(lexer: &mut Lexer) -> Result<Token, TorError> {
    let mut text = String::new();
    while let Some(ch) = lexer.peek {
        if ch == '\n' {
            break;
        }
        text.push(ch);
        bump(lexer);
    }
    if text.ends_with('\r') {
        text.pop();
    }
    Ok(Token::Comment(text))
}

fn tokenize_quoted(lexer: &mut Lexer) -> Result<Token, TorError> {
    let start = lexer.start;
    let quote = bump(lexer).unwrap_or('"');
    let mut content = String::new();

    let unclosed = |hint: &str| TorError::UnclosedString {
        quote,
        offset: start.offset,
        line: start.line,
        column: start.column,
        hint: Some(hint.into()),
        code: Some(103),
    };

    loop {
        match lexer.peek {
            Some(ch) if ch == quote => {
                bump(lexer);
                return Ok(Token::Quoted(content));
            }
            Some('\\') => {
                // Escapes are kept as written; only the escaped quote matters here.
                bump(lexer);
                match lexer.peek {
                    Some('\n') | None => return Err(unclosed("Trailing backslash in string")),
                    Some(next_ch) => {
                        content.push('\\');
                        content.push(next_ch);
                        bump(lexer);
                    }
                }
            }
            Some('\n') | Some('\r') | None => {
                return Err(unclosed("String literal not closed before end of line"));
            }
            Some(ch) => {
                content.push(ch);
                bump(lexer);
            }
        }
    }
}

fn tokenize_number(lexer: &mut Lexer) -> Result<Token, TorError> {
    let start = lexer.start;
    let mut num = String::new();
    let mut is_float = false;

    if let Some(sign @ ('+' | '-')) = lexer.peek {
        num.push(sign);
        bump(lexer);
    }

    take_digits(lexer, &mut num);

    if lexer.peek == Some('.') {
        is_float = true;
        num.push('.');
        bump(lexer);
        take_digits(lexer, &mut num);
    }

    if matches!(lexer.peek, Some('e' | 'E')) && exponent_follows(lexer) {
        is_float = true;
        num.push('e');
        bump(lexer);
        if let Some(sign @ ('+' | '-')) = lexer.peek {
            num.push(sign);
            bump(lexer);
        }
        take_digits(lexer, &mut num);
    }

    let invalid = |hint: &str| TorError::InvalidToken {
        token: num.clone(),
        offset: start.offset,
        line: start.line,
        column: start.column,
        hint: Some(hint.into()),
        code: Some(102),
    };

    if !is_float {
        if let Ok(n) = num.parse::<i64>() {
            return Ok(Token::Int(n));
        }
        // Out of i64 range: keep the magnitude as a float
    }

    match num.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Token::Float(n)),
        Ok(_) => Err(invalid("Numeric literal out of range for a 64-bit float")),
        Err(_) => Err(invalid("Malformed numeric literal")),
    }
}

/// `e` only starts an exponent when digits follow, so `1emm` stays `1` + `emm`.
fn exponent_follows(lexer: &Lexer) -> bool {
    let mut rest = lexer.input.clone();
    match rest.next() {
        Some(d) if d.is_ascii_digit() => true,
        Some('+' | '-') => rest.next().is_some_and(|d| d.is_ascii_digit()),
        _ => false,
    }
}

fn tokenize_word(lexer: &mut Lexer) -> Result<Token, TorError> {
    let mut word = String::new();

    while let Some(ch) = lexer.peek {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || ch == '.' {
            word.push(ch);
            bump(lexer);
        } else {
            break;
        }
    }

    Ok(Token::Word(word))
}

fn tokenize_unexpected_char(lexer: &mut Lexer, ch: char) -> Result<Token, TorError> {
    let start = lexer.start;
    bump(lexer);
    Err(TorError::UnexpectedCharacter {
        character: ch,
        offset: start.offset,
        line: start.line,
        column: start.column,
        hint: Some("Unexpected character in input".into()),
        code: Some(104),
    })
}
