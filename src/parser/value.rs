use super::*;
use crate::model::Payload;

/// `member ("," member)*`, possibly empty when the list is closed right away.
pub(super) fn parse_member_list(parser: &mut Parser) -> Result<Vec<RawMember>, TorError> {
    let mut members = Vec::new();

    if let Some(Token::RParen) = parser.peek() {
        return Ok(members);
    }

    loop {
        members.push(parse_member(parser)?);
        match parser.peek() {
            Some(Token::Comma) => {
                parser.bump()?;
            }
            _ => break,
        }
    }

    Ok(members)
}

fn parse_member(parser: &mut Parser) -> Result<RawMember, TorError> {
    let start = parser.position();
    let name = parser.expect_identifier("member name")?;
    parser.expect(Token::Colon, "':' after member name")?;
    let value = parse_value(parser)?;

    Ok(RawMember {
        name,
        offset: start.offset,
        value,
    })
}

pub(super) fn parse_value(parser: &mut Parser) -> Result<RawValue, TorError> {
    match parser.peek() {
        Some(Token::Word(_)) => parse_word_value(parser),
        Some(Token::Quoted(_)) => parse_quoted_value(parser),
        Some(Token::Float(_)) | Some(Token::Int(_)) => parse_number_value(parser),
        _ => {
            let pos = parser.position();
            let token = parser.bump()?;
            Err(unexpected(&token, pos, "a value"))
        }
    }
}

/// Keywords only introduce a compound value when a `(` follows; otherwise
/// the word is an ordinary bare string.
fn parse_word_value(parser: &mut Parser) -> Result<RawValue, TorError> {
    let start = parser.position();
    let word = if let Token::Word(w) = parser.bump()? {
        w
    } else {
        unreachable!()
    };

    if let Some(Token::LParen) = parser.peek() {
        match word.as_str() {
            "sequence" => return parse_nested(parser, start, parse_sequence_body),
            "ref" => return parse_ref_body(parser),
            "struct" => return parse_nested(parser, start, parse_struct_body),
            _ => {}
        }
    }

    Ok(RawValue::Scalar {
        payload: Payload::Str(word),
        unit: None,
    })
}

fn parse_nested(
    parser: &mut Parser,
    start: Position,
    body: fn(&mut Parser) -> Result<RawValue, TorError>,
) -> Result<RawValue, TorError> {
    parser.enter(start)?;
    let value = body(parser);
    parser.leave();
    value
}

fn parse_quoted_value(parser: &mut Parser) -> Result<RawValue, TorError> {
    if let Token::Quoted(s) = parser.bump()? {
        Ok(RawValue::Scalar {
            payload: Payload::Str(s),
            unit: None,
        })
    } else {
        unreachable!()
    }
}

fn parse_number_value(parser: &mut Parser) -> Result<RawValue, TorError> {
    let payload = match parser.bump()? {
        Token::Float(n) => Payload::Float(n),
        Token::Int(n) => Payload::Int(n),
        _ => unreachable!(),
    };

    let unit = if let Some(Token::Word(_)) = parser.peek() {
        Some(parser.expect_identifier("unit after number")?)
    } else {
        None
    };

    Ok(RawValue::Scalar { payload, unit })
}

fn parse_sequence_body(parser: &mut Parser) -> Result<RawValue, TorError> {
    parser.bump()?; // consume (
    let mut items = Vec::new();

    if let Some(Token::RParen) = parser.peek() {
        parser.bump()?;
        return Ok(RawValue::Sequence(items));
    }

    loop {
        items.push(parse_value(parser)?);
        match parser.peek() {
            Some(Token::Comma) => {
                parser.bump()?;
            }
            _ => break,
        }
    }

    parser.expect(Token::RParen, "',' or ')' in sequence")?;
    Ok(RawValue::Sequence(items))
}

fn parse_ref_body(parser: &mut Parser) -> Result<RawValue, TorError> {
    parser.bump()?; // consume (
    let target = parser.expect_identifier("name of the referenced object")?;
    parser.expect(Token::RParen, "')' closing ref")?;
    Ok(RawValue::Ref(target))
}

fn parse_struct_body(parser: &mut Parser) -> Result<RawValue, TorError> {
    parser.bump()?; // consume (
    let members = parse_member_list(parser)?;
    parser.expect(Token::RParen, "',' or ')' in struct")?;
    Ok(RawValue::Struct(members))
}
