use super::*;
use crate::ast::RawBody;

pub(super) fn parse_document(parser: &mut Parser) -> Result<Vec<RawNode>, TorError> {
    let mut nodes = Vec::new();

    while let Some(tok) = parser.peek() {
        match tok {
            Token::Eof => {
                break;
            }
            Token::Comment(_) => {
                nodes.push(parse_comment_block(parser)?);
            }
            Token::Word(_) => {
                nodes.push(parse_object(parser)?);
            }
            _ => {
                return Err(TorError::SyntaxError {
                    message: format!("Expected object or comment, got {}", describe(tok)),
                    offset: parser.position().offset,
                    line: parser.position().line,
                    column: parser.position().column,
                    hint: Some("Only objects and // comments may appear at top level".into()),
                    code: Some(205),
                });
            }
        }
    }

    if nodes.is_empty() {
        let pos = parser.position();
        return Err(TorError::UnexpectedEof {
            message: "Expected at least one object".into(),
            offset: pos.offset,
            line: pos.line,
            column: pos.column,
            hint: Some("A .tor file holds one or more objects".into()),
            code: Some(206),
        });
    }

    Ok(nodes)
}

/// Consecutive `//` lines collapse into one node named after the first line's offset.
fn parse_comment_block(parser: &mut Parser) -> Result<RawNode, TorError> {
    let start = parser.position();
    let mut lines = Vec::new();

    while let Some(Token::Comment(_)) = parser.peek() {
        if let Token::Comment(line) = parser.bump()? {
            lines.push(line);
        }
    }

    Ok(RawNode::comment_block(start.offset, lines))
}

pub(super) fn parse_object(parser: &mut Parser) -> Result<RawNode, TorError> {
    let start = parser.position();
    let name = parser.expect_identifier("object name")?;
    let type_name = parser.expect_identifier("object type")?;

    parser.expect(Token::LParen, "'(' after object type")?;
    let members = value::parse_member_list(parser)?;
    parser.expect(Token::RParen, "',' or ')' in object body")?;

    Ok(RawNode {
        name,
        type_name,
        offset: start.offset,
        body: RawBody::Members(members),
    })
}
