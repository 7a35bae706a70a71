use crate::model::Payload;

/// Type name given to the synthetic nodes that carry `//` comment blocks.
pub const COMMENT_TYPE: &str = "comment";

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A string or number, with the unit token that followed a number.
    Scalar { payload: Payload, unit: Option<String> },
    Ref(String),
    Sequence(Vec<RawValue>),
    Struct(Vec<RawMember>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawMember {
    pub name: String,
    pub offset: usize,
    pub value: RawValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    Members(Vec<RawMember>),
    /// Comment lines, `//` prefix included.
    Text(Vec<String>),
}

/// One top-level unit as produced by the parser, before typing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub name: String,
    pub type_name: String,
    pub offset: usize,
    pub body: RawBody,
}

impl RawNode {
    pub fn comment_block(offset: usize, lines: Vec<String>) -> Self {
        RawNode {
            name: format!("{}{}", COMMENT_TYPE, offset),
            type_name: COMMENT_TYPE.to_string(),
            offset,
            body: RawBody::Text(lines),
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.body, RawBody::Text(_))
    }
}
