use std::borrow::Cow;
use std::ops::Index;
use std::str::FromStr;

use serde::Serialize;

use super::{Members, TorMember};
use crate::ast::COMMENT_TYPE;
use crate::builder::ModelBuilder;
use crate::observer::NoopObserver;
use crate::parser::Parser;
use crate::torfile::ReadOptions;
use crate::utils::is_identifier;
use crate::TorError;

/// A named, typed entity such as `Primary_M1 reflector ( ... )`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TorObject {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    members: Members,
}

impl TorObject {
    /// Both `name` and `type_name` must match `[A-Za-z][A-Za-z0-9_]*`.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Result<Self, TorError> {
        let name = name.into();
        let type_name = type_name.into();
        check_identifier(&name, "object name")?;
        check_identifier(&type_name, "object type")?;
        Ok(Self::from_parts(name, type_name, Members::new()))
    }

    /// Caller guarantees the names already passed the grammar.
    pub(crate) fn from_parts(name: String, type_name: String, members: Members) -> Self {
        TorObject { name, type_name, members }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn set_type(&mut self, type_name: impl Into<String>) -> Result<(), TorError> {
        let type_name = type_name.into();
        check_identifier(&type_name, "object type")?;
        self.type_name = type_name;
        Ok(())
    }

    pub fn members(&self) -> &Members {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut Members {
        &mut self.members
    }

    pub fn member(&self, name: &str) -> Option<&TorMember> {
        self.members.get(name)
    }

    pub fn member_mut(&mut self, name: &str) -> Option<&mut TorMember> {
        self.members.get_mut(name)
    }

    pub fn insert(&mut self, member: TorMember) -> Option<TorMember> {
        self.members.insert(member)
    }

    /// Builder-style insert for constructing objects in code.
    pub fn with(mut self, member: TorMember) -> Self {
        self.members.insert(member);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<TorMember> {
        self.members.remove(name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TorMember> {
        self.members.iter()
    }
}

impl Index<&str> for TorObject {
    type Output = TorMember;

    fn index(&self, name: &str) -> &TorMember {
        &self.members[name]
    }
}

/// Parses a single object definition, e.g. `Feed gaussian_beam ( taper : -12.0 )`.
impl FromStr for TorObject {
    type Err = TorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let node = Parser::new(s)?.parse_single_object()?;
        let options = ReadOptions::default();
        let mut observer = NoopObserver;
        match ModelBuilder::new(&options, &mut observer).build_entity(node)? {
            Entity::Object(object) => Ok(object),
            Entity::Comment(_) => unreachable!(),
        }
    }
}

fn check_identifier(s: &str, what: &str) -> Result<(), TorError> {
    if is_identifier(s) {
        Ok(())
    } else {
        Err(TorError::TypeError {
            message: format!("Invalid {} '{}'", what, s),
            hint: Some("Names must match [A-Za-z][A-Za-z0-9_]*".into()),
            code: Some(411),
        })
    }
}

/// A block of consecutive `//` lines, kept so it can be written back in place.
///
/// Its name is `comment<offset>`, the character offset at which the block
/// started in the source. Two comments are equal when their lines are equal;
/// the offset only gives the block a stable, unique key.
#[derive(Debug, Clone, Serialize)]
pub struct TorComment {
    offset: usize,
    lines: Vec<String>,
}

impl TorComment {
    /// Lines missing the `//` prefix get one.
    pub fn new<I, S>(offset: usize, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines
            .into_iter()
            .map(|line| {
                let line = line.into();
                if line.starts_with("//") { line } else { format!("//{}", line) }
            })
            .collect();
        TorComment { offset, lines }
    }

    pub fn name(&self) -> String {
        format!("{}{}", COMMENT_TYPE, self.offset)
    }

    pub fn type_name(&self) -> &'static str {
        COMMENT_TYPE
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The lines without their `//` prefix.
    pub fn text(&self) -> Vec<&str> {
        self.lines
            .iter()
            .map(|l| l.strip_prefix("//").unwrap_or(l))
            .collect()
    }
}

impl PartialEq for TorComment {
    fn eq(&self, other: &Self) -> bool {
        self.lines == other.lines
    }
}

/// A top-level item of a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "entity", rename_all = "lowercase")]
pub enum Entity {
    Object(TorObject),
    Comment(TorComment),
}

impl Entity {
    /// Key of the entity in its file.
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Entity::Object(o) => Cow::Borrowed(o.name()),
            Entity::Comment(c) => Cow::Owned(c.name()),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Entity::Object(o) => o.type_name(),
            Entity::Comment(c) => c.type_name(),
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Entity::Comment(_))
    }

    pub fn as_object(&self) -> Option<&TorObject> {
        match self {
            Entity::Object(o) => Some(o),
            Entity::Comment(_) => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut TorObject> {
        match self {
            Entity::Object(o) => Some(o),
            Entity::Comment(_) => None,
        }
    }

    pub fn as_comment(&self) -> Option<&TorComment> {
        match self {
            Entity::Comment(c) => Some(c),
            Entity::Object(_) => None,
        }
    }
}

impl From<TorObject> for Entity {
    fn from(o: TorObject) -> Self {
        Entity::Object(o)
    }
}

impl From<TorComment> for Entity {
    fn from(c: TorComment) -> Self {
        Entity::Comment(c)
    }
}
