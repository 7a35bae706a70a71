// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::io::Read;
use std::ops::Index;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::builder::ModelBuilder;
use crate::model::{Entity, TorComment, TorObject};
use crate::observer::{BuildObserver, TracingObserver};
use crate::parser;
use crate::utils::is_identifier;
use crate::TorError;

mod access;
mod conversion;
mod validation;

pub use validation::NameIssue;

/// What to do when a name is defined twice in one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail the read with [`TorError::NameCollision`].
    #[default]
    Reject,
    /// Keep the first definition's position and the last definition's content.
    Replace,
}

/// Settings for reading Tor text.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Applies to top-level names and to member names within one object or struct.
    pub duplicates: DuplicatePolicy,
}

/// All objects and comment blocks of a `.tor` file, keyed by name, in file order.
#[derive(Debug, Clone, Default)]
pub struct TorFile {
    entities: IndexMap<String, Entity>,
}

impl TorFile {
    pub fn new() -> Self {
        TorFile { entities: IndexMap::new() }
    }

    /// Parse Tor text with default options, logging build events through `tracing`.
    ///
    /// # Example
    /// ```ignore
    /// let file = TorFile::parse("Feed gaussian_beam ( taper : -12.0 )")?;
    /// ```
    pub fn parse(input: &str) -> Result<Self, TorError> {
        Self::parse_with(input, &ReadOptions::default(), &mut TracingObserver)
    }

    /// Parse Tor text with explicit options and observer. Either the whole
    /// input is read or an error is returned; there are no partial results.
    pub fn parse_with(
        input: &str,
        options: &ReadOptions,
        observer: &mut dyn BuildObserver,
    ) -> Result<Self, TorError> {
        let mut parser = parser::Parser::new(input)?;
        let nodes = parser.parse_document()?;
        ModelBuilder::new(options, observer).build(nodes)
    }

    /// Read everything from `reader` and parse it.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, TorError> {
        let mut content = String::new();
        reader.read_to_string(&mut content).map_err(|e| TorError::FileError {
            message: format!("Failed to read input: {}", e),
            path: "<reader>".into(),
            hint: Some("Tor input must be valid UTF-8 text".into()),
            code: Some(501),
        })?;
        Self::parse(&content)
    }

    /// Load a `.tor` file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TorError> {
        Self::from_file_with_options(path, &ReadOptions::default(), &mut TracingObserver)
    }

    pub fn from_file_with_options<P: AsRef<Path>>(
        path: P,
        options: &ReadOptions,
        observer: &mut dyn BuildObserver,
    ) -> Result<Self, TorError> {
        let path_ref = path.as_ref();
        debug!(path = %path_ref.display(), "reading tor file");

        let content = fs::read_to_string(path_ref).map_err(|e| TorError::FileError {
            message: format!("Failed to read file: {}", e),
            path: path_ref.to_string_lossy().to_string(),
            hint: Some("Check that the file exists and is readable".into()),
            code: Some(502),
        })?;

        Self::parse_with(&content, options, observer)
    }

    /// Parse `reader` and append its entities to this file.
    ///
    /// Nothing is added unless the whole input parses. Names that already
    /// exist are overwritten in place, as with [`TorFile::insert`].
    pub fn read<R: Read>(&mut self, reader: R) -> Result<(), TorError> {
        let other = Self::from_reader(reader)?;
        self.extend(other.entities.into_values());
        Ok(())
    }

    /// Assign an entity under its own name. An existing entity of that name
    /// keeps its position and is returned.
    pub fn insert(&mut self, entity: impl Into<Entity>) -> Option<Entity> {
        let entity = entity.into();
        let name = entity.name().into_owned();
        self.entities.insert(name, entity)
    }

    pub fn insert_object(&mut self, object: TorObject) -> Option<Entity> {
        self.insert(Entity::Object(object))
    }

    /// The entity stored under `name`, object or comment block.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.get_mut(name)
    }

    /// The object called `name`; `None` for missing names and comment blocks.
    pub fn object(&self, name: &str) -> Option<&TorObject> {
        self.entities.get(name).and_then(Entity::as_object)
    }

    pub fn object_mut(&mut self, name: &str) -> Option<&mut TorObject> {
        self.entities.get_mut(name).and_then(Entity::as_object_mut)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Remove an entity, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Entity> {
        self.entities.shift_remove(name)
    }

    /// Rename an object without moving it. References to the old name are
    /// not touched.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), TorError> {
        if !is_identifier(new) {
            return Err(TorError::TypeError {
                message: format!("Invalid object name '{}'", new),
                hint: Some("Names must match [A-Za-z][A-Za-z0-9_]*".into()),
                code: Some(411),
            });
        }
        if self.entities.contains_key(new) {
            return Err(TorError::NameCollision {
                name: new.to_string(),
                offset: 0,
                hint: Some("Remove the existing entity first".into()),
                code: Some(303),
            });
        }
        match self.entities.get(old) {
            Some(Entity::Object(_)) => {}
            Some(Entity::Comment(_)) => {
                return Err(TorError::TypeError {
                    message: format!("'{}' is a comment block and cannot be renamed", old),
                    hint: None,
                    code: Some(412),
                });
            }
            None => {
                return Err(TorError::NotFound {
                    path: old.to_string(),
                    hint: Some("No entity with that name".into()),
                    code: Some(404),
                });
            }
        }

        if let Some((index, _, mut entity)) = self.entities.shift_remove_full(old) {
            if let Entity::Object(object) = &mut entity {
                object.set_name(new.to_string());
            }
            self.entities.shift_insert(index, new.to_string(), entity);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Values<'_, String, Entity> {
        self.entities.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn objects(&self) -> impl Iterator<Item = &TorObject> {
        self.entities.values().filter_map(Entity::as_object)
    }

    pub fn comments(&self) -> impl Iterator<Item = &TorComment> {
        self.entities.values().filter_map(Entity::as_comment)
    }
}

impl FromStr for TorFile {
    type Err = TorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TorFile::parse(s)
    }
}

impl Index<&str> for TorFile {
    type Output = Entity;

    fn index(&self, name: &str) -> &Entity {
        match self.entities.get(name) {
            Some(entity) => entity,
            None => panic!("no entity named '{}'", name),
        }
    }
}

impl<'a> IntoIterator for &'a TorFile {
    type Item = &'a Entity;
    type IntoIter = indexmap::map::Values<'a, String, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.values()
    }
}

impl Extend<Entity> for TorFile {
    fn extend<I: IntoIterator<Item = Entity>>(&mut self, iter: I) {
        for entity in iter {
            self.insert(entity);
        }
    }
}

impl FromIterator<Entity> for TorFile {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        let mut file = TorFile::new();
        file.extend(iter);
        file
    }
}

/// Files are equal when they hold equal entities in the same order. Comment
/// offsets do not take part, so a file equals its re-read serialization.
impl PartialEq for TorFile {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl Serialize for TorFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entities.values())
    }
}

#[cfg(test)]
mod tests;
