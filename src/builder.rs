use crate::ast::{RawBody, RawMember, RawNode, RawValue, COMMENT_TYPE};
use crate::model::{Entity, MemberValue, Members, Ref, Sequence, Struct, TorComment, TorMember, TorObject, Value};
use crate::observer::BuildObserver;
use crate::torfile::{DuplicatePolicy, ReadOptions, TorFile};
use crate::utils::comment_offset;
use crate::TorError;

/// Turns parser output into the typed graph in a single pass.
pub struct ModelBuilder<'a> {
    options: &'a ReadOptions,
    observer: &'a mut dyn BuildObserver,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(options: &'a ReadOptions, observer: &'a mut dyn BuildObserver) -> Self {
        ModelBuilder { options, observer }
    }

    pub fn build(&mut self, nodes: Vec<RawNode>) -> Result<TorFile, TorError> {
        let mut file = TorFile::new();

        for node in nodes {
            let offset = node.offset;
            let entity = self.build_entity(node)?;
            let name = entity.name().into_owned();

            match file.entity(&name) {
                // An object named like `comment<N>` against the block at offset N
                Some(existing) if existing.is_comment() != entity.is_comment() => {
                    return Err(comment_clash(&name, offset));
                }
                Some(_) => self.on_duplicate(&name, offset)?,
                None => {}
            }
            file.insert(entity);
        }

        Ok(file)
    }

    pub fn build_entity(&mut self, node: RawNode) -> Result<Entity, TorError> {
        match node.body {
            RawBody::Text(lines) => {
                if node.type_name != COMMENT_TYPE {
                    return Err(structural(format!(
                        "Text body on '{}' of type '{}'",
                        node.name, node.type_name
                    )));
                }
                let offset = comment_offset(&node.name).ok_or_else(|| {
                    structural(format!("Comment node name '{}' carries no offset", node.name))
                })?;

                let comment = TorComment::new(offset, lines);
                self.observer.comment(&comment);
                Ok(Entity::Comment(comment))
            }
            RawBody::Members(raw) => {
                let members = self.build_members(&node.name, raw)?;
                let object = TorObject::from_parts(node.name, node.type_name, members);
                self.observer.object(&object);
                Ok(Entity::Object(object))
            }
        }
    }

    fn build_members(&mut self, owner: &str, raw: Vec<RawMember>) -> Result<Members, TorError> {
        let mut members = Members::new();

        for item in raw {
            let path = format!("{}.{}", owner, item.name);
            let value = self.build_value(&path, item.value)?;
            let member = TorMember::new(item.name, value);

            if members.contains(member.name()) {
                self.on_duplicate(&path, item.offset)?;
            }
            self.observer.member(&path, &member);
            members.insert(member);
        }

        Ok(members)
    }

    fn build_value(&mut self, path: &str, raw: RawValue) -> Result<MemberValue, TorError> {
        let value = match raw {
            RawValue::Scalar { payload, unit } => MemberValue::Value(Value { payload, unit }),
            RawValue::Ref(target) => MemberValue::Ref(Ref::new(target)),
            RawValue::Sequence(items) => {
                let mut seq = Sequence::new();
                for (i, item) in items.into_iter().enumerate() {
                    seq.push(self.build_value(&format!("{}.{}", path, i), item)?);
                }
                MemberValue::Sequence(seq)
            }
            RawValue::Struct(raw) => MemberValue::Struct(Struct::from(self.build_members(path, raw)?)),
        };
        Ok(value)
    }

    fn on_duplicate(&mut self, name: &str, offset: usize) -> Result<(), TorError> {
        match self.options.duplicates {
            DuplicatePolicy::Reject => Err(TorError::NameCollision {
                name: name.to_string(),
                offset,
                hint: Some("Rename one definition or read with DuplicatePolicy::Replace".into()),
                code: Some(302),
            }),
            DuplicatePolicy::Replace => {
                self.observer.duplicate(name, offset);
                Ok(())
            }
        }
    }
}

fn comment_clash(name: &str, offset: usize) -> TorError {
    TorError::NameCollision {
        name: name.to_string(),
        offset,
        hint: Some(format!(
            "'{}' is also the key of the comment block at that offset; rename the object or move the comment",
            name
        )),
        code: Some(304),
    }
}

fn structural(message: String) -> TorError {
    TorError::StructuralError {
        message,
        hint: Some("The parse tree does not match what the model builder expects".into()),
        code: Some(301),
    }
}
