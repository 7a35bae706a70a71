use std::ops::{Deref, DerefMut, Index};

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::{MemberKind, MemberValue, Payload, Ref, Sequence, Value};
use crate::TorError;

/// A named value inside an object or struct.
///
/// The kind (`value`, `ref`, `sequence`, `struct`) is fixed when the member is
/// created. Mutators keep it that way: they edit the payload in place or fail
/// with [`TorError::TypeError`] rather than swap in a different kind.
#[derive(Debug, Clone, PartialEq)]
pub struct TorMember {
    name: String,
    value: MemberValue,
}

impl TorMember {
    pub fn new(name: impl Into<String>, value: impl Into<MemberValue>) -> Self {
        TorMember {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.value.kind()
    }

    pub fn value(&self) -> &MemberValue {
        &self.value
    }

    pub fn into_value(self) -> MemberValue {
        self.value
    }

    /// Payload of a `value` member; `None` for the compound kinds.
    pub fn scalar(&self) -> Option<&Payload> {
        self.value.as_value().map(|v| &v.payload)
    }

    pub fn unit(&self) -> Option<&str> {
        self.value.as_value().and_then(Value::unit)
    }

    pub fn as_value(&self) -> Option<&Value> {
        self.value.as_value()
    }

    pub fn as_reference(&self) -> Option<&Ref> {
        self.value.as_reference()
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        self.value.as_sequence()
    }

    pub fn as_struct(&self) -> Option<&Struct> {
        self.value.as_struct()
    }

    pub fn as_value_mut(&mut self) -> Option<&mut Value> {
        self.value.as_value_mut()
    }

    pub fn as_reference_mut(&mut self) -> Option<&mut Ref> {
        self.value.as_reference_mut()
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        self.value.as_sequence_mut()
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut Struct> {
        self.value.as_struct_mut()
    }

    /// Member of a `struct`-kind member, by name.
    pub fn get(&self, key: &str) -> Option<&TorMember> {
        self.as_struct().and_then(|s| s.get(key))
    }

    /// Overwrite the payload of a `value` member. The unit is left alone.
    pub fn set_scalar(&mut self, payload: impl Into<Payload>) -> Result<(), TorError> {
        if let Some(v) = self.value.as_value_mut() {
            v.payload = payload.into();
            return Ok(());
        }
        Err(self.kind_error(self.kind(), MemberKind::Value))
    }

    /// Set or clear (`None` or `""`) the unit of a `value` member.
    pub fn set_unit(&mut self, unit: Option<&str>) -> Result<(), TorError> {
        if let Some(v) = self.value.as_value_mut() {
            v.unit = unit.filter(|u| !u.is_empty()).map(str::to_string);
            return Ok(());
        }
        Err(self.kind_error(self.kind(), MemberKind::Value))
    }

    /// Swap in a new value of the same kind, returning the old one.
    pub fn replace(&mut self, value: impl Into<MemberValue>) -> Result<MemberValue, TorError> {
        let value = value.into();
        if value.kind() != self.kind() {
            return Err(self.kind_error(self.kind(), value.kind()));
        }
        Ok(std::mem::replace(&mut self.value, value))
    }

    fn kind_error(&self, actual: MemberKind, wanted: MemberKind) -> TorError {
        TorError::TypeError {
            message: format!(
                "Member '{}' holds a {} and cannot take a {}",
                self.name, actual, wanted
            ),
            hint: Some("A member keeps the kind it was created with".into()),
            code: Some(410),
        }
    }
}

/// Name-keyed members in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Members(IndexMap<String, TorMember>);

impl Members {
    pub fn new() -> Self {
        Members(IndexMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TorMember> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TorMember> {
        self.0.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Insert under the member's own name. An existing member of that name is
    /// replaced in place and returned.
    pub fn insert(&mut self, member: TorMember) -> Option<TorMember> {
        self.0.insert(member.name.clone(), member)
    }

    /// Remove a member, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<TorMember> {
        self.0.shift_remove(name)
    }

    pub fn iter(&self) -> indexmap::map::Values<'_, String, TorMember> {
        self.0.values()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::ValuesMut<'_, String, TorMember> {
        self.0.values_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Index<&str> for Members {
    type Output = TorMember;

    fn index(&self, name: &str) -> &TorMember {
        match self.0.get(name) {
            Some(member) => member,
            None => panic!("no member named '{}'", name),
        }
    }
}

impl<'a> IntoIterator for &'a Members {
    type Item = &'a TorMember;
    type IntoIter = indexmap::map::Values<'a, String, TorMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.values()
    }
}

impl FromIterator<TorMember> for Members {
    fn from_iter<I: IntoIterator<Item = TorMember>>(iter: I) -> Self {
        let mut members = Members::new();
        for member in iter {
            members.insert(member);
        }
        members
    }
}

/// Order counts: the same members listed differently are not equal.
impl PartialEq for Members {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.values().zip(other.0.values()).all(|(a, b)| a == b)
    }
}

impl Serialize for Members {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, member)| (name, &member.value)))
    }
}

/// Anonymous member list: `struct(x: 0.0 mm, y: 0.0 mm)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Struct(Members);

impl Struct {
    pub fn new() -> Self {
        Struct(Members::new())
    }

    pub fn members(&self) -> &Members {
        &self.0
    }

    pub fn into_members(self) -> Members {
        self.0
    }
}

impl From<Members> for Struct {
    fn from(members: Members) -> Self {
        Struct(members)
    }
}

impl FromIterator<TorMember> for Struct {
    fn from_iter<I: IntoIterator<Item = TorMember>>(iter: I) -> Self {
        Struct(iter.into_iter().collect())
    }
}

impl Deref for Struct {
    type Target = Members;

    fn deref(&self) -> &Members {
        &self.0
    }
}

impl DerefMut for Struct {
    fn deref_mut(&mut self) -> &mut Members {
        &mut self.0
    }
}

impl Index<&str> for Struct {
    type Output = TorMember;

    fn index(&self, name: &str) -> &TorMember {
        &self.0[name]
    }
}
