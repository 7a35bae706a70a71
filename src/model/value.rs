use std::fmt;
use std::ops::Index;

use serde::Serialize;

use super::Struct;

/// The literal carried by a scalar: whatever the grammar matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Float(f64),
    Int(i64),
    Str(String),
}

impl Payload {
    /// Numeric view of the payload; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Payload::Float(n) => Some(*n),
            Payload::Int(n) => Some(*n as f64),
            Payload::Str(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Payload::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Payload::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Payload::Str(_))
    }
}

impl From<f64> for Payload {
    fn from(n: f64) -> Self {
        Payload::Float(n)
    }
}

impl From<i64> for Payload {
    fn from(n: i64) -> Self {
        Payload::Int(n)
    }
}

impl From<i32> for Payload {
    fn from(n: i32) -> Self {
        Payload::Int(n as i64)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Str(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Str(s)
    }
}

/// A scalar with an optional unit, e.g. `175.0 mm` or `-1.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Value {
    pub payload: Payload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Value {
    pub fn new(payload: impl Into<Payload>) -> Self {
        Value {
            payload: payload.into(),
            unit: None,
        }
    }

    /// An empty unit is stored as no unit at all.
    pub fn with_unit(payload: impl Into<Payload>, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        Value {
            payload: payload.into(),
            unit: if unit.is_empty() { None } else { Some(unit) },
        }
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }
}

/// A reference to another entity by name. Never resolved at construction:
/// the target may be defined later, in another file, or nowhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Ref {
    #[serde(rename = "ref")]
    pub target: String,
}

impl Ref {
    pub fn new(target: impl Into<String>) -> Self {
        Ref { target: target.into() }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Ordered list of values; duplicates and order are both significant.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Sequence(Vec<MemberValue>);

impl Sequence {
    pub fn new() -> Self {
        Sequence(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MemberValue> {
        self.0.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut MemberValue> {
        self.0.get_mut(index)
    }

    pub fn push(&mut self, value: impl Into<MemberValue>) {
        self.0.push(value.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemberValue> {
        self.0.iter()
    }

    /// The scalar elements, skipping any `ref`/`struct`/`sequence` entries.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().filter_map(MemberValue::as_value)
    }
}

impl Index<usize> for Sequence {
    type Output = MemberValue;

    fn index(&self, index: usize) -> &MemberValue {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a MemberValue;
    type IntoIter = std::slice::Iter<'a, MemberValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<V: Into<MemberValue>> FromIterator<V> for Sequence {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Sequence(iter.into_iter().map(Into::into).collect())
    }
}

/// Which of the four value forms a member holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Value,
    Ref,
    Sequence,
    Struct,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Value => "value",
            MemberKind::Ref => "ref",
            MemberKind::Sequence => "sequence",
            MemberKind::Struct => "struct",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MemberValue {
    Value(Value),
    Ref(Ref),
    Sequence(Sequence),
    Struct(Struct),
}

impl MemberValue {
    pub fn kind(&self) -> MemberKind {
        match self {
            MemberValue::Value(_) => MemberKind::Value,
            MemberValue::Ref(_) => MemberKind::Ref,
            MemberValue::Sequence(_) => MemberKind::Sequence,
            MemberValue::Struct(_) => MemberKind::Struct,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            MemberValue::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Ref> {
        match self {
            MemberValue::Ref(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            MemberValue::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            MemberValue::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_value_mut(&mut self) -> Option<&mut Value> {
        match self {
            MemberValue::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_reference_mut(&mut self) -> Option<&mut Ref> {
        match self {
            MemberValue::Ref(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            MemberValue::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut Struct> {
        match self {
            MemberValue::Struct(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Value> for MemberValue {
    fn from(v: Value) -> Self {
        MemberValue::Value(v)
    }
}

impl From<Ref> for MemberValue {
    fn from(r: Ref) -> Self {
        MemberValue::Ref(r)
    }
}

impl From<Sequence> for MemberValue {
    fn from(s: Sequence) -> Self {
        MemberValue::Sequence(s)
    }
}

impl From<Struct> for MemberValue {
    fn from(s: Struct) -> Self {
        MemberValue::Struct(s)
    }
}

impl From<Payload> for MemberValue {
    fn from(p: Payload) -> Self {
        MemberValue::Value(Value::new(p))
    }
}

impl From<f64> for MemberValue {
    fn from(n: f64) -> Self {
        MemberValue::Value(Value::new(n))
    }
}
