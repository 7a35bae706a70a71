// Author: Dustin Pilgrim
// License: MIT

use crate::model::{MemberValue, Payload, Ref, Sequence, Struct, Value};
use crate::TorError;

fn type_error(expected: &str, value: &MemberValue, code: u32) -> TorError {
    TorError::TypeError {
        message: format!("Expected {}, got {}", expected, describe(value)),
        hint: None,
        code: Some(code),
    }
}

fn describe(value: &MemberValue) -> String {
    match value {
        MemberValue::Value(v) => match &v.payload {
            Payload::Float(n) => format!("float {:?}", n),
            Payload::Int(n) => format!("integer {}", n),
            Payload::Str(s) => format!("string '{}'", s),
        },
        other => other.kind().to_string(),
    }
}

impl TryFrom<MemberValue> for f64 {
    type Error = TorError;

    fn try_from(value: MemberValue) -> Result<Self, Self::Error> {
        match value.as_value().and_then(|v| v.payload.as_f64()) {
            Some(n) => Ok(n),
            None => Err(type_error("number", &value, 402)),
        }
    }
}

impl TryFrom<MemberValue> for f32 {
    type Error = TorError;

    fn try_from(value: MemberValue) -> Result<Self, Self::Error> {
        f64::try_from(value).map(|n| n as f32)
    }
}

impl TryFrom<MemberValue> for i64 {
    type Error = TorError;

    fn try_from(value: MemberValue) -> Result<Self, Self::Error> {
        match value.as_value().and_then(|v| v.payload.as_i64()) {
            Some(n) => Ok(n),
            None => Err(type_error("integer", &value, 403)),
        }
    }
}

impl TryFrom<MemberValue> for i32 {
    type Error = TorError;

    fn try_from(value: MemberValue) -> Result<Self, Self::Error> {
        let n = i64::try_from(value)?;
        i32::try_from(n).map_err(|_| TorError::TypeError {
            message: format!("Integer {} out of range for i32", n),
            hint: None,
            code: Some(407),
        })
    }
}

impl TryFrom<MemberValue> for u32 {
    type Error = TorError;

    fn try_from(value: MemberValue) -> Result<Self, Self::Error> {
        let n = i64::try_from(value)?;
        u32::try_from(n).map_err(|_| TorError::TypeError {
            message: format!("Integer {} out of range for u32", n),
            hint: None,
            code: Some(407),
        })
    }
}

impl TryFrom<MemberValue> for usize {
    type Error = TorError;

    fn try_from(value: MemberValue) -> Result<Self, Self::Error> {
        let n = i64::try_from(value)?;
        usize::try_from(n).map_err(|_| TorError::TypeError {
            message: format!("Integer {} out of range for usize", n),
            hint: None,
            code: Some(407),
        })
    }
}

impl TryFrom<MemberValue> for String {
    type Error = TorError;

    fn try_from(value: MemberValue) -> Result<Self, Self::Error> {
        match value {
            MemberValue::Value(Value { payload: Payload::Str(s), .. }) => Ok(s),
            other => Err(type_error("string", &other, 401)),
        }
    }
}

impl TryFrom<MemberValue> for Payload {
    type Error = TorError;

    fn try_from(value: MemberValue) -> Result<Self, Self::Error> {
        Value::try_from(value).map(|v| v.payload)
    }
}

impl TryFrom<MemberValue> for Value {
    type Error = TorError;

    fn try_from(value: MemberValue) -> Result<Self, Self::Error> {
        match value {
            MemberValue::Value(v) => Ok(v),
            other => Err(type_error("value", &other, 400)),
        }
    }
}

impl TryFrom<MemberValue> for Ref {
    type Error = TorError;

    fn try_from(value: MemberValue) -> Result<Self, Self::Error> {
        match value {
            MemberValue::Ref(r) => Ok(r),
            other => Err(type_error("ref", &other, 405)),
        }
    }
}

impl TryFrom<MemberValue> for Sequence {
    type Error = TorError;

    fn try_from(value: MemberValue) -> Result<Self, Self::Error> {
        match value {
            MemberValue::Sequence(s) => Ok(s),
            other => Err(type_error("sequence", &other, 408)),
        }
    }
}

impl TryFrom<MemberValue> for Struct {
    type Error = TorError;

    fn try_from(value: MemberValue) -> Result<Self, Self::Error> {
        match value {
            MemberValue::Struct(s) => Ok(s),
            other => Err(type_error("struct", &other, 409)),
        }
    }
}

/// Each element of a sequence converted to `T`.
impl<T> TryFrom<MemberValue> for Vec<T>
where
    T: TryFrom<MemberValue, Error = TorError>,
{
    type Error = TorError;

    fn try_from(value: MemberValue) -> Result<Self, Self::Error> {
        Sequence::try_from(value)?
            .iter()
            .cloned()
            .map(T::try_from)
            .collect()
    }
}
