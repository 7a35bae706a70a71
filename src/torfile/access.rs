use super::*;
use crate::model::{MemberValue, Payload, TorMember};

impl TorFile {
    /// Get a typed value using dot notation: `Object.member.sub_member`.
    /// Numeric segments index into sequences.
    ///
    /// # Examples
    /// ```ignore
    /// let radius: f64 = file.get("Primary_M1.centre_hole_radius")?;
    /// let z: f64 = file.get("Secondary_coor.origin.z")?;
    /// let first: f64 = file.get("Frequencies.frequency_list.0")?;
    /// let freqs: Vec<f64> = file.get("Frequencies.frequency_list")?;
    /// ```
    ///
    /// # Errors
    /// Returns error if path doesn't exist or value can't be converted to type T.
    pub fn get<T>(&self, path: &str) -> Result<T, TorError>
    where
        T: TryFrom<MemberValue, Error = TorError>,
    {
        let value = self.get_value(path)?;
        T::try_from(value).map_err(|e| match e {
            TorError::TypeError { message, hint, code } => TorError::TypeError {
                message: format!("{} at '{}'", message, path),
                hint,
                code,
            },
            other => other,
        })
    }

    /// Like [`TorFile::get`], but a missing path is `Ok(None)`.
    pub fn get_optional<T>(&self, path: &str) -> Result<Option<T>, TorError>
    where
        T: TryFrom<MemberValue, Error = TorError>,
    {
        match self.get(path) {
            Ok(value) => Ok(Some(value)),
            Err(TorError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get a value with a fallback default.
    pub fn get_or<T>(&self, path: &str, default: T) -> T
    where
        T: TryFrom<MemberValue, Error = TorError>,
    {
        self.get(path).unwrap_or(default)
    }

    /// An owned copy of the value at `path`.
    pub fn get_value(&self, path: &str) -> Result<MemberValue, TorError> {
        self.value_at(path).cloned()
    }

    /// Borrow the value at `path`.
    pub fn value_at(&self, path: &str) -> Result<&MemberValue, TorError> {
        let segs: Vec<&str> = path.split('.').collect();
        if segs.len() < 2 {
            return Err(not_found(path, "A value path names an object and at least one member"));
        }

        let object = self
            .object(segs[0])
            .ok_or_else(|| not_found(path, "No object with that name"))?;
        let mut current = object
            .member(segs[1])
            .map(TorMember::value)
            .ok_or_else(|| not_found(path, "No member with that name"))?;

        for seg in &segs[2..] {
            current = step(current, seg).ok_or_else(|| not_found(path, "Path runs past the value"))?;
        }

        Ok(current)
    }

    /// The member named by the last segment of `path`.
    pub fn member(&self, path: &str) -> Result<&TorMember, TorError> {
        let (owner, name) = split_last(path)?;
        let missing = || not_found(path, "No member with that name");

        if owner.contains('.') {
            let parent = self.value_at(owner)?;
            parent.as_struct().and_then(|s| s.get(name)).ok_or_else(missing)
        } else {
            self.object(owner).and_then(|o| o.member(name)).ok_or_else(missing)
        }
    }

    pub fn member_mut(&mut self, path: &str) -> Result<&mut TorMember, TorError> {
        let segs: Vec<&str> = path.split('.').collect();
        if segs.len() < 2 {
            return Err(not_found(path, "A member path names an object and at least one member"));
        }

        let object = self
            .object_mut(segs[0])
            .ok_or_else(|| not_found(path, "No object with that name"))?;
        let mut current = object
            .member_mut(segs[1])
            .ok_or_else(|| not_found(path, "No member with that name"))?;

        for seg in &segs[2..] {
            current = current
                .as_struct_mut()
                .and_then(|s| s.get_mut(seg))
                .ok_or_else(|| not_found(path, "Only struct members can be addressed for update"))?;
        }

        Ok(current)
    }

    /// Overwrite the payload of the `value` member at `path`, keeping its unit.
    pub fn set_scalar(&mut self, path: &str, payload: impl Into<Payload>) -> Result<(), TorError> {
        self.member_mut(path)?.set_scalar(payload)
    }

    /// Member names of an object (`"Primary_coor"`) or of a struct value.
    pub fn get_keys(&self, path: &str) -> Result<Vec<String>, TorError> {
        if !path.contains('.') {
            let object = self
                .object(path)
                .ok_or_else(|| not_found(path, "No object with that name"))?;
            return Ok(object.members().names().map(str::to_string).collect());
        }

        match self.value_at(path)? {
            MemberValue::Struct(s) => Ok(s.names().map(str::to_string).collect()),
            other => Err(TorError::TypeError {
                message: format!("Path '{}' is a {}, not a struct", path, other.kind()),
                hint: Some("Only objects and structs have keys".into()),
                code: Some(406),
            }),
        }
    }

    /// Check if a path exists.
    pub fn has(&self, path: &str) -> bool {
        if path.contains('.') {
            self.value_at(path).is_ok()
        } else {
            self.contains(path)
        }
    }
}

fn step<'v>(value: &'v MemberValue, seg: &str) -> Option<&'v MemberValue> {
    match value {
        MemberValue::Struct(s) => s.get(seg).map(TorMember::value),
        MemberValue::Sequence(seq) => seg.parse::<usize>().ok().and_then(|i| seq.get(i)),
        _ => None,
    }
}

fn split_last(path: &str) -> Result<(&str, &str), TorError> {
    path.rsplit_once('.')
        .ok_or_else(|| not_found(path, "A member path names an object and at least one member"))
}

fn not_found(path: &str, hint: &str) -> TorError {
    TorError::NotFound {
        path: path.to_string(),
        hint: Some(hint.into()),
        code: Some(404),
    }
}
