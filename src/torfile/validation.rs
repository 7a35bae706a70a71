use super::*;
use crate::model::{MemberValue, Members, Payload, Value};

/// Something the writer cannot reproduce on re-read, found by
/// [`TorFile::validate`]: a name the grammar rejects, a string or number with
/// no faithful text form, or a comment block that would not come back intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameIssue {
    /// Dotted location of the offending item, or the entity key for comments.
    pub path: String,
    /// The offending text.
    pub name: String,
    /// What the text is used as: `object name`, `member name`, `unit`,
    /// `string value`, `unit on a string`, `number`, `comment block`, ...
    pub role: &'static str,
}

impl TorFile {
    /// Get a number and check that it carries `unit`.
    ///
    /// ```ignore
    /// let focal = file.get_with_unit("Primary_Surface.focal_length", "mm")?;
    /// ```
    pub fn get_with_unit(&self, path: &str, unit: &str) -> Result<f64, TorError> {
        let value: Value = self.get(path)?;
        let number = value.payload.as_f64().ok_or_else(|| TorError::TypeError {
            message: format!("Expected number at '{}'", path),
            hint: None,
            code: Some(402),
        })?;

        if value.unit() != Some(unit) {
            return Err(TorError::TypeError {
                message: format!("Unexpected unit for `{}`", path),
                hint: Some(format!(
                    "Expected '{}', found {}",
                    unit,
                    value.unit().map_or("no unit".to_string(), |u| format!("'{}'", u))
                )),
                code: Some(451),
            });
        }

        Ok(number)
    }

    /// Everything that would not survive [`TorFile::to_tor_string`] followed
    /// by [`TorFile::parse`]: names that are not identifiers, strings with
    /// line breaks or a dangling backslash, units attached to strings,
    /// non-finite numbers, and comment blocks that are empty, carry line
    /// breaks, or directly follow another block (the two would merge).
    /// Empty when the file round-trips.
    pub fn name_issues(&self) -> Vec<NameIssue> {
        let mut issues = Vec::new();
        let mut after_comment = false;

        for entity in self.iter() {
            match entity {
                Entity::Object(object) => {
                    check(&mut issues, object.name(), object.name(), "object name");
                    check(&mut issues, object.name(), object.type_name(), "object type");
                    check_members(&mut issues, object.name(), object.members());
                }
                Entity::Comment(comment) => {
                    let key = comment.name();
                    if after_comment {
                        push(&mut issues, &key, &comment.lines().join("\n"), "comment block");
                    }
                    if comment.lines().is_empty() {
                        push(&mut issues, &key, "", "comment block");
                    }
                    for line in comment.lines() {
                        if line.contains(['\n', '\r']) {
                            push(&mut issues, &key, line, "comment line");
                        }
                    }
                }
            }
            after_comment = entity.is_comment();
        }

        issues
    }

    /// Fails with the first [`NameIssue`], if any.
    pub fn validate(&self) -> Result<(), TorError> {
        match self.name_issues().into_iter().next() {
            None => Ok(()),
            Some(issue) => Err(TorError::StructuralError {
                message: format!("Invalid {} '{}' at '{}'", issue.role, issue.name, issue.path),
                hint: Some(
                    "Names must match [A-Za-z][A-Za-z0-9_]*; strings, numbers and comments need a text form that reads back unchanged"
                        .into(),
                ),
                code: Some(452),
            }),
        }
    }
}

fn check(issues: &mut Vec<NameIssue>, path: &str, name: &str, role: &'static str) {
    if !is_identifier(name) {
        push(issues, path, name, role);
    }
}

fn push(issues: &mut Vec<NameIssue>, path: &str, name: &str, role: &'static str) {
    issues.push(NameIssue {
        path: path.to_string(),
        name: name.to_string(),
        role,
    });
}

/// Strings are written quoted with their escapes passed through, so only
/// text that already reads as the inside of a quoted literal comes back
/// unchanged: no line breaks, every `"` escaped, no unpaired backslash.
fn writable_string(s: &str) -> bool {
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('\n' | '\r') | None => return false,
                Some(_) => {}
            },
            '"' | '\n' | '\r' => return false,
            _ => {}
        }
    }
    true
}

fn check_members(issues: &mut Vec<NameIssue>, owner: &str, members: &Members) {
    for member in members {
        let path = format!("{}.{}", owner, member.name());
        check(issues, &path, member.name(), "member name");
        check_value(issues, &path, member.value());
    }
}

fn check_value(issues: &mut Vec<NameIssue>, path: &str, value: &MemberValue) {
    match value {
        MemberValue::Value(v) => {
            if let Some(unit) = v.unit() {
                check(issues, path, unit, "unit");
            }
            match &v.payload {
                Payload::Str(s) => {
                    if !writable_string(s) {
                        push(issues, path, s, "string value");
                    }
                    if let Some(unit) = v.unit() {
                        push(issues, path, unit, "unit on a string");
                    }
                }
                Payload::Float(n) if !n.is_finite() => push(issues, path, &n.to_string(), "number"),
                _ => {}
            }
        }
        MemberValue::Ref(r) => check(issues, path, r.target(), "ref target"),
        MemberValue::Sequence(seq) => {
            for (i, item) in seq.iter().enumerate() {
                check_value(issues, &format!("{}.{}", path, i), item);
            }
        }
        MemberValue::Struct(s) => check_members(issues, path, s.members()),
    }
}
