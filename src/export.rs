// Author: Dustin Pilgrim
// License: MIT

//! Writing the object graph back out: Tor text through `Display`, and JSON
//! through `serde`.
//!
//! Tor text written here reads back into an equal graph: same entities in the
//! same order, same member names, payloads and units, same comment lines.
//! Layout and number formatting may differ from the source text.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::model::{Entity, MemberValue, Payload, Ref, Sequence, Struct, TorComment, TorMember, TorObject, Value};
use crate::torfile::TorFile;
use crate::utils::{format_float, is_bare_string};
use crate::TorError;

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Float(n) => f.write_str(&format_float(*n)),
            Payload::Int(n) => write!(f, "{}", n),
            Payload::Str(s) if is_bare_string(s) => f.write_str(s),
            Payload::Str(s) => write!(f, "\"{}\"", escape_quotes(s)),
        }
    }
}

/// Escape any `"` not already escaped; existing escapes pass through.
fn escape_quotes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                out.push('\\');
                match chars.next() {
                    Some(next) => out.push(next),
                    None => out.push('\\'),
                }
            }
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{} {}", self.payload, unit),
            None => write!(f, "{}", self.payload),
        }
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ref({})", self.target)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("sequence(")?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", item)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Struct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("struct(")?;
        for (i, member) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", member.name(), member.value())?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for MemberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberValue::Value(v) => v.fmt(f),
            MemberValue::Ref(r) => r.fmt(f),
            MemberValue::Sequence(s) => s.fmt(f),
            MemberValue::Struct(s) => s.fmt(f),
        }
    }
}

/// A member displays as its value alone; the name belongs to the owner's layout.
impl fmt::Display for TorMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value().fmt(f)
    }
}

impl fmt::Display for TorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  {}", self.name(), self.type_name())?;
        writeln!(f, "(")?;
        for (i, member) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f, ",")?;
            }
            write!(f, "  {}   : {}", member.name(), member.value())?;
        }
        if !self.is_empty() {
            writeln!(f)?;
        }
        f.write_str(")")
    }
}

/// Plain `//` lines; the synthetic `comment<offset>` object never reaches text.
impl fmt::Display for TorComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Object(o) => o.fmt(f),
            Entity::Comment(c) => c.fmt(f),
        }
    }
}

/// Entities in order, separated by blank lines, with a final newline.
impl fmt::Display for TorFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entity) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", entity)?;
        }
        Ok(())
    }
}

impl TorFile {
    pub fn to_tor_string(&self) -> String {
        self.to_string()
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), TorError> {
        writer
            .write_all(self.to_tor_string().as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| TorError::FileError {
                message: format!("Failed to write tor output: {}", e),
                path: "<writer>".into(),
                hint: None,
                code: Some(503),
            })
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TorError> {
        let path_ref = path.as_ref();
        fs::write(path_ref, self.to_tor_string()).map_err(|e| TorError::FileError {
            message: format!("Failed to write file: {}", e),
            path: path_ref.to_string_lossy().to_string(),
            hint: Some("Check that the directory exists and is writable".into()),
            code: Some(504),
        })
    }
}

/// Export a Tor file to JSON.
///
/// The file becomes an array of entities in file order:
/// - objects → `{"entity": "object", "name", "type", "members": {...}}`
/// - comment blocks → `{"entity": "comment", "offset", "lines": [...]}`
/// - members → `{"kind": "value"|"ref"|"sequence"|"struct", "value": ...}`
/// - scalars → `{"payload": 175.0, "unit": "mm"}`, unit omitted when absent
/// - refs → `{"ref": "Primary_coor"}`
pub fn export_tor_to_json(file: &TorFile) -> Result<String, TorError> {
    serde_json::to_string_pretty(file).map_err(|e| TorError::TypeError {
        message: format!("Failed to encode JSON: {}", e),
        hint: None,
        code: Some(505),
    })
}

/// Export a `.tor` file directly to JSON.
///
/// Convenience function that reads, parses, and exports in one call.
///
/// # Errors
/// Returns error if file doesn't exist or contains invalid Tor syntax.
pub fn export_tor_file<P: AsRef<Path>>(path: P) -> Result<String, TorError> {
    let file = TorFile::from_file(path)?;
    export_tor_to_json(&file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../testdata/antenna.tor");

    #[test]
    fn test_value_rendering() {
        assert_eq!(Value::with_unit(175.0, "mm").to_string(), "175.0 mm");
        assert_eq!(Value::new(-1.0).to_string(), "-1.0");
        assert_eq!(Value::new(3i64).to_string(), "3");
        assert_eq!(Value::new("pattern-v2.cut").to_string(), "pattern-v2.cut");
        assert_eq!(Value::new("two words").to_string(), "\"two words\"");
        assert_eq!(Value::new("say \"hi\"").to_string(), r#""say \"hi\"""#);
    }

    #[test]
    fn test_compound_rendering() {
        let seq: Sequence = vec![Value::with_unit(180.0, "GHz"), Value::with_unit(190.0, "GHz")]
            .into_iter()
            .collect();
        assert_eq!(seq.to_string(), "sequence(180.0 GHz,190.0 GHz)");
        assert_eq!(Sequence::new().to_string(), "sequence()");

        let s: Struct = vec![
            TorMember::new("x", Value::with_unit(0.0, "mm")),
            TorMember::new("y", Value::with_unit(0.0, "mm")),
        ]
        .into_iter()
        .collect();
        assert_eq!(s.to_string(), "struct(x: 0.0 mm, y: 0.0 mm)");
        assert_eq!(Struct::new().to_string(), "struct()");

        assert_eq!(Ref::new("Primary_coor").to_string(), "ref(Primary_coor)");
    }

    #[test]
    fn test_object_layout() {
        let object = TorObject::new("Primary_M1", "reflector")
            .unwrap()
            .with(TorMember::new("coor_sys", Ref::new("Primary_coor")))
            .with(TorMember::new("centre_hole_radius", Value::with_unit(175.0, "mm")));

        assert_eq!(
            object.to_string(),
            "Primary_M1  reflector\n(\n  coor_sys   : ref(Primary_coor),\n  centre_hole_radius   : 175.0 mm\n)"
        );

        let empty = TorObject::new("Marker", "point").unwrap();
        assert_eq!(empty.to_string(), "Marker  point\n(\n)");
    }

    #[test]
    fn test_comment_renders_as_plain_lines() {
        let comment = TorComment::new(10, ["DO NOT MODIFY", "//MANAGED BY THE GUI"]);
        assert_eq!(comment.to_string(), "//DO NOT MODIFY\n//MANAGED BY THE GUI");
    }

    #[test]
    fn test_sample_round_trip() {
        let file = TorFile::parse(SAMPLE).unwrap();
        let text = file.to_tor_string();
        assert!(!text.contains("comment("));

        let reread = TorFile::parse(&text).unwrap();
        assert_eq!(reread, file);

        let names: Vec<&str> = reread.objects().map(TorObject::name).collect();
        let before: Vec<&str> = file.objects().map(TorObject::name).collect();
        assert_eq!(names, before);
    }

    #[test]
    fn test_write_to_file() {
        let file = TorFile::parse(SAMPLE).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tor");

        file.write_file(&path).unwrap();
        let reread = TorFile::from_file(&path).unwrap();
        assert_eq!(reread, file);
    }

    #[test]
    fn test_write_to_writer() {
        let file = TorFile::parse("Feed gaussian_beam ( taper : -12.0, taper_angle : 10.0 deg )").unwrap();
        let mut buf = Vec::new();
        file.write_to(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Feed  gaussian_beam\n(\n  taper   : -12.0,\n  taper_angle   : 10.0 deg\n)\n"
        );
    }

    #[test]
    fn test_export_sample_to_json() {
        let file = TorFile::parse(SAMPLE).unwrap();
        let json_output = export_tor_to_json(&file).expect("Failed to export document to JSON");

        let v: serde_json::Value = serde_json::from_str(&json_output).unwrap();
        assert!(v.is_array());
        assert_eq!(v.as_array().unwrap().len(), file.len());

        assert_eq!(v[0]["entity"], "object");
        assert_eq!(v[0]["name"], "Primary_coor");
        assert_eq!(v[0]["type"], "coor_sys");
        assert_eq!(v[0]["members"]["origin"]["kind"], "struct");
        assert_eq!(v[0]["members"]["origin"]["value"]["z"]["value"]["unit"], "mm");

        assert_eq!(v[1]["members"]["coor_sys"]["value"]["ref"], "Primary_coor");
        assert_eq!(v[1]["members"]["centre_hole_radius"]["value"]["payload"], 175.0);

        let comment = &v[7];
        assert_eq!(comment["entity"], "comment");
        assert_eq!(comment["lines"][0], "//DO NOT MODIFY OBJECTS BELOW THIS LINE.");
    }

    #[test]
    fn test_export_unitless_value_has_no_unit_key() {
        let file = TorFile::parse("A b ( y : -1.0 )").unwrap();
        let v: serde_json::Value = serde_json::from_str(&export_tor_to_json(&file).unwrap()).unwrap();
        let member = &v[0]["members"]["y"]["value"];
        assert_eq!(member["payload"], -1.0);
        assert!(member.get("unit").is_none());
    }
}
