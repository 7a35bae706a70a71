// Author: Dustin Pilgrim
// License: MIT

#[cfg(test)]
use super::*;
use std::io::Write as _;

use crate::model::{MemberKind, MemberValue, Payload, Ref, Sequence, TorMember, Value};
use crate::observer::NoopObserver;

const SAMPLE: &str = include_str!("../../testdata/antenna.tor");

#[test]
fn test_sample_end_to_end() {
    let file = TorFile::parse(SAMPLE).expect("Failed to parse sample");

    // 9 objects plus the comment block
    assert_eq!(file.len(), 10);
    assert_eq!(file.objects().count(), 9);
    assert_eq!(file.comments().count(), 1);

    let names: Vec<&str> = file.names().collect();
    let offset = SAMPLE.find("//DO NOT MODIFY").unwrap();
    assert_eq!(
        names,
        vec![
            "Primary_coor".to_string(),
            "Primary_M1".to_string(),
            "Primary_Surface".to_string(),
            "Primary_Rim".to_string(),
            "Subreflector_M2".to_string(),
            "Secondary_coor".to_string(),
            "Secondary_Surface".to_string(),
            format!("comment{}", offset),
            "Secondary_Rim".to_string(),
            "Frequencies".to_string(),
        ]
    );

    let comment = file.iter().nth(7).and_then(Entity::as_comment).expect("Expected comment at index 7");
    assert_eq!(comment.offset(), offset);
    assert_eq!(comment.type_name(), "comment");
    assert_eq!(comment.lines().len(), 4);
    assert_eq!(comment.text()[0], "DO NOT MODIFY OBJECTS BELOW THIS LINE.");

    let freqs: Vec<f64> = file.get("Frequencies.frequency_list").expect("Failed to get frequency_list");
    assert_eq!(freqs, vec![180.0, 190.0, 200.0, 210.0, 220.0, 230.0, 240.0, 250.0, 260.0]);

    let list: Sequence = file.get("Frequencies.frequency_list").unwrap();
    assert!(list.values().all(|v| v.unit() == Some("GHz")));
}

#[test]
fn test_entity_lookup_and_path_access() {
    let mut file = TorFile::parse(SAMPLE).unwrap();

    let entity = file.entity("Primary_M1").expect("Primary_M1 should exist");
    assert_eq!(entity.type_name(), "reflector");
    assert!(file.entity("Primary_M1.coor_sys").is_none());

    let radius: f64 = file.get("Primary_M1.centre_hole_radius").unwrap();
    assert_eq!(radius, 175.0);

    if let Some(object) = file.entity_mut("Primary_M1").and_then(Entity::as_object_mut) {
        object.remove("rim");
    }
    assert!(!file.has("Primary_M1.rim"));
    assert!(file.get::<Ref>("Primary_M1.rim").is_err());
}

#[test]
fn test_unit_fidelity() {
    let file = TorFile::parse(SAMPLE).unwrap();

    let radius = file.member("Primary_M1.centre_hole_radius").unwrap();
    assert_eq!(radius.kind(), MemberKind::Value);
    assert_eq!(radius.scalar(), Some(&Payload::Float(175.0)));
    assert_eq!(radius.unit(), Some("mm"));

    let y = file.member("Secondary_coor.y_axis.y").unwrap();
    assert_eq!(y.scalar(), Some(&Payload::Float(-1.0)));
    assert_eq!(y.unit(), None);

    assert_eq!(file.get_with_unit("Primary_Surface.focal_length", "mm").unwrap(), 2520.0);
    let err = file.get_with_unit("Secondary_coor.y_axis.y", "mm").unwrap_err();
    assert_eq!(err.code(), Some(451));
}

#[test]
fn test_nested_struct_access() {
    let file = TorFile::parse(SAMPLE).unwrap();

    let keys = file.get_keys("Secondary_coor.origin").unwrap();
    assert_eq!(keys, vec!["x", "y", "z"]);
    for key in &keys {
        let value: Value = file.get(&format!("Secondary_coor.origin.{}", key)).unwrap();
        assert_eq!(value.unit(), Some("mm"));
    }
    let z: f64 = file.get("Secondary_coor.origin.z").unwrap();
    assert_eq!(z, 2520.0);

    assert_eq!(file.get_keys("Primary_M1").unwrap(), vec!["coor_sys", "surface", "rim", "centre_hole_radius"]);
    assert_eq!(file.get_keys("Primary_M1.coor_sys").unwrap_err().code(), Some(406));
}

#[test]
fn test_typed_access() {
    let file = TorFile::parse(SAMPLE).unwrap();

    let last: f64 = file.get("Frequencies.frequency_list.8").unwrap();
    assert_eq!(last, 260.0);

    let target: Ref = file.get("Primary_M1.coor_sys").unwrap();
    assert_eq!(target.target(), "Primary_coor");

    let err = file.get::<f64>("Primary_M1.coor_sys").unwrap_err();
    match err {
        TorError::TypeError { message, .. } => assert!(message.contains("Primary_M1.coor_sys")),
        other => panic!("Expected TypeError, got {:?}", other),
    }

    let missing: Option<f64> = file.get_optional("Primary_M1.focal_length").unwrap();
    assert_eq!(missing, None);
    assert!(file.get_optional::<f64>("Primary_M1.rim").is_err());

    assert_eq!(file.get_or("Primary_M1.focal_length", 1.5), 1.5);
    assert_eq!(file.get::<f64>("Nope.x").unwrap_err().code(), Some(404));

    assert!(file.has("Primary_M1"));
    assert!(file.has("Frequencies.frequency_list.0"));
    assert!(!file.has("Frequencies.frequency_list.9"));
    assert!(!file.has("Primary_M1.nothing"));
}

#[test]
fn test_round_trip_preserves_graph() {
    let file = TorFile::parse(SAMPLE).unwrap();
    let text = file.to_string();
    let reread = TorFile::parse(&text).expect("Failed to re-read serialized output");

    assert_eq!(reread, file);
    assert_eq!(reread.len(), 10);

    let kinds: Vec<bool> = reread.iter().map(Entity::is_comment).collect();
    assert_eq!(kinds.iter().position(|c| *c), Some(7));
    assert_eq!(
        reread.iter().nth(7).and_then(Entity::as_comment).unwrap().lines(),
        file.iter().nth(7).and_then(Entity::as_comment).unwrap().lines()
    );

    // Writing again is stable
    assert_eq!(reread.to_string(), text);
}

#[test]
fn test_round_trip_strings_and_integers() {
    let input = r#"Feed pattern ( file : "C:\data\feed.cut", label : "two words", tag : v2.cut, count : 3, scale : 1e-7 )"#;
    let file = TorFile::parse(input).unwrap();

    let count: i64 = file.get("Feed.count").unwrap();
    assert_eq!(count, 3);
    let file_name: String = file.get("Feed.file").unwrap();
    assert_eq!(file_name, r"C:\data\feed.cut");

    let reread = TorFile::parse(&file.to_string()).unwrap();
    assert_eq!(reread, file);
}

#[test]
fn test_out_of_range_float_is_not_read() {
    let err = TorFile::parse("A t ( x : 1e999 )").unwrap_err();
    assert!(matches!(err, TorError::InvalidToken { offset: 10, code: Some(102), .. }));

    let file = TorFile::parse("A t ( x : 1e308, y : -1.7976931348623157e308 )").unwrap();
    let reread = TorFile::parse(&file.to_string()).unwrap();
    assert_eq!(reread, file);
}

#[test]
fn test_mutation_keeps_kind() {
    let mut file = TorFile::parse(SAMPLE).unwrap();

    file.set_scalar("Primary_M1.centre_hole_radius", 200.0).unwrap();
    let radius = file.member("Primary_M1.centre_hole_radius").unwrap();
    assert_eq!(radius.scalar(), Some(&Payload::Float(200.0)));
    assert_eq!(radius.unit(), Some("mm"));

    let err = file.set_scalar("Primary_M1.coor_sys", 1.0).unwrap_err();
    assert_eq!(err.code(), Some(410));
    let err = file.set_scalar("Secondary_coor.origin", 1.0).unwrap_err();
    assert_eq!(err.code(), Some(410));

    let z = file.member_mut("Secondary_coor.origin.z").unwrap();
    z.set_unit(Some("cm")).unwrap();
    assert_eq!(file.get_with_unit("Secondary_coor.origin.z", "cm").unwrap(), 2520.0);

    let rim = file.member_mut("Primary_M1.rim").unwrap();
    let old = rim.replace(Ref::new("Secondary_Rim")).unwrap();
    assert_eq!(old, MemberValue::Ref(Ref::new("Primary_Rim")));
    assert!(rim.replace(Value::new(1.0)).is_err());

    assert!(file.member_mut("Frequencies.frequency_list.0").is_err());
}

#[test]
fn test_object_editing() {
    let mut file = TorFile::parse(SAMPLE).unwrap();

    let feed = TorObject::new("Feed", "gaussian_beam")
        .unwrap()
        .with(TorMember::new("taper", Value::new(-12.0)))
        .with(TorMember::new("taper_angle", Value::with_unit(10.0, "deg")));
    assert!(file.insert_object(feed).is_none());
    assert_eq!(file.names().last(), Some("Feed"));

    let m1 = file.object_mut("Primary_M1").unwrap();
    m1.insert(TorMember::new("note", Value::new("spare")));
    assert_eq!(m1.members().names().last(), Some("note"));
    assert!(m1.remove("note").is_some());

    assert!(TorObject::new("bad name", "reflector").is_err());
    assert!(file.object_mut("Primary_M1").unwrap().set_type("2nd").is_err());
}

#[test]
fn test_rename_and_remove() {
    let mut file = TorFile::parse(SAMPLE).unwrap();

    file.rename("Primary_coor", "Main_coor").unwrap();
    assert_eq!(file.names().next(), Some("Main_coor"));
    assert_eq!(file.object("Main_coor").unwrap().name(), "Main_coor");

    // References are left pointing at the old name
    let dangling = file.dangling_refs();
    assert!(dangling.iter().any(|site| site.target == "Primary_coor"));

    assert_eq!(file.rename("Main_coor", "Primary_M1").unwrap_err().code(), Some(303));
    assert_eq!(file.rename("Missing", "Other").unwrap_err().code(), Some(404));
    assert_eq!(file.rename("Main_coor", "bad.name").unwrap_err().code(), Some(411));

    let comment_name = file.comments().next().unwrap().name();
    assert_eq!(file.rename(&comment_name, "Notes").unwrap_err().code(), Some(412));

    let removed = file.remove("Primary_Surface").unwrap();
    assert_eq!(removed.type_name(), "paraboloid");
    let names: Vec<&str> = file.names().take(3).collect();
    assert_eq!(names, vec!["Main_coor", "Primary_M1", "Primary_Rim"]);
}

#[test]
fn test_duplicate_top_level_rejected_by_default() {
    let input = "A t ( x : 1 )\nB t ( )\nA t ( x : 2 )";
    let err = TorFile::parse(input).unwrap_err();
    match err {
        TorError::NameCollision { name, offset, code, .. } => {
            assert_eq!(name, "A");
            assert_eq!(offset, 22);
            assert_eq!(code, Some(302));
        }
        other => panic!("Expected NameCollision, got {:?}", other),
    }
}

#[test]
fn test_duplicate_top_level_replace() {
    let input = "A t ( x : 1 )\nB t ( )\nA t ( x : 2 )";
    let options = ReadOptions { duplicates: DuplicatePolicy::Replace };
    let file = TorFile::parse_with(input, &options, &mut NoopObserver).unwrap();

    let names: Vec<&str> = file.names().collect();
    assert_eq!(names, vec!["A", "B"]);
    let x: i64 = file.get("A.x").unwrap();
    assert_eq!(x, 2);
}

#[test]
fn test_object_name_matching_comment_key() {
    for input in ["// note\ncomment0 t ( x : 1 )", "comment16 t ( )\n// x"] {
        let err = TorFile::parse(input).unwrap_err();
        assert_eq!(err.code(), Some(304), "input: {}", input);

        let options = ReadOptions { duplicates: DuplicatePolicy::Replace };
        let err = TorFile::parse_with(input, &options, &mut NoopObserver).unwrap_err();
        assert_eq!(err.code(), Some(304), "input: {}", input);
    }

    let file = TorFile::parse("comment0 t ( x : 1 )\n// note").unwrap();
    assert_eq!(file.len(), 2);
    assert_eq!(file.object("comment0").unwrap().type_name(), "t");
    assert!(file["comment21"].is_comment());
}

#[test]
fn test_comment_offset_ignored_by_equality() {
    let a = TorFile::parse("// note\nA t ( x : 1 )").unwrap();
    let b = TorFile::parse("\n\n   // note\nA t ( x : 1 )").unwrap();

    assert_ne!(a.names().next(), b.names().next());
    assert_eq!(a, b);

    let c = TorFile::parse("// other\nA t ( x : 1 )").unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_member_order_is_content() {
    let a = TorFile::parse("A t ( x : 1, y : 2 )").unwrap();
    let b = TorFile::parse("A t ( y : 2, x : 1 )").unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_validate_names() {
    let mut file = TorFile::parse(SAMPLE).unwrap();
    assert!(file.validate().is_ok());
    assert!(file.name_issues().is_empty());

    let object = file.object_mut("Primary_M1").unwrap();
    object.insert(TorMember::new("bad name", Value::with_unit(1.0, "m m")));

    let issues = file.name_issues();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].role, "member name");
    assert_eq!(issues[1].role, "unit");
    assert_eq!(issues[1].path, "Primary_M1.bad name");

    assert_eq!(file.validate().unwrap_err().code(), Some(452));
}

#[test]
fn test_issues_cover_unwritable_values() {
    let clean = TorFile::parse(r#"A t ( s : plain, q : "say \"hi\"", p : "C:\data" )"#).unwrap();
    assert!(clean.name_issues().is_empty());

    let object = TorObject::new("A", "t")
        .unwrap()
        .with(TorMember::new("label", Value::with_unit("abc", "mm")))
        .with(TorMember::new("note", Value::new("two\nlines")))
        .with(TorMember::new("quote", Value::new("say \"hi\"")))
        .with(TorMember::new("slash", Value::new(r"C:\")))
        .with(TorMember::new("gain", Value::new(f64::INFINITY)));
    let file: TorFile = vec![Entity::from(object)].into_iter().collect();

    let roles: Vec<&str> = file.name_issues().iter().map(|i| i.role).collect();
    assert_eq!(roles, vec!["unit on a string", "string value", "string value", "string value", "number"]);
    assert_eq!(file.validate().unwrap_err().code(), Some(452));

    // The unit on a string is what breaks the re-read
    assert!(TorFile::parse(&file.to_string()).is_err());
}

#[test]
fn test_issues_cover_comment_blocks() {
    let adjacent: TorFile = vec![
        Entity::from(TorComment::new(0, ["a"])),
        Entity::from(TorComment::new(1, ["b"])),
        Entity::from(TorObject::new("B", "t").unwrap()),
    ]
    .into_iter()
    .collect();

    let issues = adjacent.name_issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, "comment1");
    assert_eq!(issues[0].role, "comment block");

    // The two blocks merge on re-read
    let reread = TorFile::parse(&adjacent.to_string()).unwrap();
    assert_eq!(reread.len(), 2);
    assert_ne!(reread, adjacent);

    let file: TorFile = vec![
        Entity::from(TorObject::new("B", "t").unwrap()),
        Entity::from(TorComment::new(5, std::iter::empty::<String>())),
        Entity::from(TorObject::new("C", "t").unwrap()),
        Entity::from(TorComment::new(7, ["x\ny"])),
    ]
    .into_iter()
    .collect();

    let found: Vec<(String, &str)> = file.name_issues().into_iter().map(|i| (i.path, i.role)).collect();
    assert_eq!(
        found,
        vec![
            ("comment5".to_string(), "comment block"),
            ("comment7".to_string(), "comment line"),
        ]
    );
}

#[test]
fn test_from_file_and_errors() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(SAMPLE.as_bytes()).unwrap();

    let file = TorFile::from_file(tmp.path()).expect("Failed to load tor file");
    assert_eq!(file.len(), 10);

    let dir = tempfile::tempdir().unwrap();
    let err = TorFile::from_file(dir.path().join("missing.tor")).unwrap_err();
    assert!(matches!(err, TorError::FileError { code: Some(502), .. }));

    let err = TorFile::from_reader(&b"\xff\xfe\x00"[..]).unwrap_err();
    assert_eq!(err.code(), Some(501));
}

#[test]
fn test_read_appends_only_on_success() {
    let mut file = TorFile::parse("A t ( x : 1 )").unwrap();

    file.read("B t ( y : ref(A) )".as_bytes()).unwrap();
    let names: Vec<&str> = file.names().collect();
    assert_eq!(names, vec!["A", "B"]);

    let err = file.read("C t ( z : 1 ) D t (".as_bytes()).unwrap_err();
    assert!(matches!(err, TorError::UnexpectedEof { .. }));
    assert_eq!(file.len(), 2);
    assert!(!file.contains("C"));
}

#[test]
fn test_object_from_str() {
    let object: TorObject = "Feed gaussian_beam ( taper : -12.0, taper_angle : 10.0 deg )".parse().unwrap();
    assert_eq!(object.name(), "Feed");
    assert_eq!(object.type_name(), "gaussian_beam");
    assert_eq!(object["taper_angle"].unit(), Some("deg"));

    assert!("// only a comment".parse::<TorObject>().is_err());
    assert!("A t ( x : 1, x : 2 )".parse::<TorObject>().is_err());
}

#[test]
fn test_collect_into_file() {
    let file: TorFile = vec![
        Entity::from(TorObject::new("A", "t").unwrap()),
        Entity::from(TorComment::new(0, ["between"])),
        Entity::from(TorObject::new("B", "t").unwrap()),
    ]
    .into_iter()
    .collect();

    assert_eq!(file.len(), 3);
    assert!(file["comment0"].is_comment());
    assert_eq!(file.to_string(), "A  t\n(\n)\n\n//between\n\nB  t\n(\n)\n");
}
