use super::*;
use std::{cell::RefCell, rc::Rc};

fn load_err(doc: &str) -> Error {
    match load(doc, LoadOptions::default()) {
        Ok(v) => panic!("expect error, got {:?}", v),
        Err(e) => e,
    }
}

fn warnings_of(doc: &str) -> (Option<Value>, Vec<String>) {
    let mut warnings = Vec::new();
    let opts = LoadOptions::default().on_warning(|w| warnings.push(w.msg.clone()));
    let v = load(doc, opts).unwrap_or_else(|e| panic!("{}", e));
    (v, warnings)
}

#[test]
fn empty_stream() {
    assert_eq!(load("", LoadOptions::default()).unwrap(), None);
    assert_eq!(load("\n", LoadOptions::default()).unwrap(), None);
    assert_eq!(load_one("# comment\n"), Value::Null);
    assert!(load_all("", LoadOptions::default()).unwrap().is_empty());
}

#[test]
fn multiple_documents() {
    let e = load_err("a\n---\nb\n");
    assert!(matches!(e, Error::MultipleDocuments { .. }));
    assert_eq!(e.mark().unwrap().line, 1);
    let docs = load_all("--- a\n--- [b]\n...\n--- {c: d}\n", LoadOptions::default()).unwrap();
    assert_eq!(
        docs,
        vec![Value::from("a"), yaml_seq!["b"], yaml_map! {"c" => "d"}]
    );
    let mut seen = Vec::new();
    load_all_with("1\n---\n2\n", |v| seen.push(v), LoadOptions::default()).unwrap();
    assert_eq!(seen, vec![Value::from(1), Value::from(2)]);
}

#[test]
fn implicit_scalars() {
    let v = load_one("[~, null, true, False, 0x1F, 0o17, 017, 1_000, -.inf, 1.5, 2002-12-14, text]");
    assert_eq!(
        v,
        yaml_seq![
            (),
            (),
            true,
            false,
            31,
            15,
            15,
            1000,
            f64::NEG_INFINITY,
            1.5,
            Timestamp::date(2002, 12, 14),
            "text",
        ]
    );
    assert_eq!(load_one("-9223372036854775808"), Value::Int(i64::MIN));
    assert_eq!(load_one("0x7FFFFFFFFFFFFFFF"), Value::Int(i64::MAX));
    assert_eq!(load_one("9223372036854775808"), Value::Float(9223372036854775808.));
}

#[test]
fn duplicate_key() {
    let e = load_err("a: 1\nb: 2\na: 3\n");
    assert!(matches!(e, Error::DuplicateKey { .. }));
    assert_eq!(e.kind(), ErrorKind::Resolution);
    assert_eq!(e.mark().unwrap().line, 2);
    let v = load("a: 1\na: 2\n", LoadOptions::default().json(true))
        .unwrap()
        .unwrap();
    assert_eq!(v, yaml_map! {"a" => 2});
}

#[test]
fn json_complex_key() {
    let v = load("? [1, 2]\n: x\n", LoadOptions::default().json(true))
        .unwrap()
        .unwrap();
    assert_eq!(v, yaml_map! {"[1, 2]" => "x"});
}

#[test]
fn merge_keys() {
    let doc = "\
base: &b {x: 1, y: 2}
other: &o {y: 9, z: 3}
over:
  <<: *b
  y: 3
first:
  y: 3
  <<: *b
list:
  <<: [*b, *o]
";
    let v = load_one(doc);
    assert_eq!(v.get("over"), Some(yaml_map! {"x" => 1, "y" => 3}));
    assert_eq!(v.get("first"), Some(yaml_map! {"y" => 3, "x" => 1}));
    assert_eq!(v.get("list"), Some(yaml_map! {"x" => 1, "y" => 2, "z" => 3}));
    // The merge source is not changed
    assert_eq!(v.get("base"), Some(yaml_map! {"x" => 1, "y" => 2}));
    let v = load_one("base: &b\n  x: 1\nchild:\n  <<: *b\n  x: 2\n");
    assert_eq!(v.get("child"), Some(yaml_map! {"x" => 2}));
    let v = load_one("base: &b\n  x: 1\nchild:\n  <<: *b\n  y: 3\n");
    assert_eq!(v.get("child"), Some(yaml_map! {"x" => 1, "y" => 3}));
}

#[test]
fn merge_errors() {
    assert!(matches!(load_err("a:\n  <<: 1\n"), Error::InvalidMerge { .. }));
    assert!(matches!(load_err("a:\n  <<: [{b: 1}, 2]\n"), Error::InvalidMerge { .. }));
    // A merged key can be overridden once
    assert!(matches!(
        load_err("<<: {a: 1}\na: 2\na: 3\n"),
        Error::DuplicateKey { .. }
    ));
}

#[test]
fn anchors_and_aliases() {
    let v = load_one("a: &x [1, 2]\nb: *x\nc: &x 3\nd: *x\n");
    let (a, b) = (v.get("a").unwrap(), v.get("b").unwrap());
    assert!(a.as_seq().unwrap().ptr_eq(b.as_seq().unwrap()));
    assert_eq!(v.get("d"), Some(Value::from(3)));
    a.as_seq().unwrap().borrow_mut().push(Value::from(3));
    assert_eq!(b, yaml_seq![1, 2, 3]);
}

#[test]
fn recursive_alias() {
    let v = load_one("&a [1, *a]\n");
    let inner = v.at(1).unwrap();
    assert!(inner.as_seq().unwrap().ptr_eq(v.as_seq().unwrap()));
    let v = load_one("? &a [*a]\n: 1\n");
    let map = v.as_map().unwrap().borrow();
    let (key, value) = map.iter().next().unwrap();
    assert_eq!(value, &Value::from(1));
    assert!(key.at(0).unwrap().as_seq().unwrap().ptr_eq(key.as_seq().unwrap()));
    // Different holders with the same cyclic shape
    let v = load_one("- &a [*a]\n- &b [*b]\n");
    assert!(!v.at(0).unwrap().as_seq().unwrap().ptr_eq(v.at(1).unwrap().as_seq().unwrap()));
    assert_eq!(v.at(0), v.at(1));
}

#[test]
fn alias_errors() {
    match load_err("- *nope\n") {
        Error::UnknownAlias { name, mark } => {
            assert_eq!(name, "nope");
            assert_eq!(mark.column, 2);
        }
        e => panic!("{:?}", e),
    }
    assert!(matches!(
        load_err("- &x 1\n- &y *x\n"),
        Error::AliasWithProperties { .. }
    ));
    assert!(matches!(
        load_err("!!str !!str a\n"),
        Error::DuplicateProperty { property: "tag", .. }
    ));
    assert!(matches!(
        load_err("&a &b a\n"),
        Error::DuplicateProperty { property: "anchor", .. }
    ));
}

#[test]
fn block_scalars() {
    let v = load_one("a: |\n  x\n\n\nb: |-\n  y\nc: >\n  one\n  two\n\n  three\n   more\nd: |+\n  z\n\n");
    assert_eq!(v.get("a"), Some(Value::from("x\n")));
    assert_eq!(v.get("b"), Some(Value::from("y")));
    assert_eq!(v.get("c"), Some(Value::from("one two\nthree\n more\n")));
    assert_eq!(v.get("d"), Some(Value::from("z\n\n")));
    assert_eq!(load_one("a: |2\n   lead\n"), yaml_map! {"a" => " lead\n"});
    assert_eq!(load_one("--- |-\n  end"), Value::from("end"));
}

#[test]
fn quoted_scalars() {
    assert_eq!(load_one("'it''s'"), Value::from("it's"));
    assert_eq!(load_one("'a\n  b\n\n  c'"), Value::from("a b\nc"));
    assert_eq!(
        load_one(r#""\x41\u00e9\U0001F600\ud83d\ude00\N\_\0""#),
        Value::from("Aé😀😀\u{85}\u{a0}\0")
    );
    let e = load_err(r#""\ud83d""#);
    assert_eq!(e.kind(), ErrorKind::Structural);
    assert!(matches!(load_err("\"abc"), Error::UnterminatedScalar { .. }));
    assert!(matches!(load_err("'abc\n---\n'"), Error::UnterminatedScalar { .. }));
}

#[test]
fn flow_collections() {
    let v = load_one("[a, b: c, {d: e}, ? f, [g]]");
    assert_eq!(
        v,
        yaml_seq![
            "a",
            yaml_map! {"b" => "c"},
            yaml_map! {"d" => "e"},
            yaml_map! {"f" => ()},
            yaml_seq!["g"],
        ]
    );
    let v = load_one("{a: [1, 2], b, \"c\":d,\n  e: {f: g}}");
    assert_eq!(
        v,
        yaml_map! {
            "a" => yaml_seq![1, 2],
            "b" => (),
            "c" => "d",
            "e" => yaml_map! {"f" => "g"},
        }
    );
    assert!(matches!(load_err("[a b: c"), Error::Syntax { .. }));
    assert!(matches!(load_err("[a, b"), Error::Syntax { .. }));
    let e = load_err("[a,,b]");
    assert_eq!(e.kind(), ErrorKind::Structural);
    assert!(e.to_string().contains("expected the node content, but found ','"));
    assert!(matches!(load_err("{a: 1,,}"), Error::Syntax { .. }));
    assert_eq!(load_one("[a, b,]"), yaml_seq!["a", "b"]);
}

#[test]
fn deficient_indentation() {
    let (v, warnings) = warnings_of("a: [1,\n2]\n");
    assert_eq!(v, Some(yaml_map! {"a" => yaml_seq![1, 2]}));
    assert_eq!(warnings, ["deficient indentation"]);
}

#[test]
fn explicit_tags() {
    let v = load_one("- !!binary aGVsbG8=\n- !!str 12\n- !!set {a, b}\n- !!float 1\n- !!pairs [a: 1, a: 2]\n");
    assert_eq!(
        v,
        yaml_seq![
            Value::Binary(b"hello".to_vec()),
            "12",
            yaml_map! {"a" => (), "b" => ()},
            1.,
            yaml_seq![yaml_seq!["a", 1], yaml_seq!["a", 2]],
        ]
    );
    assert_eq!(load_one("! 12"), Value::from("12"));
    assert_eq!(load_one("!<tag:yaml.org,2002:int> 12"), Value::from(12));
    assert_eq!(load_one("!!%73tr 12"), Value::from("12"));
}

#[test]
fn tag_errors() {
    match load_err("!unknown x\n") {
        Error::UnknownTag { tag, .. } => assert_eq!(tag, "!unknown"),
        e => panic!("{:?}", e),
    }
    match load_err("!!int abc\n") {
        Error::TagMismatch { tag, .. } => assert_eq!(tag, "tag:yaml.org,2002:int"),
        e => panic!("{:?}", e),
    }
    assert!(matches!(load_err("!!omap [a: 1, a: 2]\n"), Error::TagMismatch { .. }));
    assert!(matches!(load_err("!x!y z\n"), Error::Syntax { .. }));
    assert!(load_err("!!%7 x\n").to_string().contains("tag name is malformed"));
}

#[test]
fn custom_types() {
    let point = Type::new("!point", Kind::Sequence)
        .resolve(|v| v.as_seq().map_or(false, |s| s.borrow().len() == 2))
        .construct(|v| yaml_map! {"x" => v.at(0).unwrap_or_default(), "y" => v.at(1).unwrap_or_default()});
    let schema = Schema::default().extend(vec![], vec![point]).unwrap();
    let v = load("!point [1, 2]", LoadOptions::default().schema(schema))
        .unwrap()
        .unwrap();
    assert_eq!(v, yaml_map! {"x" => 1, "y" => 2});
    let e = Schema::new(vec![], vec![Type::new("!point", Kind::Sequence)], vec![]).unwrap_err();
    assert!(matches!(e, Error::Schema(_)));
    assert_eq!(e.kind(), ErrorKind::SchemaConfig);
}

#[test]
fn failsafe_schema() {
    let v = load("[1, true, ~]", LoadOptions::default().schema(Schema::failsafe()))
        .unwrap()
        .unwrap();
    assert_eq!(v, yaml_seq!["1", "true", "~"]);
}

#[test]
fn directives() {
    let (v, warnings) = warnings_of("%FOO bar\n--- a\n");
    assert_eq!(v, Some(Value::from("a")));
    assert_eq!(warnings, vec!["unknown document directive \"FOO\"".to_string()]);
    let (_, warnings) = warnings_of("%YAML 1.3\n--- a\n");
    assert_eq!(warnings, vec!["unsupported YAML version of the document".to_string()]);
    let (v, warnings) = warnings_of("%TAG !e! tag:yaml.org,2002:\n--- !e!str 1\n");
    assert_eq!(v, Some(Value::from("1")));
    assert!(warnings.is_empty());
    assert!(matches!(
        load_err("%TAG !a! tag:a,2000:\n%TAG !a! tag:b,2000:\n--- x\n"),
        Error::Syntax { .. }
    ));
    assert!(matches!(load_err("%YAML 1.2\n%YAML 1.2\n--- x\n"), Error::Syntax { .. }));
    assert!(matches!(load_err("%YAML 2.0\n--- x\n"), Error::Syntax { .. }));
    assert!(matches!(load_err("%YAML 1.2\nx\n"), Error::Syntax { .. }));
    // Tag handles are scoped to their document
    assert!(load_all(
        "%TAG !e! tag:yaml.org,2002:\n--- !e!str 1\n--- !e!str 2\n",
        LoadOptions::default()
    )
    .is_err());
}

#[test]
fn errors() {
    let e = load_err("a\0");
    assert!(matches!(e, Error::Syntax { .. }));
    let e = load("a: 1\n b: 2\n", LoadOptions::default().filename("conf.yml")).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Structural);
    let mark = e.mark().unwrap();
    assert_eq!(mark.name.as_deref(), Some("conf.yml"));
    assert!(e.to_string().contains("conf.yml"));
    let e = load_err("a: b: c\n");
    assert!(e.to_string().contains("bad indentation of a mapping entry"));
}

#[test]
fn byte_order_mark() {
    assert_eq!(load_one("\u{FEFF}a: 1"), yaml_map! {"a" => 1});
}

#[test]
fn listener() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let record = events.clone();
    let opts = LoadOptions::default().listener(move |t| record.borrow_mut().push(t.clone()));
    load("[1, a]", opts).unwrap();
    let events = events.borrow();
    let opens = events.iter().filter(|t| t.event == NodeEvent::Open).count();
    let closes = events.iter().filter(|t| t.event == NodeEvent::Close).count();
    assert_eq!(opens, 3);
    assert_eq!(opens, closes);
    assert_eq!(events[0].event, NodeEvent::Open);
    assert_eq!(events[0].kind, None);
    let last = events.last().unwrap();
    assert_eq!(last.event, NodeEvent::Close);
    assert_eq!(last.kind, Some(Kind::Sequence));
    assert_eq!(last.value, Some(yaml_seq![1, "a"]));
    assert!(events
        .iter()
        .any(|t| t.tag.as_deref() == Some("tag:yaml.org,2002:int")));
}

#[test]
fn legacy_line_breaks() {
    let (v, warnings) = warnings_of("%YAML 1.1\n--- a\u{2028}b\n");
    assert_eq!(v, Some(Value::from("a\u{2028}b")));
    assert_eq!(warnings.len(), 1);
    let (_, warnings) = warnings_of("a\u{2028}b\n");
    assert!(warnings.is_empty());
}
