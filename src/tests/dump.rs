use super::*;
use std::sync::Arc;

fn dump_ok(v: &Value, opts: DumpOptions) -> String {
    dump(v, opts).unwrap_or_else(|e| panic!("{}", e))
}

#[test]
fn scalars() {
    let v = yaml_seq![
        (),
        true,
        -7,
        0.5,
        1e20,
        f64::NAN,
        f64::NEG_INFINITY,
        "",
        "123",
        "null",
        "yes",
        "it's",
        "- dash",
        "a: b",
        "x #y",
    ];
    let doc = dump_ok(&v, DumpOptions::default());
    assert_eq!(
        doc,
        "- null\n- true\n- -7\n- 0.5\n- 1.0e20\n- .nan\n- -.inf\n- ''\n- '123'\n- 'null'\n\
         - 'yes'\n- it's\n- '- dash'\n- 'a: b'\n- 'x #y'\n"
    );
    assert_eq!(load_one(&doc), v);
    let doc = dump_ok(&Value::from("yes"), DumpOptions::default().no_compat_mode(true));
    assert_eq!(doc, "yes\n");
    let v = yaml_seq![i64::MIN, i64::MAX];
    let doc = dump_ok(&v, DumpOptions::default());
    assert_eq!(doc, "- -9223372036854775808\n- 9223372036854775807\n");
    assert_eq!(load_one(&doc), v);
}

#[test]
fn collections() {
    let v = yaml_map! {
        "a" => yaml_seq![1, yaml_map! {"b" => 2, "c" => 3}, yaml_seq![4, 5]],
        "d" => yaml_map! {"e" => yaml_map! {}},
        "f" => yaml_seq![],
    };
    let doc = dump_ok(&v, DumpOptions::default());
    assert_eq!(
        doc,
        "a:\n  - 1\n  - b: 2\n    c: 3\n  - - 4\n    - 5\nd:\n  e: {}\nf: []\n"
    );
    assert_eq!(load_one(&doc), v);
}

#[test]
fn indent_options() {
    let v = yaml_map! {"a" => yaml_seq![1, 2], "b" => yaml_map! {"c" => 3}};
    let doc = dump_ok(&v, DumpOptions::default().no_array_indent(true));
    assert_eq!(doc, "a:\n- 1\n- 2\nb:\n  c: 3\n");
    let doc = dump_ok(&v, DumpOptions::default().indent(4));
    assert_eq!(doc, "a:\n    - 1\n    - 2\nb:\n    c: 3\n");
    assert_eq!(load_one(&doc), v);
}

#[test]
fn flow_level() {
    let v = yaml_map! {"a" => yaml_seq![1, 2], "b" => yaml_map! {"c" => "d e"}};
    assert_eq!(
        dump_ok(&v, DumpOptions::default().flow_level(0)),
        "{a: [1, 2], b: {c: d e}}\n"
    );
    assert_eq!(
        dump_ok(&v, DumpOptions::default().flow_level(1)),
        "a: [1, 2]\nb: {c: d e}\n"
    );
    assert_eq!(
        dump_ok(&v, DumpOptions::default().flow_level(0).condense_flow(true)),
        "{\"a\":[1,2],\"b\":{\"c\":d e}}\n"
    );
    let v = yaml_map! {"a\\b" => 1, "c\"d" => 2};
    let doc = dump_ok(&v, DumpOptions::default().flow_level(0).condense_flow(true));
    assert_eq!(doc, "{\"a\\\\b\":1,\"c\\\"d\":2}\n");
    assert_eq!(load_one(&doc), v);
}

#[test]
fn sort_keys() {
    let v = yaml_map! {"b" => 1, "c" => 2, "a" => 3};
    let doc = dump_ok(&v, DumpOptions::default().sort_keys(SortKeys::Lexical));
    assert_eq!(doc, "a: 3\nb: 1\nc: 2\n");
    let order: KeyOrder = Arc::new(|a: &Value, b: &Value| b.as_str().cmp(&a.as_str()));
    let doc = dump_ok(&v, DumpOptions::default().sort_keys(SortKeys::Custom(order)));
    assert_eq!(doc, "c: 2\nb: 1\na: 3\n");
}

#[test]
fn styles() {
    let v = yaml_seq![10, -3, f64::INFINITY];
    let opts = DumpOptions::default()
        .style("!!int", "bin")
        .style("tag:yaml.org,2002:float", "uppercase");
    assert_eq!(dump_ok(&v, opts), "- 0b1010\n- -0b11\n- .INF\n");
    let opts = DumpOptions::default().style("!!int", "octal");
    assert_eq!(dump_ok(&Value::from(8), opts), "0o10\n");
    let e = dump(&Value::from(1), DumpOptions::default().style("!!int", "roman")).unwrap_err();
    assert!(matches!(e, Error::InvalidStyle { .. }));
    assert_eq!(e.kind(), ErrorKind::SchemaConfig);
}

#[test]
fn explicit_types() {
    let v = yaml_map! {
        "bin" => Value::Binary(b"hello".to_vec()),
        "date" => Timestamp::date(2002, 12, 14),
    };
    let doc = dump_ok(&v, DumpOptions::default());
    assert_eq!(doc, "bin: !!binary aGVsbG8=\ndate: 2002-12-14\n");
    assert_eq!(load_one(&doc), v);
}

#[test]
fn unacceptable_values() {
    let v = yaml_map! {"a" => 1, "b" => "x"};
    let opts = DumpOptions::default().schema(Schema::failsafe());
    let e = dump(&v, opts.clone()).unwrap_err();
    assert_eq!(e, Error::UnacceptableValue("int".to_string()));
    assert_eq!(dump_ok(&v, opts.clone().skip_invalid(true)), "b: x\n");
    assert_eq!(dump_ok(&Value::from(1), opts.skip_invalid(true)), "");
}

#[test]
fn references() {
    let shared = yaml_seq![1, 2];
    let v = yaml_map! {"a" => shared.clone(), "b" => shared};
    let doc = dump_ok(&v, DumpOptions::default());
    assert_eq!(doc, "a: &ref_0\n  - 1\n  - 2\nb: *ref_0\n");
    let back = load_one(&doc);
    let (a, b) = (back.get("a").unwrap(), back.get("b").unwrap());
    assert!(a.as_seq().unwrap().ptr_eq(b.as_seq().unwrap()));
    let doc = dump_ok(&v, DumpOptions::default().no_refs(true));
    assert_eq!(doc, "a:\n  - 1\n  - 2\nb:\n  - 1\n  - 2\n");
}

#[test]
fn cycles() {
    let v = Value::new_seq();
    v.as_seq().unwrap().borrow_mut().push(v.clone());
    let doc = dump_ok(&v, DumpOptions::default());
    assert_eq!(doc, "&ref_0\n- *ref_0\n");
    let back = load_one(&doc);
    let inner = back.at(0).unwrap();
    assert!(inner.as_seq().unwrap().ptr_eq(back.as_seq().unwrap()));
    let e = dump(&v, DumpOptions::default().no_refs(true)).unwrap_err();
    assert_eq!(e, Error::CyclicValue);
    assert_eq!(e.kind(), ErrorKind::Unacceptable);
}

#[test]
fn line_width() {
    let fits = format!("{} {}", "a".repeat(20), "b".repeat(19));
    let over = format!("{} {}", "a".repeat(20), "b".repeat(20));
    let opts = DumpOptions::default().line_width(40);
    assert_eq!(dump_ok(&Value::from(fits.as_str()), opts.clone()), format!("{}\n", fits));
    let doc = dump_ok(&Value::from(over.as_str()), opts.clone());
    assert_eq!(doc, format!(">-\n  {}\n  {}\n", "a".repeat(20), "b".repeat(20)));
    assert_eq!(load_one(&doc), Value::from(over.as_str()));
    let doc = dump_ok(&Value::from(over.as_str()), opts.line_width(-1));
    assert_eq!(doc, format!("{}\n", over));
}

#[test]
fn block_strings() {
    let v = yaml_seq!["a\nb\n", "a\nb", "a\n\n", " lead\nx\n"];
    let doc = dump_ok(&v, DumpOptions::default());
    assert_eq!(doc, "- |\n  a\n  b\n- |-\n  a\n  b\n- |+\n  a\n\n- |2\n   lead\n  x\n");
    assert_eq!(load_one(&doc), v);
    // The top-level indicator counts from the column before the document
    let doc = dump_ok(&Value::from(" lead\n"), DumpOptions::default());
    assert_eq!(doc, "|3\n   lead\n");
    for s in ["\n a", "  \n  ", " lead\nx\n"] {
        let v = Value::from(s);
        assert_eq!(load_one(&dump_ok(&v, DumpOptions::default())), v);
        let v = yaml_map! {"k" => s};
        assert_eq!(load_one(&dump_ok(&v, DumpOptions::default())), v);
    }
}

#[test]
fn escapes() {
    let s = "tab\there \u{1} bell\u{7} \u{1F600} \u{FEFF} \u{85}";
    let doc = dump_ok(&Value::from(s), DumpOptions::default());
    assert_eq!(
        doc,
        "\"tab\\there \\x01 bell\\a \u{1F600} \\uFEFF \\N\"\n"
    );
    assert_eq!(load_one(&doc), Value::from(s));
}

#[test]
fn explicit_keys() {
    let long = "k".repeat(EXPLICIT_KEY_THRESHOLD + 1);
    let v = yaml_map! {long.as_str() => "v"};
    let doc = dump_ok(&v, DumpOptions::default());
    assert_eq!(doc, format!("? {}\n: v\n", long));
    assert_eq!(load_one(&doc), v);
    let short = "k".repeat(EXPLICIT_KEY_THRESHOLD);
    let v = yaml_map! {short.as_str() => "v"};
    assert_eq!(dump_ok(&v, DumpOptions::default()), format!("{}: v\n", short));
    let v = yaml_map! {yaml_seq![1, 2] => "v"};
    let doc = dump_ok(&v, DumpOptions::default());
    assert_eq!(doc, "? - 1\n  - 2\n: v\n");
    assert_eq!(load_one(&doc), v);
    let v = yaml_map! {yaml_seq![1] => "v"};
    let doc = dump_ok(&v, DumpOptions::default());
    assert_eq!(doc, "? - 1\n: v\n");
    assert_eq!(load_one(&doc), v);
    let v = yaml_map! {yaml_map! {"a" => 1} => "v"};
    let doc = dump_ok(&v, DumpOptions::default());
    assert_eq!(doc, "? a: 1\n: v\n");
    assert_eq!(load_one(&doc), v);
}
