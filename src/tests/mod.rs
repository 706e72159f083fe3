use super::*;

mod dump;
mod load;
#[cfg(feature = "serde")]
mod serde;

const TEST_JSON: &str = include_str!("test.json");
const TEST_YAML: &str = include_str!("test.yaml");

fn load_one(doc: &str) -> Value {
    load(doc, LoadOptions::default())
        .unwrap_or_else(|e| panic!("{}", e))
        .unwrap_or_else(|| panic!("no document"))
}

#[test]
fn test_json() {
    let ans = load(TEST_JSON, LoadOptions::default().json(true))
        .unwrap_or_else(|e| panic!("{}", e))
        .unwrap();
    assert_eq!(
        ans,
        yaml_map! {
            "a" => "b",
            "c" => yaml_seq![123, 321, 1234567],
            "d" => yaml_map! {},
            "e" => "é😀",
            "f" => yaml_seq![true, false, (), -1500.],
        }
    );
    assert_eq!(ans.get("a"), Some(Value::from("b")));
}

#[test]
fn test_yaml() {
    let ans = load_one(TEST_YAML);
    let x = yaml_seq!["d1🀄🃏", "中文"];
    assert_eq!(
        ans,
        yaml_map! {
            "a0 bb" => "val",
            "::a1" => yaml_map! {
                "b1" => 4.,
                "b2" => yaml_seq!["50%", 2e-4, f64::NAN, f64::NEG_INFINITY, "-.infs"],
            },
            "-a2" => 4.03,
            yaml_seq!["q", "r", "s"] => yaml_map! {1 => 2, 3 => 4},
            "?a3" => yaml_seq![x.clone(), x, (), ()],
            "base" => yaml_map! {"name" => "base", "size" => 1},
            "derived" => yaml_map! {"name" => "base", "size" => 2},
            "when" => Timestamp::date(2001, 12, 14)
                .time(21, 59, 43)
                .nanosecond(100_000_000)
                .offset(-300),
            "test multiline" => yaml_map! {
                "folded" => "aaa bbb ccc\nddd\n",
                "literal" => "aaa\nbbb\n  ccc\n\n  ddd\n",
                "plain" => "aaa bbb ccc\nddd",
                "single quoted" => "aaa 'bbb' ccc",
                "double quoted" => "aaa \"bbb\"\tccc",
            },
        }
    );
    let a3 = ans.get("?a3").unwrap();
    let (first, second) = (a3.at(0).unwrap(), a3.at(1).unwrap());
    assert!(first.as_seq().unwrap().ptr_eq(second.as_seq().unwrap()));
}

#[test]
fn test_round_trip() {
    let doc = "- a\n- b\n- 3\n";
    let v = load_one(doc);
    assert_eq!(v, yaml_seq!["a", "b", 3]);
    assert_eq!(dump(&v, DumpOptions::default()).unwrap(), doc);
}

#[test]
fn test_dump_idempotent() {
    for doc in [TEST_YAML, TEST_JSON] {
        let v = load_one(doc);
        let first = dump(&v, DumpOptions::default()).unwrap_or_else(|e| panic!("{}", e));
        let reloaded = load_one(&first);
        assert_eq!(reloaded, v, "{}", first);
        let second = dump(&reloaded, DumpOptions::default()).unwrap();
        assert_eq!(first, second);
    }
}
