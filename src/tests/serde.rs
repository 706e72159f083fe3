use super::*;

#[test]
fn to_json() {
    let v = load_one("a: [1, 2.5, ~, true, s]\nb: 2002-12-14\n");
    let json = serde_json::to_string(&v).unwrap();
    assert_eq!(json, r#"{"a":[1,2.5,null,true,"s"],"b":"2002-12-14"}"#);
}

#[test]
fn from_json() {
    let v = serde_json::from_str::<Value>(TEST_JSON).unwrap_or_else(|e| panic!("{}", e));
    assert_eq!(v, load_one(TEST_JSON));
    let v = serde_json::from_str::<Value>("18446744073709551615").unwrap();
    assert_eq!(v, Value::Float(18446744073709551615.));
}

#[test]
fn cyclic_value() {
    let v = Value::new_map();
    v.as_map().unwrap().borrow_mut().insert("self".into(), v.clone());
    assert!(serde_json::to_string(&v).is_err());
}
