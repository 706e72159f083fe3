use crate::Value;
use ::serde::{
    ser::{Error as _, SerializeMap as _, SerializeSeq as _},
    Serialize, Serializer,
};
use std::cell::RefCell;

thread_local! {
    static VISITING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Serialize the children of a collection, return error if it contains itself.
fn enter<S, F>(id: usize, f: F) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    F: FnOnce() -> Result<S::Ok, S::Error>,
{
    if VISITING.with(|v| v.borrow().contains(&id)) {
        return Err(S::Error::custom("cannot serialize a cyclic value"));
    }
    VISITING.with(|v| v.borrow_mut().push(id));
    let r = f();
    VISITING.with(|v| v.borrow_mut().pop());
    r
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Timestamp(t) => serializer.collect_str(t),
            Value::Binary(b) => serializer.serialize_bytes(b),
            Value::Seq(a) => enter::<S, _>(a.id(), || {
                let a = a.borrow();
                let mut seq = serializer.serialize_seq(Some(a.len()))?;
                for item in a.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }),
            Value::Map(m) => enter::<S, _>(m.id(), || {
                let m = m.borrow();
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }),
        }
    }
}
