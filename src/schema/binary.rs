use super::*;
use base64::{engine::general_purpose::STANDARD, Engine as _};

fn decode(data: &Value) -> Option<Vec<u8>> {
    match data {
        Value::Null => Some(Vec::new()),
        Value::Str(s) => {
            let s = s
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect::<String>();
            STANDARD.decode(s).ok()
        }
        _ => None,
    }
}

/// `tag:yaml.org,2002:binary`, base64 encoded bytes.
pub fn binary() -> Type {
    Type::new(tag!("binary"), Kind::Scalar)
        .resolve(|data| decode(data).is_some())
        .construct(|data| match decode(&data) {
            Some(b) => Value::Binary(b),
            None => data,
        })
        .predicate(|v| matches!(v, Value::Binary(_)))
        .represent(|v, _| match v {
            Value::Binary(b) => Some(STANDARD.encode(b)),
            _ => None,
        })
}
