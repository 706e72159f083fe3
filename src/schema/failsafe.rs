use super::*;

/// `tag:yaml.org,2002:str`
pub fn str() -> Type {
    Type::new(tag!("str"), Kind::Scalar).construct(|data| match data {
        Value::Null => Value::Str(String::new()),
        data => data,
    })
}

/// `tag:yaml.org,2002:seq`
pub fn seq() -> Type {
    Type::new(tag!("seq"), Kind::Sequence).construct(|data| match data {
        Value::Null => Value::new_seq(),
        data => data,
    })
}

/// `tag:yaml.org,2002:map`
pub fn map() -> Type {
    Type::new(tag!("map"), Kind::Mapping).construct(|data| match data {
        Value::Null => Value::new_map(),
        data => data,
    })
}
