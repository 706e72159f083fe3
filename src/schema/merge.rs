use super::*;

/// `tag:yaml.org,2002:merge`, the `<<` key.
pub fn merge() -> Type {
    Type::new(tag!("merge"), Kind::Scalar)
        .resolve(|data| matches!(data, Value::Null) || data.as_str() == Some("<<"))
        .construct(|_| Value::from("<<"))
}
