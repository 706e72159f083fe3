use super::*;

fn resolve_null(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Str(s) => matches!(s.as_str(), "~" | "null" | "Null" | "NULL"),
        _ => false,
    }
}

/// `tag:yaml.org,2002:null`
pub fn null() -> Type {
    Type::new(tag!("null"), Kind::Scalar)
        .resolve(resolve_null)
        .construct(|_| Value::Null)
        .predicate(Value::is_null)
        .represent(|_, style| {
            Some(match style {
                "canonical" => "~",
                "lowercase" => "null",
                "uppercase" => "NULL",
                "camelcase" => "Null",
                "empty" => "",
                _ => return None,
            })
            .map(str::to_string)
        })
        .default_style("lowercase")
        .style_alias("~", "canonical")
        .style_alias("null", "lowercase")
        .style_alias("NULL", "uppercase")
        .style_alias("Null", "camelcase")
}
