use super::*;

fn resolve_bool(data: &Value) -> bool {
    matches!(
        data.as_str(),
        Some("true" | "True" | "TRUE" | "false" | "False" | "FALSE")
    )
}

/// `tag:yaml.org,2002:bool`
pub fn bool() -> Type {
    Type::new(tag!("bool"), Kind::Scalar)
        .resolve(resolve_bool)
        .construct(|data| Value::Bool(matches!(data.as_str(), Some("true" | "True" | "TRUE"))))
        .predicate(|v| matches!(v, Value::Bool(_)))
        .represent(|v, style| {
            let b = v.as_bool()?;
            let s = match style {
                "lowercase" => if b { "true" } else { "false" },
                "uppercase" => if b { "TRUE" } else { "FALSE" },
                "camelcase" => if b { "True" } else { "False" },
                _ => return None,
            };
            Some(s.to_string())
        })
        .default_style("lowercase")
}
