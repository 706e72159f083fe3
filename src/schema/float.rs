use super::*;
use once_cell::sync::Lazy;
use regex::Regex;

static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:[-+]?(?:0|[1-9][0-9_]*)(?:\.[0-9_]*)?(?:[eE][-+]?[0-9]+)?",
        r"|\.[0-9_]+(?:[eE][-+]?[0-9]+)?",
        r"|[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*",
        r"|[-+]?\.(?:inf|Inf|INF)",
        r"|\.(?:nan|NaN|NAN))$",
    ))
    .unwrap()
});

fn resolve_float(data: &Value) -> bool {
    match data.as_str() {
        Some(s) => FLOAT.is_match(s) && !s.ends_with('_'),
        None => false,
    }
}

pub(crate) fn parse_float(data: &str) -> Option<f64> {
    let s = data.replace('_', "").to_lowercase();
    let (sign, body) = match s.as_bytes().first()? {
        b'-' => (-1., &s[1..]),
        b'+' => (1., &s[1..]),
        _ => (1., s.as_str()),
    };
    if body == ".inf" {
        Some(sign * f64::INFINITY)
    } else if body == ".nan" {
        Some(f64::NAN)
    } else if body.contains(':') {
        let mut n = 0.;
        for part in body.split(':') {
            n = n * 60. + part.parse::<f64>().ok()?;
        }
        Some(sign * n)
    } else {
        body.parse::<f64>().ok().map(|n| sign * n)
    }
}

/// Format a finite float that reads back as a float, not an integer.
pub(crate) fn format_float(f: f64) -> String {
    let s = format!("{:?}", f);
    // Rust writes `1e20`, the pattern wants the exponent after a mantissa
    if s.contains(['e', 'E']) && !s.contains('.') {
        s.replacen('e', ".0e", 1)
    } else {
        s
    }
}

/// `tag:yaml.org,2002:float`
pub fn float() -> Type {
    Type::new(tag!("float"), Kind::Scalar)
        .resolve(resolve_float)
        .construct(|data| match data.as_str().and_then(parse_float) {
            Some(f) => Value::Float(f),
            None => data,
        })
        .predicate(|v| matches!(v, Value::Float(_)))
        .represent(|v, style| {
            let Value::Float(f) = v else {
                return None;
            };
            let special = |lower: &str, upper: &str, camel: &str| match style {
                "lowercase" => Some(lower.to_string()),
                "uppercase" => Some(upper.to_string()),
                "camelcase" => Some(camel.to_string()),
                _ => None,
            };
            if f.is_nan() {
                special(".nan", ".NAN", ".NaN")
            } else if *f == f64::INFINITY {
                special(".inf", ".INF", ".Inf")
            } else if *f == f64::NEG_INFINITY {
                special("-.inf", "-.INF", "-.Inf")
            } else {
                special("", "", "")?;
                Some(format_float(*f))
            }
        })
        .default_style("lowercase")
}
