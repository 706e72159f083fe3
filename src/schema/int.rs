use super::*;

fn digits(s: &str, radix: u32) -> Option<u64> {
    // Separators are allowed between digits but not at the end
    if s.is_empty() || s.ends_with('_') {
        return None;
    }
    let s = s.replace('_', "");
    if s.is_empty() || !s.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(&s, radix).ok()
}

fn sexagesimal(s: &str) -> Option<u64> {
    let mut parts = s.split(':');
    let mut n = digits(parts.next()?, 10)?;
    for part in parts {
        if part.is_empty() || part.len() > 2 || !part.bytes().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let d = part.parse::<u64>().ok()?;
        if d >= 60 {
            return None;
        }
        n = n.checked_mul(60)?.checked_add(d)?;
    }
    Some(n)
}

/// Parse the YAML integer forms: decimal, `0b` binary, `0x` hexadecimal,
/// leading-zero octal, `0o` octal and base 60, with `_` separators.
pub(crate) fn parse_int(data: &str) -> Option<i64> {
    let (neg, body) = match data.as_bytes().first()? {
        b'-' => (true, &data[1..]),
        b'+' => (false, &data[1..]),
        _ => (false, data),
    };
    let n = if body == "0" {
        0
    } else if let Some(b) = body.strip_prefix("0b") {
        digits(b, 2)?
    } else if let Some(x) = body.strip_prefix("0x") {
        digits(x, 16)?
    } else if let Some(o) = body.strip_prefix("0o") {
        digits(o, 8)?
    } else if let Some(o) = body.strip_prefix('0') {
        digits(o, 8)?
    } else if body.starts_with('_') {
        return None;
    } else if body.contains(':') {
        sexagesimal(body)?
    } else {
        digits(body, 10)?
    };
    // The magnitude of `i64::MIN` only fits after the sign is applied
    let n = i128::from(n);
    i64::try_from(if neg { -n } else { n }).ok()
}

fn radix(n: i64, prefix: &str, digits: String) -> String {
    let sign = if n < 0 { "-" } else { "" };
    format!("{}{}{}", sign, prefix, digits)
}

/// `tag:yaml.org,2002:int`
pub fn int() -> Type {
    Type::new(tag!("int"), Kind::Scalar)
        .resolve(|data| data.as_str().and_then(parse_int).is_some())
        .construct(|data| match data.as_str().and_then(parse_int) {
            Some(n) => Value::Int(n),
            None => data,
        })
        .predicate(|v| matches!(v, Value::Int(_)))
        .represent(|v, style| {
            let n = v.as_int()?;
            let a = n.unsigned_abs();
            Some(match style {
                "binary" => radix(n, "0b", format!("{:b}", a)),
                "octal" => radix(n, "0o", format!("{:o}", a)),
                "decimal" => n.to_string(),
                "hexadecimal" => radix(n, "0x", format!("{:X}", a)),
                _ => return None,
            })
        })
        .default_style("decimal")
        .style_alias("bin", "binary")
        .style_alias("2", "binary")
        .style_alias("oct", "octal")
        .style_alias("8", "octal")
        .style_alias("dec", "decimal")
        .style_alias("10", "decimal")
        .style_alias("hex", "hexadecimal")
        .style_alias("16", "hexadecimal")
}
