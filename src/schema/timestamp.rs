use super::*;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").unwrap());

static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^([0-9]{4})-([0-9][0-9]?)-([0-9][0-9]?)",
        r"(?:[Tt]|[ \t]+)([0-9][0-9]?):([0-9]{2}):([0-9]{2})",
        r"(?:\.([0-9]*))?",
        r"(?:[ \t]*(Z|([-+])([0-9][0-9]?)(?::([0-9]{2}))?))?$",
    ))
    .unwrap()
});

pub(crate) fn parse_timestamp(data: &str) -> Option<Timestamp> {
    if let Some(cap) = DATE.captures(data) {
        let t = Timestamp::date(cap[1].parse().ok()?, cap[2].parse().ok()?, cap[3].parse().ok()?);
        return valid(t);
    }
    let cap = TIMESTAMP.captures(data)?;
    let mut t = Timestamp::date(cap[1].parse().ok()?, cap[2].parse().ok()?, cap[3].parse().ok()?)
        .time(cap[4].parse().ok()?, cap[5].parse().ok()?, cap[6].parse().ok()?);
    if let Some(frac) = cap.get(7) {
        let frac = format!("{:0<9}", &frac.as_str()[..frac.as_str().len().min(9)]);
        t = t.nanosecond(frac.parse().ok()?);
    }
    if cap.get(8).is_some() {
        let mut offset = 0;
        if let Some(h) = cap.get(10) {
            let h = h.as_str().parse::<i32>().ok()?;
            let m = cap.get(11).map_or(Some(0), |m| m.as_str().parse::<i32>().ok())?;
            offset = h * 60 + m;
            if &cap[9] == "-" {
                offset = -offset;
            }
        }
        t = t.offset(offset);
    }
    valid(t)
}

fn valid(t: Timestamp) -> Option<Timestamp> {
    let in_range = (1..=12).contains(&t.month)
        && (1..=31).contains(&t.day)
        && t.time.map_or(true, |(h, m, s)| h < 24 && m < 60 && s < 61);
    in_range.then_some(t)
}

/// `tag:yaml.org,2002:timestamp`
pub fn timestamp() -> Type {
    Type::new(tag!("timestamp"), Kind::Scalar)
        .resolve(|data| data.as_str().and_then(parse_timestamp).is_some())
        .construct(|data| match data.as_str().and_then(parse_timestamp) {
            Some(t) => Value::Timestamp(t),
            None => data,
        })
        .predicate(|v| matches!(v, Value::Timestamp(_)))
        .represent(|v, _| match v {
            Value::Timestamp(t) => Some(t.to_string()),
            _ => None,
        })
}
