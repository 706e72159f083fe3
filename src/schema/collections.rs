use super::*;

/// Each item of a sequence is a map with exactly one pair.
fn single_pairs(data: &Value) -> Option<Vec<(Value, Value)>> {
    let seq = data.as_seq()?.borrow();
    let mut pairs = Vec::with_capacity(seq.len());
    for item in seq.iter() {
        let m = item.as_map()?.borrow();
        if m.len() != 1 {
            return None;
        }
        let (k, v) = m.iter().next()?;
        pairs.push((k.clone(), v.clone()));
    }
    Some(pairs)
}

/// `tag:yaml.org,2002:omap`, ordered map with unique keys.
pub fn omap() -> Type {
    Type::new(tag!("omap"), Kind::Sequence).resolve(|data| match data {
        Value::Null => true,
        data => single_pairs(data).map_or(false, |pairs| {
            let mut keys = std::collections::HashSet::new();
            pairs.into_iter().all(|(k, _)| keys.insert(k))
        }),
    })
}

/// `tag:yaml.org,2002:pairs`, ordered pairs, keys may repeat.
///
/// Constructed as a sequence of two-item sequences.
pub fn pairs() -> Type {
    Type::new(tag!("pairs"), Kind::Sequence)
        .resolve(|data| data.is_null() || single_pairs(data).is_some())
        .construct(|data| match single_pairs(&data) {
            Some(pairs) => pairs
                .into_iter()
                .map(|(k, v)| Value::from(vec![k, v]))
                .collect(),
            None => Value::new_seq(),
        })
}

/// `tag:yaml.org,2002:set`, a map with null values.
pub fn set() -> Type {
    Type::new(tag!("set"), Kind::Mapping)
        .resolve(|data| match data {
            Value::Null => true,
            Value::Map(m) => m.borrow().values().all(Value::is_null),
            _ => false,
        })
        .construct(|data| match data {
            Value::Null => Value::new_map(),
            data => data,
        })
}
