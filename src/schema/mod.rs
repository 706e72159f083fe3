//! Schema and type registry.
//!
//! A [`Schema`] is an immutable value built by the caller and passed into every
//! load and dump call. Types declared later override earlier types with the same
//! tag and kind, including the types of included schemas.
pub use self::ty::{Kind, Type, DEFAULT_PREFIX};
use crate::{Error, Result, Timestamp, Value};
use std::{collections::HashMap, sync::Arc};

macro_rules! tag {
    ($name:literal) => {
        concat!("tag:yaml.org,2002:", $name)
    };
}

mod binary;
mod boolean;
mod collections;
mod failsafe;
mod float;
mod int;
mod merge;
mod null;
mod timestamp;
mod ty;

pub(crate) use self::float::format_float;

/// Built-in types.
pub mod types {
    pub use super::binary::binary;
    pub use super::boolean::bool;
    pub use super::collections::{omap, pairs, set};
    pub use super::failsafe::{map, seq, str};
    pub use super::float::float;
    pub use super::int::int;
    pub use super::merge::merge;
    pub use super::null::null;
    pub use super::timestamp::timestamp;
}

/// Types by explicit tag, grouped by kind, plus a fallback table for empty nodes.
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    fallback: HashMap<String, Arc<Type>>,
    scalar: HashMap<String, Arc<Type>>,
    sequence: HashMap<String, Arc<Type>>,
    mapping: HashMap<String, Arc<Type>>,
}

impl TypeMap {
    fn compile(lists: &[&[Arc<Type>]]) -> Self {
        let mut map = Self::default();
        for ty in lists.iter().flat_map(|list| list.iter()) {
            let table = match ty.kind() {
                Kind::Scalar => &mut map.scalar,
                Kind::Sequence => &mut map.sequence,
                Kind::Mapping => &mut map.mapping,
            };
            table.insert(ty.tag().to_string(), ty.clone());
            map.fallback.insert(ty.tag().to_string(), ty.clone());
        }
        map
    }

    /// Find the type by tag for the node kind, `None` kind means an empty node.
    pub fn get(&self, kind: Option<Kind>, tag: &str) -> Option<&Arc<Type>> {
        let table = match kind {
            Some(Kind::Scalar) => &self.scalar,
            Some(Kind::Sequence) => &self.sequence,
            Some(Kind::Mapping) => &self.mapping,
            None => &self.fallback,
        };
        table.get(tag)
    }
}

/// The active set of implicit and explicit types.
///
/// ```
/// use yaml_codec::{Schema, Kind};
///
/// let schema = Schema::default();
/// assert_eq!(schema.implicit().len(), 6);
/// assert!(schema.type_map().get(Some(Kind::Scalar), "tag:yaml.org,2002:binary").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Schema {
    include: Vec<Schema>,
    own_implicit: Vec<Arc<Type>>,
    own_explicit: Vec<Arc<Type>>,
    implicit: Vec<Arc<Type>>,
    explicit: Vec<Arc<Type>>,
    type_map: TypeMap,
}

/// Flatten the lists of the included schemas and the own list,
/// a later type removes an earlier type with the same tag and kind.
fn compile_list(schema: &Schema, implicit: bool, mut result: Vec<Arc<Type>>) -> Vec<Arc<Type>> {
    for include in &schema.include {
        result = compile_list(include, implicit, result);
    }
    let own = if implicit {
        &schema.own_implicit
    } else {
        &schema.own_explicit
    };
    let mut exclude = Vec::new();
    for current in own {
        for (i, prev) in result.iter().enumerate() {
            if prev.tag() == current.tag() && prev.kind() == current.kind() {
                exclude.push(i);
            }
        }
        result.push(current.clone());
    }
    result
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !exclude.contains(i))
        .map(|(_, ty)| ty)
        .collect()
}

impl Schema {
    /// Create a schema from the included schemas and its own types.
    ///
    /// Implicit types must be scalar types,
    /// only a scalar can be resolved from its lexical form.
    pub fn new(include: Vec<Schema>, implicit: Vec<Type>, explicit: Vec<Type>) -> Result<Self> {
        if let Some(ty) = implicit.iter().find(|ty| ty.kind() != Kind::Scalar) {
            return Err(Error::Schema(format!(
                "there is a non-scalar type in the implicit list of a schema: !<{}> is a {}",
                ty.tag(),
                ty.kind().name()
            )));
        }
        let mut schema = Self {
            include,
            own_implicit: implicit.into_iter().map(Arc::new).collect(),
            own_explicit: explicit.into_iter().map(Arc::new).collect(),
            implicit: Vec::new(),
            explicit: Vec::new(),
            type_map: TypeMap::default(),
        };
        schema.implicit = compile_list(&schema, true, Vec::new());
        schema.explicit = compile_list(&schema, false, Vec::new());
        schema.type_map = TypeMap::compile(&[&schema.implicit, &schema.explicit]);
        Ok(schema)
    }

    /// Create a schema that includes this one with additional types.
    pub fn extend(&self, implicit: Vec<Type>, explicit: Vec<Type>) -> Result<Self> {
        Self::new(vec![self.clone()], implicit, explicit)
    }

    /// Strings, sequences and mappings only.
    pub fn failsafe() -> Self {
        Self::from_builtin(vec![], vec![], vec![types::str(), types::seq(), types::map()])
    }

    /// The JSON compatible schema: adds null, bool, int and float.
    pub fn json() -> Self {
        let implicit = vec![types::null(), types::bool(), types::int(), types::float()];
        Self::from_builtin(vec![Self::failsafe()], implicit, vec![])
    }

    /// The YAML 1.2 core schema, same types as [`Schema::json`].
    pub fn core() -> Self {
        Self::from_builtin(vec![Self::json()], vec![], vec![])
    }

    fn from_builtin(include: Vec<Schema>, implicit: Vec<Type>, explicit: Vec<Type>) -> Self {
        match Self::new(include, implicit, explicit) {
            Ok(schema) => schema,
            Err(e) => unreachable!("built-in schema: {}", e),
        }
    }

    /// Implicit types in resolving order.
    pub fn implicit(&self) -> &[Arc<Type>] {
        &self.implicit
    }

    /// Explicit types in declaration order.
    pub fn explicit(&self) -> &[Arc<Type>] {
        &self.explicit
    }

    /// The compiled lookup table.
    pub fn type_map(&self) -> &TypeMap {
        &self.type_map
    }

    /// Return true if a plain scalar would be resolved to a non-string type.
    pub fn is_ambiguous(&self, s: &str) -> bool {
        let raw = Value::from(s);
        self.implicit.iter().any(|ty| ty.resolves(&raw))
    }
}

/// The default schema: the core schema plus timestamp and merge as implicit
/// types, and binary, omap, pairs and set as explicit types.
impl Default for Schema {
    fn default() -> Self {
        Self::from_builtin(
            vec![Self::core()],
            vec![types::timestamp(), types::merge()],
            vec![types::binary(), types::omap(), types::pairs(), types::set()],
        )
    }
}

/// Expand the `!!` shorthand of a tag.
///
/// ```
/// use yaml_codec::schema::expand_tag;
/// assert_eq!("tag:yaml.org,2002:int", expand_tag("!!int"));
/// assert_eq!("!local", expand_tag("!local"));
/// ```
pub fn expand_tag(tag: &str) -> String {
    match tag.strip_prefix("!!") {
        Some(name) => format!("{}{}", DEFAULT_PREFIX, name),
        None => tag.to_string(),
    }
}

/// Shorten a full tag for output.
///
/// ```
/// use yaml_codec::schema::shorten_tag;
/// assert_eq!("!!binary", shorten_tag("tag:yaml.org,2002:binary"));
/// assert_eq!("!local", shorten_tag("!local"));
/// assert_eq!("!<tag:example.com,2000:a>", shorten_tag("tag:example.com,2000:a"));
/// ```
pub fn shorten_tag(tag: &str) -> String {
    if tag.starts_with('!') {
        let name = tag[1..].replace('!', "%21");
        format!("!{}", name)
    } else if let Some(name) = tag.strip_prefix(DEFAULT_PREFIX) {
        format!("!!{}", name.replace('!', "%21"))
    } else {
        format!("!<{}>", tag)
    }
}
