use crate::Value;
use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

/// The prefix of the YAML core tags, `!!` in the shorthand form.
pub const DEFAULT_PREFIX: &str = "tag:yaml.org,2002:";

type Resolver = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
type Constructor = Arc<dyn Fn(Value) -> Value + Send + Sync>;
type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
type Representer = Arc<dyn Fn(&Value, &str) -> Option<String> + Send + Sync>;

/// The node shape a [`Type`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Scalar, the raw value is a [`Value::Str`], or [`Value::Null`] for an empty node.
    Scalar,
    /// Sequence, the raw value is a [`Value::Seq`].
    Sequence,
    /// Mapping, the raw value is a [`Value::Map`].
    Mapping,
}

impl Kind {
    /// Name of the kind used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
        }
    }
}

/// A tag declaration: the capability record used by loading and dumping.
///
/// + `resolve` decides whether a raw node matches the tag.
///   Implicit types are tried in order on untagged plain scalars.
/// + `construct` converts an accepted raw node into the final value.
/// + `predicate` picks the type for a value when dumping.
/// + `represent` renders the value into its lexical form with a named style.
///
/// ```
/// use yaml_codec::{load, LoadOptions, Schema, Type, Kind, Value};
///
/// let color = Type::new("!color", Kind::Scalar)
///     .resolve(|v| v.as_str().map_or(false, |s| s.starts_with('#')))
///     .construct(|v| Value::Int(i64::from_str_radix(&v.as_str().unwrap()[1..], 16).unwrap_or(0)));
/// let schema = Schema::default().extend(vec![], vec![color]).unwrap();
/// let v = load("!color '#ff'", LoadOptions::default().schema(schema)).unwrap();
/// assert_eq!(v, Some(Value::Int(255)));
/// ```
#[derive(Clone)]
pub struct Type {
    tag: String,
    kind: Kind,
    resolve: Option<Resolver>,
    construct: Option<Constructor>,
    predicate: Option<Predicate>,
    represent: Option<Representer>,
    default_style: Option<String>,
    style_aliases: Vec<(String, String)>,
}

impl Type {
    /// Declare a tag for the node kind.
    ///
    /// Without other capabilities, it accepts any node of the kind and keeps it.
    pub fn new<S: Into<String>>(tag: S, kind: Kind) -> Self {
        Self {
            tag: tag.into(),
            kind,
            resolve: None,
            construct: None,
            predicate: None,
            represent: None,
            default_style: None,
            style_aliases: Vec::new(),
        }
    }

    /// Builder function for the resolver.
    pub fn resolve<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.resolve = Some(Arc::new(f));
        self
    }

    /// Builder function for the constructor.
    pub fn construct<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.construct = Some(Arc::new(f));
        self
    }

    /// Builder function for the dumping predicate.
    pub fn predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(f));
        self
    }

    /// Builder function for the representer.
    ///
    /// The representer returns `None` if the style is not supported.
    pub fn represent<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &str) -> Option<String> + Send + Sync + 'static,
    {
        self.represent = Some(Arc::new(f));
        self
    }

    /// Builder function for the default representing style.
    pub fn default_style<S: Into<String>>(mut self, style: S) -> Self {
        self.default_style = Some(style.into());
        self
    }

    /// Builder function for a style alias, e.g. `hex` for `hexadecimal`.
    pub fn style_alias<S: Into<String>>(mut self, alias: S, style: S) -> Self {
        self.style_aliases.push((alias.into(), style.into()));
        self
    }

    /// The full tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The node kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Return true if the type can select values when dumping.
    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }

    /// Test the raw node.
    pub fn resolves(&self, raw: &Value) -> bool {
        match &self.resolve {
            Some(f) => f(raw),
            None => true,
        }
    }

    /// Convert the raw node.
    pub fn construct_value(&self, raw: Value) -> Value {
        match &self.construct {
            Some(f) => f(raw),
            None => raw,
        }
    }

    /// Test the value when dumping.
    pub fn matches(&self, value: &Value) -> bool {
        self.predicate.as_ref().map_or(false, |f| f(value))
    }

    /// Render the value. `Ok(None)` means the type has no representer.
    ///
    /// The style falls back to the default style, then to an empty name.
    pub fn represent_value(&self, value: &Value, style: Option<&str>) -> Result<Option<String>, String> {
        let Some(f) = &self.represent else {
            return Ok(None);
        };
        let style = style
            .or(self.default_style.as_deref())
            .unwrap_or_default();
        f(value, style).map(Some).ok_or_else(|| style.to_string())
    }

    /// Expand a style alias.
    pub fn style_name<'a>(&'a self, style: &'a str) -> &'a str {
        self.style_aliases
            .iter()
            .find(|(alias, _)| alias == style)
            .map_or(style, |(_, s)| s.as_str())
    }
}

impl Debug for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Type")
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .finish()
    }
}
