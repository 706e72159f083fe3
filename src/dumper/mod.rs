//! Dumper components.
use self::scalar::*;
use crate::{
    anchors::Anchors,
    schema::{expand_tag, format_float, shorten_tag},
    Error, Map, Result, Schema, Seq, Value,
};
use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

mod scalar;

/// A key longer than this is written as an explicit pair (`? key`).
pub const EXPLICIT_KEY_THRESHOLD: usize = 1024;

/// The words that YAML 1.1 reads as booleans, they are quoted in the compatible mode.
const DEPRECATED_BOOLEANS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "on", "On", "ON", "n", "N", "no", "No", "NO", "off", "Off",
    "OFF",
];

/// The comparator of [`SortKeys::Custom`].
pub type KeyOrder = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

/// The order of the map keys in the output.
#[derive(Clone, Default)]
pub enum SortKeys {
    /// Keep the insertion order.
    #[default]
    Insertion,
    /// Sort by the lexical form of the keys.
    Lexical,
    /// Sort by a comparator.
    Custom(KeyOrder),
}

impl Debug for SortKeys {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Insertion => f.write_str("Insertion"),
            Self::Lexical => f.write_str("Lexical"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// The text of a scalar key used by [`SortKeys::Lexical`].
fn key_text(key: &Value) -> String {
    match key {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => format_float(*f),
        Value::Str(s) => s.clone(),
        Value::Timestamp(t) => t.to_string(),
        _ => String::new(),
    }
}

/// The options of the dumper.
///
/// ```
/// use yaml_codec::{dump, yaml_map, DumpOptions, SortKeys};
///
/// let v = yaml_map! {"b" => 1, "a" => 0xff};
/// let opts = DumpOptions::default()
///     .sort_keys(SortKeys::Lexical)
///     .style("!!int", "hex");
/// assert_eq!(dump(&v, opts).unwrap(), "a: 0xFF\nb: 0x1\n");
/// ```
#[derive(Debug, Clone)]
pub struct DumpOptions {
    schema: Schema,
    indent: usize,
    no_array_indent: bool,
    skip_invalid: bool,
    flow_level: i32,
    styles: HashMap<String, String>,
    sort_keys: SortKeys,
    line_width: i32,
    no_refs: bool,
    no_compat_mode: bool,
    condense_flow: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            schema: Schema::default(),
            indent: 2,
            no_array_indent: false,
            skip_invalid: false,
            flow_level: -1,
            styles: HashMap::new(),
            sort_keys: SortKeys::Insertion,
            line_width: 80,
            no_refs: false,
            no_compat_mode: false,
            condense_flow: false,
        }
    }
}

impl DumpOptions {
    /// Builder function for the schema.
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Builder function for the indentation width, at least one.
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }

    /// Builder function to write the sequence items at the level of their parent.
    pub fn no_array_indent(mut self, yes: bool) -> Self {
        self.no_array_indent = yes;
        self
    }

    /// Builder function to skip the values that cannot be represented.
    pub fn skip_invalid(mut self, yes: bool) -> Self {
        self.skip_invalid = yes;
        self
    }

    /// Builder function for the nesting level to switch to the flow style, `-1` means never.
    pub fn flow_level(mut self, level: i32) -> Self {
        self.flow_level = level;
        self
    }

    /// Builder function for the style of a tag, the tag can be a `!!` shorthand.
    pub fn style<T: Into<String>, S: Into<String>>(mut self, tag: T, style: S) -> Self {
        self.styles.insert(tag.into(), style.into());
        self
    }

    /// Builder function for the order of the map keys.
    pub fn sort_keys(mut self, sort_keys: SortKeys) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    /// Builder function for the preferred line width, `-1` means unlimited.
    pub fn line_width(mut self, width: i32) -> Self {
        self.line_width = width;
        self
    }

    /// Builder function to write the shared collections in full, without anchors.
    ///
    /// A cyclic value is an error in this mode.
    pub fn no_refs(mut self, yes: bool) -> Self {
        self.no_refs = yes;
        self
    }

    /// Builder function to stop quoting the YAML 1.1 booleans like `yes` and `off`.
    pub fn no_compat_mode(mut self, yes: bool) -> Self {
        self.no_compat_mode = yes;
        self
    }

    /// Builder function to remove the spaces of the flow collections and quote their keys.
    pub fn condense_flow(mut self, yes: bool) -> Self {
        self.condense_flow = yes;
        self
    }

    /// Expand the tags and the style aliases of the style map.
    fn compile_styles(&self) -> HashMap<String, String> {
        self.styles
            .iter()
            .map(|(tag, style)| {
                let tag = expand_tag(tag);
                let style = match self.schema.type_map().get(None, &tag) {
                    Some(ty) => ty.style_name(style).to_string(),
                    None => style.clone(),
                };
                (tag, style)
            })
            .collect()
    }
}

/// The type matched by the predicates.
struct Detected {
    /// The tag of an explicit type.
    tag: Option<String>,
    /// The represented text.
    text: Option<String>,
}

/// A written node.
struct Dump {
    text: String,
    /// Written with an explicit tag.
    tagged: bool,
}

/// The serializer state of one call.
struct Dumper<'a> {
    opts: &'a DumpOptions,
    styles: HashMap<String, String>,
    anchors: Anchors,
    /// Ids of the collections being written, used to find cycles without anchors.
    path: Vec<usize>,
}

impl Dumper<'_> {
    fn next_line(&self, level: usize) -> String {
        format!("\n{}", " ".repeat(self.opts.indent * level))
    }

    fn detect_type(&self, value: &Value, explicit: bool) -> Result<Option<Detected>> {
        let types = if explicit {
            self.opts.schema.explicit()
        } else {
            self.opts.schema.implicit()
        };
        let Some(ty) = types.iter().find(|ty| ty.has_predicate() && ty.matches(value)) else {
            return Ok(None);
        };
        let style = self.styles.get(ty.tag()).map(String::as_str);
        let text = ty
            .represent_value(value, style)
            .map_err(|style| Error::InvalidStyle {
                tag: ty.tag().to_string(),
                style,
            })?;
        Ok(Some(Detected {
            tag: explicit.then(|| ty.tag().to_string()),
            text,
        }))
    }

    /// Write a node, return `None` if the node is skipped.
    fn write_node(
        &mut self,
        level: usize,
        value: &Value,
        block: bool,
        mut compact: bool,
        is_key: bool,
    ) -> Result<Option<Dump>> {
        let detected = match self.detect_type(value, false)? {
            Some(d) => Some(d),
            None => self.detect_type(value, true)?,
        };
        let (tag, text) = detected.map_or((None, None), |d| (d.tag, d.text));
        let block = block && (self.opts.flow_level < 0 || self.opts.flow_level > level as i32);
        let duplicate = self.anchors.index(value);
        if tag.is_some() || duplicate.is_some() || (self.opts.indent != 2 && level > 0) {
            compact = false;
        }
        if let Some(i) = duplicate {
            if self.anchors.visit(i) {
                return Ok(Some(Dump {
                    text: format!("*ref_{}", i),
                    tagged: false,
                }));
            }
        }
        let anchored = |dump: String| match duplicate {
            Some(i) if dump.starts_with('\n') => format!("&ref_{}{}", i, dump),
            Some(i) => format!("&ref_{} {}", i, dump),
            None => dump,
        };
        let text = match (text, value) {
            (Some(text), _) if tag.is_some() => self.write_scalar(&text, level, is_key),
            (Some(text), _) => text,
            (None, Value::Seq(seq)) => {
                let level = if self.opts.no_array_indent && level > 0 {
                    level - 1
                } else {
                    level
                };
                let block = block && !seq.borrow().is_empty();
                anchored(self.enter(value, |d| {
                    if block {
                        d.write_block_sequence(level, seq, compact)
                    } else {
                        d.write_flow_sequence(level, seq)
                    }
                })?)
            }
            (None, Value::Map(map)) => {
                let block = block && !map.borrow().is_empty();
                anchored(self.enter(value, |d| {
                    if block {
                        d.write_block_mapping(level, map, compact)
                    } else {
                        d.write_flow_mapping(level, map)
                    }
                })?)
            }
            (None, Value::Str(s)) => self.write_scalar(s, level, is_key),
            (None, value) => {
                if self.opts.skip_invalid {
                    return Ok(None);
                }
                return Err(Error::UnacceptableValue(value.type_name().to_string()));
            }
        };
        Ok(Some(match tag {
            Some(tag) => {
                let sep = if text.starts_with('\n') { "" } else { " " };
                Dump {
                    text: format!("{}{}{}", shorten_tag(&tag), sep, text),
                    tagged: true,
                }
            }
            None => Dump {
                text,
                tagged: false,
            },
        }))
    }

    /// Write the children of a collection, a collection inside itself is a cycle.
    fn enter<F>(&mut self, value: &Value, f: F) -> Result<String>
    where
        F: FnOnce(&mut Self) -> Result<String>,
    {
        let id = value.id().unwrap_or_default();
        if self.path.contains(&id) {
            return Err(Error::CyclicValue);
        }
        self.path.push(id);
        let r = f(self);
        self.path.pop();
        r
    }

    fn sorted_entries(&self, map: &Map) -> Vec<(Value, Value)> {
        let mut entries = map
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<Vec<_>>();
        match &self.opts.sort_keys {
            SortKeys::Insertion => {}
            SortKeys::Lexical => entries.sort_by_key(|(k, _)| key_text(k)),
            SortKeys::Custom(f) => entries.sort_by(|(a, _), (b, _)| f(a, b)),
        }
        entries
    }

    fn write_block_sequence(&mut self, level: usize, seq: &Seq, compact: bool) -> Result<String> {
        let items = seq.borrow().clone();
        let mut result = String::new();
        for item in &items {
            let Some(dump) = self.write_node(level + 1, item, true, true, false)? else {
                continue;
            };
            if !compact || !result.is_empty() {
                result += &self.next_line(level);
            }
            result += if dump.text.starts_with('\n') { "-" } else { "- " };
            result += &dump.text;
        }
        Ok(if result.is_empty() {
            "[]".to_string()
        } else {
            result
        })
    }

    fn write_flow_sequence(&mut self, level: usize, seq: &Seq) -> Result<String> {
        let items = seq.borrow().clone();
        let sep = if self.opts.condense_flow { "," } else { ", " };
        let mut result = Vec::with_capacity(items.len());
        for item in &items {
            if let Some(dump) = self.write_node(level, item, false, false, false)? {
                result.push(dump.text);
            }
        }
        Ok(format!("[{}]", result.join(sep)))
    }

    fn write_block_mapping(&mut self, level: usize, map: &Map, compact: bool) -> Result<String> {
        let mut result = String::new();
        for (k, v) in self.sorted_entries(map) {
            let mut pair = String::new();
            if !compact || !result.is_empty() {
                pair += &self.next_line(level);
            }
            let Some(key) = self.write_node(level + 1, &k, true, true, true)? else {
                continue;
            };
            // A block collection key cannot be written on the key line
            let block_key = matches!(k, Value::Seq(_) | Value::Map(_))
                && !key.text.starts_with(['[', '{', '*']);
            let explicit = key.tagged
                || block_key
                || key.text.chars().count() > EXPLICIT_KEY_THRESHOLD
                || key.text.contains('\n');
            if explicit {
                pair += if key.text.starts_with('\n') { "?" } else { "? " };
            }
            pair += &key.text;
            if explicit {
                pair += &self.next_line(level);
            }
            let Some(value) = self.write_node(level + 1, &v, true, explicit, false)? else {
                continue;
            };
            pair += if value.text.starts_with('\n') { ":" } else { ": " };
            pair += &value.text;
            result += &pair;
        }
        Ok(if result.is_empty() {
            "{}".to_string()
        } else {
            result
        })
    }

    fn write_flow_mapping(&mut self, level: usize, map: &Map) -> Result<String> {
        let condense = self.opts.condense_flow;
        let mut result = Vec::new();
        for (k, v) in self.sorted_entries(map) {
            let Some(key) = self.write_node(level, &k, false, false, true)? else {
                continue;
            };
            let mut pair = String::new();
            if key.text.chars().count() > EXPLICIT_KEY_THRESHOLD {
                pair += "? ";
            }
            if condense && !key.text.starts_with(['"', '\'']) {
                pair += &format!("\"{}\"", escape_string(&key.text));
            } else {
                pair += &key.text;
            }
            pair += if condense { ":" } else { ": " };
            let Some(value) = self.write_node(level, &v, false, false, false)? else {
                continue;
            };
            pair += &value.text;
            result.push(pair);
        }
        let sep = if condense { "," } else { ", " };
        Ok(format!("{{{}}}", result.join(sep)))
    }

    fn write_scalar(&self, s: &str, level: usize, is_key: bool) -> String {
        if s.is_empty() {
            return "''".to_string();
        }
        if !self.opts.no_compat_mode && DEPRECATED_BOOLEANS.contains(&s) {
            return format!("'{}'", s);
        }
        let indent = self.opts.indent * level.max(1);
        // A top-level indicator counts from the column before the document
        let indicator = if level == 0 {
            self.opts.indent + 1
        } else {
            self.opts.indent
        };
        let line_width = match self.opts.line_width {
            -1 => -1,
            w => {
                let w = w as i64;
                w.min(40).max(w - indent as i64)
            }
        };
        let single_line_only =
            is_key || (self.opts.flow_level > -1 && level as i32 >= self.opts.flow_level);
        let style = choose_style(s, single_line_only, self.opts.indent, line_width, |s| {
            self.opts.schema.is_ambiguous(s)
        });
        match style {
            Style::Plain => s.to_string(),
            Style::Single => format!("'{}'", s.replace('\'', "''")),
            Style::Literal => format!(
                "|{}{}",
                block_header(s, indicator),
                drop_ending_newline(&indent_string(s, indent))
            ),
            Style::Folded => format!(
                ">{}{}",
                block_header(s, indicator),
                drop_ending_newline(&indent_string(&fold_string(s, line_width), indent))
            ),
            Style::Double => format!("\"{}\"", escape_string(s)),
        }
    }
}

/// Dump a value into a YAML document.
///
/// The output ends with a line break,
/// it is empty only if the value is skipped by [`DumpOptions::skip_invalid`].
///
/// ```
/// use yaml_codec::{dump, yaml_map, yaml_seq, DumpOptions};
///
/// let v = yaml_seq!["a", "b", 3];
/// assert_eq!(dump(&v, DumpOptions::default()).unwrap(), "- a\n- b\n- 3\n");
/// let v = yaml_map! {"a" => yaml_seq![1, 2], "b" => "true"};
/// let doc = dump(&v, DumpOptions::default()).unwrap();
/// assert_eq!(doc, "a:\n  - 1\n  - 2\nb: 'true'\n");
/// ```
pub fn dump(value: &Value, opts: DumpOptions) -> Result<String> {
    tracing::debug!(
        kind = value.type_name(),
        no_refs = opts.no_refs,
        "dump value"
    );
    let anchors = if opts.no_refs {
        Anchors::default()
    } else {
        Anchors::scan(value)
    };
    let mut dumper = Dumper {
        styles: opts.compile_styles(),
        opts: &opts,
        anchors,
        path: Vec::new(),
    };
    Ok(match dumper.write_node(0, value, true, true, false)? {
        Some(dump) => dump.text + "\n",
        None => String::new(),
    })
}
