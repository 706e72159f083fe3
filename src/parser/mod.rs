//! Parser components.
//!
//! The loader is a recursive descent parser driven by indentation.
//! Each sub-parser moves the cursor of [`Parser`] and returns its result,
//! the composed node is never stored in the parser state.
pub use self::error::*;
use self::base::*;
use crate::{schema::Kind, Error, Mark, Result, Schema, Value, Warning};
use std::{collections::HashMap, sync::Arc};

mod base;
mod collection;
mod composer;
mod directive;
mod error;

/// The options of the loader.
///
/// ```
/// use yaml_codec::{load, LoadOptions, Schema};
///
/// let opts = LoadOptions::default().schema(Schema::failsafe()).filename("a.yaml");
/// let v = load("a: 1", opts).unwrap().unwrap();
/// assert_eq!(v.get("a").unwrap().as_str(), Some("1"));
/// ```
pub struct LoadOptions<'a> {
    schema: Schema,
    filename: Option<String>,
    on_warning: Option<Box<dyn FnMut(&Warning) + 'a>>,
    legacy: bool,
    json: bool,
    listener: Option<Box<dyn FnMut(&NodeTrace) + 'a>>,
}

impl Default for LoadOptions<'_> {
    fn default() -> Self {
        Self {
            schema: Schema::default(),
            filename: None,
            on_warning: None,
            legacy: false,
            json: false,
            listener: None,
        }
    }
}

impl<'a> LoadOptions<'a> {
    /// Builder function for the schema.
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Builder function for the file name shown in the error messages.
    pub fn filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Builder function for the warning callback.
    pub fn on_warning<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Warning) + 'a,
    {
        self.on_warning = Some(Box::new(f));
        self
    }

    /// Builder function for the legacy mode, check the non-ASCII line breaks in any version.
    pub fn legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    /// Builder function for the JSON compatible mode.
    ///
    /// Duplicated keys override the previous values,
    /// and complex keys are stringified.
    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Builder function for the node listener.
    pub fn listener<F>(mut self, f: F) -> Self
    where
        F: FnMut(&NodeTrace) + 'a,
    {
        self.listener = Some(Box::new(f));
        self
    }
}

/// The event type of [`NodeTrace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEvent {
    /// Start to compose a node.
    Open,
    /// A node is composed, or nothing is found.
    Close,
}

/// A record sent to the listener of [`LoadOptions`].
#[derive(Debug, Clone)]
pub struct NodeTrace {
    /// Open or close.
    pub event: NodeEvent,
    /// Byte position of the cursor.
    pub position: usize,
    /// Zero-based line number of the cursor.
    pub line: usize,
    /// Node kind, always `None` when opening.
    pub kind: Option<Kind>,
    /// Resolved tag.
    pub tag: Option<String>,
    /// Constructed value.
    pub value: Option<Value>,
}

/// A YAML loader that reads a stream of documents.
///
/// The input is normalized first: the byte order mark is removed,
/// and a line break is appended to the end.
///
/// ```
/// use yaml_codec::{parser::Parser, yaml_seq, LoadOptions};
///
/// let mut p = Parser::new("- a\n- 3", LoadOptions::default()).unwrap();
/// let docs = p.parse().unwrap();
/// assert_eq!(docs, vec![yaml_seq!["a", 3]]);
/// ```
pub struct Parser<'a> {
    doc: Arc<str>,
    opts: LoadOptions<'a>,
    /// Current position.
    pub pos: usize,
    line: usize,
    line_start: usize,
    line_indent: isize,
    version: Option<String>,
    check_line_breaks: bool,
    tag_map: HashMap<String, String>,
    anchors: HashMap<String, Value>,
}

impl<'a> Parser<'a> {
    /// Create a parser with the string.
    ///
    /// Return error if the string contains a zero byte.
    pub fn new(doc: &str, opts: LoadOptions<'a>) -> Result<Self> {
        let doc = doc.strip_prefix('\u{FEFF}').unwrap_or(doc);
        let mut doc = doc.to_string();
        if !doc.is_empty() && !doc.ends_with(['\n', '\r']) {
            doc.push('\n');
        }
        let mut p = Self {
            doc: Arc::from(doc),
            opts,
            pos: 0,
            line: 0,
            line_start: 0,
            line_indent: 0,
            version: None,
            check_line_breaks: false,
            tag_map: HashMap::new(),
            anchors: HashMap::new(),
        };
        if let Some(pos) = p.doc.find('\0') {
            return Err(Error::Syntax {
                msg: "null byte is not allowed in input".to_string(),
                mark: p.mark_at(pos),
            });
        }
        p.line_indent = p.take_while(|c| c == b' ') as isize;
        Ok(p)
    }

    /// Read all documents.
    pub fn parse(&mut self) -> Result<Vec<Value>> {
        let mut docs = Vec::new();
        self.parse_with(|v, _| docs.push(v))?;
        Ok(docs)
    }

    /// Read all documents, and call the visitor with each document and its start position.
    pub fn parse_with<F>(&mut self, mut visitor: F) -> Result<()>
    where
        F: FnMut(Value, usize),
    {
        while self.pos + 1 < self.doc.len() {
            let start = self.pos;
            let doc = self
                .document()
                .map_err(|e| e.into_error(|| self.fatal("invalid document")))?;
            tracing::debug!(start, end = self.pos, "document loaded");
            visitor(doc, start);
        }
        Ok(())
    }

    fn fatal(&self, msg: &str) -> Error {
        Error::Syntax {
            msg: msg.to_string(),
            mark: self.mark(),
        }
    }

    /// Match one document, with its directives and markers.
    pub fn document(&mut self) -> PResult<Value> {
        let start = self.pos;
        self.version = None;
        self.check_line_breaks = self.opts.legacy;
        self.tag_map.clear();
        self.anchors.clear();
        let mut has_directives = false;
        while self.ch() != 0 {
            self.skip_separation_space(true, None)?;
            if self.line_indent > 0 || self.ch() != b'%' {
                break;
            }
            has_directives = true;
            self.directive()?;
        }
        self.skip_separation_space(true, None)?;
        if self.line_indent == 0
            && self.ch() == b'-'
            && self.ch_at(self.pos + 1) == b'-'
            && self.ch_at(self.pos + 2) == b'-'
        {
            self.pos += 3;
            self.skip_separation_space(true, None)?;
        } else if has_directives {
            return self.err("directives end mark is expected");
        }
        let node = self.compose_node(self.line_indent - 1, Context::BlockOut, false, true)?;
        self.skip_separation_space(true, None)?;
        if self.check_line_breaks
            && self.doc[start..self.pos].contains(['\u{85}', '\u{2028}', '\u{2029}'])
        {
            self.warn("non-ASCII line breaks are interpreted as content");
        }
        let value = node.map(|n| n.value).unwrap_or_default();
        if self.pos == self.line_start && self.test_document_separator() {
            if self.ch() == b'.' {
                self.pos += 3;
                self.skip_separation_space(true, None)?;
            }
        } else if self.pos < self.doc.len() {
            return self.err("end of the stream or a document separator is expected");
        }
        Ok(value)
    }
}

/// Load a single document.
///
/// Return `None` if the stream has no document.
///
/// ```
/// use yaml_codec::{load, yaml_seq, LoadOptions};
///
/// let v = load("- a\n- b\n- 3\n", LoadOptions::default()).unwrap();
/// assert_eq!(v, Some(yaml_seq!["a", "b", 3]));
/// assert_eq!(load("", LoadOptions::default()).unwrap(), None);
/// ```
pub fn load(doc: &str, opts: LoadOptions) -> Result<Option<Value>> {
    let mut p = Parser::new(doc, opts)?;
    let mut docs = Vec::new();
    p.parse_with(|v, start| docs.push((v, start)))?;
    if docs.len() > 1 {
        let mark = p.mark_at(docs[1].1);
        return Err(Error::MultipleDocuments { mark });
    }
    Ok(docs.pop().map(|(v, _)| v))
}

/// Load all documents of the stream.
///
/// ```
/// use yaml_codec::{load_all, LoadOptions, Value};
///
/// let docs = load_all("a\n---\nb\n...\n", LoadOptions::default()).unwrap();
/// assert_eq!(docs, vec![Value::from("a"), Value::from("b")]);
/// ```
pub fn load_all(doc: &str, opts: LoadOptions) -> Result<Vec<Value>> {
    Parser::new(doc, opts)?.parse()
}

/// Load all documents of the stream, and pass them to the visitor in order.
pub fn load_all_with<F>(doc: &str, mut visitor: F, opts: LoadOptions) -> Result<()>
where
    F: FnMut(Value),
{
    Parser::new(doc, opts)?.parse_with(|v, _| visitor(v))
}

/// The context of the block and flow nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Context {
    FlowIn,
    FlowOut,
    BlockIn,
    BlockOut,
}
