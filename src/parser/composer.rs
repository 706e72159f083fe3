use super::*;
use crate::schema::DEFAULT_PREFIX;
use std::cmp::Ordering;

/// A composed node, returned through the recursive sub-parsers.
#[derive(Debug, Clone, Default)]
pub(crate) struct Node {
    /// `None` if the node has no content.
    pub(crate) kind: Option<Kind>,
    pub(crate) value: Value,
    /// The resolved tag, `?` for an unresolved plain scalar.
    pub(crate) tag: Option<String>,
}

impl Node {
    pub(crate) fn new(kind: Kind, value: Value) -> Self {
        Self {
            kind: Some(kind),
            value,
            tag: None,
        }
    }
}

/// Decode the `%XX` escapes of a tag name.
fn percent_decode(name: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(name.len());
    let mut iter = name.bytes();
    while let Some(c) = iter.next() {
        if c != b'%' {
            bytes.push(c);
            continue;
        }
        let hex = [iter.next()?, iter.next()?];
        if !hex.iter().all(u8::is_ascii_hexdigit) {
            return None;
        }
        bytes.push(u8::from_str_radix(std::str::from_utf8(&hex).ok()?, 16).ok()?);
    }
    String::from_utf8(bytes).ok()
}

/// The node composer and the node properties.
impl Parser<'_> {
    fn trace(&mut self, event: NodeEvent, node: Option<&Node>) {
        let (pos, line) = (self.pos, self.line);
        if let Some(f) = self.opts.listener.as_mut() {
            f(&NodeTrace {
                event,
                position: pos,
                line,
                kind: node.and_then(|n| n.kind),
                tag: node.and_then(|n| n.tag.clone()),
                value: node.map(|n| n.value.clone()),
            });
        }
    }

    /// Compose a node with its properties and content.
    ///
    /// Return `None` if there is neither property nor content.
    pub(crate) fn compose_node(
        &mut self,
        parent_indent: isize,
        ctx: Context,
        allow_seek: bool,
        allow_compact: bool,
    ) -> PResult<Option<Node>> {
        self.trace(NodeEvent::Open, None);
        let block_styles = matches!(ctx, Context::BlockOut | Context::BlockIn);
        let mut allow_block_collections = block_styles;
        let mut at_new_line = false;
        let mut indent_status = Ordering::Greater;
        if allow_seek && self.skip_separation_space(true, None)? > 0 {
            at_new_line = true;
            indent_status = self.line_indent.cmp(&parent_indent);
        }
        let mut tag = None;
        let mut anchor = None;
        if indent_status == Ordering::Greater {
            loop {
                match self.ch() {
                    b'!' if tag.is_some() => return self.err_property("tag"),
                    b'!' => tag = Some(self.tag_property()?),
                    b'&' if anchor.is_some() => return self.err_property("anchor"),
                    b'&' => anchor = Some(self.anchor_property()?),
                    _ => break,
                }
                if self.skip_separation_space(true, None)? > 0 {
                    at_new_line = true;
                    allow_block_collections = block_styles;
                    indent_status = self.line_indent.cmp(&parent_indent);
                } else {
                    allow_block_collections = false;
                }
            }
        }
        if allow_block_collections {
            allow_block_collections = at_new_line || allow_compact;
        }
        let mut content = None;
        if indent_status == Ordering::Greater || ctx == Context::BlockOut {
            let flow_indent = match ctx {
                Context::FlowIn | Context::FlowOut => parent_indent,
                _ => parent_indent + 1,
            };
            let block_indent = (self.pos - self.line_start) as isize;
            let anchor = anchor.as_deref();
            if indent_status == Ordering::Greater {
                let collection = if allow_block_collections {
                    err_own!(
                        self.block_sequence(block_indent, anchor),
                        self.block_mapping(block_indent, flow_indent, anchor)
                    )
                } else {
                    Err(PError::Mismatch)
                };
                content = match err_own!(collection, self.flow_collection(flow_indent, anchor)) {
                    Ok(node) => Some(node),
                    Err(PError::Mismatch) => {
                        self.scalar_node(flow_indent, ctx, block_styles, &mut tag, anchor)?
                    }
                    Err(e) => return Err(e),
                };
            } else if indent_status == Ordering::Equal && allow_block_collections {
                content = match self.block_sequence(block_indent, anchor) {
                    Ok(node) => Some(node),
                    Err(PError::Mismatch) => None,
                    Err(e) => return Err(e),
                };
            }
        }
        let found = content.is_some() || tag.is_some() || anchor.is_some();
        let mut node = content.unwrap_or_default();
        if let Some(tag) = tag {
            self.resolve_tag(&mut node, tag)?;
        }
        if let Some(anchor) = anchor {
            self.anchors.insert(anchor, node.value.clone());
        }
        self.trace(NodeEvent::Close, Some(&node));
        Ok(found.then_some(node))
    }

    /// Match a scalar or an alias.
    fn scalar_node(
        &mut self,
        flow_indent: isize,
        ctx: Context,
        allow_block_scalars: bool,
        tag: &mut Option<String>,
        anchor: Option<&str>,
    ) -> PResult<Option<Node>> {
        let block = if allow_block_scalars {
            self.block_scalar(flow_indent)
        } else {
            Err(PError::Mismatch)
        };
        let quoted = err_own!(
            block,
            err_own!(self.single_quoted(flow_indent), self.double_quoted(flow_indent))
        );
        match quoted {
            Ok(s) => return Ok(Some(Node::new(Kind::Scalar, Value::Str(s)))),
            Err(PError::Mismatch) => {}
            Err(e) => return Err(e),
        }
        match self.alias() {
            Ok(value) => {
                if tag.is_some() || anchor.is_some() {
                    return Err(PError::Terminate(Error::AliasWithProperties { mark: self.mark() }));
                }
                let kind = match value {
                    Value::Seq(_) => Kind::Sequence,
                    Value::Map(_) => Kind::Mapping,
                    _ => Kind::Scalar,
                };
                return Ok(Some(Node::new(kind, value)));
            }
            Err(PError::Mismatch) => {}
            Err(e) => return Err(e),
        }
        match self.plain_scalar(flow_indent, ctx == Context::FlowIn) {
            Ok(s) => {
                tag.get_or_insert_with(|| "?".to_string());
                Ok(Some(Node::new(Kind::Scalar, Value::Str(s))))
            }
            Err(PError::Mismatch) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Apply the tag to the node.
    ///
    /// Plain scalars try the implicit types in order, and the `!` tag keeps the node as is.
    fn resolve_tag(&mut self, node: &mut Node, tag: String) -> PResult<()> {
        if tag == "!" {
            node.tag = Some(tag);
            return Ok(());
        }
        if tag == "?" {
            if let Some(kind) = node.kind.filter(|k| *k != Kind::Scalar) {
                return self.err_tag(
                    &tag,
                    format!(
                        "unacceptable node kind for !<?> tag; it should be \"scalar\", not \"{}\"",
                        kind.name()
                    ),
                );
            }
            let ty = self
                .opts
                .schema
                .implicit()
                .iter()
                .find(|ty| ty.resolves(&node.value))
                .cloned();
            node.tag = Some(tag);
            if let Some(ty) = ty {
                node.value = ty.construct_value(std::mem::take(&mut node.value));
                node.tag = Some(ty.tag().to_string());
            }
            return Ok(());
        }
        let Some(ty) = self.opts.schema.type_map().get(node.kind, &tag).cloned() else {
            return Err(PError::Terminate(Error::UnknownTag {
                tag,
                mark: self.mark(),
            }));
        };
        if let Some(kind) = node.kind.filter(|k| *k != ty.kind()) {
            let msg = format!(
                "unacceptable node kind for !<{}> tag; it should be \"{}\", not \"{}\"",
                tag,
                ty.kind().name(),
                kind.name()
            );
            return self.err_tag(&tag, msg);
        }
        if !ty.resolves(&node.value) {
            let msg = format!("cannot resolve a node with !<{}> explicit tag", tag);
            return self.err_tag(&tag, msg);
        }
        node.value = ty.construct_value(std::mem::take(&mut node.value));
        node.tag = Some(tag);
        Ok(())
    }

    fn err_tag<R>(&self, tag: &str, msg: String) -> PResult<R> {
        Err(PError::Terminate(Error::TagMismatch {
            tag: tag.to_string(),
            msg,
            mark: self.mark(),
        }))
    }

    fn err_property<R>(&self, property: &'static str) -> PResult<R> {
        Err(PError::Terminate(Error::DuplicateProperty {
            property,
            mark: self.mark(),
        }))
    }

    /// Match a tag property and return the full tag name, the cursor is at `!`.
    pub fn tag_property(&mut self) -> PResult<String> {
        let mut ch = self.bump();
        let mut verbatim = false;
        let mut named = false;
        let mut handle = "!".to_string();
        if ch == b'<' {
            verbatim = true;
            ch = self.bump();
        } else if ch == b'!' {
            named = true;
            handle = "!!".to_string();
            ch = self.bump();
        }
        let mut start = self.pos;
        let name = if verbatim {
            self.take_while(|c| c != b'>');
            if self.ch() == 0 {
                return self.err("unexpected end of the stream within a verbatim tag");
            }
            let name = self.doc[start..self.pos].to_string();
            self.pos += 1;
            name
        } else {
            while ch != 0 && !is_ws_or_eol(ch) {
                if ch == b'!' {
                    if named {
                        return self.err("tag suffix cannot contain exclamation marks");
                    }
                    handle = self.doc[start - 1..=self.pos].to_string();
                    if !super::directive::is_tag_handle(&handle) {
                        return self.err("named tag handle cannot contain such characters");
                    }
                    named = true;
                    start = self.pos + 1;
                }
                ch = self.bump();
            }
            let name = self.doc[start..self.pos].to_string();
            if name.bytes().any(is_flow_indicator) {
                return self.err("tag suffix cannot contain flow indicator characters");
            }
            name
        };
        if !name.is_empty() && !super::directive::TAG_URI.is_match(&name) {
            return self.err(format!("tag name cannot contain such characters: {}", name));
        }
        let Some(name) = percent_decode(&name) else {
            return self.err(format!("tag name is malformed: {}", name));
        };
        if verbatim {
            Ok(name)
        } else if let Some(prefix) = self.tag_map.get(&handle) {
            Ok(format!("{}{}", prefix, name))
        } else if handle == "!" {
            Ok(format!("!{}", name))
        } else if handle == "!!" {
            Ok(format!("{}{}", DEFAULT_PREFIX, name))
        } else {
            self.err(format!("undeclared tag handle \"{}\"", handle))
        }
    }

    fn anchor_name(&mut self, what: &str) -> PResult<String> {
        self.pos += 1;
        let start = self.pos;
        if self.take_while(|c| !is_ws_or_eol(c) && !is_flow_indicator(c)) == 0 {
            return self.err(format!("name of an {} node must contain at least one character", what));
        }
        Ok(self.doc[start..self.pos].to_string())
    }

    /// Match an anchor property, the cursor is at `&`.
    pub fn anchor_property(&mut self) -> PResult<String> {
        self.anchor_name("anchor")
    }

    /// Match an alias and return the anchored value.
    ///
    /// Sequences and maps are shared with the anchored node.
    pub fn alias(&mut self) -> PResult<Value> {
        if self.ch() != b'*' {
            return Err(PError::Mismatch);
        }
        let start = self.pos;
        let name = self.anchor_name("alias")?;
        let Some(value) = self.anchors.get(&name).cloned() else {
            return Err(PError::Terminate(Error::UnknownAlias {
                name,
                mark: self.mark_at(start),
            }));
        };
        self.skip_separation_space(true, None)?;
        Ok(value)
    }
}
