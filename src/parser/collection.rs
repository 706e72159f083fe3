use super::{composer::Node, *};
use crate::{dump, schema::DEFAULT_PREFIX, DumpOptions, Map, Seq};
use std::{collections::HashSet, mem::take};

/// Keys that came from a merge, an explicit key may override them once.
type Overridable = HashSet<Value>;

/// Stringify a complex key in the JSON compatible mode.
fn stringify_key(key: &Value) -> String {
    dump(key, DumpOptions::default().flow_level(0))
        .map(|s| s.trim_end().to_string())
        .unwrap_or_default()
}

/// The collection implementation.
///
/// Sequences and maps are registered to the anchor before their children are composed,
/// so an alias inside the collection can refer to itself.
impl Parser<'_> {
    fn register(&mut self, anchor: Option<&str>, value: &Value) {
        if let Some(anchor) = anchor {
            self.anchors.insert(anchor.to_string(), value.clone());
        }
    }

    /// Match a block sequence, the items are led by `- `.
    pub(crate) fn block_sequence(&mut self, node_indent: isize, anchor: Option<&str>) -> PResult<Node> {
        let seq = Seq::default();
        let result = Value::Seq(seq.clone());
        self.register(anchor, &result);
        let mut detected = false;
        let mut ch = self.ch();
        while ch != 0 {
            if ch != b'-' || !is_ws_or_eol(self.ch_at(self.pos + 1)) {
                break;
            }
            detected = true;
            self.pos += 1;
            if self.skip_separation_space(true, None)? > 0 && self.line_indent <= node_indent {
                seq.borrow_mut().push(Value::Null);
                ch = self.ch();
                continue;
            }
            let line = self.line;
            let item = self.compose_node(node_indent, Context::BlockIn, false, true)?;
            seq.borrow_mut().push(item.map(|n| n.value).unwrap_or_default());
            self.skip_separation_space(true, None)?;
            ch = self.ch();
            if (self.line == line || self.line_indent > node_indent) && ch != 0 {
                return self.err("bad indentation of a sequence entry");
            } else if self.line_indent < node_indent {
                break;
            }
        }
        if detected {
            Ok(Node::new(Kind::Sequence, result))
        } else {
            Err(PError::Mismatch)
        }
    }

    /// Match a block mapping with implicit (`k: v`) or explicit (`? k`) keys.
    ///
    /// If the first node is not followed by a colon on the same line,
    /// the node itself is returned.
    pub(crate) fn block_mapping(
        &mut self,
        node_indent: isize,
        flow_indent: isize,
        anchor: Option<&str>,
    ) -> PResult<Node> {
        let map = Map::default();
        let result = Value::Map(map.clone());
        self.register(anchor, &result);
        let mut overridable = Overridable::new();
        let mut key_tag = None;
        let mut key = Value::Null;
        let mut value = Value::Null;
        let mut at_explicit_key = false;
        let mut detected = false;
        let mut allow_compact = false;
        let mut ch = self.ch();
        while ch != 0 {
            let following = self.ch_at(self.pos + 1);
            let line = self.line;
            let start = self.pos;
            if (ch == b'?' || ch == b':') && is_ws_or_eol(following) {
                if ch == b'?' {
                    if at_explicit_key {
                        self.store_mapping_pair(&map, &mut overridable, key_tag.take(), take(&mut key), Value::Null, None)?;
                    }
                    detected = true;
                    at_explicit_key = true;
                } else if at_explicit_key {
                    at_explicit_key = false;
                } else {
                    return self.err("incomplete explicit mapping pair; a key node is missed; or followed by a non-tabulated empty line");
                }
                allow_compact = true;
                self.pos += 1;
                ch = following;
            } else {
                let Some(node) = self.compose_node(flow_indent, Context::FlowOut, false, true)? else {
                    break;
                };
                if self.line != line {
                    if detected {
                        return self.err("can not read a block mapping entry; a multiline key may not be an implicit key");
                    }
                    return Ok(node);
                }
                self.take_while(is_white_space);
                if self.ch() != b':' {
                    if detected {
                        return self.err("can not read an implicit mapping pair; a colon is missed");
                    }
                    return Ok(node);
                }
                ch = self.bump();
                if !is_ws_or_eol(ch) {
                    return self.err("a whitespace character is expected after the key-value separator within a block mapping");
                }
                if at_explicit_key {
                    self.store_mapping_pair(&map, &mut overridable, key_tag.take(), take(&mut key), Value::Null, None)?;
                }
                detected = true;
                at_explicit_key = false;
                allow_compact = false;
                key_tag = node.tag;
                key = node.value;
            }
            if self.line == line || self.line_indent > node_indent {
                if let Some(node) = self.compose_node(node_indent, Context::BlockOut, true, allow_compact)? {
                    if at_explicit_key {
                        key_tag = node.tag;
                        key = node.value;
                    } else {
                        value = node.value;
                    }
                }
                if !at_explicit_key {
                    self.store_mapping_pair(&map, &mut overridable, key_tag.take(), take(&mut key), take(&mut value), Some(start))?;
                }
                self.skip_separation_space(true, None)?;
                ch = self.ch();
            }
            if (self.line == line || self.line_indent > node_indent) && ch != 0 {
                return self.err("bad indentation of a mapping entry");
            } else if self.line_indent < node_indent {
                break;
            }
        }
        if at_explicit_key {
            self.store_mapping_pair(&map, &mut overridable, key_tag, key, Value::Null, None)?;
        }
        if detected {
            Ok(Node::new(Kind::Mapping, result))
        } else {
            Err(PError::Mismatch)
        }
    }

    /// Match a flow sequence (`[a, b]`) or a flow mapping (`{a: b}`).
    ///
    /// A pair inside a flow sequence is a single-pair map.
    pub(crate) fn flow_collection(&mut self, node_indent: isize, anchor: Option<&str>) -> PResult<Node> {
        let (terminator, kind) = match self.ch() {
            b'[' => (b']', Kind::Sequence),
            b'{' => (b'}', Kind::Mapping),
            _ => return Err(PError::Mismatch),
        };
        let seq = Seq::default();
        let map = Map::default();
        let result = match kind {
            Kind::Mapping => Value::Map(map.clone()),
            _ => Value::Seq(seq.clone()),
        };
        self.register(anchor, &result);
        let mut overridable = Overridable::new();
        let mut read_next = true;
        self.pos += 1;
        while self.ch() != 0 {
            self.skip_separation_space(true, Some(node_indent))?;
            let ch = self.ch();
            if ch == terminator {
                self.pos += 1;
                return Ok(Node::new(kind, result));
            } else if !read_next {
                return self.err("missed comma between flow collection entries");
            } else if ch == b',' {
                return self.err("expected the node content, but found ','");
            }
            let mut is_pair = false;
            let mut is_explicit_pair = false;
            if ch == b'?' && is_ws_or_eol(self.ch_at(self.pos + 1)) {
                is_pair = true;
                is_explicit_pair = true;
                self.pos += 1;
                self.skip_separation_space(true, Some(node_indent))?;
            }
            let line = self.line;
            let key = self
                .compose_node(node_indent, Context::FlowIn, false, true)?
                .unwrap_or_default();
            self.skip_separation_space(true, Some(node_indent))?;
            let mut value = Value::Null;
            if (is_explicit_pair || self.line == line) && self.ch() == b':' {
                is_pair = true;
                self.pos += 1;
                self.skip_separation_space(true, Some(node_indent))?;
                if let Some(node) = self.compose_node(node_indent, Context::FlowIn, false, true)? {
                    value = node.value;
                }
            }
            if kind == Kind::Mapping {
                self.store_mapping_pair(&map, &mut overridable, key.tag, key.value, value, None)?;
            } else if is_pair {
                let pair = Map::default();
                self.store_mapping_pair(&pair, &mut Overridable::new(), key.tag, key.value, value, None)?;
                seq.borrow_mut().push(Value::Map(pair));
            } else {
                seq.borrow_mut().push(key.value);
            }
            self.skip_separation_space(true, Some(node_indent))?;
            read_next = self.sym(b',');
        }
        self.err("unexpected end of the stream within a flow collection")
    }

    /// Insert a pair, or merge the mappings if the key is the merge key.
    ///
    /// The duplicated key error points to `start` if given.
    fn store_mapping_pair(
        &mut self,
        map: &Map,
        overridable: &mut Overridable,
        key_tag: Option<String>,
        key: Value,
        value: Value,
        start: Option<usize>,
    ) -> PResult<()> {
        if key_tag.as_deref().and_then(|t| t.strip_prefix(DEFAULT_PREFIX)) == Some("merge") {
            if let Value::Seq(sources) = &value {
                let sources = sources.borrow().clone();
                for source in sources {
                    self.merge_mappings(map, &source, overridable)?;
                }
            } else {
                self.merge_mappings(map, &value, overridable)?;
            }
            return Ok(());
        }
        let key = if self.opts.json && !key.is_scalar() {
            Value::Str(stringify_key(&key))
        } else {
            key
        };
        if !self.opts.json && !overridable.contains(&key) && map.borrow().contains_key(&key) {
            let mark = self.mark_at(start.unwrap_or(self.pos));
            return Err(PError::Terminate(Error::DuplicateKey { mark }));
        }
        overridable.remove(&key);
        let mut map = map.borrow_mut();
        if let Some(slot) = map.get_mut(&key) {
            *slot = value;
        } else {
            map.insert(key, value);
        }
        Ok(())
    }

    /// Copy the keys of the source that the map doesn't have.
    fn merge_mappings(&mut self, map: &Map, source: &Value, overridable: &mut Overridable) -> PResult<()> {
        let Value::Map(source) = source else {
            return Err(PError::Terminate(Error::InvalidMerge { mark: self.mark() }));
        };
        let entries = source
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<Vec<_>>();
        let mut map = map.borrow_mut();
        for (k, v) in entries {
            if !map.contains_key(&k) {
                overridable.insert(k.clone());
                map.insert(k, v);
            }
        }
        Ok(())
    }
}
