//! Source positions and human-readable error snippets.
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::Arc,
};

/// Indicate the position of the document.
/// This function will show the line number and column number of the position.
///
/// ```
/// use yaml_codec::indicated_msg;
///
/// let doc = indicated_msg("{\"a\": \n[\"b\", \"c\", \"d\"]}", 13);
/// assert_eq!(doc, "2:7\n[\"b\", \"c\", \"d\"]}\n      ^")
/// ```
///
/// If print the string, it would be like:
///
/// ```bash
/// 2:7
/// ["b", "c", "d"]}
///       ^
/// ```
///
/// Positions past the end of the document point at the last line.
pub fn indicated_msg(doc: &str, pos: usize) -> String {
    let (line, start) = locate(doc, pos);
    let text = doc[start..]
        .split(['\n', '\r'])
        .next()
        .unwrap_or_default();
    let end = pos.min(doc.len()).max(start);
    let column = doc
        .get(start..end)
        .map_or(end - start, |s| s.chars().count());
    format!(
        "{}:{}\n{}\n{}^",
        line + 1,
        column + 1,
        text,
        " ".repeat(column)
    )
}

/// Same as [`indicated_msg`], but join the path before message.
///
/// ```
/// use yaml_codec::indicated_msg_file;
///
/// let doc = indicated_msg_file("my/file.yaml", "{\"a\": \n[\"b\", \"c\", \"d\"]}", 13);
/// assert_eq!(doc, "my/file.yaml:2:7\n[\"b\", \"c\", \"d\"]}\n      ^")
/// ```
pub fn indicated_msg_file(path: &str, doc: &str, pos: usize) -> String {
    format!("{}:{}", path, indicated_msg(doc, pos))
}

/// Return the zero-based line number and the byte offset of its start.
fn locate(doc: &str, pos: usize) -> (usize, usize) {
    let pos = pos.min(doc.len());
    let mut line = 0;
    let mut start = 0;
    let bytes = doc.as_bytes();
    let mut i = 0;
    while i < pos {
        match bytes[i] {
            b'\n' => {
                line += 1;
                start = i + 1;
            }
            b'\r' if bytes.get(i + 1) != Some(&b'\n') => {
                line += 1;
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    (line, start)
}

/// An immutable snapshot of a source location.
///
/// Marks are attached to every error raised from source text.
/// The buffer is shared between all marks of the same call.
#[derive(Clone, PartialEq, Eq)]
pub struct Mark {
    /// Cosmetic source name, e.g. a file name.
    pub name: Option<String>,
    buffer: Arc<str>,
    /// Byte offset.
    pub position: usize,
    /// Zero-based line number.
    pub line: usize,
    /// Zero-based column, counted in bytes from the line start.
    pub column: usize,
}

impl Mark {
    /// Create a mark at the byte offset of the buffer.
    pub fn new(name: Option<String>, buffer: Arc<str>, position: usize) -> Self {
        let (line, start) = locate(&buffer, position);
        Self {
            name,
            column: position.min(buffer.len()) - start,
            buffer,
            position,
            line,
        }
    }

    /// The full source text.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Render the line and a caret under the column.
    pub fn snippet(&self) -> String {
        match &self.name {
            Some(name) => indicated_msg_file(name, &self.buffer, self.position),
            None => indicated_msg(&self.buffer, self.position),
        }
    }
}

impl core::fmt::Debug for Mark {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Mark")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}

impl Display for Mark {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.snippet())
    }
}
