use super::*;

mod grammar;

/// Tab or space.
pub(crate) fn is_white_space(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// Line feed or carriage return.
pub(crate) fn is_eol(c: u8) -> bool {
    c == b'\n' || c == b'\r'
}

/// White space, line break or the end of the stream.
pub(crate) fn is_ws_or_eol(c: u8) -> bool {
    c == 0 || is_white_space(c) || is_eol(c)
}

/// `,[]{}`
pub(crate) fn is_flow_indicator(c: u8) -> bool {
    matches!(c, b',' | b'[' | b']' | b'{' | b'}')
}

/// Printable characters allowed in the content of scalars.
pub(crate) fn is_printable(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{85}')
        || ('\u{20}'..='\u{7E}').contains(&c)
        || ('\u{A0}'..='\u{D7FF}').contains(&c)
        || (('\u{E000}'..='\u{FFFD}').contains(&c) && c != '\u{FEFF}')
        || ('\u{10000}'..='\u{10FFFF}').contains(&c)
}

/// The cursor implementation.
///
/// These sub-parsers move the cursor and keep the line bookkeeping.
/// The document always ends with a line break, and a zero byte is read past the end.
impl Parser<'_> {
    /// The byte under the cursor, zero at the end of the stream.
    pub fn ch(&self) -> u8 {
        self.ch_at(self.pos)
    }

    /// The byte at the position, zero at the end of the stream.
    pub fn ch_at(&self, pos: usize) -> u8 {
        self.doc.as_bytes().get(pos).copied().unwrap_or(0)
    }

    /// Show the right hand side string after the current cursor.
    pub fn food(&self) -> &str {
        self.doc.get(self.pos..).unwrap_or_default()
    }

    /// Move on and return the next byte.
    pub(crate) fn bump(&mut self) -> u8 {
        self.pos += 1;
        self.ch()
    }

    /// Match a symbol.
    pub fn sym(&mut self, s: u8) -> bool {
        if self.ch() == s {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Match until the condition failed, return the number of matched bytes.
    pub fn take_while<F>(&mut self, f: F) -> usize
    where
        F: Fn(u8) -> bool,
    {
        let pos = self.pos;
        while self.ch() != 0 && f(self.ch()) {
            self.pos += 1;
        }
        self.pos - pos
    }

    /// Get the mark of the position.
    pub fn mark_at(&self, pos: usize) -> Mark {
        Mark::new(self.opts.filename.clone(), self.doc.clone(), pos)
    }

    /// Get the mark of the current position.
    pub fn mark(&self) -> Mark {
        self.mark_at(self.pos)
    }

    /// A short function to raise a syntax error.
    pub fn err<R, S: Into<String>>(&self, msg: S) -> PResult<R> {
        Err(PError::Terminate(Error::Syntax {
            msg: msg.into(),
            mark: self.mark(),
        }))
    }

    /// Deliver a warning to the callback, loading goes on.
    pub(crate) fn warn<S: Into<String>>(&mut self, msg: S) {
        let warning = Warning {
            msg: msg.into(),
            mark: self.mark(),
        };
        tracing::warn!(line = warning.mark.line + 1, "{}", warning.msg);
        if let Some(f) = self.opts.on_warning.as_mut() {
            f(&warning);
        }
    }

    /// Match a line break, count the line and reset the line start.
    pub(crate) fn read_line_break(&mut self) -> PResult<()> {
        match self.ch() {
            b'\n' => self.pos += 1,
            b'\r' => {
                self.pos += 1;
                self.sym(b'\n');
            }
            _ => return self.err("a line break is expected"),
        }
        self.line += 1;
        self.line_start = self.pos;
        Ok(())
    }

    /// Skip white spaces, line breaks and optional comments,
    /// return the number of line breaks.
    ///
    /// A warning is raised if the new line is indented less than `check_indent`.
    pub(crate) fn skip_separation_space(
        &mut self,
        allow_comments: bool,
        check_indent: Option<isize>,
    ) -> PResult<usize> {
        let mut line_breaks = 0;
        let mut ch = self.ch();
        while ch != 0 {
            self.take_while(is_white_space);
            ch = self.ch();
            if allow_comments && ch == b'#' {
                self.take_while(|c| !is_eol(c));
                ch = self.ch();
            }
            if !is_eol(ch) {
                break;
            }
            self.read_line_break()?;
            line_breaks += 1;
            self.line_indent = self.take_while(|c| c == b' ') as isize;
            ch = self.ch();
        }
        if let Some(indent) = check_indent {
            if line_breaks != 0 && self.line_indent < indent {
                self.warn("deficient indentation");
            }
        }
        Ok(line_breaks)
    }

    /// Match `---` or `...` followed by a blank at the cursor, without moving.
    pub(crate) fn test_document_separator(&self) -> bool {
        let c = self.ch();
        (c == b'-' || c == b'.')
            && self.ch_at(self.pos + 1) == c
            && self.ch_at(self.pos + 2) == c
            && is_ws_or_eol(self.ch_at(self.pos + 3))
    }

    /// Push the source text between the positions into the buffer.
    ///
    /// Set `check_json` to allow only tabs and the printable range beyond.
    pub(crate) fn capture_segment(
        &self,
        buf: &mut String,
        start: usize,
        end: usize,
        check_json: bool,
    ) -> PResult<()> {
        if start >= end {
            return Ok(());
        }
        let s = &self.doc[start..end];
        let ok = if check_json {
            s.chars().all(|c| c == '\t' || c >= '\u{20}')
        } else {
            s.chars().all(is_printable)
        };
        if !ok {
            return self.err("the stream contains non-printable characters");
        }
        buf.push_str(s);
        Ok(())
    }
}

/// Fold line breaks of flow scalars: one break is a space, `n` breaks are `n - 1` newlines.
pub(crate) fn write_folded_lines(buf: &mut String, count: usize) {
    if count == 1 {
        buf.push(' ');
    } else if count > 1 {
        buf.push_str(&"\n".repeat(count - 1));
    }
}
