use super::*;

fn simple_escape(c: u8) -> Option<char> {
    Some(match c {
        b'0' => '\0',
        b'a' => '\x07',
        b'b' => '\x08',
        b't' | b'\t' => '\t',
        b'n' => '\n',
        b'v' => '\x0B',
        b'f' => '\x0C',
        b'r' => '\r',
        b'e' => '\x1B',
        b' ' => ' ',
        b'"' => '"',
        b'/' => '/',
        b'\\' => '\\',
        b'N' => '\u{85}',
        b'_' => '\u{A0}',
        b'L' => '\u{2028}',
        b'P' => '\u{2029}',
        _ => return None,
    })
}

fn hex_len(c: u8) -> usize {
    match c {
        b'x' => 2,
        b'u' => 4,
        b'U' => 8,
        _ => 0,
    }
}

/// Block scalar chomping indicator.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Chomp {
    Clip,
    Strip,
    Keep,
}

/// The scalar grammar implementation for YAML.
///
/// These sub-parsers return [`PError::Mismatch`] without moving if the first character doesn't match.
impl Parser<'_> {
    fn err_unterminated<R>(&self, msg: &str) -> PResult<R> {
        Err(PError::Terminate(Error::UnterminatedScalar {
            msg: msg.to_string(),
            mark: self.mark(),
        }))
    }

    /// Match a plain scalar.
    ///
    /// Multi-line scalars are folded.
    /// The scalar ends before `: `, ` #`, a less indented line,
    /// or a flow indicator if it is inside a flow collection.
    pub fn plain_scalar(&mut self, node_indent: isize, within_flow: bool) -> PResult<String> {
        let mut ch = self.ch();
        if is_ws_or_eol(ch)
            || is_flow_indicator(ch)
            || matches!(ch, b'#' | b'&' | b'*' | b'!' | b'|' | b'>' | b'\'' | b'"' | b'%' | b'@' | b'`')
        {
            return Err(PError::Mismatch);
        }
        if ch == b'?' || ch == b'-' {
            let following = self.ch_at(self.pos + 1);
            if is_ws_or_eol(following) || within_flow && is_flow_indicator(following) {
                return Err(PError::Mismatch);
            }
        }
        let mut buf = String::new();
        let mut capture_start = self.pos;
        let mut capture_end = self.pos;
        let mut pending = false;
        let mut line_before = self.line;
        while ch != 0 {
            if ch == b':' {
                let following = self.ch_at(self.pos + 1);
                if is_ws_or_eol(following) || within_flow && is_flow_indicator(following) {
                    break;
                }
            } else if ch == b'#' {
                if is_ws_or_eol(self.ch_at(self.pos - 1)) {
                    break;
                }
            } else if (self.pos == self.line_start && self.test_document_separator())
                || within_flow && is_flow_indicator(ch)
            {
                break;
            } else if is_eol(ch) {
                let saved = (self.line, self.line_start, self.line_indent);
                line_before = self.line;
                self.skip_separation_space(false, None)?;
                if self.line_indent >= node_indent {
                    pending = true;
                    ch = self.ch();
                    continue;
                }
                self.pos = capture_end;
                (self.line, self.line_start, self.line_indent) = saved;
                break;
            }
            if pending {
                self.capture_segment(&mut buf, capture_start, capture_end, false)?;
                write_folded_lines(&mut buf, self.line - line_before);
                capture_start = self.pos;
                capture_end = self.pos;
                pending = false;
            }
            if !is_white_space(ch) {
                capture_end = self.pos + 1;
            }
            ch = self.bump();
        }
        self.capture_segment(&mut buf, capture_start, capture_end, false)?;
        if buf.is_empty() {
            Err(PError::Mismatch)
        } else {
            Ok(buf)
        }
    }

    /// Match a single quoted scalar, `''` is the escape of `'`.
    pub fn single_quoted(&mut self, node_indent: isize) -> PResult<String> {
        if !self.sym(b'\'') {
            return Err(PError::Mismatch);
        }
        let mut buf = String::new();
        let mut capture_start = self.pos;
        let mut capture_end = self.pos;
        loop {
            let ch = self.ch();
            if ch == 0 {
                return self.err_unterminated("unexpected end of the stream within a single quoted scalar");
            } else if ch == b'\'' {
                self.capture_segment(&mut buf, capture_start, self.pos, true)?;
                if self.bump() != b'\'' {
                    return Ok(buf);
                }
                capture_start = self.pos;
                self.pos += 1;
                capture_end = self.pos;
            } else if is_eol(ch) {
                self.capture_segment(&mut buf, capture_start, capture_end, true)?;
                let breaks = self.skip_separation_space(false, Some(node_indent))?;
                write_folded_lines(&mut buf, breaks);
                capture_start = self.pos;
                capture_end = self.pos;
            } else if self.pos == self.line_start && self.test_document_separator() {
                return self.err_unterminated("unexpected end of the document within a single quoted scalar");
            } else {
                self.pos += 1;
                if !is_white_space(ch) {
                    capture_end = self.pos;
                }
            }
        }
    }

    /// Match a double quoted scalar with escape sequences.
    pub fn double_quoted(&mut self, node_indent: isize) -> PResult<String> {
        if !self.sym(b'"') {
            return Err(PError::Mismatch);
        }
        let mut buf = String::new();
        let mut capture_start = self.pos;
        let mut capture_end = self.pos;
        loop {
            let ch = self.ch();
            if ch == 0 {
                return self.err_unterminated("unexpected end of the stream within a double quoted scalar");
            } else if ch == b'"' {
                self.capture_segment(&mut buf, capture_start, self.pos, true)?;
                self.pos += 1;
                return Ok(buf);
            } else if ch == b'\\' {
                self.capture_segment(&mut buf, capture_start, self.pos, true)?;
                let ch = self.bump();
                if is_eol(ch) {
                    self.skip_separation_space(false, Some(node_indent))?;
                } else if let Some(c) = simple_escape(ch) {
                    buf.push(c);
                    self.pos += 1;
                } else if hex_len(ch) > 0 {
                    let c = self.escaped_char()?;
                    buf.push(c);
                } else {
                    return self.err("unknown escape sequence");
                }
                capture_start = self.pos;
                capture_end = self.pos;
            } else if is_eol(ch) {
                self.capture_segment(&mut buf, capture_start, capture_end, true)?;
                let breaks = self.skip_separation_space(false, Some(node_indent))?;
                write_folded_lines(&mut buf, breaks);
                capture_start = self.pos;
                capture_end = self.pos;
            } else if self.pos == self.line_start && self.test_document_separator() {
                return self.err_unterminated("unexpected end of the document within a double quoted scalar");
            } else {
                self.pos += 1;
                if !is_white_space(ch) {
                    capture_end = self.pos;
                }
            }
        }
    }

    /// Read the hex digits after `\x`, `\u` or `\U`, the cursor is at the letter.
    fn hex_code(&mut self) -> PResult<u32> {
        let mut code = 0;
        for _ in 0..hex_len(self.ch()) {
            let digit = (self.bump() as char).to_digit(16);
            match digit {
                Some(d) => code = (code << 4) + d,
                None => return self.err("expected hexadecimal character"),
            }
        }
        self.pos += 1;
        Ok(code)
    }

    /// Decode a hex escape, UTF-16 surrogate pairs are joined.
    fn escaped_char(&mut self) -> PResult<char> {
        let code = self.hex_code()?;
        let code = if (0xD800..0xDC00).contains(&code) {
            if self.ch() != b'\\' || self.ch_at(self.pos + 1) != b'u' {
                return self.err("unpaired surrogate in escape sequence");
            }
            self.pos += 1;
            let low = self.hex_code()?;
            if !(0xDC00..0xE000).contains(&low) {
                return self.err("unpaired surrogate in escape sequence");
            }
            0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00)
        } else {
            code
        };
        match char::from_u32(code) {
            Some(c) => Ok(c),
            None => self.err("invalid code point in escape sequence"),
        }
    }

    /// Match a literal (`|`) or folded (`>`) block scalar.
    pub fn block_scalar(&mut self, node_indent: isize) -> PResult<String> {
        let folding = match self.ch() {
            b'|' => false,
            b'>' => true,
            _ => return Err(PError::Mismatch),
        };
        let mut chomp = Chomp::Clip;
        let mut detected_indent = false;
        let mut text_indent = node_indent;
        let mut ch = self.ch();
        while ch != 0 {
            ch = self.bump();
            if ch == b'+' || ch == b'-' {
                if chomp != Chomp::Clip {
                    return self.err("repeat of a chomping mode identifier");
                }
                chomp = if ch == b'+' { Chomp::Keep } else { Chomp::Strip };
            } else if ch.is_ascii_digit() {
                let n = (ch - b'0') as isize;
                if n == 0 {
                    return self.err(
                        "bad explicit indentation width of a block scalar; it cannot be less than one",
                    );
                }
                if detected_indent {
                    return self.err("repeat of an indentation width identifier");
                }
                text_indent = node_indent + n - 1;
                detected_indent = true;
            } else {
                break;
            }
        }
        if is_white_space(ch) {
            self.take_while(is_white_space);
            if self.ch() == b'#' {
                self.take_while(|c| !is_eol(c));
            }
            ch = self.ch();
        }
        let mut buf = String::new();
        let mut did_read_content = false;
        let mut empty_lines = 0;
        let mut at_more_indented = false;
        let breaks = |did_read_content: bool, empty_lines: usize| {
            "\n".repeat(if did_read_content { empty_lines + 1 } else { empty_lines })
        };
        while ch != 0 {
            self.read_line_break()?;
            self.line_indent = 0;
            ch = self.ch();
            while (!detected_indent || self.line_indent < text_indent) && ch == b' ' {
                self.line_indent += 1;
                ch = self.bump();
            }
            if !detected_indent && self.line_indent > text_indent {
                text_indent = self.line_indent;
            }
            if is_eol(ch) {
                empty_lines += 1;
                continue;
            }
            if self.line_indent < text_indent || ch == 0 {
                match chomp {
                    Chomp::Keep => buf.push_str(&breaks(did_read_content, empty_lines)),
                    Chomp::Clip if did_read_content => buf.push('\n'),
                    _ => {}
                }
                break;
            }
            if !folding {
                buf.push_str(&breaks(did_read_content, empty_lines));
            } else if is_white_space(ch) {
                at_more_indented = true;
                buf.push_str(&breaks(did_read_content, empty_lines));
            } else if at_more_indented {
                at_more_indented = false;
                buf.push_str(&"\n".repeat(empty_lines + 1));
            } else if empty_lines == 0 {
                if did_read_content {
                    buf.push(' ');
                }
            } else {
                buf.push_str(&"\n".repeat(empty_lines));
            }
            did_read_content = true;
            detected_indent = true;
            empty_lines = 0;
            let start = self.pos;
            self.take_while(|c| !is_eol(c));
            ch = self.ch();
            self.capture_segment(&mut buf, start, self.pos, false)?;
        }
        Ok(buf)
    }
}
