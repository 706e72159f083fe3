//! Scalar styles and their text transformations.

/// The output style of a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Style {
    Plain,
    Single,
    Literal,
    Folded,
    Double,
}

fn is_white_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Characters that can be written without escaping.
fn is_printable(c: char) -> bool {
    ('\u{20}'..='\u{7E}').contains(&c)
        || (('\u{A1}'..='\u{D7FF}').contains(&c) && c != '\u{2028}' && c != '\u{2029}')
        || (('\u{E000}'..='\u{FFFD}').contains(&c) && c != '\u{FEFF}')
        || ('\u{10000}'..='\u{10FFFF}').contains(&c)
}

fn is_ns_char(c: char) -> bool {
    is_printable(c) && !is_white_space(c) && c != '\u{FEFF}' && c != '\r' && c != '\n'
}

fn is_plain_safe(c: char, prev: Option<char>) -> bool {
    is_printable(c)
        && c != '\u{FEFF}'
        && !matches!(c, ',' | '[' | ']' | '{' | '}' | ':')
        && (c != '#' || prev.map_or(false, is_ns_char))
}

fn is_plain_safe_first(c: char) -> bool {
    is_printable(c)
        && c != '\u{FEFF}'
        && !is_white_space(c)
        && !matches!(
            c,
            '-' | '?' | ':' | ',' | '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '='
                | '>' | '\'' | '"' | '%' | '@' | '`'
        )
}

/// Leading spaces, after optional line breaks, need an explicit indentation indicator.
fn need_indent_indicator(s: &str) -> bool {
    s.trim_start_matches('\n').starts_with(' ')
}

/// Choose the style of a string.
///
/// `line_width` is `-1` for unlimited width. The double quoted style can represent anything.
pub(crate) fn choose_style<F>(
    s: &str,
    single_line_only: bool,
    indent_per_level: usize,
    line_width: i64,
    ambiguous: F,
) -> Style
where
    F: Fn(&str) -> bool,
{
    let chars = s.chars().collect::<Vec<_>>();
    let track_width = line_width != -1;
    let mut has_line_break = false;
    let mut has_foldable_line = false;
    let mut prev_break = -1i64;
    let mut plain = chars.first().map_or(false, |c| is_plain_safe_first(*c))
        && !chars.last().map_or(false, |c| is_white_space(*c));
    let foldable = |from: i64, to: i64| {
        to - from - 1 > line_width && chars.get((from + 1) as usize) != Some(&' ')
    };
    for (i, &c) in chars.iter().enumerate() {
        if !single_line_only && c == '\n' {
            has_line_break = true;
            if track_width {
                has_foldable_line = has_foldable_line || foldable(prev_break, i as i64);
                prev_break = i as i64;
            }
        } else if !is_printable(c) {
            return Style::Double;
        }
        let prev = i.checked_sub(1).map(|j| chars[j]);
        plain = plain && is_plain_safe(c, prev);
    }
    if !single_line_only && track_width {
        has_foldable_line = has_foldable_line || foldable(prev_break, chars.len() as i64);
    }
    if !has_line_break && !has_foldable_line {
        return if plain && !ambiguous(s) {
            Style::Plain
        } else {
            Style::Single
        };
    }
    if indent_per_level > 9 && need_indent_indicator(s) {
        return Style::Double;
    }
    if has_foldable_line {
        Style::Folded
    } else {
        Style::Literal
    }
}

/// The header of the block scalars: indentation indicator and chomping indicator.
pub(crate) fn block_header(s: &str, indent_per_level: usize) -> String {
    let indicator = if need_indent_indicator(s) {
        indent_per_level.to_string()
    } else {
        String::new()
    };
    let clip = s.ends_with('\n');
    let keep = clip && (s.ends_with("\n\n") || s == "\n");
    let chomp = if keep {
        "+"
    } else if clip {
        ""
    } else {
        "-"
    };
    format!("{}{}\n", indicator, chomp)
}

/// Indent each non-empty line.
pub(crate) fn indent_string(s: &str, spaces: usize) -> String {
    let ind = " ".repeat(spaces);
    let mut result = String::with_capacity(s.len());
    for line in s.split_inclusive('\n') {
        if line != "\n" {
            result.push_str(&ind);
        }
        result.push_str(line);
    }
    result
}

pub(crate) fn drop_ending_newline(s: &str) -> &str {
    s.strip_suffix('\n').unwrap_or(s)
}

/// Fold the lines of a string for the folded style.
///
/// An extra line break is added between two normal lines,
/// more indented lines are kept as is.
pub(crate) fn fold_string(s: &str, width: i64) -> String {
    let first = s.find('\n').unwrap_or(s.len());
    let mut result = fold_line(&s[..first], width);
    let mut prev_more_indented = s.starts_with('\n') || s.starts_with(' ');
    let rest = &s[first..];
    let mut pos = 0;
    while pos < rest.len() {
        let prefix_len = rest[pos..].len() - rest[pos..].trim_start_matches('\n').len();
        let prefix = &rest[pos..pos + prefix_len];
        pos += prefix_len;
        let line_len = rest[pos..].find('\n').unwrap_or(rest.len() - pos);
        let line = &rest[pos..pos + line_len];
        pos += line_len;
        let more_indented = line.starts_with(' ');
        result.push_str(prefix);
        if !prev_more_indented && !more_indented && !line.is_empty() {
            result.push('\n');
        }
        result.push_str(&fold_line(line, width));
        prev_more_indented = more_indented;
    }
    result
}

/// Break a line at the spaces, each piece is at most `width` characters if possible.
///
/// A space is only a break point if it is followed by a non-space character.
pub(crate) fn fold_line(line: &str, width: i64) -> String {
    if line.is_empty() || line.starts_with(' ') {
        return line.to_string();
    }
    let chars = line.chars().collect::<Vec<_>>();
    let slice = |a: usize, b: usize| chars[a..b].iter().collect::<String>();
    let mut start = 0;
    let mut curr = 0;
    let mut result = String::new();
    let mut i = 0;
    while i + 1 < chars.len() {
        if chars[i] != ' ' || chars[i + 1] == ' ' {
            i += 1;
            continue;
        }
        let next = i;
        if (next - start) as i64 > width {
            let end = if curr > start { curr } else { next };
            result.push('\n');
            result.push_str(&slice(start, end));
            start = end + 1;
        }
        curr = next;
        i += 2;
    }
    result.push('\n');
    if (chars.len() - start) as i64 > width && curr > start {
        result.push_str(&slice(start, curr));
        result.push('\n');
        result.push_str(&slice(curr + 1, chars.len()));
    } else {
        result.push_str(&slice(start, chars.len()));
    }
    result.split_off(1)
}

fn escape_seq(c: char) -> Option<&'static str> {
    Some(match c {
        '\0' => "\\0",
        '\x07' => "\\a",
        '\x08' => "\\b",
        '\t' => "\\t",
        '\n' => "\\n",
        '\x0B' => "\\v",
        '\x0C' => "\\f",
        '\r' => "\\r",
        '\x1B' => "\\e",
        '"' => "\\\"",
        '\\' => "\\\\",
        '\u{85}' => "\\N",
        '\u{A0}' => "\\_",
        '\u{2028}' => "\\L",
        '\u{2029}' => "\\P",
        _ => return None,
    })
}

/// Escape a string for the double quoted style.
pub(crate) fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_seq(c) {
            Some(e) => result.push_str(e),
            None if is_printable(c) => result.push(c),
            None => {
                let code = c as u32;
                let hex = if code <= 0xFF {
                    format!("\\x{:02X}", code)
                } else if code <= 0xFFFF {
                    format!("\\u{:04X}", code)
                } else {
                    format!("\\U{:08X}", code)
                };
                result.push_str(&hex);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_long_line() {
        let s = "aaa bbb ccc ddd";
        assert_eq!(fold_line(s, 7), "aaa bbb\nccc ddd");
        assert_eq!(fold_line(s, 80), s);
        assert_eq!(fold_line("  indented", 3), "  indented");
    }

    #[test]
    fn escape_controls() {
        assert_eq!(escape_string("a\tb\u{1}\"\\"), "a\\tb\\x01\\\"\\\\");
        assert_eq!(escape_string("\u{FEFF}"), "\\uFEFF");
    }

    #[test]
    fn header_chomping() {
        assert_eq!(block_header("a\nb", 2), "-\n");
        assert_eq!(block_header("a\nb\n", 2), "\n");
        assert_eq!(block_header("a\nb\n\n", 2), "+\n");
        assert_eq!(block_header(" a\n", 2), "2\n");
    }
}
