use super::*;
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_HANDLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:!|!!|![a-z\-]+!)$").unwrap());
pub(crate) static TAG_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:!|[^,\[\]\{\}])(?:%[0-9a-f]{2}|[0-9a-z\-#;/\?:@&=\+\$,_\.!~\*'\(\)\[\]])*$")
        .unwrap()
});

pub(crate) fn is_tag_handle(s: &str) -> bool {
    TAG_HANDLE.is_match(s)
}

static VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)\.([0-9]+)$").unwrap());

/// The implementation of the directives.
impl Parser<'_> {
    /// Match a directive line, the cursor is at `%`.
    pub fn directive(&mut self) -> PResult<()> {
        self.pos += 1;
        let start = self.pos;
        self.take_while(|c| !is_ws_or_eol(c));
        let name = self.doc[start..self.pos].to_string();
        if name.is_empty() {
            return self.err("directive name must not be less than one character in length");
        }
        let mut args = Vec::new();
        while self.ch() != 0 {
            self.take_while(is_white_space);
            if self.ch() == b'#' {
                self.take_while(|c| !is_eol(c));
                break;
            }
            if is_eol(self.ch()) {
                break;
            }
            let start = self.pos;
            self.take_while(|c| !is_ws_or_eol(c));
            args.push(self.doc[start..self.pos].to_string());
        }
        if self.ch() != 0 {
            self.read_line_break()?;
        }
        tracing::trace!(%name, ?args, "directive");
        match name.as_str() {
            "YAML" => self.directive_yaml(&args),
            "TAG" => self.directive_tag(args),
            _ => {
                self.warn(format!("unknown document directive \"{}\"", name));
                Ok(())
            }
        }
    }

    fn directive_yaml(&mut self, args: &[String]) -> PResult<()> {
        if self.version.is_some() {
            return self.err("duplication of %YAML directive");
        }
        let [arg] = args else {
            return self.err("YAML directive accepts exactly one argument");
        };
        let Some(caps) = VERSION.captures(arg) else {
            return self.err("ill-formed argument of the YAML directive");
        };
        let major = caps[1].parse::<u32>().unwrap_or(u32::MAX);
        let minor = caps[2].parse::<u32>().unwrap_or(u32::MAX);
        if major != 1 {
            return self.err("unacceptable YAML version of the document");
        }
        self.version = Some(arg.clone());
        self.check_line_breaks = minor < 2;
        if minor != 1 && minor != 2 {
            self.warn("unsupported YAML version of the document");
        }
        Ok(())
    }

    fn directive_tag(&mut self, args: Vec<String>) -> PResult<()> {
        let Ok([handle, prefix]) = <[String; 2]>::try_from(args) else {
            return self.err("TAG directive accepts exactly two arguments");
        };
        if !TAG_HANDLE.is_match(&handle) {
            return self.err("ill-formed tag handle (first argument) of the TAG directive");
        }
        if self.tag_map.contains_key(&handle) {
            return self.err(format!(
                "there is a previously declared suffix for \"{}\" tag handle",
                handle
            ));
        }
        if !TAG_URI.is_match(&prefix) {
            return self.err("ill-formed tag prefix (second argument) of the TAG directive");
        }
        self.tag_map.insert(handle, prefix);
        Ok(())
    }
}
