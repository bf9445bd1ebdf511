//! Node properties (tags and anchors) and aliases.

use super::Parser;
use crate::{
    char_traits::{as_hex, is_blank_or_breakz, is_flow, is_handle_char, is_hex, is_uri_char},
    error::ScanError,
    schema::YAML_TAG_PREFIX,
};

impl Parser<'_> {
    /// Read a tag property (`!local`, `!!str`, `!handle!suffix` or `!<verbatim>`).
    pub(super) fn read_tag_property(&mut self) -> Result<bool, ScanError> {
        if self.input.peek() != '!' {
            return Ok(false);
        }
        if self.tag.is_some() {
            return Err(self.error("duplication of a tag property"));
        }

        let mut c = self.input.next_ch();
        let (handle, suffix, verbatim) = if c == '<' {
            self.input.skip();
            let start = self.input.pos;
            while !matches!(self.input.peek(), '>' | '\0') {
                self.input.skip();
            }
            if self.input.peek() != '>' {
                return Err(self.error("unexpected end of the stream within a verbatim tag"));
            }
            let name = self.input.slice(start, self.input.pos);
            self.input.skip();
            (String::new(), name, true)
        } else {
            let mut handle = "!".to_owned();
            let mut named = false;
            if c == '!' {
                handle.push('!');
                named = true;
                c = self.input.next_ch();
            }
            let mut start = self.input.pos;
            while !is_blank_or_breakz(c) {
                if c == '!' {
                    if named {
                        return Err(self.error("tag suffix cannot contain exclamation marks"));
                    }
                    handle = self.input.slice(start - 1, self.input.pos + 1);
                    if !is_tag_handle(&handle) {
                        return Err(self.error("named tag handle cannot contain such characters"));
                    }
                    named = true;
                    start = self.input.pos + 1;
                }
                c = self.input.next_ch();
            }
            let name = self.input.slice(start, self.input.pos);
            if name.chars().any(is_flow) {
                return Err(self.error("tag suffix cannot contain flow indicator characters"));
            }
            (handle, name, false)
        };

        if !suffix.is_empty() && !is_tag_uri(&suffix) {
            return Err(self.error(&format!(
                "tag name cannot contain such characters: {suffix}"
            )));
        }
        let Some(suffix) = percent_decode(&suffix) else {
            return Err(self.error(&format!("tag name is malformed: {suffix}")));
        };

        let tag = if verbatim {
            suffix
        } else if let Some(prefix) = self.tag_map.get(&handle) {
            format!("{prefix}{suffix}")
        } else if handle == "!" {
            format!("!{suffix}")
        } else if handle == "!!" {
            format!("{YAML_TAG_PREFIX}{suffix}")
        } else {
            return Err(self.error(&format!("undeclared tag handle \"{handle}\"")));
        };
        self.tag = Some(tag);
        Ok(true)
    }

    /// Read an anchor property (`&name`).
    pub(super) fn read_anchor_property(&mut self) -> Result<bool, ScanError> {
        if self.input.peek() != '&' {
            return Ok(false);
        }
        if self.anchor.is_some() {
            return Err(self.error("duplication of an anchor property"));
        }
        self.input.skip();
        let name = self.read_anchor_name();
        if name.is_empty() {
            return Err(self.error("name of an anchor node must contain at least one character"));
        }
        self.anchor = Some(name);
        Ok(true)
    }

    /// Read an alias (`*name`) and set the result to a copy of the anchored node.
    pub(super) fn read_alias(&mut self) -> Result<bool, ScanError> {
        if self.input.peek() != '*' {
            return Ok(false);
        }
        self.input.skip();
        let name = self.read_anchor_name();
        if name.is_empty() {
            return Err(self.error("name of an alias node must contain at least one character"));
        }
        let Some((node, nodes)) = self.anchors.get(&name) else {
            return Err(self.error(&format!("unidentified alias \"{name}\"")));
        };
        self.alias_nodes = self.alias_nodes.saturating_add(*nodes);
        if self.alias_nodes > self.options.max_alias_nodes {
            return Err(self.error(&format!(
                "too many alias expansions; the limit is {} nodes",
                self.options.max_alias_nodes
            )));
        }
        self.result = node.clone();
        self.kind = crate::NodeKind::of(&self.result);
        self.skip_separation(true, None);
        Ok(true)
    }

    fn read_anchor_name(&mut self) -> String {
        let start = self.input.pos;
        let mut c = self.input.peek();
        while !is_blank_or_breakz(c) && !is_flow(c) {
            c = self.input.next_ch();
        }
        self.input.slice(start, self.input.pos)
    }
}

/// Check whether `handle` is `!`, `!!` or `!word!`.
pub(super) fn is_tag_handle(handle: &str) -> bool {
    match handle.len() {
        0 => false,
        1 => handle == "!",
        _ => {
            handle.starts_with('!')
                && handle.ends_with('!')
                && handle[1..handle.len() - 1].chars().all(is_handle_char)
        }
    }
}

/// Check whether `uri` is a valid tag URI.
///
/// The first character may be `!` but no other flow indicator. `%` must start a two hex digits
/// escape.
pub(super) fn is_tag_uri(uri: &str) -> bool {
    let chars: Vec<char> = uri.chars().collect();
    let Some(&first) = chars.first() else {
        return false;
    };
    let mut i = usize::from(first == '!' || (!is_flow(first) && first != '%'));
    while i < chars.len() {
        match chars[i] {
            '%' if chars.get(i + 1).copied().is_some_and(is_hex)
                && chars.get(i + 2).copied().is_some_and(is_hex) =>
            {
                i += 3;
            }
            c if is_uri_char(c) => i += 1,
            _ => return false,
        }
    }
    true
}

/// Decode the `%XX` escapes of `uri`.
///
/// # Return
/// Returns `None` if an escape is incomplete or the decoded bytes are not valid UTF-8.
pub(super) fn percent_decode(uri: &str) -> Option<String> {
    if !uri.contains('%') {
        return Some(uri.to_owned());
    }
    let mut bytes = Vec::with_capacity(uri.len());
    let mut chars = uri.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            let hi = chars.next().filter(|&c| is_hex(c))?;
            let lo = chars.next().filter(|&c| is_hex(c))?;
            bytes.push(u8::try_from((as_hex(hi) << 4) | as_hex(lo)).ok()?);
        } else {
            let mut buf = [0; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod test {
    use super::{is_tag_handle, is_tag_uri, percent_decode};

    #[test]
    fn handles() {
        assert!(is_tag_handle("!"));
        assert!(is_tag_handle("!!"));
        assert!(is_tag_handle("!e-x!"));
        assert!(is_tag_handle("!e1!"));
        assert!(!is_tag_handle("!e_1!"));
        assert!(!is_tag_handle("e!"));
        assert!(!is_tag_handle(""));
    }

    #[test]
    fn uris() {
        assert!(is_tag_uri("tag:example.com,2000:app/"));
        assert!(is_tag_uri("!my-"));
        assert!(is_tag_uri("a%21b"));
        assert!(!is_tag_uri(",a"));
        assert!(!is_tag_uri("a%2"));
        assert!(!is_tag_uri("a{b"));
        assert!(!is_tag_uri(""));
    }

    #[test]
    fn decode() {
        assert_eq!(percent_decode("a%21b").as_deref(), Some("a!b"));
        assert_eq!(percent_decode("%C3%A9").as_deref(), Some("é"));
        assert_eq!(percent_decode("%C3").as_deref(), None);
        assert_eq!(percent_decode("plain").as_deref(), Some("plain"));
    }
}
