//! `%YAML` and `%TAG` directives.

use std::sync::OnceLock;

use regex::Regex;

use super::{
    property::{is_tag_handle, is_tag_uri, percent_decode},
    Parser,
};
use crate::{
    char_traits::{is_blank, is_blank_or_breakz, is_break, is_breakz},
    error::ScanError,
};

fn version_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+)\.([0-9]+)$").unwrap_or_else(|e| panic!("{e}")))
}

impl Parser<'_> {
    /// Read the directives opening a document.
    ///
    /// # Return
    /// Returns whether at least one directive was read.
    pub(super) fn read_directives(&mut self) -> Result<bool, ScanError> {
        let mut has_directives = false;
        while self.input.peek() != '\0' {
            self.skip_separation(true, None);
            if self.input.line_indent > 0 || self.input.peek() != '%' {
                break;
            }
            has_directives = true;
            self.input.skip();

            let start = self.input.pos;
            let mut c = self.input.peek();
            while !is_blank_or_breakz(c) {
                c = self.input.next_ch();
            }
            let name = self.input.slice(start, self.input.pos);
            if name.is_empty() {
                return Err(
                    self.error("directive name must not be less than one character in length")
                );
            }

            let mut args = vec![];
            while c != '\0' {
                while is_blank(c) {
                    c = self.input.next_ch();
                }
                if c == '#' {
                    while !is_breakz(c) {
                        c = self.input.next_ch();
                    }
                    break;
                }
                if is_break(c) {
                    break;
                }
                let start = self.input.pos;
                while !is_blank_or_breakz(c) {
                    c = self.input.next_ch();
                }
                args.push(self.input.slice(start, self.input.pos));
            }
            if c != '\0' {
                self.input.read_line_break()?;
            }

            debug_print!("directive %{name} {args:?}");
            match name.as_str() {
                "YAML" => self.handle_yaml_directive(&args)?,
                "TAG" => self.handle_tag_directive(&args)?,
                _ => self.warn(&format!("unknown document directive \"{name}\"")),
            }
        }
        Ok(has_directives)
    }

    fn handle_yaml_directive(&mut self, args: &[String]) -> Result<(), ScanError> {
        if self.version.is_some() {
            return Err(self.error("duplication of %YAML directive"));
        }
        let [version] = args else {
            return Err(self.error("YAML directive accepts exactly one argument"));
        };
        let Some(caps) = version_pattern().captures(version) else {
            return Err(self.error("ill-formed argument of the YAML directive"));
        };
        let major = caps[1].parse::<u64>().ok();
        let minor = caps[2].parse::<u64>().ok();
        if major != Some(1) {
            return Err(self.error("unacceptable YAML version of the document"));
        }
        self.version = Some(version.clone());
        self.check_line_breaks = minor.is_some_and(|minor| minor < 2);
        if minor != Some(1) && minor != Some(2) {
            self.warn("unsupported YAML version of the document");
        }
        Ok(())
    }

    fn handle_tag_directive(&mut self, args: &[String]) -> Result<(), ScanError> {
        let [handle, prefix] = args else {
            return Err(self.error("TAG directive accepts exactly two arguments"));
        };
        if !is_tag_handle(handle) {
            return Err(self.error("ill-formed tag handle (first argument) of the TAG directive"));
        }
        if self.tag_map.contains_key(handle) {
            return Err(self.error(&format!(
                "there is a previously declared suffix for \"{handle}\" tag handle"
            )));
        }
        if !is_tag_uri(prefix) {
            return Err(self.error("ill-formed tag prefix (second argument) of the TAG directive"));
        }
        let Some(prefix) = percent_decode(prefix) else {
            return Err(self.error(&format!("tag prefix is malformed: {prefix}")));
        };
        self.tag_map.insert(handle.clone(), prefix);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;

    use crate::{loader::LoadOptions, parser::Parser, ScanError, Yaml};

    fn parse_with_warnings(source: &str) -> (Result<Vec<Yaml>, ScanError>, Vec<String>) {
        let warnings = RefCell::new(vec![]);
        let options = LoadOptions::new()
            .on_warning(|w: ScanError| warnings.borrow_mut().push(w.info().to_owned()));
        let mut docs = vec![];
        let res = Parser::new(source, options).and_then(|mut p| p.parse_stream(|d| docs.push(d)));
        (res.map(|()| docs), warnings.into_inner())
    }

    #[test]
    fn yaml_directive() {
        let (docs, warnings) = parse_with_warnings("%YAML 1.2\n---\na\n");
        assert_eq!(docs.unwrap(), [Yaml::string("a")]);
        assert!(warnings.is_empty());

        let (docs, warnings) = parse_with_warnings("%YAML 1.3\n---\na\n");
        assert!(docs.is_ok());
        assert_eq!(warnings, ["unsupported YAML version of the document"]);

        let (docs, _) = parse_with_warnings("%YAML 2.0\n---\na\n");
        assert_eq!(docs.unwrap_err().info(), "unacceptable YAML version of the document");

        let (docs, _) = parse_with_warnings("%YAML 1.2\n%YAML 1.2\n---\na\n");
        assert_eq!(docs.unwrap_err().info(), "duplication of %YAML directive");

        let (docs, _) = parse_with_warnings("%YAML 1.2 # comment\n--- a\n");
        assert!(docs.is_ok());
    }

    #[test]
    fn unknown_directive() {
        let (docs, warnings) = parse_with_warnings("%FOO bar baz\n---\na\n");
        assert!(docs.is_ok());
        assert_eq!(warnings, ["unknown document directive \"FOO\""]);
    }

    #[test]
    fn directives_need_a_document() {
        let (docs, _) = parse_with_warnings("%YAML 1.2\na\n");
        assert_eq!(docs.unwrap_err().info(), "directives end mark is expected");
    }
}
