//! Plain, quoted and block scalars.

use super::Parser;
use crate::{
    char_traits::{
        as_hex, is_blank, is_blank_or_breakz, is_break, is_breakz, is_flow, is_hex, is_json_char,
        is_printable, is_reserved_indicator,
    },
    error::ScanError,
    schema::NodeKind,
    Yaml,
};

/// What to do with the line breaks ending a block scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Chomping {
    /// Keep the first line break (`|`, `>`).
    Clip,
    /// Remove all of them (`|-`, `>-`).
    Strip,
    /// Keep all of them (`|+`, `>+`).
    Keep,
}

/// Append the result of folding `count` line breaks to `out`.
fn fold_lines(out: &mut String, count: usize) {
    match count {
        0 => {}
        1 => out.push(' '),
        _ => out.extend(std::iter::repeat('\n').take(count - 1)),
    }
}

fn push_newlines(out: &mut String, count: usize) {
    out.extend(std::iter::repeat('\n').take(count));
}

/// Return the character a single-character escape (`\n`, `\t`, ...) stands for.
fn simple_escape(c: char) -> Option<char> {
    Some(match c {
        '0' => '\0',
        'a' => '\x07',
        'b' => '\x08',
        't' | '\t' => '\t',
        'n' => '\n',
        'v' => '\x0b',
        'f' => '\x0c',
        'r' => '\r',
        'e' => '\x1b',
        ' ' => ' ',
        '"' => '"',
        '/' => '/',
        '\\' => '\\',
        'N' => '\u{85}',
        '_' => '\u{a0}',
        'L' => '\u{2028}',
        'P' => '\u{2029}',
        _ => return None,
    })
}

/// Return the number of hex digits following a code point escape (`\x`, `\u`, `\U`).
fn hex_escape_len(c: char) -> Option<usize> {
    match c {
        'x' => Some(2),
        'u' => Some(4),
        'U' => Some(8),
        _ => None,
    }
}

impl Parser<'_> {
    fn set_scalar(&mut self, value: String) {
        self.kind = Some(NodeKind::Scalar);
        self.result = Yaml::string(value);
    }

    /// Append the characters in `start..end` to `out`, checking they may appear in a scalar.
    ///
    /// Quoted scalars (`check_json`) accept any character from `U+0020` and tabs, other scalars
    /// only accept printable characters.
    fn capture_segment(
        &self,
        out: &mut String,
        start: usize,
        end: usize,
        check_json: bool,
    ) -> Result<(), ScanError> {
        if start >= end {
            return Ok(());
        }
        let chars = self.input.chars(start, end);
        if check_json {
            if !chars.iter().all(|&c| is_json_char(c)) {
                return Err(self.error("expected valid JSON character"));
            }
        } else if !chars.iter().all(|&c| is_printable(c)) {
            return Err(self.error("the stream contains non-printable characters"));
        }
        out.extend(chars);
        Ok(())
    }

    /// Read a plain (unquoted) scalar.
    ///
    /// Continuation lines must be indented at least `node_indent`. Inside flow collections, flow
    /// indicators end the scalar.
    pub(super) fn read_plain_scalar(
        &mut self,
        node_indent: isize,
        within_flow: bool,
    ) -> Result<bool, ScanError> {
        let mut c = self.input.peek();
        if is_blank_or_breakz(c) || is_flow(c) || is_reserved_indicator(c) {
            return Ok(false);
        }
        if c == '?' || c == '-' {
            let following = self.input.peek_nth(1);
            if is_blank_or_breakz(following) || (within_flow && is_flow(following)) {
                return Ok(false);
            }
        }

        let mut value = String::new();
        let mut capture_start = self.input.pos;
        let mut capture_end = capture_start;
        let mut pending_breaks = None;

        while c != '\0' {
            if c == ':' {
                let following = self.input.peek_nth(1);
                if is_blank_or_breakz(following) || (within_flow && is_flow(following)) {
                    break;
                }
            } else if c == '#' {
                if is_blank_or_breakz(self.input.peek_prev()) {
                    break;
                }
            } else if (self.input.at_line_start() && self.input.next_is_document_indicator())
                || (within_flow && is_flow(c))
            {
                break;
            } else if is_break(c) {
                let line_end = self.input.checkpoint();
                let line = self.input.line;
                self.skip_separation(false, None);
                if self.input.line_indent >= node_indent {
                    pending_breaks = Some(self.input.line - line);
                    c = self.input.peek();
                    continue;
                }
                self.input.restore(line_end);
                self.input.pos = capture_end;
                break;
            }

            if let Some(breaks) = pending_breaks.take() {
                self.capture_segment(&mut value, capture_start, capture_end, false)?;
                fold_lines(&mut value, breaks);
                capture_start = self.input.pos;
                capture_end = capture_start;
            }
            if !is_blank(c) {
                capture_end = self.input.pos + 1;
            }
            c = self.input.next_ch();
        }
        self.capture_segment(&mut value, capture_start, capture_end, false)?;

        if value.is_empty() {
            return Ok(false);
        }
        self.set_scalar(value);
        Ok(true)
    }

    /// Read a single-quoted scalar. `''` stands for a single quote.
    pub(super) fn read_single_quoted_scalar(
        &mut self,
        node_indent: isize,
    ) -> Result<bool, ScanError> {
        if self.input.peek() != '\'' {
            return Ok(false);
        }
        self.input.skip();

        let mut value = String::new();
        let mut capture_start = self.input.pos;
        let mut capture_end = capture_start;
        loop {
            let c = self.input.peek();
            if c == '\0' {
                return Err(
                    self.error("unexpected end of the stream within a single quoted scalar")
                );
            } else if c == '\'' {
                self.capture_segment(&mut value, capture_start, self.input.pos, true)?;
                if self.input.next_ch() != '\'' {
                    self.set_scalar(value);
                    return Ok(true);
                }
                capture_start = self.input.pos;
                self.input.skip();
                capture_end = self.input.pos;
            } else if is_break(c) {
                self.capture_segment(&mut value, capture_start, capture_end, true)?;
                let breaks = self.skip_separation(false, Some(node_indent));
                fold_lines(&mut value, breaks);
                capture_start = self.input.pos;
                capture_end = capture_start;
            } else if self.input.at_line_start() && self.input.next_is_document_indicator() {
                return Err(
                    self.error("unexpected end of the document within a single quoted scalar")
                );
            } else {
                self.input.skip();
                if !is_blank(c) {
                    capture_end = self.input.pos;
                }
            }
        }
    }

    /// Read a double-quoted scalar, decoding its escape sequences.
    pub(super) fn read_double_quoted_scalar(
        &mut self,
        node_indent: isize,
    ) -> Result<bool, ScanError> {
        if self.input.peek() != '"' {
            return Ok(false);
        }
        self.input.skip();

        let mut value = String::new();
        let mut capture_start = self.input.pos;
        let mut capture_end = capture_start;
        loop {
            let c = self.input.peek();
            if c == '\0' {
                return Err(
                    self.error("unexpected end of the stream within a double quoted scalar")
                );
            } else if c == '"' {
                self.capture_segment(&mut value, capture_start, self.input.pos, true)?;
                self.input.skip();
                self.set_scalar(value);
                return Ok(true);
            } else if c == '\\' {
                self.capture_segment(&mut value, capture_start, self.input.pos, true)?;
                let c = self.input.next_ch();
                if is_break(c) {
                    // An escaped line break is removed, the following ones are kept.
                    let breaks = self.skip_separation(false, Some(node_indent));
                    push_newlines(&mut value, breaks.saturating_sub(1));
                } else if let Some(escaped) = simple_escape(c) {
                    value.push(escaped);
                    self.input.skip();
                } else if let Some(len) = hex_escape_len(c) {
                    value.push(self.read_code_point(len)?);
                } else {
                    return Err(self.error("unknown escape sequence"));
                }
                capture_start = self.input.pos;
                capture_end = capture_start;
            } else if is_break(c) {
                self.capture_segment(&mut value, capture_start, capture_end, true)?;
                let breaks = self.skip_separation(false, Some(node_indent));
                fold_lines(&mut value, breaks);
                capture_start = self.input.pos;
                capture_end = capture_start;
            } else if self.input.at_line_start() && self.input.next_is_document_indicator() {
                return Err(
                    self.error("unexpected end of the document within a double quoted scalar")
                );
            } else {
                self.input.skip();
                if !is_blank(c) {
                    capture_end = self.input.pos;
                }
            }
        }
    }

    /// Read the `len` hex digits following the escape character under the cursor.
    fn read_hex_escape(&mut self, len: usize) -> Result<u32, ScanError> {
        let mut code = 0;
        for _ in 0..len {
            let c = self.input.next_ch();
            if !is_hex(c) {
                return Err(self.error("expected hexadecimal character"));
            }
            code = (code << 4) | as_hex(c);
        }
        self.input.skip();
        Ok(code)
    }

    /// Read a code point escape. A `\u` high surrogate followed by a `\u` low surrogate is
    /// decoded as a single character.
    fn read_code_point(&mut self, len: usize) -> Result<char, ScanError> {
        let mut code = self.read_hex_escape(len)?;
        if (0xd800..0xdc00).contains(&code)
            && self.input.peek() == '\\'
            && self.input.peek_nth(1) == 'u'
        {
            self.input.skip();
            let low = self.read_hex_escape(4)?;
            if !(0xdc00..0xe000).contains(&low) {
                return Err(self.error("invalid Unicode code point"));
            }
            code = 0x10000 + ((code - 0xd800) << 10) + (low - 0xdc00);
        }
        char::from_u32(code).ok_or_else(|| self.error("invalid Unicode code point"))
    }

    /// Read a literal (`|`) or folded (`>`) block scalar.
    ///
    /// `node_indent` is the minimal indentation of the content. It is overridden by an explicit
    /// indentation indicator, or by the indentation of the first non-empty line.
    pub(super) fn read_block_scalar(&mut self, node_indent: isize) -> Result<bool, ScanError> {
        let folding = match self.input.peek() {
            '|' => false,
            '>' => true,
            _ => return Ok(false),
        };

        let mut chomping = Chomping::Clip;
        let mut detected_indent = false;
        let mut text_indent = node_indent;
        let mut c;
        loop {
            c = self.input.next_ch();
            if c == '+' || c == '-' {
                if chomping != Chomping::Clip {
                    return Err(self.error("repeat of a chomping mode identifier"));
                }
                chomping = if c == '+' {
                    Chomping::Keep
                } else {
                    Chomping::Strip
                };
            } else if let Some(width) = c.to_digit(10) {
                if width == 0 {
                    return Err(self.error(
                        "bad explicit indentation width of a block scalar; it cannot be less than one",
                    ));
                }
                if detected_indent {
                    return Err(self.error("repeat of an indentation width identifier"));
                }
                text_indent = node_indent + isize::try_from(width).unwrap_or(1) - 1;
                detected_indent = true;
            } else {
                break;
            }
        }

        if is_blank(c) {
            while is_blank(c) {
                c = self.input.next_ch();
            }
            if c == '#' {
                while !is_breakz(c) {
                    c = self.input.next_ch();
                }
            }
        }

        let mut value = String::new();
        let mut did_read_content = false;
        let mut empty_lines = 0;
        let mut at_more_indented = false;

        while c != '\0' {
            self.input.read_line_break()?;
            self.input.line_indent = 0;
            c = self.input.peek();
            while (!detected_indent || self.input.line_indent < text_indent) && c == ' ' {
                self.input.line_indent += 1;
                c = self.input.next_ch();
            }
            if !detected_indent && self.input.line_indent > text_indent {
                text_indent = self.input.line_indent;
            }

            if is_break(c) {
                empty_lines += 1;
                continue;
            }

            if self.input.line_indent < text_indent
                || c == '\0'
                || (self.input.at_line_start() && self.input.next_is_document_indicator())
            {
                match chomping {
                    Chomping::Keep => push_newlines(
                        &mut value,
                        if did_read_content {
                            empty_lines + 1
                        } else {
                            empty_lines
                        },
                    ),
                    Chomping::Clip if did_read_content => value.push('\n'),
                    Chomping::Clip | Chomping::Strip => {}
                }
                break;
            }

            if folding && is_blank(c) {
                // More-indented lines are not folded.
                at_more_indented = true;
                push_newlines(
                    &mut value,
                    if did_read_content {
                        empty_lines + 1
                    } else {
                        empty_lines
                    },
                );
            } else if folding && at_more_indented {
                at_more_indented = false;
                push_newlines(&mut value, empty_lines + 1);
            } else if folding && empty_lines == 0 {
                if did_read_content {
                    value.push(' ');
                }
            } else if folding {
                push_newlines(&mut value, empty_lines);
            } else {
                push_newlines(
                    &mut value,
                    if did_read_content {
                        empty_lines + 1
                    } else {
                        empty_lines
                    },
                );
            }

            did_read_content = true;
            detected_indent = true;
            empty_lines = 0;
            let start = self.input.pos;
            while !is_breakz(c) {
                c = self.input.next_ch();
            }
            self.capture_segment(&mut value, start, self.input.pos, false)?;
        }

        self.set_scalar(value);
        Ok(true)
    }
}

#[cfg(test)]
mod test {
    use super::fold_lines;
    use crate::{loader::LoadOptions, parser::Parser, ScanError, Yaml};

    fn parse(source: &str) -> Result<Yaml, ScanError> {
        let mut docs = vec![];
        Parser::new(source, LoadOptions::default())?.parse_stream(|doc| docs.push(doc))?;
        Ok(docs.pop().unwrap_or(Yaml::BadValue))
    }

    fn text(source: &str) -> String {
        parse(source).unwrap().into_string().unwrap()
    }

    #[test]
    fn folding() {
        let mut out = String::new();
        fold_lines(&mut out, 1);
        fold_lines(&mut out, 3);
        fold_lines(&mut out, 0);
        assert_eq!(out, " \n\n");
    }

    #[test]
    fn plain() {
        assert_eq!(text("  hello world  "), "hello world");
        assert_eq!(text("a\n  b\n\n  c\n"), "a b\nc");
        assert_eq!(text("a:b # comment"), "a:b");
        assert_eq!(text("a#b"), "a#b");
        assert_eq!(text("-a"), "-a");
        assert_eq!(text("?a"), "?a");
    }

    #[test]
    fn single_quoted() {
        assert_eq!(text("'a''b'"), "a'b");
        assert_eq!(text("'a  \n   b'"), "a b");
        assert_eq!(text("'a\n\n  b '"), "a\nb ");
        assert_eq!(text("'a \\n'"), "a \\n");
    }

    #[test]
    fn double_quoted() {
        assert_eq!(text(r#""a\tb""#), "a\tb");
        assert_eq!(text(r#""\x41é\U0001F600""#), "Aé😀");
        assert_eq!(text(r#""😀""#), "😀");
        assert_eq!(text("\"a\\\n   b\""), "ab");
        assert_eq!(text("\"a\\\n\n  b\""), "a\nb");
        assert_eq!(text("\"a \n b\""), "a b");
        assert_eq!(text(r#""\N\_\L\P\e\0""#), "\u{85}\u{a0}\u{2028}\u{2029}\x1b\0");

        let err = parse(r#""\q""#).unwrap_err();
        assert_eq!(err.info(), "unknown escape sequence");
        let err = parse(r#""\x4g""#).unwrap_err();
        assert_eq!(err.info(), "expected hexadecimal character");
        let err = parse(r#""\ud800""#).unwrap_err();
        assert_eq!(err.info(), "invalid Unicode code point");
    }

    #[test]
    fn literal() {
        assert_eq!(text("|\n  a\n  b\n\n"), "a\nb\n");
        assert_eq!(text("|-\n  a\n  b\n\n"), "a\nb");
        assert_eq!(text("|+\n  a\n  b\n\n"), "a\nb\n\n");
        assert_eq!(text("|\n  a\n   b\n"), "a\n b\n");
        assert_eq!(text("|2\n   a\n"), "  a\n");
        assert_eq!(parse("k: |2\n   a\n").unwrap()["k"].as_str(), Some(" a\n"));
        assert_eq!(text("|\n"), "");
        assert_eq!(text("|+\n\n"), "\n");
        assert_eq!(text("--- |\na\n...\n"), "a\n");
    }

    #[test]
    fn folded() {
        assert_eq!(text(">\n  a\n  b\n\n  c\n"), "a b\nc\n");
        assert_eq!(text(">\n  a\n    code\n  b\n"), "a\n  code\nb\n");
        assert_eq!(text(">-\n  a\n\n\n  b\n"), "a\n\nb");
        assert_eq!(text("> # comment\n a\n"), "a\n");
    }

    #[test]
    fn block_header_errors() {
        assert_eq!(
            parse("|++\n a\n").unwrap_err().info(),
            "repeat of a chomping mode identifier"
        );
        assert_eq!(
            parse("|0\n a\n").unwrap_err().info(),
            "bad explicit indentation width of a block scalar; it cannot be less than one"
        );
        assert_eq!(
            parse("|12\n a\n").unwrap_err().info(),
            "repeat of an indentation width identifier"
        );
    }
}
