//! The character buffer the parser reads from, and the position within it.

use crate::{
    char_traits::{is_blank, is_blank_or_breakz, is_bom, is_break, is_breakz, is_z},
    error::{Marker, ScanError},
};

/// A saved position in the [`Input`], used to rewind or to pin an error to an earlier token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    pos: usize,
    line: usize,
    line_start: usize,
    line_indent: isize,
}

impl Checkpoint {
    /// Return the marker of the saved position.
    pub fn mark(&self) -> Marker {
        Marker::new(self.pos, self.line, self.pos - self.line_start)
    }

    /// Return the line of the saved position.
    pub fn line(&self) -> usize {
        self.line
    }
}

/// An immutable character buffer and a cursor over it.
///
/// The buffer always ends with a line break followed by a `\0` sentinel: peeking past the
/// content returns `\0` without any explicit bound check from the readers.
pub struct Input {
    /// The characters of the source, with the trailing sentinel.
    buffer: Vec<char>,
    /// The index of the next character to read.
    pub pos: usize,
    /// The current line (1-indexed).
    pub line: usize,
    /// The index of the first character of the current line.
    pub line_start: usize,
    /// The number of spaces at the start of the current line.
    pub line_indent: isize,
    /// The index of the first tab in the leading whitespace of the current line, if any.
    pub first_tab_in_line: Option<usize>,
}

impl Input {
    /// Prepare `source` for parsing.
    ///
    /// A leading BOM is removed and a line break is appended if the source does not end with
    /// one. The spaces opening the first line count as its indentation.
    ///
    /// # Errors
    /// Returns an error if the source contains a `\0` character.
    pub fn new(source: &str) -> Result<Self, ScanError> {
        let mut buffer: Vec<char> = source.chars().collect();
        if buffer.first().copied().is_some_and(is_bom) {
            buffer.remove(0);
        }
        if let Some(&last) = buffer.last() {
            if !is_break(last) {
                buffer.push('\n');
            }
        }

        let mut input = Input {
            buffer,
            pos: 0,
            line: 1,
            line_start: 0,
            line_indent: 0,
            first_tab_in_line: None,
        };

        if let Some(nul) = input.buffer.iter().position(|&c| is_z(c)) {
            input.advance_to(nul);
            return Err(input.error("null byte is not allowed in input"));
        }
        input.buffer.push('\0');

        while input.peek() == ' ' {
            input.line_indent += 1;
            input.pos += 1;
        }
        Ok(input)
    }

    /// Move forward to `index`, keeping track of lines along the way.
    ///
    /// Only used to report errors at an arbitrary position.
    fn advance_to(&mut self, index: usize) {
        while self.pos < index {
            let c = self.buffer[self.pos];
            self.pos += 1;
            if c == '\n' || (c == '\r' && self.buffer.get(self.pos) != Some(&'\n')) {
                self.line += 1;
                self.line_start = self.pos;
            }
        }
    }

    /// Return whether there are characters left to read, not counting the final line break.
    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.pos + 2 < self.buffer.len()
    }

    /// Return the next character, without consuming it.
    #[inline]
    pub fn peek(&self) -> char {
        self.peek_nth(0)
    }

    /// Return the `n`-th character after the cursor, without consuming it.
    #[inline]
    pub fn peek_nth(&self, n: usize) -> char {
        self.buffer.get(self.pos + n).copied().unwrap_or('\0')
    }

    /// Return the character right before the cursor, or `\0` at the start of the input.
    #[inline]
    pub fn peek_prev(&self) -> char {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.buffer.get(i))
            .copied()
            .unwrap_or('\0')
    }

    /// Consume the next character.
    #[inline]
    pub fn skip(&mut self) {
        self.pos += 1;
    }

    /// Consume the next `count` characters.
    #[inline]
    pub fn skip_n(&mut self, count: usize) {
        self.pos += count;
    }

    /// Consume the next character and return the one following it.
    #[inline]
    pub fn next_ch(&mut self) -> char {
        self.pos += 1;
        self.peek()
    }

    /// Return the characters in `start..end` as a `String`.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.buffer[start..end].iter().collect()
    }

    /// Return the characters in `start..end`.
    pub fn chars(&self, start: usize, end: usize) -> &[char] {
        &self.buffer[start..end]
    }

    /// Return the column of the cursor.
    #[inline]
    pub fn column(&self) -> isize {
        isize::try_from(self.pos - self.line_start).unwrap_or(isize::MAX)
    }

    /// Return whether the cursor is at the first character of a line.
    #[inline]
    pub fn at_line_start(&self) -> bool {
        self.pos == self.line_start
    }

    /// Return the marker of the cursor.
    pub fn mark(&self) -> Marker {
        Marker::new(self.pos, self.line, self.pos - self.line_start)
    }

    /// Build an error located at the cursor.
    pub fn error(&self, info: &str) -> ScanError {
        ScanError::new_str(self.mark(), info)
    }

    /// Return whether any character between `start` and the cursor matches `f`.
    pub fn consumed_any(&self, start: usize, f: impl Fn(char) -> bool) -> bool {
        self.buffer[start..self.pos].iter().any(|&c| f(c))
    }

    /// Save the current position.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            line: self.line,
            line_start: self.line_start,
            line_indent: self.line_indent,
        }
    }

    /// Go back (or forward) to a saved position.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.line = checkpoint.line;
        self.line_start = checkpoint.line_start;
        self.line_indent = checkpoint.line_indent;
    }

    /// Check whether the next characters correspond to a document indicator (`---` or `...`
    /// followed by a blank, a line break or the end of input).
    #[inline]
    pub fn next_is_document_indicator(&self) -> bool {
        self.next_is_document_start() || self.next_is_document_end()
    }

    /// Check whether the next characters correspond to a start of document.
    #[inline]
    pub fn next_is_document_start(&self) -> bool {
        self.next_3_are('-') && is_blank_or_breakz(self.peek_nth(3))
    }

    /// Check whether the next characters correspond to an end of document.
    #[inline]
    pub fn next_is_document_end(&self) -> bool {
        self.next_3_are('.') && is_blank_or_breakz(self.peek_nth(3))
    }

    fn next_3_are(&self, c: char) -> bool {
        self.peek() == c && self.peek_nth(1) == c && self.peek_nth(2) == c
    }

    /// Consume a line break (`\n`, `\r` or `\r\n`) and start a new line.
    ///
    /// # Errors
    /// Returns an error if the cursor is not on a line break.
    pub fn read_line_break(&mut self) -> Result<(), ScanError> {
        match self.peek() {
            '\n' => self.skip(),
            '\r' => {
                self.skip();
                if self.peek() == '\n' {
                    self.skip();
                }
            }
            _ => return Err(self.error("a line break is expected")),
        }
        self.line += 1;
        self.line_start = self.pos;
        self.first_tab_in_line = None;
        Ok(())
    }

    /// Skip whitespace, comments (if allowed) and line breaks, updating the indentation of the
    /// current line.
    ///
    /// # Return
    /// Returns the number of line breaks that were consumed.
    pub fn skip_separation(&mut self, allow_comments: bool) -> usize {
        let mut line_breaks = 0;
        let mut c = self.peek();
        while !is_z(c) {
            while is_blank(c) {
                if c == '\t' && self.first_tab_in_line.is_none() {
                    self.first_tab_in_line = Some(self.pos);
                }
                c = self.next_ch();
            }

            if allow_comments && c == '#' {
                while !is_breakz(c) {
                    c = self.next_ch();
                }
            }

            if !is_break(c) {
                break;
            }
            // Cannot fail, we are on a line break.
            let _ = self.read_line_break();
            line_breaks += 1;
            self.line_indent = 0;
            c = self.peek();
            while c == ' ' {
                self.line_indent += 1;
                c = self.next_ch();
            }
        }
        line_breaks
    }
}

#[cfg(test)]
mod test {
    use super::Input;

    #[test]
    pub fn prepare() {
        let input = Input::new("\u{feff}a").unwrap();
        assert_eq!(input.peek(), 'a');
        assert_eq!(input.peek_nth(1), '\n');
        assert_eq!(input.peek_nth(2), '\0');
        assert_eq!(input.peek_nth(42), '\0');

        let input = Input::new("   a\n").unwrap();
        assert_eq!(input.line_indent, 3);
        assert_eq!(input.peek(), 'a');

        let input = Input::new("").unwrap();
        assert!(!input.has_remaining());
    }

    #[test]
    pub fn null_byte() {
        let Err(err) = Input::new("a: b\nc: \0") else {
            panic!()
        };
        assert_eq!(err.info(), "null byte is not allowed in input");
        assert_eq!(err.marker().line(), 2);
        assert_eq!(err.marker().col(), 3);
    }

    #[test]
    pub fn is_document_start() {
        let input = Input::new("---\n").unwrap();
        assert!(input.next_is_document_start());
        assert!(input.next_is_document_indicator());
        let input = Input::new("---").unwrap();
        assert!(input.next_is_document_start());
        let input = Input::new("...\n").unwrap();
        assert!(!input.next_is_document_start());
        assert!(input.next_is_document_end());
        let input = Input::new("--- ").unwrap();
        assert!(input.next_is_document_start());
        let input = Input::new("---a").unwrap();
        assert!(!input.next_is_document_indicator());
    }

    #[test]
    pub fn separation() {
        let mut input = Input::new("a # comment\n\n  \t b").unwrap();
        input.skip();
        assert_eq!(input.skip_separation(true), 2);
        assert_eq!(input.line, 3);
        assert_eq!(input.line_indent, 2);
        assert_eq!(input.peek(), 'b');
        assert_eq!(input.first_tab_in_line, Some(input.line_start + 2));
    }
}
