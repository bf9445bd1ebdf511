//! Holds functions to determine if a character belongs to a specific character set.

/// Check whether the character is nil (`\0`).
///
/// The parser appends a `\0` to its buffer, so this also tells whether the end of input is
/// reached.
#[inline]
#[must_use]
pub fn is_z(c: char) -> bool {
    c == '\0'
}

/// Check whether the character is a line break (`\r` or `\n`).
#[inline]
#[must_use]
pub fn is_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Check whether the character is nil or a line break (`\0`, `\r`, `\n`).
#[inline]
#[must_use]
pub fn is_breakz(c: char) -> bool {
    is_break(c) || is_z(c)
}

/// Check whether the character is a whitespace (` ` or `\t`).
#[inline]
#[must_use]
pub fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Check whether the character is nil, a linebreak or a whitespace.
///
/// `\0`, ` `, `\t`, `\n`, `\r`
#[inline]
#[must_use]
pub fn is_blank_or_breakz(c: char) -> bool {
    is_blank(c) || is_breakz(c)
}

/// Check whether the character is a hexadecimal character (case insensitive).
#[inline]
#[must_use]
pub fn is_hex(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Convert the hexadecimal digit to an integer.
///
/// # Panics
/// Panics if `c` is not a hexadecimal digit. Callers check with [`is_hex`] first.
#[inline]
#[must_use]
pub fn as_hex(c: char) -> u32 {
    match c {
        '0'..='9' => (c as u32) - ('0' as u32),
        'a'..='f' => (c as u32) - ('a' as u32) + 10,
        'A'..='F' => (c as u32) - ('A' as u32) + 10,
        _ => unreachable!(),
    }
}

/// Check whether the character is a YAML flow character (one of `,[]{}`).
#[inline]
#[must_use]
pub fn is_flow(c: char) -> bool {
    matches!(c, ',' | '[' | ']' | '{' | '}')
}

/// Check whether the character is the BOM character.
#[inline]
#[must_use]
pub fn is_bom(c: char) -> bool {
    c == '\u{FEFF}'
}

/// Check whether the character may not start a plain scalar.
///
/// `?` and `-` are not listed: they are only indicators when followed by a whitespace.
#[inline]
#[must_use]
pub fn is_reserved_indicator(c: char) -> bool {
    matches!(
        c,
        '#' | '&' | '*' | '!' | '|' | '>' | '\'' | '"' | '%' | '@' | '`'
    )
}

/// Check whether the character is one of the line breaks YAML 1.1 recognized but YAML 1.2
/// treats as content (`U+0085`, `U+2028`, `U+2029`).
#[inline]
#[must_use]
pub fn is_non_ascii_break(c: char) -> bool {
    matches!(c, '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// Check whether the character is printable in the YAML sense.
///
/// ```text
///     #x9 | #xA | #xD | [#x20-#x7E]          /* 8 bit */
///   | #x85 | [#xA0-#xD7FF] | [#xE000-#xFFFD] /* 16 bit */
///   | [#x10000-#x10FFFF]                     /* 32 bit */
/// ```
#[inline]
#[must_use]
pub fn is_printable(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r' | '\x20'..='\x7e' | '\u{85}'
        | '\u{a0}'..='\u{d7ff}' | '\u{e000}'..='\u{fffd}' | '\u{10000}'..='\u{10ffff}')
}

/// Check whether the character is allowed within a JSON string (tab or anything from `U+0020`).
#[inline]
#[must_use]
pub fn is_json_char(c: char) -> bool {
    c == '\t' || c >= '\x20'
}

/// Check whether the character is a valid word character in a named tag handle (`!word!`).
#[inline]
#[must_use]
pub fn is_handle_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Check whether the character is a valid URI character.
///
/// `%` is not included: escapes are validated as a whole by the caller.
#[inline]
#[must_use]
pub fn is_uri_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-#;/?:@&=+$,_.!~*'()[]".contains(c)
}

#[cfg(test)]
mod test {
    use super::{is_blank_or_breakz, is_printable, is_reserved_indicator, is_uri_char};

    #[test]
    fn printable() {
        assert!(is_printable('a'));
        assert!(is_printable('\t'));
        assert!(is_printable('\u{85}'));
        assert!(is_printable('é'));
        assert!(!is_printable('\x07'));
        assert!(!is_printable('\x7f'));
        assert!(!is_printable('\u{fffe}'));
    }

    #[test]
    fn indicators() {
        assert!(is_reserved_indicator('&'));
        assert!(is_reserved_indicator('`'));
        assert!(!is_reserved_indicator('-'));
        assert!(!is_reserved_indicator('?'));
        assert!(is_blank_or_breakz('\0'));
        assert!(!is_uri_char('%'));
        assert!(!is_uri_char('{'));
    }
}
