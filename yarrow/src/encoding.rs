//! Decoding of byte streams. Available only with the `encoding` feature.

use std::{borrow::Cow, ops::ControlFlow};

use encoding_rs::{Decoder, DecoderResult, Encoding};

use crate::{
    loader::{load_all_with_options, LoadError, LoadOptions},
    Yaml,
};

/// The signature of the function to call when using [`YAMLDecodingTrap::Call`].
///
/// The arguments are as follows:
///  * `malformation_length`: The length of the sequence the decoder failed to decode.
///  * `bytes_read_after_malformation`: The number of lookahead bytes the decoder consumed after
///    the malformation.
///  * `input_at_malformation`: The input buffer, starting at the malformation.
///  * `output`: The output string.
///
/// The function may push a replacement into `output`.
///
/// # Returns
/// The function must return [`ControlFlow::Continue`] if decoding may continue or
/// [`ControlFlow::Break`] if decoding must be aborted. An optional error string may be supplied.
pub type YAMLDecodingTrapFn = fn(
    malformation_length: u8,
    bytes_read_after_malformation: u8,
    input_at_malformation: &[u8],
    output: &mut String,
) -> ControlFlow<Cow<'static, str>>;

/// The behavior [`YamlDecoder`] must have when a decoding error occurs.
#[derive(Copy, Clone, Debug)]
pub enum YAMLDecodingTrap {
    /// Ignore the offending bytes, remove them from the output.
    Ignore,
    /// Error out.
    Strict,
    /// Replace them with the Unicode REPLACEMENT CHARACTER.
    Replace,
    /// Call the user-supplied function upon decoding malformation.
    Call(YAMLDecodingTrapFn),
}

impl PartialEq for YAMLDecodingTrap {
    /// Compare the behaviors. Function pointers cannot be compared reliably, so two
    /// [`YAMLDecodingTrap::Call`] are never equal.
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Ignore, Self::Ignore)
                | (Self::Strict, Self::Strict)
                | (Self::Replace, Self::Replace)
        )
    }
}

/// Load YAML from a byte stream in UTF-8 or UTF-16.
///
/// ```rust
/// use yarrow::{YamlDecoder, YAMLDecodingTrap};
///
/// let bytes = b"---
/// a\xa9: 1
/// b: 2.2
/// c: [1, 2]
/// ";
/// let docs = YamlDecoder::read(bytes as &[u8])
///     .encoding_trap(YAMLDecodingTrap::Ignore)
///     .decode()
///     .unwrap();
/// assert_eq!(docs[0]["a"].as_integer(), Some(1));
/// ```
pub struct YamlDecoder<'a, T: std::io::Read> {
    /// The input stream.
    source: T,
    /// The behavior to adopt when encountering a malformed encoding.
    trap: YAMLDecodingTrap,
    /// The options documents are loaded with.
    options: Option<LoadOptions<'a>>,
}

impl<'a, T: std::io::Read> YamlDecoder<'a, T> {
    /// Create a `YamlDecoder` decoding the given source.
    pub fn read(source: T) -> Self {
        YamlDecoder {
            source,
            trap: YAMLDecodingTrap::Strict,
            options: None,
        }
    }

    /// Set the behavior of the decoder when the encoding is invalid.
    pub fn encoding_trap(&mut self, trap: YAMLDecodingTrap) -> &mut Self {
        self.trap = trap;
        self
    }

    /// Set the options documents are loaded with.
    pub fn options(&mut self, options: LoadOptions<'a>) -> &mut Self {
        self.options = Some(options);
        self
    }

    /// Read the whole source, decode it and load every document it holds.
    ///
    /// The options set with [`Self::options`] are used by the first call only.
    ///
    /// # Errors
    /// Returns `LoadError` when reading, decoding or loading fails.
    pub fn decode(&mut self) -> Result<Vec<Yaml>, LoadError> {
        let mut buffer = Vec::new();
        self.source.read_to_end(&mut buffer)?;

        // The BOM tells the encoding, if any. Otherwise, look at where the NULs are.
        let (encoding, _) =
            Encoding::for_bom(&buffer).unwrap_or_else(|| (detect_utf16_endianness(&buffer), 2));
        let mut decoder = encoding.new_decoder();
        let mut output = String::new();
        decode_loop(&buffer, &mut output, &mut decoder, self.trap)?;

        load_all_with_options(&output, self.options.take().unwrap_or_default())
    }
}

/// Perform a loop of [`Decoder::decode_to_string_without_replacement`], reallocating `output` if
/// needed.
fn decode_loop(
    input: &[u8],
    output: &mut String,
    decoder: &mut Decoder,
    trap: YAMLDecodingTrap,
) -> Result<(), LoadError> {
    output.reserve(input.len());
    let mut total_bytes_read = 0;

    loop {
        match decoder.decode_to_string_without_replacement(&input[total_bytes_read..], output, true)
        {
            (DecoderResult::InputEmpty, _) => break Ok(()),
            (DecoderResult::OutputFull, bytes_read) => {
                total_bytes_read += bytes_read;
                // Expect 10% of the bytes to double in size when converted to UTF-8.
                output.reserve(input.len() / 10);
            }
            (DecoderResult::Malformed(malformed_len, bytes_after_malformed), bytes_read) => {
                total_bytes_read += bytes_read;
                let byte_idx = total_bytes_read
                    - (usize::from(malformed_len) + usize::from(bytes_after_malformed));
                let malformed_sequence = &input[byte_idx..byte_idx + usize::from(malformed_len)];
                let invalid_sequence = || {
                    LoadError::Decode(Cow::Owned(format!(
                        "invalid character sequence at byte {byte_idx}: {malformed_sequence:?}"
                    )))
                };
                match trap {
                    YAMLDecodingTrap::Ignore => {}
                    YAMLDecodingTrap::Replace => output.push('\u{FFFD}'),
                    YAMLDecodingTrap::Strict => break Err(invalid_sequence()),
                    YAMLDecodingTrap::Call(callback) => {
                        if let ControlFlow::Break(error) = callback(
                            malformed_len,
                            bytes_after_malformed,
                            &input[byte_idx..],
                            output,
                        ) {
                            if error.is_empty() {
                                break Err(invalid_sequence());
                            }
                            break Err(LoadError::Decode(error));
                        }
                    }
                }
            }
        }
    }
}

/// Guess the encoding of a stream without BOM.
///
/// A YAML stream starts with an ASCII character, so the position of the first NUL byte tells
/// UTF-16BE from UTF-16LE. Anything else is read as UTF-8.
fn detect_utf16_endianness(b: &[u8]) -> &'static Encoding {
    if b.len() > 1 && (b[0] != b[1]) {
        if b[0] == 0 {
            return encoding_rs::UTF_16BE;
        } else if b[1] == 0 {
            return encoding_rs::UTF_16LE;
        }
    }
    encoding_rs::UTF_8
}

#[cfg(test)]
mod test {
    use std::{borrow::Cow, ops::ControlFlow};

    use super::{YAMLDecodingTrap, YamlDecoder};
    use crate::{loader::LoadError, LoadOptions};

    const DOCUMENT_UTF16LE: &[u8] = b"-\x00-\x00-\x00\n\x00a\x00:\x00 \x001\x00\n\x00\
b\x00:\x00 \x00[\x001\x00,\x00 \x002\x00]\x00\n\x00";

    #[test]
    fn read_bom() {
        let out = YamlDecoder::read(b"\xef\xbb\xbf---\na: 1\nb: [1, 2]\n" as &[u8])
            .decode()
            .unwrap();
        assert_eq!(out[0]["a"].as_integer(), Some(1));
        assert_eq!(out[0]["b"][1].as_integer(), Some(2));
        assert!(out[0]["d"][0].is_badvalue());
    }

    #[test]
    fn read_utf16() {
        let mut with_bom = b"\xff\xfe".to_vec();
        with_bom.extend_from_slice(DOCUMENT_UTF16LE);
        for input in [DOCUMENT_UTF16LE, with_bom.as_slice()] {
            let out = YamlDecoder::read(input).decode().unwrap();
            assert_eq!(out[0]["a"].as_integer(), Some(1));
            assert_eq!(out[0]["b"][1].as_integer(), Some(2));
        }

        let be = b"\xfe\xff\x00-\x00-\x00-\x00\n\x00a\x00:\x00 \x001\x00\n";
        let out = YamlDecoder::read(be as &[u8]).decode().unwrap();
        assert_eq!(out[0]["a"].as_integer(), Some(1));
    }

    #[test]
    fn traps() {
        let s = b"---\na\xa9: 1\n";
        let err = YamlDecoder::read(s as &[u8]).decode().unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));

        let out = YamlDecoder::read(s as &[u8])
            .encoding_trap(YAMLDecodingTrap::Replace)
            .decode()
            .unwrap();
        assert_eq!(out[0]["a\u{FFFD}"].as_integer(), Some(1));

        let out = YamlDecoder::read(s as &[u8])
            .encoding_trap(YAMLDecodingTrap::Call(|_, _, _, output| {
                output.push('?');
                ControlFlow::Continue(())
            }))
            .decode()
            .unwrap();
        assert_eq!(out[0]["a?"].as_integer(), Some(1));

        let err = YamlDecoder::read(s as &[u8])
            .encoding_trap(YAMLDecodingTrap::Call(|_, _, _, _| {
                ControlFlow::Break("no way".into())
            }))
            .decode()
            .unwrap_err();
        assert_eq!(err.to_string(), "no way");
    }

    #[test]
    fn trap_equality() {
        fn keep(_: u8, _: u8, _: &[u8], _: &mut String) -> ControlFlow<Cow<'static, str>> {
            ControlFlow::Continue(())
        }
        assert_eq!(YAMLDecodingTrap::Strict, YAMLDecodingTrap::Strict);
        assert_ne!(YAMLDecodingTrap::Strict, YAMLDecodingTrap::Replace);
        let call = YAMLDecodingTrap::Call(keep);
        let copy = call;
        assert_ne!(call, copy);
    }

    #[test]
    fn options() {
        let s = b"{a: 1, a: 2}";
        assert!(YamlDecoder::read(s as &[u8]).decode().is_err());
        let out = YamlDecoder::read(s as &[u8])
            .options(LoadOptions::new().json(true))
            .decode()
            .unwrap();
        assert_eq!(out[0]["a"].as_integer(), Some(2));
    }
}
