//! Source positions and the error type raised on malformed input.

use std::{error::Error, fmt, sync::Arc};

/// A location in a YAML document.
#[derive(Clone, Copy, PartialEq, Debug, Eq, Default)]
pub struct Marker {
    /// The index (in chars) in the input string.
    index: usize,
    /// The line (1-indexed).
    line: usize,
    /// The column (0-indexed).
    col: usize,
}

impl Marker {
    /// Create a new [`Marker`] at the given position.
    #[must_use]
    pub fn new(index: usize, line: usize, col: usize) -> Marker {
        Marker { index, line, col }
    }

    /// Return the index (in chars) of the marker in the source.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Return the line of the marker in the source.
    ///
    /// Lines start at 1.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Return the column of the marker in the source.
    ///
    /// Columns start at 0.
    #[must_use]
    pub fn col(&self) -> usize {
        self.col
    }
}

/// An error that occurred while parsing, or a warning handed to the warning sink.
#[derive(Clone, PartialEq, Debug, Eq)]
pub struct ScanError {
    /// The position at which the error happened in the source.
    mark: Marker,
    /// Human-readable details about the error.
    info: String,
    /// The name of the source, if the caller provided one.
    filename: Option<Arc<str>>,
}

impl ScanError {
    /// Create a new error from a location and an error string.
    #[must_use]
    pub fn new(loc: Marker, info: String) -> ScanError {
        ScanError {
            mark: loc,
            info,
            filename: None,
        }
    }

    /// Convenience alias for string slices.
    #[must_use]
    pub fn new_str(loc: Marker, info: &str) -> ScanError {
        ScanError::new(loc, info.to_owned())
    }

    /// Attach the name of the source to the error (builder-style).
    #[must_use]
    pub fn with_filename(mut self, filename: Option<Arc<str>>) -> ScanError {
        self.filename = filename;
        self
    }

    /// Return the marker pointing to the error in the source.
    #[must_use]
    pub fn marker(&self) -> &Marker {
        &self.mark
    }

    /// Return the information string describing the error that happened.
    #[must_use]
    pub fn info(&self) -> &str {
        self.info.as_ref()
    }

    /// Return the name of the source the error happened in, if known.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }
}

impl Error for ScanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        if let Some(filename) = &self.filename {
            write!(formatter, "in \"{filename}\": ")?;
        }
        write!(
            formatter,
            "{} at byte {} line {} column {}",
            self.info,
            self.mark.index,
            self.mark.line,
            self.mark.col + 1,
        )
    }
}

#[cfg(test)]
mod test {
    use super::{Marker, ScanError};

    #[test]
    fn display() {
        let err = ScanError::new_str(Marker::new(26, 4, 3), "duplicated mapping key");
        assert_eq!(
            err.to_string(),
            "duplicated mapping key at byte 26 line 4 column 4"
        );
        let err = err.with_filename(Some("conf.yml".into()));
        assert_eq!(
            err.to_string(),
            "in \"conf.yml\": duplicated mapping key at byte 26 line 4 column 4"
        );
        assert_eq!(err.filename(), Some("conf.yml"));
    }
}
