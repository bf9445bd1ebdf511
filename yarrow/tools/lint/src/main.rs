use std::{cell::RefCell, process::ExitCode};

use miette::{Context, Diagnostic, IntoDiagnostic, NamedSource, Report, Result, SourceSpan};
use thiserror::Error;
use yarrow::{LoadError, LoadOptions, ScanError};

/// Load every document of the files given on the command line.
///
/// Warnings and errors are rendered with the offending position labelled. The exit code is
/// non-zero if any file failed to load.
fn main() -> ExitCode {
    let files: Vec<_> = std::env::args().skip(1).collect();
    if files.is_empty() {
        eprintln!("Usage: yarrow-lint <file.yaml>...");
        return ExitCode::from(2);
    }

    let mut failed = false;
    for file in &files {
        match lint(file) {
            Ok(documents) => println!("{file}: {documents} document(s)"),
            Err(report) => {
                eprintln!("{report:?}");
                failed = true;
            }
        }
    }
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Load `path`, printing its warnings.
///
/// # Return
/// Returns the number of documents in the file.
fn lint(path: &str) -> Result<usize> {
    let contents = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot read {path}"))?;

    let warnings = RefCell::new(vec![]);
    let options = LoadOptions::new()
        .filename(path)
        .on_warning(|warning| warnings.borrow_mut().push(warning));
    let mut documents = 0;
    let res = yarrow::load_all_with_options_and(&contents, options, |_| documents += 1);

    for warning in warnings.into_inner() {
        let finding = Finding::Warning {
            message: warning.info().to_owned(),
            span: span(&contents, &warning),
            src: NamedSource::new(path, contents.clone()),
        };
        eprintln!("{:?}", Report::new(finding));
    }

    match res {
        Ok(()) => Ok(documents),
        Err(LoadError::Scan(error)) => Err(Finding::Error {
            message: error.info().to_owned(),
            span: span(&contents, &error),
            src: NamedSource::new(path, contents),
        }
        .into()),
        Err(error) => Err(error).into_diagnostic(),
    }
}

/// Turn the position of `error` into a byte span of `contents`.
fn span(contents: &str, error: &ScanError) -> SourceSpan {
    // The parser does not count the BOM.
    let index = error.marker().index() + usize::from(contents.starts_with('\u{feff}'));
    let (offset, len) = contents
        .char_indices()
        .nth(index)
        .map_or((contents.len(), 0), |(offset, c)| (offset, c.len_utf8()));
    (offset, len).into()
}

#[derive(Error, Debug, Diagnostic)]
enum Finding {
    #[error("{message}")]
    #[diagnostic(code(yarrow::error))]
    Error {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },
    #[error("{message}")]
    #[diagnostic(code(yarrow::warning), severity(Warning))]
    Warning {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },
}
