//! The public entry points: options, loading functions and their error type.

use std::{borrow::Cow, fmt, sync::Arc};

use thiserror::Error;

use crate::{error::ScanError, parser::Parser, schema::Schema, Yaml};

/// The default value of [`LoadOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// The default value of [`LoadOptions::max_alias_nodes`].
pub const DEFAULT_MAX_ALIAS_NODES: usize = 1_000_000;

/// An error that occurred while loading YAML.
#[derive(Clone, Debug, Error)]
pub enum LoadError {
    /// An I/O error.
    #[error(transparent)]
    Io(Arc<std::io::Error>),
    /// Malformed YAML.
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// A decoding error (e.g.: Invalid UTF-8).
    #[error("{0}")]
    Decode(Cow<'static, str>),
    /// [`load`] was given a stream of more than one document.
    #[error("expected a single document in the stream, but found more")]
    MultipleDocuments,
}

impl From<std::io::Error> for LoadError {
    fn from(error: std::io::Error) -> Self {
        LoadError::Io(Arc::new(error))
    }
}

/// The warning sink of [`LoadOptions`].
type WarningFn<'a> = Box<dyn FnMut(ScanError) + 'a>;

/// Options of a load operation.
///
/// ```
/// use std::cell::RefCell;
/// use yarrow::{LoadOptions, ScanError};
///
/// let warnings = RefCell::new(vec![]);
/// let options = LoadOptions::new()
///     .filename("settings.yml")
///     .on_warning(|w: ScanError| warnings.borrow_mut().push(w.to_string()));
/// let doc = yarrow::load_with_options("%YAML 1.3\n--- ok\n", options).unwrap();
///
/// assert_eq!(doc.as_str(), Some("ok"));
/// assert_eq!(
///     warnings.into_inner(),
///     ["in \"settings.yml\": unsupported YAML version of the document at byte 10 line 2 column 1"]
/// );
/// ```
pub struct LoadOptions<'a> {
    /// The name of the source, attached to errors and warnings.
    pub(crate) filename: Option<Arc<str>>,
    /// The types used to resolve nodes.
    pub(crate) schema: Schema,
    /// Whether duplicate mapping keys override earlier ones instead of failing.
    pub(crate) json: bool,
    /// Whether to warn about YAML 1.1 line breaks in every document.
    pub(crate) legacy: bool,
    /// The maximal number of nested nodes.
    pub(crate) max_depth: usize,
    /// The maximal number of nodes copied by aliases in a document.
    pub(crate) max_alias_nodes: usize,
    /// Where warnings go. Warnings are dropped if `None`.
    pub(crate) on_warning: Option<WarningFn<'a>>,
}

impl<'a> LoadOptions<'a> {
    /// Options with the [default schema](Schema::default) and no warning sink.
    #[must_use]
    pub fn new() -> Self {
        LoadOptions {
            filename: None,
            schema: Schema::default(),
            json: false,
            legacy: false,
            max_depth: DEFAULT_MAX_DEPTH,
            max_alias_nodes: DEFAULT_MAX_ALIAS_NODES,
            on_warning: None,
        }
    }

    /// Set the name of the source, reported in errors and warnings.
    #[must_use]
    pub fn filename(mut self, filename: impl Into<Arc<str>>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the schema used to resolve tags.
    #[must_use]
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Let duplicate mapping keys override earlier ones, like `JSON.parse` does.
    #[must_use]
    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Warn about non-ASCII line breaks (`U+0085`, `U+2028`, `U+2029`) even in documents without a
    /// `%YAML 1.1` directive.
    #[must_use]
    pub fn legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    /// Set the maximal nesting depth of nodes. Deeper documents fail to load.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the maximal number of nodes aliases may copy in a single document.
    ///
    /// Each alias counts the nodes of the tree it refers to. Documents going over the limit fail
    /// to load.
    #[must_use]
    pub fn max_alias_nodes(mut self, max_alias_nodes: usize) -> Self {
        self.max_alias_nodes = max_alias_nodes;
        self
    }

    /// Set the function receiving warnings. Warnings never interrupt loading.
    #[must_use]
    pub fn on_warning(mut self, on_warning: impl FnMut(ScanError) + 'a) -> Self {
        self.on_warning = Some(Box::new(on_warning));
        self
    }
}

impl Default for LoadOptions<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoadOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("filename", &self.filename)
            .field("schema", &self.schema)
            .field("json", &self.json)
            .field("legacy", &self.legacy)
            .field("max_depth", &self.max_depth)
            .field("max_alias_nodes", &self.max_alias_nodes)
            .field("on_warning", &self.on_warning.is_some())
            .finish()
    }
}

/// Load a stream holding at most one document.
///
/// An empty stream loads as null.
///
/// ```
/// let doc = yarrow::load("name: yarrow\ntags: [yaml, parser]\n").unwrap();
/// assert_eq!(doc["tags"][1].as_str(), Some("parser"));
///
/// assert!(yarrow::load("a\n---\nb\n").is_err());
/// ```
///
/// # Errors
/// Returns an error if the stream is malformed or holds more than one document.
pub fn load(source: &str) -> Result<Yaml, LoadError> {
    load_with_options(source, LoadOptions::default())
}

/// [`load`], with options.
///
/// # Errors
/// Returns an error if the stream is malformed or holds more than one document.
pub fn load_with_options(source: &str, options: LoadOptions<'_>) -> Result<Yaml, LoadError> {
    let mut documents = load_all_with_options(source, options)?;
    match documents.len() {
        0 => Ok(Yaml::null()),
        1 => Ok(documents.remove(0)),
        _ => Err(LoadError::MultipleDocuments),
    }
}

/// Load every document of a stream.
///
/// # Errors
/// Returns an error if the stream is malformed.
pub fn load_all(source: &str) -> Result<Vec<Yaml>, LoadError> {
    load_all_with_options(source, LoadOptions::default())
}

/// [`load_all`], with options.
///
/// # Errors
/// Returns an error if the stream is malformed.
pub fn load_all_with_options(
    source: &str,
    options: LoadOptions<'_>,
) -> Result<Vec<Yaml>, LoadError> {
    let mut documents = vec![];
    load_all_with_options_and(source, options, |document| documents.push(document))?;
    Ok(documents)
}

/// Load every document of a stream, handing each to `on_document` as soon as it is complete.
///
/// ```
/// let mut names = vec![];
/// let res = yarrow::load_all_with("--- a\n--- b\n--- [c\n", |doc| {
///     names.push(doc.into_string().unwrap_or_default());
/// });
/// assert!(res.is_err());
/// assert_eq!(names, ["a", "b"]);
/// ```
///
/// # Errors
/// Returns an error if the stream is malformed. Documents preceding the error have already been
/// handed to `on_document`.
pub fn load_all_with<F: FnMut(Yaml)>(source: &str, on_document: F) -> Result<(), LoadError> {
    load_all_with_options_and(source, LoadOptions::default(), on_document)
}

/// [`load_all_with`], with options.
///
/// # Errors
/// Returns an error if the stream is malformed. Documents preceding the error have already been
/// handed to `on_document`.
pub fn load_all_with_options_and<F: FnMut(Yaml)>(
    source: &str,
    options: LoadOptions<'_>,
    on_document: F,
) -> Result<(), LoadError> {
    let filename = options.filename.clone();
    Parser::new(source, options)
        .and_then(|mut parser| parser.parse_stream(on_document))
        .map_err(|e| LoadError::Scan(e.with_filename(filename)))
}

#[cfg(test)]
mod test {
    use super::{load, load_all, load_with_options, LoadError, LoadOptions};
    use crate::Yaml;

    #[test]
    fn single_document() {
        assert_eq!(load("").unwrap(), Yaml::null());
        assert_eq!(load("--- a\n").unwrap().as_str(), Some("a"));
        assert!(matches!(
            load("--- a\n--- b\n"),
            Err(LoadError::MultipleDocuments)
        ));
        assert_eq!(
            load_all("--- a\n--- b\n").unwrap(),
            [Yaml::string("a"), Yaml::string("b")]
        );
    }

    #[test]
    fn filename_in_errors() {
        let options = LoadOptions::new().filename("a.yml");
        let err = load_with_options("[", options).unwrap_err();
        assert!(err.to_string().starts_with("in \"a.yml\": "));
        let LoadError::Scan(err) = err else {
            panic!("expected a scan error, got {err:?}");
        };
        assert_eq!(err.filename(), Some("a.yml"));
    }

    #[test]
    fn json_mode() {
        assert!(load("{a: 1, a: 2}").is_err());
        let doc = load_with_options("{a: 1, a: 2}", LoadOptions::new().json(true)).unwrap();
        assert_eq!(doc["a"].as_integer(), Some(2));
    }

    #[test]
    fn max_depth() {
        let options = LoadOptions::new().max_depth(3);
        assert!(load_with_options("[[a]]", options).is_ok());
        let options = LoadOptions::new().max_depth(3);
        let err = load_with_options("[[[a]]]", options).unwrap_err();
        assert!(err.to_string().starts_with("nesting too deep; the limit is 3"));
    }

    #[test]
    fn max_alias_nodes() {
        let source = "- &a [1, 2]\n- *a\n- *a\n";
        let options = LoadOptions::new().max_alias_nodes(6);
        assert!(load_with_options(source, options).is_ok());
        let options = LoadOptions::new().max_alias_nodes(5);
        let err = load_with_options(source, options).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("too many alias expansions; the limit is 5 nodes"));
    }
}
