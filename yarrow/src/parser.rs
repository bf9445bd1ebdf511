//! A single-pass recursive-descent YAML reader.
//!
//! The [`Parser`] holds the whole parse state. Its methods are the readers of the different
//! productions: each of them either declines (returning `Ok(false)` without consuming anything) or
//! consumes its production and leaves the value in [`Parser::result`].
//!
//! The readers are spread over submodules:
//!  - [`directive`]: `%YAML` and `%TAG` lines.
//!  - [`property`]: tags, anchors and aliases.
//!  - [`scalar`]: plain, quoted and block scalars.
//!  - [`flow`]: `[...]` and `{...}` collections.
//!  - [`block`]: indentation-based sequences and mappings.

use std::collections::{HashMap, HashSet};

use crate::{
    char_traits::is_non_ascii_break,
    error::{Marker, ScanError},
    input::{Checkpoint, Input},
    loader::LoadOptions,
    schema::{extra::MERGE_TAG, NodeKind},
    Mapping, Yaml,
};

mod block;
mod directive;
mod flow;
mod property;
mod scalar;

/// The context a node is composed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Context {
    /// Inside a flow collection.
    FlowIn,
    /// An implicit key of a block mapping.
    FlowOut,
    /// An entry of a block sequence.
    BlockIn,
    /// A value of a block mapping, or the root node.
    BlockOut,
}

impl Context {
    fn is_block(self) -> bool {
        matches!(self, Context::BlockIn | Context::BlockOut)
    }

    fn is_flow(self) -> bool {
        !self.is_block()
    }
}

/// Tag used for plain scalars with no explicit tag, resolved by the implicit types.
const NON_SPECIFIC_TAG: &str = "?";

/// The parse state.
pub(crate) struct Parser<'a> {
    /// The source and position within it.
    input: Input,
    /// Caller options: schema, flags, warning sink.
    options: LoadOptions<'a>,
    /// The tag of the node being composed.
    tag: Option<String>,
    /// The anchor of the node being composed.
    anchor: Option<String>,
    /// The kind of the last node produced, `None` for an empty node.
    kind: Option<NodeKind>,
    /// The last node produced.
    result: Yaml,
    /// `%TAG` handles of the current document.
    tag_map: HashMap<String, String>,
    /// Anchored nodes of the current document, with their node count.
    anchors: HashMap<String, (Yaml, usize)>,
    /// The number of nodes aliases have copied in the current document.
    alias_nodes: usize,
    /// The `%YAML` version of the current document.
    version: Option<String>,
    /// Whether to warn about YAML 1.1 line breaks in the document.
    check_line_breaks: bool,
    /// The number of nodes currently being composed.
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Prepare a parser for `source`.
    ///
    /// # Errors
    /// Returns an error if the source cannot be parsed at all (it contains a NUL character).
    pub fn new(source: &str, options: LoadOptions<'a>) -> Result<Self, ScanError> {
        Ok(Parser {
            input: Input::new(source)?,
            check_line_breaks: options.legacy,
            options,
            tag: None,
            anchor: None,
            kind: None,
            result: Yaml::null(),
            tag_map: HashMap::new(),
            anchors: HashMap::new(),
            alias_nodes: 0,
            version: None,
            depth: 0,
        })
    }

    /// Read every document of the stream, handing each to `on_document` as soon as it is
    /// complete.
    ///
    /// # Errors
    /// Returns the first error encountered. Documents completed before it have already been
    /// handed to `on_document`.
    pub fn parse_stream<F: FnMut(Yaml)>(&mut self, mut on_document: F) -> Result<(), ScanError> {
        while self.input.has_remaining() {
            let document = self.read_document()?;
            on_document(document);
        }
        Ok(())
    }

    /// Read one document: its directives, its root node and its end marker.
    fn read_document(&mut self) -> Result<Yaml, ScanError> {
        let document_start = self.input.pos;
        debug_print!("document at line {}", self.input.line);

        self.version = None;
        self.check_line_breaks = self.options.legacy;
        self.tag_map.clear();
        self.anchors.clear();
        self.alias_nodes = 0;

        let has_directives = self.read_directives()?;

        self.skip_separation(true, None);
        if self.input.line_indent == 0 && self.input.next_is_document_start() {
            self.input.skip_n(3);
            self.skip_separation(true, None);
        } else if has_directives {
            return Err(self.error("directives end mark is expected"));
        }

        self.compose_node(self.input.line_indent - 1, Context::BlockOut, false, true)?;
        self.skip_separation(true, None);

        if self.check_line_breaks && self.input.consumed_any(document_start, is_non_ascii_break) {
            self.warn("non-ASCII line breaks are interpreted as content");
        }

        let document = self.result.take();

        if self.input.at_line_start() && self.input.next_is_document_indicator() {
            if self.input.peek() == '.' {
                self.input.skip_n(3);
                self.skip_separation(true, None);
            }
        } else if self.input.has_remaining() {
            return Err(self.error("end of the stream or a document separator is expected"));
        }
        Ok(document)
    }

    /// Skip whitespace, line breaks and (if `allow_comments`) comments.
    ///
    /// If at least a line break was skipped and the next line is indented less than
    /// `check_indent`, a warning is emitted.
    ///
    /// # Return
    /// Returns the number of line breaks that were skipped.
    fn skip_separation(&mut self, allow_comments: bool, check_indent: Option<isize>) -> usize {
        let line_breaks = self.input.skip_separation(allow_comments);
        if let Some(indent) = check_indent {
            if line_breaks != 0 && self.input.line_indent < indent {
                self.warn("deficient indentation");
            }
        }
        line_breaks
    }

    /// Build an error located at the cursor.
    fn error(&self, info: &str) -> ScanError {
        self.input.error(info)
    }

    /// Build an error located at `mark`.
    fn error_at(mark: Marker, info: String) -> ScanError {
        ScanError::new(mark, info)
    }

    /// Hand a warning located at the cursor to the warning sink, if any.
    fn warn(&mut self, info: &str) {
        if let Some(on_warning) = self.options.on_warning.as_mut() {
            let warning = self.input.error(info).with_filename(self.options.filename.clone());
            on_warning(warning);
        }
    }

    /// Compose a node: its properties, its content, and resolve its tag.
    ///
    /// `parent_indent` is the indentation of the enclosing collection. If `allow_to_seek`,
    /// separation is skipped first and the node may be on a later line. `allow_compact` lets a
    /// block collection start on the same line as its parent's indicator (`- - a`, `- a: b`).
    ///
    /// # Return
    /// Returns whether a tag, an anchor or content was read.
    fn compose_node(
        &mut self,
        parent_indent: isize,
        context: Context,
        allow_to_seek: bool,
        allow_compact: bool,
    ) -> Result<bool, ScanError> {
        if self.depth >= self.options.max_depth {
            return Err(self.error(&format!(
                "nesting too deep; the limit is {}",
                self.options.max_depth
            )));
        }
        self.depth += 1;
        debug_print!(
            "-> compose_node(parent_indent={parent_indent}, {context:?}) at {}:{}",
            self.input.line,
            self.input.column()
        );
        let composed = self.compose_node_inner(parent_indent, context, allow_to_seek, allow_compact);
        self.depth -= 1;
        debug_print!("<- compose_node: {:?}", self.result);
        composed
    }

    fn compose_node_inner(
        &mut self,
        parent_indent: isize,
        context: Context,
        allow_to_seek: bool,
        allow_compact: bool,
    ) -> Result<bool, ScanError> {
        self.tag = None;
        self.anchor = None;
        self.kind = None;
        self.result = Yaml::null();

        let allow_block_styles = context.is_block();
        let mut allow_block_collections = allow_block_styles;
        let mut at_new_line = false;
        let mut has_content = false;
        let mut indent_status = std::cmp::Ordering::Greater;

        if allow_to_seek && self.skip_separation(true, None) != 0 {
            at_new_line = true;
            indent_status = self.input.line_indent.cmp(&parent_indent);
        }

        if indent_status.is_gt() {
            while self.read_tag_property()? || self.read_anchor_property()? {
                if self.skip_separation(true, None) != 0 {
                    at_new_line = true;
                    allow_block_collections = allow_block_styles;
                    indent_status = self.input.line_indent.cmp(&parent_indent);
                } else {
                    allow_block_collections = false;
                }
            }
        }

        allow_block_collections &= at_new_line || allow_compact;

        if indent_status.is_gt() || context == Context::BlockOut {
            let flow_indent = if context.is_flow() {
                parent_indent
            } else {
                parent_indent + 1
            };
            let block_indent = self.input.column();

            if indent_status.is_gt() {
                if (allow_block_collections
                    && (self.read_block_sequence(block_indent)?
                        || self.read_block_mapping(block_indent, flow_indent)?))
                    || self.read_flow_collection(flow_indent)?
                {
                    has_content = true;
                } else {
                    if (allow_block_styles && self.read_block_scalar(flow_indent)?)
                        || self.read_single_quoted_scalar(flow_indent)?
                        || self.read_double_quoted_scalar(flow_indent)?
                    {
                        has_content = true;
                    } else if self.read_alias()? {
                        has_content = true;
                        if self.tag.is_some() || self.anchor.is_some() {
                            return Err(self.error("alias node should not have any properties"));
                        }
                    } else if self.read_plain_scalar(flow_indent, context == Context::FlowIn)? {
                        has_content = true;
                        if self.tag.is_none() {
                            self.tag = Some(NON_SPECIFIC_TAG.to_owned());
                        }
                    }
                }
            } else if indent_status.is_eq() {
                // Block sequences may be indented as much as their parent mapping's keys.
                has_content = allow_block_collections && self.read_block_sequence(block_indent)?;
            }
        }

        self.resolve_tag()?;
        Ok(self.tag.is_some() || self.anchor.is_some() || has_content)
    }

    /// Bind the pending anchor, if any, to the current result.
    fn bind_anchor(&mut self) {
        if let Some(anchor) = &self.anchor {
            let nodes = count_nodes(&self.result);
            self.anchors.insert(anchor.clone(), (self.result.clone(), nodes));
        }
    }

    /// Turn the raw result into its typed value, according to the pending tag, and bind the
    /// pending anchor to it.
    fn resolve_tag(&mut self) -> Result<(), ScanError> {
        let Some(tag) = self.tag.as_deref() else {
            self.bind_anchor();
            return Ok(());
        };

        if tag == NON_SPECIFIC_TAG {
            if let Some(kind) = self.kind.filter(|&kind| kind != NodeKind::Scalar) {
                return Err(self.error(&format!(
                    "unacceptable node kind for !<?> tag; it should be \"scalar\", not \"{kind}\""
                )));
            }
            let resolved = self
                .options
                .schema
                .implicit_types()
                .iter()
                .find(|def| def.resolve(&self.result))
                .cloned();
            if let Some(def) = resolved {
                self.result = def.construct(self.result.take());
                self.tag = Some(def.tag().to_owned());
            }
        } else if tag != "!" {
            let Some(def) = self.options.schema.lookup(self.kind, tag) else {
                return Err(self.error(&format!("unknown tag !<{tag}>")));
            };
            if let Some(kind) = self.kind.filter(|&kind| kind != def.kind()) {
                return Err(self.error(&format!(
                    "unacceptable node kind for !<{tag}> tag; it should be \"{}\", not \"{kind}\"",
                    def.kind()
                )));
            }
            if !def.resolve(&self.result) {
                return Err(
                    self.error(&format!("cannot resolve a node with !<{tag}> explicit tag"))
                );
            }
            let def = def.clone();
            self.result = def.construct(self.result.take());
        }
        self.bind_anchor();
        Ok(())
    }

    /// Insert a key/value pair in `mapping`.
    ///
    /// A key tagged as a merge key merges the value (a mapping or a sequence of mappings) into
    /// `mapping`, without overwriting existing keys. Keys inserted that way are remembered in
    /// `overridable` and may be set once more without triggering a duplicate key error.
    ///
    /// `key_start` is where the key was read, to point the duplicate key error at it.
    fn store_mapping_pair(
        &self,
        mapping: &mut Mapping,
        overridable: &mut HashSet<Yaml>,
        key_tag: Option<&str>,
        key: Yaml,
        value: Yaml,
        key_start: Checkpoint,
    ) -> Result<(), ScanError> {
        if key_tag == Some(MERGE_TAG) {
            match value {
                Yaml::Sequence(sources) => {
                    for source in sources {
                        self.merge_mappings(mapping, source, overridable)?;
                    }
                }
                source => self.merge_mappings(mapping, source, overridable)?,
            }
            return Ok(());
        }

        if !self.options.json && !overridable.contains(&key) && mapping.contains_key(&key) {
            return Err(Self::error_at(
                key_start.mark(),
                "duplicated mapping key".to_owned(),
            ));
        }
        overridable.remove(&key);
        mapping.replace(key, value);
        Ok(())
    }

    fn merge_mappings(
        &self,
        destination: &mut Mapping,
        source: Yaml,
        overridable: &mut HashSet<Yaml>,
    ) -> Result<(), ScanError> {
        let Yaml::Mapping(source) = source else {
            return Err(
                self.error("cannot merge mappings; the provided source object is unacceptable")
            );
        };
        for (key, value) in source {
            if !destination.contains_key(&key) {
                overridable.insert(key.clone());
                destination.insert(key, value);
            }
        }
        Ok(())
    }
}

/// Return the number of nodes in the tree rooted at `node`, mapping keys included.
fn count_nodes(node: &Yaml) -> usize {
    match node {
        Yaml::Sequence(sequence) => 1 + sequence.iter().map(count_nodes).sum::<usize>(),
        Yaml::Mapping(mapping) => {
            1 + mapping
                .iter()
                .map(|(k, v)| count_nodes(k) + count_nodes(v))
                .sum::<usize>()
        }
        Yaml::Value(_) | Yaml::BadValue => 1,
    }
}

#[cfg(test)]
mod test {
    use super::Parser;
    use crate::{loader::LoadOptions, ScanError, Yaml};

    fn parse(source: &str) -> Result<Vec<Yaml>, ScanError> {
        let mut docs = vec![];
        Parser::new(source, LoadOptions::default())?.parse_stream(|doc| docs.push(doc))?;
        Ok(docs)
    }

    #[test]
    fn documents() {
        assert_eq!(parse("").unwrap(), []);
        assert_eq!(parse("# only a comment\n").unwrap(), [Yaml::null()]);
        assert_eq!(parse("---\n...\n").unwrap(), [Yaml::null()]);
        assert_eq!(
            parse("a\n---\nb\n...\n--- c\n").unwrap(),
            [Yaml::string("a"), Yaml::string("b"), Yaml::string("c")]
        );
    }

    #[test]
    fn trailing_content() {
        let err = parse("a: b\n- c\n").unwrap_err();
        assert_eq!(err.info(), "end of the stream or a document separator is expected");
        assert_eq!(err.marker().line(), 2);
    }

    #[test]
    fn depth_limit() {
        let nested = format!("{}{}", "[".repeat(300), "]".repeat(300));
        let err = parse(&nested).unwrap_err();
        assert_eq!(err.info(), "nesting too deep; the limit is 128");
        assert!(parse(&format!("{}{}", "[".repeat(100), "]".repeat(100))).is_ok());
    }
}
