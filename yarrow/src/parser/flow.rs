//! Flow collections (`[a, b]` and `{a: b}`).

use std::collections::HashSet;

use super::{Context, Parser};
use crate::{
    char_traits::is_blank_or_breakz, error::ScanError, schema::NodeKind, Mapping, Sequence, Yaml,
};

impl Parser<'_> {
    /// Read a flow sequence or a flow mapping.
    ///
    /// Entries of a flow sequence may be single pairs (`[a: b]`), which are read as mappings
    /// holding that pair. Continuation lines should be indented more than `node_indent`.
    pub(super) fn read_flow_collection(&mut self, node_indent: isize) -> Result<bool, ScanError> {
        let (terminator, is_mapping) = match self.input.peek() {
            '[' => (']', false),
            '{' => ('}', true),
            _ => return Ok(false),
        };
        debug_print!("flow collection `{terminator}` at line {}", self.input.line);
        let tag = self.tag.take();
        let anchor = self.anchor.take();

        let mut sequence = Sequence::new();
        let mut mapping = Mapping::new();
        let mut overridable = HashSet::new();
        let mut read_next = true;
        self.input.skip();

        loop {
            self.skip_separation(true, Some(node_indent));
            let c = self.input.peek();
            if c == terminator {
                self.input.skip();
                self.tag = tag;
                self.anchor = anchor;
                if is_mapping {
                    self.kind = Some(NodeKind::Mapping);
                    self.result = Yaml::Mapping(mapping);
                } else {
                    self.kind = Some(NodeKind::Sequence);
                    self.result = Yaml::Sequence(sequence);
                }
                return Ok(true);
            } else if c == '\0' {
                return Err(self.error("unexpected end of the stream within a flow collection"));
            } else if !read_next {
                return Err(self.error("missed comma between flow collection entries"));
            } else if c == ',' {
                return Err(self.error("expected the node content, but found ','"));
            }

            let mut is_pair = false;
            let mut is_explicit_pair = false;
            if c == '?' && is_blank_or_breakz(self.input.peek_nth(1)) {
                is_pair = true;
                is_explicit_pair = true;
                self.input.skip();
                self.skip_separation(true, Some(node_indent));
            }

            let key_start = self.input.checkpoint();
            self.compose_node(node_indent, Context::FlowIn, false, true)?;
            let key_tag = self.tag.take();
            let key = self.result.take();
            self.skip_separation(true, Some(node_indent));

            let mut value = Yaml::null();
            if (is_explicit_pair || self.input.line == key_start.line())
                && self.input.peek() == ':'
            {
                is_pair = true;
                self.input.skip();
                self.skip_separation(true, Some(node_indent));
                self.compose_node(node_indent, Context::FlowIn, false, true)?;
                value = self.result.take();
            }

            if is_mapping {
                self.store_mapping_pair(
                    &mut mapping,
                    &mut overridable,
                    key_tag.as_deref(),
                    key,
                    value,
                    key_start,
                )?;
            } else if is_pair {
                let mut pair = Mapping::new();
                self.store_mapping_pair(
                    &mut pair,
                    &mut HashSet::new(),
                    key_tag.as_deref(),
                    key,
                    value,
                    key_start,
                )?;
                sequence.push(Yaml::Mapping(pair));
            } else {
                sequence.push(key);
            }

            self.skip_separation(true, Some(node_indent));
            read_next = self.input.peek() == ',';
            if read_next {
                self.input.skip();
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{loader::LoadOptions, parser::Parser, ScanError, Yaml};

    fn parse(source: &str) -> Result<Yaml, ScanError> {
        let mut docs = vec![];
        Parser::new(source, LoadOptions::default())?.parse_stream(|doc| docs.push(doc))?;
        Ok(docs.pop().unwrap_or(Yaml::BadValue))
    }

    #[test]
    fn sequences() {
        let doc = parse("[a, 'b', \"c\", [d], {e: f}, ]").unwrap();
        assert_eq!(doc.as_vec().map(Vec::len), Some(5));
        assert_eq!(doc[0].as_str(), Some("a"));
        assert_eq!(doc[3][0].as_str(), Some("d"));
        assert_eq!(doc[4]["e"].as_str(), Some("f"));
        assert_eq!(parse("[]").unwrap(), Yaml::Sequence(vec![]));
    }

    #[test]
    fn single_pairs() {
        let doc = parse("[a: 1, ? b, c: ]").unwrap();
        assert_eq!(doc[0]["a"].as_integer(), Some(1));
        assert!(doc[1]["b"].is_null());
        assert!(doc[2]["c"].is_null());
    }

    #[test]
    fn mappings() {
        let doc = parse("{a: 1, b, \"c\":d, ? e : f,\n  g: [h]}").unwrap();
        assert_eq!(doc["a"].as_integer(), Some(1));
        assert!(doc["b"].is_null());
        assert_eq!(doc["c"].as_str(), Some("d"));
        assert_eq!(doc["e"].as_str(), Some("f"));
        assert_eq!(doc["g"][0].as_str(), Some("h"));
        assert_eq!(doc.as_mapping().unwrap().len(), 5);
    }

    #[test]
    fn plain_scalars_stop_at_indicators() {
        let doc = parse("{a:b, c: d:e, url: http://x.y/z}").unwrap();
        assert!(doc["a:b"].is_null());
        assert_eq!(doc["c"].as_str(), Some("d:e"));
        assert_eq!(doc["url"].as_str(), Some("http://x.y/z"));
    }

    #[test]
    fn errors() {
        assert_eq!(
            parse("[a b, c").unwrap_err().info(),
            "unexpected end of the stream within a flow collection"
        );
        assert_eq!(
            parse("[a, , b]").unwrap_err().info(),
            "expected the node content, but found ','"
        );
        assert_eq!(
            parse("{a: 1 b: 2}").unwrap_err().info(),
            "missed comma between flow collection entries"
        );
        assert_eq!(parse("{a: 1, a: 2}").unwrap_err().info(), "duplicated mapping key");
    }
}
