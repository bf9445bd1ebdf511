//! Block collections, delimited by indentation.

use std::collections::HashSet;

use super::{Context, Parser};
use crate::{
    char_traits::{is_blank, is_blank_or_breakz},
    error::ScanError,
    schema::NodeKind,
    Mapping, Sequence, Yaml,
};

impl Parser<'_> {
    /// Point the cursor at the first tab of the line's indentation and fail.
    fn tab_in_indentation(&mut self, tab: usize) -> ScanError {
        self.input.pos = tab;
        self.error("tab characters must not be used in indentation")
    }

    /// Read a block sequence whose `-` indicators are in column `node_indent`.
    pub(super) fn read_block_sequence(&mut self, node_indent: isize) -> Result<bool, ScanError> {
        if self.input.first_tab_in_line.is_some() {
            return Ok(false);
        }
        let tag = self.tag.take();
        let anchor = self.anchor.take();
        let mut sequence = Sequence::new();
        let mut detected = false;

        let mut c = self.input.peek();
        while c != '\0' {
            if let Some(tab) = self.input.first_tab_in_line {
                return Err(self.tab_in_indentation(tab));
            }
            if c != '-' || !is_blank_or_breakz(self.input.peek_nth(1)) {
                break;
            }
            if !detected {
                debug_print!("block sequence at line {}", self.input.line);
                detected = true;
            }
            self.input.skip();

            if self.skip_separation(true, None) != 0 && self.input.line_indent <= node_indent {
                sequence.push(Yaml::null());
                c = self.input.peek();
                continue;
            }

            let line = self.input.line;
            self.compose_node(node_indent, Context::BlockIn, false, true)?;
            sequence.push(self.result.take());
            self.skip_separation(true, None);
            c = self.input.peek();

            if (self.input.line == line || self.input.line_indent > node_indent) && c != '\0' {
                return Err(self.error("bad indentation of a sequence entry"));
            } else if self.input.line_indent < node_indent {
                break;
            }
        }

        self.tag = tag;
        self.anchor = anchor;
        if detected {
            self.kind = Some(NodeKind::Sequence);
            self.result = Yaml::Sequence(sequence);
        }
        Ok(detected)
    }

    /// Read a block mapping whose keys are in column `node_indent`.
    ///
    /// Implicit keys are composed as flow nodes indented more than `flow_indent`. When the first
    /// node read turns out not to be followed by `:`, that node is kept as the result: the caller
    /// sees a scalar or a flow collection instead of a mapping.
    pub(super) fn read_block_mapping(
        &mut self,
        node_indent: isize,
        flow_indent: isize,
    ) -> Result<bool, ScanError> {
        if self.input.first_tab_in_line.is_some() {
            return Ok(false);
        }
        let tag = self.tag.take();
        let anchor = self.anchor.take();
        let mut mapping = Mapping::new();
        let mut overridable = HashSet::new();

        let mut key_tag: Option<String> = None;
        let mut key = Yaml::null();
        let mut key_start = self.input.checkpoint();
        let mut at_explicit_key = false;
        let mut allow_compact;
        let mut detected = false;

        let mut c = self.input.peek();
        while c != '\0' {
            if !at_explicit_key {
                if let Some(tab) = self.input.first_tab_in_line {
                    return Err(self.tab_in_indentation(tab));
                }
            }
            let line = self.input.line;

            if (c == '?' || c == ':') && is_blank_or_breakz(self.input.peek_nth(1)) {
                if c == '?' {
                    if at_explicit_key {
                        self.store_mapping_pair(
                            &mut mapping,
                            &mut overridable,
                            key_tag.take().as_deref(),
                            key.take(),
                            Yaml::null(),
                            key_start,
                        )?;
                    }
                    detected = true;
                    at_explicit_key = true;
                } else if at_explicit_key {
                    at_explicit_key = false;
                } else {
                    return Err(self.error(
                        "incomplete explicit mapping pair; a key node is missed; or followed by a non-tabulated empty line",
                    ));
                }
                allow_compact = true;
                self.input.skip();
            } else {
                key_start = self.input.checkpoint();
                if !self.compose_node(flow_indent, Context::FlowOut, false, true)? {
                    break;
                }
                if self.input.line != line {
                    if detected {
                        return Err(self.error(
                            "can not read a block mapping entry; a multiline key may not be an implicit key",
                        ));
                    }
                    self.tag = tag;
                    self.anchor = anchor;
                    return Ok(true);
                }

                while is_blank(self.input.peek()) {
                    self.input.skip();
                }
                if self.input.peek() != ':' {
                    if detected {
                        return Err(
                            self.error("can not read an implicit mapping pair; a colon is missed")
                        );
                    }
                    self.tag = tag;
                    self.anchor = anchor;
                    return Ok(true);
                }
                if !is_blank_or_breakz(self.input.next_ch()) {
                    return Err(self.error(
                        "a whitespace character is expected after the key-value separator within a block mapping",
                    ));
                }

                if at_explicit_key {
                    self.store_mapping_pair(
                        &mut mapping,
                        &mut overridable,
                        key_tag.take().as_deref(),
                        key.take(),
                        Yaml::null(),
                        key_start,
                    )?;
                }
                if !detected {
                    debug_print!("block mapping at line {}", self.input.line);
                    detected = true;
                }
                at_explicit_key = false;
                allow_compact = false;
                key_tag = self.tag.take();
                key = self.result.take();
            }

            if self.input.line == line || self.input.line_indent > node_indent {
                if at_explicit_key {
                    key_start = self.input.checkpoint();
                }
                self.compose_node(node_indent, Context::BlockOut, true, allow_compact)?;
                let node = self.result.take();
                if at_explicit_key {
                    key = node;
                } else {
                    self.store_mapping_pair(
                        &mut mapping,
                        &mut overridable,
                        key_tag.take().as_deref(),
                        key.take(),
                        node,
                        key_start,
                    )?;
                }
                self.skip_separation(true, None);
                c = self.input.peek();
            }

            if (self.input.line == line || self.input.line_indent > node_indent) && c != '\0' {
                return Err(self.error("bad indentation of a mapping entry"));
            } else if self.input.line_indent < node_indent {
                break;
            }
        }

        if at_explicit_key {
            self.store_mapping_pair(
                &mut mapping,
                &mut overridable,
                key_tag.as_deref(),
                key,
                Yaml::null(),
                key_start,
            )?;
        }

        self.tag = tag;
        self.anchor = anchor;
        if detected {
            self.kind = Some(NodeKind::Mapping);
            self.result = Yaml::Mapping(mapping);
        }
        Ok(detected)
    }
}
