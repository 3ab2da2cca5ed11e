//! HTML fragment parser producing a [`TreeNode`] tree.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::collections::BTreeMap;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::entities::decode_entity;
use super::{ROOT_TAG, is_void_element};
use crate::error::MarkupError;
use crate::tree::TreeNode;

/// Parse HTML fragments, such as Markdown renderer output.
///
/// Void elements (`<br>`, `<img ...>`) don't need `/>`. An end tag that
/// matches an open ancestor closes every element above it; an end tag with
/// no open element is dropped.
pub struct MarkupParser;

/// How an end tag relates to the currently open elements.
enum Closing {
    /// Closes the innermost open element.
    Current,
    /// Closes an outer element; inner elements are closed implicitly.
    Ancestor(String),
    /// Matches no open element.
    Stray,
}

impl MarkupParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML fragment into a tree.
    ///
    /// The fragment is wrapped in a synthetic [`ROOT_TAG`] element, which
    /// becomes the returned node.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup cannot be tokenized, e.g. an unclosed
    /// tag or comment at the end of input.
    pub fn parse(&self, html: &str) -> Result<TreeNode, MarkupError> {
        let wrapped = format!("<{ROOT_TAG}>{html}</{ROOT_TAG}>");

        let mut reader = Reader::from_str(&wrapped);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let tag = self.decode_tag(&reader, &e);
                    let attrs = self.decode_attrs(&reader, &e);
                    let mut open = vec![tag.clone()];
                    let (mut root, _) = self.parse_children(&mut reader, &mut open)?;
                    root.tag = tag;
                    root.attrs = attrs;
                    return Ok(root);
                }
                Event::Eof => return Ok(TreeNode::new(ROOT_TAG)),
                _ => {}
            }
            buf.clear();
        }
    }

    /// Parse the content of the innermost element in `open`.
    ///
    /// Returns the parsed content and, when an end tag closed an outer
    /// element, that tag so the caller can keep unwinding.
    fn parse_children<R: BufRead>(
        &self,
        reader: &mut Reader<R>,
        open: &mut Vec<String>,
    ) -> Result<(TreeNode, Option<String>), MarkupError> {
        let mut buf = Vec::new();
        let mut node = TreeNode::default();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let child_tag = self.decode_tag(reader, &e);
                    let child_attrs = self.decode_attrs(reader, &e);

                    if is_void_element(&child_tag) {
                        node.children.push(TreeNode {
                            tag: child_tag,
                            attrs: child_attrs,
                            ..Default::default()
                        });
                        buf.clear();
                        continue;
                    }

                    open.push(child_tag.clone());
                    let (mut child, pending) = self.parse_children(reader, open)?;
                    open.pop();

                    child.tag = child_tag;
                    child.attrs = child_attrs;
                    node.children.push(child);

                    if let Some(end_tag) = pending {
                        match classify_end(end_tag, open) {
                            Closing::Current => return Ok((node, None)),
                            Closing::Ancestor(tag) => return Ok((node, Some(tag))),
                            Closing::Stray => {}
                        }
                    }
                }
                Event::Empty(e) => {
                    let child = TreeNode {
                        tag: self.decode_tag(reader, &e),
                        attrs: self.decode_attrs(reader, &e),
                        ..Default::default()
                    };
                    node.children.push(child);
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?.into_owned();
                    append_text(&mut node, &text);
                }
                Event::GeneralRef(e) => {
                    let entity = reader.decoder().decode(&e)?.into_owned();
                    append_text(&mut node, &decode_entity(&entity));
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    append_text(&mut node, &text);
                }
                Event::End(e) => {
                    let end_tag = self.decode_tag_from_bytes(reader, e.name().as_ref());
                    match classify_end(end_tag, open) {
                        Closing::Current => return Ok((node, None)),
                        Closing::Ancestor(tag) => {
                            tracing::debug!(
                                unclosed = ?open.last(),
                                found = %tag,
                                "Implicitly closing element"
                            );
                            return Ok((node, Some(tag)));
                        }
                        Closing::Stray => {}
                    }
                }
                Event::Eof => {
                    return Ok((node, None));
                }
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
            buf.clear();
        }
    }

    fn decode_tag<R: BufRead>(&self, reader: &Reader<R>, e: &BytesStart) -> String {
        self.decode_tag_from_bytes(reader, e.name().as_ref())
    }

    fn decode_tag_from_bytes<R: BufRead>(&self, reader: &Reader<R>, name: &[u8]) -> String {
        reader.decoder().decode(name).map_or_else(
            |_| String::from_utf8_lossy(name).into_owned(),
            std::borrow::Cow::into_owned,
        )
    }

    fn decode_attrs<R: BufRead>(
        &self,
        reader: &Reader<R>,
        e: &BytesStart,
    ) -> BTreeMap<String, String> {
        let mut attrs = BTreeMap::new();
        for attr in e.html_attributes().flatten() {
            let key = reader.decoder().decode(attr.key.as_ref()).map_or_else(
                |_| String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                std::borrow::Cow::into_owned,
            );
            let value = attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                std::borrow::Cow::into_owned,
            );
            attrs.insert(key, value);
        }
        attrs
    }
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Match an end tag against the open elements, innermost last.
fn classify_end(end_tag: String, open: &[String]) -> Closing {
    match open.split_last() {
        Some((current, _)) if current.eq_ignore_ascii_case(&end_tag) => Closing::Current,
        Some((_, outer)) if outer.iter().any(|tag| tag.eq_ignore_ascii_case(&end_tag)) => {
            Closing::Ancestor(end_tag)
        }
        _ => {
            tracing::debug!(found = %end_tag, "Ignoring end tag without open element");
            Closing::Stray
        }
    }
}

/// Append text to node's text or last child's tail.
fn append_text(node: &mut TreeNode, text: &str) {
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}
