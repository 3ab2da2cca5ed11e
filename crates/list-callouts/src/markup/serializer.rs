//! HTML serializer for [`TreeNode`] trees.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use super::is_void_element;
use crate::tree::TreeNode;

/// Elements whose text is written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script"];

/// Serialize a tree back to HTML.
pub struct MarkupSerializer;

impl MarkupSerializer {
    /// Create a new serializer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize the children of the root wrapper to an HTML string.
    pub fn serialize(&self, tree: &TreeNode) -> String {
        let mut out = String::with_capacity(4096);
        for child in &tree.children {
            serialize_node(child, &mut out);
        }
        out
    }

    /// Serialize a single node, including its tail.
    pub fn serialize_node(&self, node: &TreeNode) -> String {
        let mut out = String::new();
        serialize_node(node, &mut out);
        out
    }
}

impl Default for MarkupSerializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a single node recursively.
fn serialize_node(node: &TreeNode, out: &mut String) {
    out.push('<');
    out.push_str(&node.tag);

    for (key, value) in &node.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }

    let is_empty = node.children.is_empty() && node.text.is_empty();
    if is_empty && is_void_element(&node.tag) {
        out.push_str(" />");
    } else {
        out.push('>');

        if RAW_TEXT_ELEMENTS.contains(&node.tag.as_str()) {
            out.push_str(&node.text);
        } else {
            out.push_str(&escape_text(&node.text));
        }

        for child in &node.children {
            serialize_node(child, out);
        }

        out.push_str("</");
        out.push_str(&node.tag);
        out.push('>');
    }

    if !node.tail.is_empty() {
        out.push_str(&escape_text(&node.tail));
    }
}

/// Escape text for element content.
fn escape_text(text: &str) -> String {
    escape_html(text, false)
}

/// Escape text for attribute values.
fn escape_attr(text: &str) -> String {
    escape_html(text, true)
}

fn escape_html(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}
