//! Conversion between HTML fragments and [`TreeNode`](crate::TreeNode) trees.

mod entities;
mod parser;
mod serializer;

pub use parser::MarkupParser;
pub use serializer::MarkupSerializer;

/// Tag of the synthetic element wrapping a parsed fragment.
pub const ROOT_TAG: &str = "root";

/// HTML elements that never have content. A start tag without `/>` is
/// treated as complete, and the serializer self-closes them.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub(crate) fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag))
}
