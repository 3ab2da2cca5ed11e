//! Generic markup tree.

use std::collections::BTreeMap;

/// Tag of list item elements.
pub const LIST_ITEM_TAG: &str = "li";

/// Tags of list elements nested inside list items.
pub const LIST_TAGS: &[&str] = &["ul", "ol"];

/// Node in a parsed markup tree.
///
/// Text follows the `ElementTree` model: `text` is the text before the first
/// child, `tail` is the text after the element's closing tag inside its parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    /// Element tag name.
    pub tag: String,
    /// Direct text content.
    pub text: String,
    /// Text after element.
    pub tail: String,
    /// Element attributes.
    pub attrs: BTreeMap<String, String>,
    /// Child nodes.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a new tree node with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tail content.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Set a single attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Whether this node is a list item (`li`).
    #[must_use]
    pub fn is_list_item(&self) -> bool {
        self.tag == LIST_ITEM_TAG
    }

    /// Whether this node is an ordered or unordered list.
    #[must_use]
    pub fn is_list(&self) -> bool {
        LIST_TAGS.contains(&self.tag.as_str())
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Whether the `class` attribute contains the given class name.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Text of this node and all descendants, excluding this node's own tail.
    ///
    /// Mirrors `ElementTree.itertext()`: markup boundaries are dropped and no
    /// separators are inserted.
    #[must_use]
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        collect_inner_text(self, &mut out);
        out
    }

    /// Find the first node with the given tag in document order (self included).
    #[must_use]
    pub fn find_first_mut(&mut self, tag: &str) -> Option<&mut TreeNode> {
        if self.tag == tag {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_first_mut(tag))
    }

    /// Whether this node or any descendant satisfies the predicate.
    #[must_use]
    pub fn any(&self, predicate: &impl Fn(&TreeNode) -> bool) -> bool {
        predicate(self) || self.children.iter().any(|child| child.any(predicate))
    }
}

fn collect_inner_text(node: &TreeNode, out: &mut String) {
    out.push_str(&node.text);
    for child in &node.children {
        collect_inner_text(child, out);
        out.push_str(&child.tail);
    }
}
