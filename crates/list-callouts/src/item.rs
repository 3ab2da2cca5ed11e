//! List item decomposition: content/sub-list splitting, text flattening and
//! marker stripping.

use crate::error::CalloutError;
use crate::tree::TreeNode;

/// Tag of the node wrapping a list item's own leading text.
pub const LEADING_TEXT_TAG: &str = "span";

/// A list item's children, partitioned.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListItemParts {
    /// Non-list children, preceded by the synthetic leading-text node if any.
    pub content: Vec<TreeNode>,
    /// Nested `ul`/`ol` children.
    pub sublists: Vec<TreeNode>,
}

/// The item's own leading text, if it holds anything but whitespace.
#[must_use]
pub fn leading_text(item: &TreeNode) -> Option<&str> {
    (!item.text.trim().is_empty()).then_some(item.text.as_str())
}

/// Non-list children of an item, in order.
pub fn content_nodes(item: &TreeNode) -> impl Iterator<Item = &TreeNode> {
    item.children.iter().filter(|child| !child.is_list())
}

/// Move an item's leading text and children out into [`ListItemParts`].
///
/// Leaves the item with no text and no children. Relative order is kept
/// within each sequence.
pub fn split_children(item: &mut TreeNode) -> ListItemParts {
    let leading = std::mem::take(&mut item.text);
    let (mut content, sublists): (Vec<_>, Vec<_>) = std::mem::take(&mut item.children)
        .into_iter()
        .partition(|child| !child.is_list());

    if !leading.trim().is_empty() {
        let text = leading_span_text(&leading, !content.is_empty());
        content.insert(0, TreeNode::new(LEADING_TEXT_TAG).with_text(text));
    }

    ListItemParts { content, sublists }
}

/// Normalize leading text for the synthetic span.
///
/// Leading whitespace is dropped. Trailing whitespace becomes a single space
/// when inline content follows, so `"! Buy <em>milk</em>"` keeps its word gap.
fn leading_span_text(leading: &str, followed_by_content: bool) -> String {
    let trimmed = leading.trim();
    let had_trailing_space = leading.ends_with(char::is_whitespace);
    if followed_by_content && had_trailing_space {
        format!("{trimmed} ")
    } else {
        trimmed.to_owned()
    }
}

/// Flatten content into a single string for marker matching.
///
/// Each node contributes its text and descendant text (not its own tail),
/// trimmed; contributions are joined with a single space.
pub fn extract_text<'a>(
    leading: Option<&str>,
    nodes: impl IntoIterator<Item = &'a TreeNode>,
) -> String {
    let leading = leading.map(|text| text.trim().to_owned());
    let node_texts = nodes
        .into_iter()
        .map(|node| node.inner_text().trim().to_owned());

    leading
        .into_iter()
        .chain(node_texts)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First non-blank text slot of a node in document order.
///
/// The node's own text comes first, then each child's subtree followed by
/// that child's tail. The node's own tail is not considered.
#[must_use]
pub fn first_text_run(node: &TreeNode) -> Option<&str> {
    if !node.text.trim().is_empty() {
        return Some(&node.text);
    }
    for child in &node.children {
        if let Some(run) = first_text_run(child) {
            return Some(run);
        }
        if !child.tail.trim().is_empty() {
            return Some(&child.tail);
        }
    }
    None
}

fn first_text_run_mut(node: &mut TreeNode) -> Option<&mut String> {
    if !node.text.trim().is_empty() {
        return Some(&mut node.text);
    }
    for child in &mut node.children {
        if first_text_run(child).is_some() {
            return first_text_run_mut(child);
        }
        if !child.tail.trim().is_empty() {
            return Some(&mut child.tail);
        }
    }
    None
}

/// Remove a leading `symbol + whitespace` run from `text`.
///
/// Returns the remainder, or `None` if `text` doesn't start with the marker.
#[must_use]
pub fn strip_marker_text(text: &str, symbol: char) -> Option<&str> {
    let rest = text.trim_start().strip_prefix(symbol)?;
    rest.starts_with(char::is_whitespace)
        .then_some(rest.trim_start())
}

/// Strip the marker from a content node's first text run.
///
/// Only that run changes; children and every other text slot are untouched.
///
/// # Errors
///
/// Returns [`CalloutError::MarkerOutsideLeadingText`] if the first text run
/// doesn't start with `symbol` followed by whitespace. The node is unchanged.
pub fn strip_marker(node: &mut TreeNode, symbol: char) -> Result<(), CalloutError> {
    let outside = || CalloutError::MarkerOutsideLeadingText { symbol };
    let run = first_text_run_mut(node).ok_or_else(outside)?;
    let stripped = strip_marker_text(run, symbol).ok_or_else(outside)?.to_owned();
    *run = stripped;
    Ok(())
}
