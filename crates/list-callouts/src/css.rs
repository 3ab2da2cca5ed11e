//! Default callout stylesheet and its injection into the document tree.

use crate::tree::TreeNode;

/// Stylesheet covering the built-in symbols.
pub const DEFAULT_CSS: &str = include_str!("default.css");

const HEAD_TAG: &str = "head";
const STYLE_TAG: &str = "style";

/// Where the default stylesheet ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssInjection {
    /// Appended as the last child of the first `head` element.
    Head,
    /// No `head` element; inserted as the first child of the root.
    Root,
    /// The stylesheet was already in the tree; nothing was added.
    AlreadyPresent,
}

/// Insert a `style` node holding [`DEFAULT_CSS`] into the tree.
pub fn inject_css(root: &mut TreeNode) -> CssInjection {
    if root.any(&is_default_style) {
        tracing::debug!("Default CSS already present, skipping injection");
        return CssInjection::AlreadyPresent;
    }

    let style = TreeNode::new(STYLE_TAG).with_text(DEFAULT_CSS);

    if let Some(head) = root.find_first_mut(HEAD_TAG) {
        head.children.push(style);
        tracing::debug!("Inserted default CSS into <head>");
        CssInjection::Head
    } else {
        root.children.insert(0, style);
        tracing::debug!("Inserted default CSS at document root");
        CssInjection::Root
    }
}

fn is_default_style(node: &TreeNode) -> bool {
    node.tag == STYLE_TAG && node.text == DEFAULT_CSS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_styles(node: &TreeNode) -> usize {
        usize::from(node.tag == STYLE_TAG)
            + node.children.iter().map(count_styles).sum::<usize>()
    }

    #[test]
    fn test_default_css_covers_builtin_symbols() {
        for (_, suffix) in crate::symbols::DEFAULT_SYMBOLS {
            assert!(
                DEFAULT_CSS.contains(&format!(".list-callouts-{suffix}")),
                "missing rule for {suffix}"
            );
        }
    }

    #[test]
    fn test_inject_into_head() {
        let mut root = TreeNode::new("root").with_children(vec![TreeNode::new("html")
            .with_children(vec![
                TreeNode::new("head")
                    .with_children(vec![TreeNode::new("title").with_text("Doc")]),
                TreeNode::new("body"),
            ])]);

        assert_eq!(inject_css(&mut root), CssInjection::Head);

        let head = &root.children[0].children[0];
        assert_eq!(head.children.len(), 2);
        assert_eq!(head.children[1].tag, "style");
        assert_eq!(head.children[1].text, DEFAULT_CSS);
        assert_eq!(count_styles(&root), 1);
    }

    #[test]
    fn test_inject_at_root_without_head() {
        let mut root = TreeNode::new("root").with_children(vec![TreeNode::new("p")]);

        assert_eq!(inject_css(&mut root), CssInjection::Root);

        assert_eq!(root.children[0].tag, "style");
        assert_eq!(root.children[1].tag, "p");
    }

    #[test]
    fn test_inject_twice_is_noop() {
        let mut root = TreeNode::new("root").with_children(vec![TreeNode::new("head")]);

        assert_eq!(inject_css(&mut root), CssInjection::Head);
        assert_eq!(inject_css(&mut root), CssInjection::AlreadyPresent);
        assert_eq!(count_styles(&root), 1);
    }
}
