//! Callout rewriting pass over a document tree.

use std::sync::Arc;

use crate::css::{CssInjection, inject_css};
use crate::error::CalloutError;
use crate::item::{
    ListItemParts, content_nodes, extract_text, first_text_run, leading_text, split_children,
    strip_marker, strip_marker_text,
};
use crate::pattern::{PatternCache, SymbolPattern};
use crate::pipeline::TreeProcessor;
use crate::symbols::SymbolMap;
use crate::tree::TreeNode;

/// Tag of the callout container.
pub const CONTAINER_TAG: &str = "div";

/// Class shared by every callout container.
pub const CALLOUT_CLASS: &str = "list-callouts";

/// Name under which the processor registers in a [`crate::TreeProcessors`] pipeline.
pub const PROCESSOR_NAME: &str = "list-callouts";

/// Default pipeline priority: after inline processing, before serialization.
pub const PROCESSOR_PRIORITY: i32 = 15;

/// Configuration consumed by [`CalloutProcessor`].
#[derive(Debug, Clone)]
pub struct CalloutConfig {
    /// Marker symbols and their class suffixes.
    pub symbols: SymbolMap,
    /// Whether to add the default stylesheet to the document.
    pub insert_default_css: bool,
}

impl Default for CalloutConfig {
    fn default() -> Self {
        Self {
            symbols: SymbolMap::builtin(),
            insert_default_css: false,
        }
    }
}

/// Why a list item was left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Item has no text or non-list children.
    NoContent,
    /// Leading text doesn't start with a registered marker.
    NoMarker,
    /// Marker matched but the symbol has no (or an empty) class suffix.
    UnmappedSymbol(char),
    /// Item already starts with a callout container from an earlier pass.
    AlreadyConverted,
}

/// Result of processing one list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Item was rewritten into a callout.
    Converted {
        /// Matched symbol.
        symbol: char,
        /// Full class attribute of the container.
        class: String,
    },
    /// Item was left unchanged.
    Skipped(SkipReason),
}

/// A list item that could not be converted.
#[derive(Debug)]
pub struct ItemFault {
    /// Zero-based index of the list item in document order.
    pub index: usize,
    /// What went wrong.
    pub error: CalloutError,
}

/// Summary of one pass over a document.
#[derive(Debug, Default)]
pub struct PassReport {
    /// List items visited.
    pub items: usize,
    /// List items rewritten into callouts.
    pub converted: usize,
    /// List items left unchanged.
    pub skipped: usize,
    /// List items that failed; they are left as they were.
    pub faults: Vec<ItemFault>,
    /// Stylesheet placement, if injection is enabled.
    pub css: Option<CssInjection>,
}

/// Rewrites marker-prefixed list items into callout containers.
///
/// # Example
///
/// ```
/// use list_callouts::{CalloutConfig, CalloutProcessor, SymbolMap, TreeNode};
///
/// let config = CalloutConfig {
///     symbols: SymbolMap::new().with_symbol('!', "warning"),
///     insert_default_css: false,
/// };
/// let processor = CalloutProcessor::new(config).unwrap();
///
/// let mut root = TreeNode::new("root").with_children(vec![
///     TreeNode::new("ul").with_children(vec![TreeNode::new("li").with_text("! Buy milk")]),
/// ]);
/// let report = processor.process(&mut root);
///
/// let container = &root.children[0].children[0].children[0];
/// assert_eq!(report.converted, 1);
/// assert_eq!(container.attr("class"), Some("list-callouts list-callouts-warning"));
/// assert_eq!(container.inner_text(), "Buy milk");
/// ```
#[derive(Debug)]
pub struct CalloutProcessor {
    config: CalloutConfig,
    pattern: Arc<SymbolPattern>,
}

impl CalloutProcessor {
    /// Create a processor using the process-wide [`PatternCache`].
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol pattern fails to compile.
    pub fn new(config: CalloutConfig) -> Result<Self, CalloutError> {
        Self::with_cache(config, PatternCache::global())
    }

    /// Create a processor that takes its matcher from the given cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol pattern fails to compile.
    pub fn with_cache(config: CalloutConfig, cache: &PatternCache) -> Result<Self, CalloutError> {
        let pattern = cache.get_or_build(&config.symbols)?;
        tracing::debug!(
            symbols = %config.symbols.cache_key(),
            insert_default_css = config.insert_default_css,
            "Initialized callout processor"
        );
        Ok(Self { config, pattern })
    }

    /// Processor configuration.
    #[must_use]
    pub fn config(&self) -> &CalloutConfig {
        &self.config
    }

    /// Run the pass over a tree, mutating it in place.
    ///
    /// Per-item failures are logged and collected in the report; they never
    /// stop the pass.
    pub fn process(&self, root: &mut TreeNode) -> PassReport {
        let mut report = PassReport::default();

        if self.config.insert_default_css {
            report.css = Some(inject_css(root));
        }

        self.visit(root, &mut report);

        tracing::info!(
            items = report.items,
            converted = report.converted,
            faults = report.faults.len(),
            "Processed list callouts"
        );
        report
    }

    /// Pre-order walk; an item's children are visited after the item is rewritten.
    fn visit(&self, node: &mut TreeNode, report: &mut PassReport) {
        if node.is_list_item() {
            let index = report.items;
            report.items += 1;

            match self.process_item(node) {
                Ok(ItemOutcome::Converted { symbol, class }) => {
                    tracing::debug!(item = index, %symbol, %class, "Converted list item");
                    report.converted += 1;
                }
                Ok(ItemOutcome::Skipped(reason)) => {
                    tracing::trace!(item = index, ?reason, "Skipped list item");
                    report.skipped += 1;
                }
                Err(error) => {
                    tracing::warn!(item = index, %error, "Error processing list item");
                    report.faults.push(ItemFault { index, error });
                }
            }
        }

        for child in &mut node.children {
            self.visit(child, report);
        }
    }

    /// Rewrite a single list item.
    ///
    /// All checks run before the item is touched, so a skipped or failed item
    /// is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`CalloutError::MarkerOutsideLeadingText`] when the marker
    /// matches the flattened text but can't be stripped from the first text run.
    pub fn process_item(&self, item: &mut TreeNode) -> Result<ItemOutcome, CalloutError> {
        if is_converted(item) {
            return Ok(ItemOutcome::Skipped(SkipReason::AlreadyConverted));
        }

        let leading = leading_text(item);
        if leading.is_none() && content_nodes(item).next().is_none() {
            return Ok(ItemOutcome::Skipped(SkipReason::NoContent));
        }

        let text = extract_text(leading, content_nodes(item));
        let Some(marker) = self.pattern.find_marker(&text) else {
            return Ok(ItemOutcome::Skipped(SkipReason::NoMarker));
        };
        let symbol = marker.symbol;

        let Some(suffix) = self.config.symbols.class_suffix(symbol) else {
            tracing::debug!(%symbol, "Symbol not found in symbol map");
            return Ok(ItemOutcome::Skipped(SkipReason::UnmappedSymbol(symbol)));
        };

        let first_run = leading.or_else(|| content_nodes(item).next().and_then(first_text_run));
        if first_run
            .and_then(|run| strip_marker_text(run, symbol))
            .is_none()
        {
            return Err(CalloutError::MarkerOutsideLeadingText { symbol });
        }

        let class = format!("{CALLOUT_CLASS} {CALLOUT_CLASS}-{suffix}");
        let ListItemParts {
            mut content,
            sublists,
        } = split_children(item);

        if let Some(first) = content.first_mut() {
            strip_marker(first, symbol)?;
        }

        let container = TreeNode::new(CONTAINER_TAG)
            .with_attr("class", class.clone())
            .with_children(content);

        item.children = std::iter::once(container).chain(sublists).collect();

        Ok(ItemOutcome::Converted { symbol, class })
    }
}

impl TreeProcessor for CalloutProcessor {
    fn name(&self) -> &str {
        PROCESSOR_NAME
    }

    fn run(&self, root: &mut TreeNode) {
        self.process(root);
    }
}

/// Whether an item's first child is a callout container from an earlier pass.
fn is_converted(item: &TreeNode) -> bool {
    item.text.trim().is_empty()
        && item
            .children
            .first()
            .is_some_and(|first| first.tag == CONTAINER_TAG && first.has_class(CALLOUT_CLASS))
}
