//! List callouts for rendered Markdown.
//!
//! Rewrites list items whose text starts with a registered marker symbol
//! (e.g. `! Buy milk`) into callout blocks:
//!
//! ```html
//! <li><div class="list-callouts list-callouts-warning"><span>Buy milk</span></div></li>
//! ```
//!
//! Nested lists stay inside the list item, after the callout container.
//!
//! # Architecture
//!
//! - [`tree`]: generic markup tree (`tag`, `text`, `tail`, `attrs`, `children`)
//! - [`pattern`]: leading-marker matcher with a process-wide [`PatternCache`]
//! - [`item`]: list item splitting, text flattening and marker stripping
//! - [`processor`]: the rewriting pass ([`CalloutProcessor`])
//! - [`css`]: default stylesheet injection
//! - [`pipeline`]: host extension point ([`TreeProcessors`])
//! - [`markup`]: HTML fragment parser and serializer
//!
//! # Example
//!
//! ```
//! use list_callouts::markup::{MarkupParser, MarkupSerializer};
//! use list_callouts::{CalloutConfig, CalloutProcessor};
//!
//! let mut tree = MarkupParser::new()
//!     .parse("<ul><li>~ Remember<ul><li>sub</li></ul></li></ul>")
//!     .unwrap();
//!
//! let processor = CalloutProcessor::new(CalloutConfig::default()).unwrap();
//! processor.process(&mut tree);
//!
//! let html = MarkupSerializer::new().serialize(&tree);
//! assert_eq!(
//!     html,
//!     r#"<ul><li><div class="list-callouts list-callouts-bookmark"><span>Remember</span></div><ul><li>sub</li></ul></li></ul>"#
//! );
//! ```

pub mod css;
mod error;
pub mod item;
pub mod markup;
pub mod pattern;
pub mod pipeline;
pub mod processor;
pub mod symbols;
pub mod tree;

pub use css::{CssInjection, DEFAULT_CSS};
pub use error::{CalloutError, MarkupError, SymbolMapError};
pub use pattern::{MarkerMatch, PatternCache, SymbolPattern};
pub use pipeline::{TreeProcessor, TreeProcessors};
pub use processor::{
    CalloutConfig, CalloutProcessor, ItemFault, ItemOutcome, PROCESSOR_NAME, PROCESSOR_PRIORITY,
    PassReport, SkipReason,
};
pub use symbols::SymbolMap;
pub use tree::TreeNode;
