//! Tree processor registry.
//!
//! Hosts register processors once and run them over every parsed document,
//! before serialization. Processors run in descending priority; equal
//! priorities keep registration order.

use crate::tree::TreeNode;

/// A pass that rewrites a parsed document tree in place.
pub trait TreeProcessor: Send + Sync {
    /// Unique name; registering a second processor under the same name replaces the first.
    fn name(&self) -> &str;

    /// Rewrite the tree. Implementations must not panic on malformed input.
    fn run(&self, root: &mut TreeNode);
}

struct Registered {
    priority: i32,
    processor: Box<dyn TreeProcessor>,
}

/// Ordered collection of [`TreeProcessor`]s.
#[derive(Default)]
pub struct TreeProcessors {
    entries: Vec<Registered>,
}

impl TreeProcessors {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor (builder form).
    #[must_use]
    pub fn with<P: TreeProcessor + 'static>(mut self, processor: P, priority: i32) -> Self {
        self.register(processor, priority);
        self
    }

    /// Register a processor, replacing any processor with the same name.
    pub fn register<P: TreeProcessor + 'static>(&mut self, processor: P, priority: i32) {
        self.entries
            .retain(|entry| entry.processor.name() != processor.name());
        self.entries.push(Registered {
            priority,
            processor: Box::new(processor),
        });
        self.entries.sort_by_key(|entry| std::cmp::Reverse(entry.priority));
    }

    /// Run every processor over the tree, highest priority first.
    pub fn run(&self, root: &mut TreeNode) {
        for entry in &self.entries {
            tracing::debug!(processor = entry.processor.name(), "Running tree processor");
            entry.processor.run(root);
        }
    }

    /// Registered names in run order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.processor.name())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for TreeProcessors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeProcessors")
            .field("processors", &self.names())
            .finish()
    }
}
