//! Leading-marker matcher and its process-wide cache.
//!
//! Compiling the marker regex is the only setup cost of a pass, so matchers are
//! memoized by symbol set in a [`PatternCache`] and shared between documents.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use regex::Regex;

use crate::error::CalloutError;
use crate::symbols::SymbolMap;

static GLOBAL_CACHE: LazyLock<PatternCache> = LazyLock::new(PatternCache::new);

/// Marker found at the start of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerMatch<'t> {
    /// Matched symbol.
    pub symbol: char,
    /// Text after the symbol and its trailing whitespace, up to the end.
    pub remainder: &'t str,
}

/// Matcher for `<whitespace>* <symbol> <whitespace>+ <rest>`.
#[derive(Debug)]
pub struct SymbolPattern {
    /// `None` for an empty symbol set: nothing ever matches.
    regex: Option<Regex>,
}

impl SymbolPattern {
    /// Build a matcher for the given symbols.
    ///
    /// Symbols are escaped, so regex metacharacters are matched literally.
    ///
    /// # Errors
    ///
    /// Returns an error if the generated regex fails to compile.
    pub fn build(symbols: impl IntoIterator<Item = char>) -> Result<Self, CalloutError> {
        let alternatives: Vec<String> = symbols
            .into_iter()
            .map(|symbol| regex::escape(symbol.encode_utf8(&mut [0; 4])))
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { regex: None });
        }

        let pattern = format!(r"(?s)^\s*({})\s+(.*)", alternatives.join("|"));
        tracing::debug!(%pattern, "Compiled symbol pattern");
        Ok(Self {
            regex: Some(Regex::new(&pattern)?),
        })
    }

    /// Match a registered marker at the start of `text`.
    #[must_use]
    pub fn find_marker<'t>(&self, text: &'t str) -> Option<MarkerMatch<'t>> {
        let caps = self.regex.as_ref()?.captures(text)?;
        let symbol = caps.get(1)?.as_str().chars().next()?;
        let remainder = caps.get(2).map_or("", |m| m.as_str());
        Some(MarkerMatch { symbol, remainder })
    }

    /// Whether this matcher can never match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }
}

/// Memoized matchers keyed by the sorted symbol set.
///
/// Entries are written once and never mutated. If two passes build the same
/// matcher concurrently, the first stored value wins and both are equivalent.
#[derive(Debug, Default)]
pub struct PatternCache {
    patterns: RwLock<HashMap<String, Arc<SymbolPattern>>>,
}

impl PatternCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache shared by processors that don't supply their own.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL_CACHE
    }

    /// Get the matcher for the symbol map's key set, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the matcher has to be built and fails to compile.
    pub fn get_or_build(&self, symbols: &SymbolMap) -> Result<Arc<SymbolPattern>, CalloutError> {
        let key = symbols.cache_key();

        if let Some(pattern) = self
            .patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            tracing::debug!(symbols = %key, "Reusing cached symbol pattern");
            return Ok(Arc::clone(pattern));
        }

        let built = Arc::new(SymbolPattern::build(symbols.symbols())?);
        let mut patterns = self
            .patterns
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(patterns.entry(key).or_insert(built)))
    }

    /// Number of cached matchers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
