//! Marker symbol to class suffix mapping.

use std::collections::BTreeMap;

use crate::error::SymbolMapError;

/// Built-in symbols and their class suffixes.
pub const DEFAULT_SYMBOLS: &[(char, &str)] = &[
    ('&', "highlight"),
    ('?', "question"),
    ('!', "warning"),
    ('~', "bookmark"),
    ('@', "tip"),
    ('$', "success"),
    ('%', "quote"),
];

/// Mapping from a single-character marker symbol to a CSS class suffix.
///
/// Keys are kept sorted, so [`SymbolMap::cache_key`] is stable for equal key sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolMap {
    entries: BTreeMap<char, String>,
}

impl SymbolMap {
    /// Create an empty map. No list item ever matches an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in symbol set.
    #[must_use]
    pub fn builtin() -> Self {
        DEFAULT_SYMBOLS
            .iter()
            .fold(Self::new(), |map, &(symbol, suffix)| {
                map.with_symbol(symbol, suffix)
            })
    }

    /// Add or replace a symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: char, suffix: impl Into<String>) -> Self {
        self.entries.insert(symbol, suffix.into());
        self
    }

    /// Build a map from string keys, as read from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is not exactly one non-whitespace character.
    pub fn from_strings<I, K, V>(entries: I) -> Result<Self, SymbolMapError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (key, suffix) in entries {
            let symbol = parse_symbol(key.as_ref())?;
            map.entries.insert(symbol, suffix.into());
        }
        Ok(map)
    }

    /// Class suffix for a symbol.
    ///
    /// Returns `None` for unknown symbols and for symbols mapped to an empty suffix.
    #[must_use]
    pub fn class_suffix(&self, symbol: char) -> Option<&str> {
        self.entries
            .get(&symbol)
            .map(String::as_str)
            .filter(|suffix| !suffix.is_empty())
    }

    /// Registered symbols in sorted order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.keys().copied()
    }

    /// Key identifying the symbol set, used for pattern caching.
    #[must_use]
    pub fn cache_key(&self) -> String {
        self.symbols().collect()
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

/// Parse a configuration key into a symbol character.
fn parse_symbol(key: &str) -> Result<char, SymbolMapError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_whitespace() => Err(SymbolMapError::Whitespace(c)),
        (Some(c), None) => Ok(c),
        _ => Err(SymbolMapError::NotSingleChar(key.to_owned())),
    }
}
