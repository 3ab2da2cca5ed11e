//! Error types for callout processing.

use std::str::Utf8Error;

/// Error while building a matcher or rewriting a list item.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CalloutError {
    /// The symbol pattern failed to compile.
    #[error("invalid symbol pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The marker matched the flattened item text but is not at the start of
    /// the first text run (e.g. the symbol is separated from its whitespace by
    /// markup), so it cannot be stripped without touching descendant markup.
    #[error("marker '{symbol}' is not at the start of the item's first text run")]
    MarkerOutsideLeadingText {
        /// Matched symbol.
        symbol: char,
    },
}

/// Invalid symbol map entry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SymbolMapError {
    /// Symbol key is empty or longer than one character.
    #[error("symbol {0:?} must be exactly one character")]
    NotSingleChar(String),

    /// Symbol key is a whitespace character.
    #[error("symbol {0:?} must not be whitespace")]
    Whitespace(char),
}

/// Error while parsing markup into a tree.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MarkupError {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] Utf8Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error during XML parsing.
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::MarkupParser;

    #[test]
    fn test_markup_error_message_includes_cause() {
        let err = MarkupParser::new().parse("<p>text<!-- unterminated").unwrap_err();

        assert!(matches!(err, MarkupError::XmlParse(_)));
        let message = err.to_string();
        assert!(message.starts_with("XML parse error: "), "{message}");
        assert!(message.len() > "XML parse error: ".len(), "{message}");
    }
}
