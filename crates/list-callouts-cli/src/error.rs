//! CLI error types.

use list_callouts::{CalloutError, MarkupError, SymbolMapError};
use list_callouts_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Markup(#[from] MarkupError),

    #[error("{0}")]
    Callout(#[from] CalloutError),

    #[error("{0}")]
    Symbols(#[from] SymbolMapError),
}
