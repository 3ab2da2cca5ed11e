//! `list-callouts css` command implementation.

use std::io::Write;

use list_callouts::DEFAULT_CSS;

use crate::error::CliError;

/// Write the default callout stylesheet to stdout.
pub(crate) fn execute() -> Result<(), CliError> {
    write_css(&mut std::io::stdout().lock())
}

fn write_css(out: &mut impl Write) -> Result<(), CliError> {
    out.write_all(DEFAULT_CSS.as_bytes())?;
    out.flush()?;
    Ok(())
}
