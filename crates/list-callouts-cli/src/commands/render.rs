//! `list-callouts render` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use list_callouts::markup::{MarkupParser, MarkupSerializer, ROOT_TAG};
use list_callouts::{
    CalloutConfig, CalloutProcessor, PROCESSOR_PRIORITY, SymbolMap, TreeNode, TreeProcessors,
};
use list_callouts_config::{CalloutsConfig, CliSettings, Config};
use pulldown_cmark::{Options, Parser};

use crate::error::CliError;
use crate::output::Output;

/// Title used for standalone documents read from stdin.
const DEFAULT_TITLE: &str = "Document";

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: read from stdin).
    input: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover list-callouts.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Insert the default callout stylesheet (overrides config).
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    css: Option<bool>,

    /// Don't insert the default callout stylesheet.
    #[arg(long, conflicts_with = "css")]
    no_css: bool,

    /// Wrap the output in a complete HTML document.
    #[arg(long)]
    standalone: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the input can't be read, the
    /// rendered HTML can't be parsed, or the output can't be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            insert_default_css: self.resolve_css_enabled(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if self.verbose {
            match &config.config_path {
                Some(path) => output.info(&format!("Config: {}", path.display())),
                None => output.info("Config: defaults"),
            }
        }
        if config
            .callouts
            .symbols
            .values()
            .all(|suffix| suffix.is_empty())
        {
            output.warning("No callout symbols configured; list items will be left unchanged");
        }

        let markdown = read_input(self.input.as_deref())?;
        let title = self.standalone.then(|| document_title(self.input.as_deref()));
        let html = render_markdown(&markdown, &config.callouts, title.as_deref())?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &html)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }

    /// Resolve `insert_default_css` from --css/--no-css flags.
    fn resolve_css_enabled(&self) -> Option<bool> {
        self.no_css.then_some(false).or(self.css)
    }
}

/// Render Markdown to HTML and run the tree processors over the result.
///
/// With `standalone_title`, the fragment is wrapped in an `html`/`head`/`body`
/// document so the stylesheet lands in `head`.
pub(crate) fn render_markdown(
    markdown: &str,
    config: &CalloutsConfig,
    standalone_title: Option<&str>,
) -> Result<String, CliError> {
    let html = markdown_to_html(markdown);

    let mut tree = MarkupParser::new().parse(&html)?;
    if let Some(title) = standalone_title {
        tree = standalone_document(tree, title);
    }

    build_processors(config)?.run(&mut tree);

    let body = MarkupSerializer::new().serialize(&tree);
    Ok(if standalone_title.is_some() {
        format!("<!DOCTYPE html>\n{body}\n")
    } else {
        body
    })
}

/// Build the tree processor pipeline from configuration.
fn build_processors(config: &CalloutsConfig) -> Result<TreeProcessors, CliError> {
    let symbols = SymbolMap::from_strings(&config.symbols)?;
    let processor = CalloutProcessor::new(CalloutConfig {
        symbols,
        insert_default_css: config.insert_default_css,
    })?;
    Ok(TreeProcessors::new().with(processor, PROCESSOR_PRIORITY))
}

fn markdown_to_html(markdown: &str) -> String {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options);

    let mut html = String::with_capacity(markdown.len() * 2);
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// Move a parsed fragment into the body of a full document.
fn standalone_document(fragment: TreeNode, title: &str) -> TreeNode {
    let head = TreeNode::new("head").with_children(vec![
        TreeNode::new("meta").with_attr("charset", "utf-8"),
        TreeNode::new("title").with_text(title),
    ]);
    let body = TreeNode::new("body")
        .with_text(fragment.text)
        .with_children(fragment.children);

    TreeNode::new(ROOT_TAG)
        .with_children(vec![TreeNode::new("html").with_children(vec![head, body])])
}

fn document_title(input: Option<&Path>) -> String {
    input
        .and_then(Path::file_stem)
        .map_or_else(|| DEFAULT_TITLE.to_owned(), |stem| stem.to_string_lossy().into_owned())
}

fn read_input(input: Option<&Path>) -> Result<String, CliError> {
    if let Some(path) = input {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut markdown = String::new();
    std::io::stdin().lock().read_to_string(&mut markdown)?;
    Ok(markdown)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use list_callouts::DEFAULT_CSS;
    use pretty_assertions::assert_eq;

    use super::*;

    fn config(insert_default_css: bool) -> CalloutsConfig {
        CalloutsConfig {
            insert_default_css,
            ..CalloutsConfig::default()
        }
    }

    fn args(css: Option<bool>, no_css: bool) -> RenderArgs {
        RenderArgs {
            input: None,
            output: None,
            config: None,
            css,
            no_css,
            standalone: false,
            verbose: false,
        }
    }

    #[test]
    fn test_render_plain_list_unchanged() {
        let html = render_markdown("- one\n- two\n", &config(false), None).unwrap();

        assert_eq!(html, "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n");
    }

    #[test]
    fn test_render_warning_item() {
        let html = render_markdown("- ! Buy milk\n- Bread\n", &config(false), None).unwrap();

        assert_eq!(
            html,
            "<ul>\n<li><div class=\"list-callouts list-callouts-warning\"><span>Buy milk</span></div></li>\n<li>Bread</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_render_nested_list_stays_after_callout() {
        let markdown = "- ~ Remember\n    - sub A\n    - sub B\n";
        let html = render_markdown(markdown, &config(false), None).unwrap();

        assert_eq!(
            html,
            "<ul>\n<li><div class=\"list-callouts list-callouts-bookmark\"><span>Remember</span></div><ul>\n<li>sub A</li>\n<li>sub B</li>\n</ul>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_render_inline_markup_kept_in_container() {
        let html = render_markdown("1. @ Use `cargo fmt`\n", &config(false), None).unwrap();

        assert_eq!(
            html,
            "<ol>\n<li><div class=\"list-callouts list-callouts-tip\"><span>Use </span><code>cargo fmt</code></div></li>\n</ol>\n"
        );
    }

    #[test]
    fn test_render_fragment_css_at_start() {
        let html = render_markdown("- ? Why\n", &config(true), None).unwrap();

        assert!(html.starts_with(&format!("<style>{DEFAULT_CSS}</style>")));
        assert_eq!(html.matches("<style>").count(), 1);
    }

    #[test]
    fn test_render_standalone_css_in_head() {
        let html = render_markdown("- $ Done\n", &config(true), Some("notes")).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\" /><title>notes</title><style>"));
        assert!(html.contains("</style></head><body><ul>"));
        assert!(html.contains("list-callouts-success"));
        assert!(html.ends_with("</body></html>\n"));
    }

    #[test]
    fn test_render_raw_void_tag_keeps_other_callouts() {
        let markdown = "- ! Buy milk\n- line one<br>line two\n";
        let html = render_markdown(markdown, &config(false), None).unwrap();

        assert_eq!(
            html,
            "<ul>\n<li><div class=\"list-callouts list-callouts-warning\"><span>Buy milk</span></div></li>\n<li>line one<br />line two</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_render_callout_with_raw_void_tag() {
        let html = render_markdown("- ! Note<br>more\n", &config(false), None).unwrap();

        assert_eq!(
            html,
            "<ul>\n<li><div class=\"list-callouts list-callouts-warning\"><span>Note</span><br />more</div></li>\n</ul>\n"
        );
    }

    #[test]
    fn test_render_unclosed_raw_html_block() {
        let markdown = "<div><p>x</div>\n\n- ~ Keep\n";
        let html = render_markdown(markdown, &config(false), None).unwrap();

        assert_eq!(
            html,
            "<div><p>x</p></div>\n<ul>\n<li><div class=\"list-callouts list-callouts-bookmark\"><span>Keep</span></div></li>\n</ul>\n"
        );
    }

    #[test]
    fn test_render_custom_symbols() {
        let config = CalloutsConfig {
            insert_default_css: false,
            symbols: BTreeMap::from([("^".to_owned(), "up".to_owned())]),
        };
        let html = render_markdown("- ^ Raise\n- ! Not mapped\n", &config, None).unwrap();

        assert_eq!(
            html,
            "<ul>\n<li><div class=\"list-callouts list-callouts-up\"><span>Raise</span></div></li>\n<li>! Not mapped</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_render_rejects_invalid_symbol() {
        let config = CalloutsConfig {
            insert_default_css: false,
            symbols: BTreeMap::from([("!!".to_owned(), "warning".to_owned())]),
        };
        let err = render_markdown("- !! x\n", &config, None).unwrap_err();

        assert!(matches!(err, CliError::Symbols(_)));
    }

    #[test]
    fn test_resolve_css_enabled() {
        assert_eq!(args(None, false).resolve_css_enabled(), None);
        assert_eq!(args(Some(true), false).resolve_css_enabled(), Some(true));
        assert_eq!(args(Some(false), false).resolve_css_enabled(), Some(false));
        assert_eq!(args(None, true).resolve_css_enabled(), Some(false));
    }

    #[test]
    fn test_document_title() {
        assert_eq!(document_title(Some(Path::new("docs/guide.md"))), "guide");
        assert_eq!(document_title(None), DEFAULT_TITLE);
    }

    #[test]
    fn test_execute_writes_output_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("list.md");
        let output = temp_dir.path().join("list.html");
        let config = temp_dir.path().join("list-callouts.toml");
        std::fs::write(&input, "- % Quoted\n").unwrap();
        std::fs::write(&config, "[callouts]\ninsert_default_css = true\n").unwrap();

        RenderArgs {
            input: Some(input),
            output: Some(output.clone()),
            config: Some(config),
            css: None,
            no_css: true,
            standalone: false,
            verbose: false,
        }
        .execute()
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "<ul>\n<li><div class=\"list-callouts list-callouts-quote\"><span>Quoted</span></div></li>\n</ul>\n"
        );
    }
}
