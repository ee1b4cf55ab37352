//! Markdown to HTML conversion.

use pulldown_cmark::{Options, Parser, html};

/// Converts markdown to HTML body markup.
///
/// Implementations must be pure: the same input always yields the same
/// output.
pub trait MarkdownRenderer {
    fn to_html(&self, markdown: &str) -> String;
}

/// CommonMark renderer backed by pulldown-cmark.
///
/// Enables common markdown extensions:
/// - Tables
/// - Footnotes
/// - Strikethrough
/// - Task lists
///
/// Raw HTML passes through untouched, which is what lets `<mark>` and
/// page-break markers survive conversion.
///
/// # Example
///
/// ```
/// use vellum::export::{CmarkRenderer, MarkdownRenderer};
///
/// let html = CmarkRenderer.to_html("# Hello\n\nWorld");
/// assert!(html.contains("<h1>Hello</h1>"));
/// assert!(html.contains("<p>World</p>"));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct CmarkRenderer;

impl MarkdownRenderer for CmarkRenderer {
    fn to_html(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(markdown, options);
        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        html_output
    }
}
