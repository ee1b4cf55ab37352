//! Text transformations applied to the fully resolved note.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use super::html::MarkdownRenderer;
use super::template::render_document;
use super::theme::{FontSize, stylesheet};

/// `%% ... %%` comments, possibly spanning lines.
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)%%.*?%%").expect("comment pattern is valid"));

/// Fenced `dataview` / `dataviewjs` query blocks, fences included.
static DATAVIEW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^```(?:dataviewjs|dataview)[ \t]*\r?\n.*?^```[ \t]*(?:\r?\n|\z)")
        .expect("dataview pattern is valid")
});

/// `==highlight==` spans, possibly spanning lines.
static HIGHLIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)==(.+?)==").expect("highlight pattern is valid"));

/// Inline image targets carrying a data URI, `](data:...)`.
static DATA_URI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]\(data:[^)\s]*\)").expect("data uri pattern is valid"));

/// Placeholder standing in for a shielded data URI.
static SHIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x00(\d+)\x00").expect("shield pattern is valid"));

/// A line holding only a `---` rule.
static RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^---[ \t\r]*$").expect("rule pattern is valid"));

/// Markup substituted for a horizontal rule when page breaks are enabled.
pub const PAGE_BREAK: &str = r#"<div class="page-break"></div>"#;

/// Errors while producing the HTML document.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to render HTML template: {0}")]
    Template(#[from] minijinja::Error),
}

/// Options for [`transform`].
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Replace `---` rules with page breaks.
    pub page_breaks: bool,
    /// Base font size for the style sheet.
    pub font_size: FontSize,
    /// Author written to the document metadata.
    pub author: Option<String>,
}

/// A complete, self-contained HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlDocument {
    pub title: String,
    pub html: String,
}

/// Applies the markdown-level passes, in order:
///
/// 1. strip `%% comments %%`
/// 2. drop dataview query blocks
/// 3. turn `==text==` into `<mark>text</mark>`
/// 4. with `page_breaks`, turn `---` lines into page-break markers
///
/// Inlined data URIs are set aside before the passes run and put back
/// afterwards, so base64 `==` padding never pairs with a highlight marker.
///
/// The result contains none of the patterns it removes, so running it again
/// changes nothing.
///
/// # Examples
///
/// ```
/// use vellum::export::sanitize;
///
/// assert_eq!(sanitize("A %%hidden%% B", false), "A  B");
/// assert_eq!(sanitize("==hi==", false), "<mark>hi</mark>");
/// ```
pub fn sanitize(text: &str, page_breaks: bool) -> String {
    let mut uris: Vec<String> = Vec::new();
    let text = DATA_URI_RE.replace_all(text, |caps: &Captures| {
        uris.push(caps[0].to_string());
        format!("\u{0}{}\u{0}", uris.len() - 1)
    });

    let text = COMMENT_RE.replace_all(&text, "");
    let text = DATAVIEW_RE.replace_all(&text, "");
    let mut text = HIGHLIGHT_RE
        .replace_all(&text, "<mark>$1</mark>")
        .into_owned();
    if page_breaks {
        text = RULE_RE.replace_all(&text, PAGE_BREAK).into_owned();
    }

    if uris.is_empty() {
        return text;
    }
    SHIELD_RE
        .replace_all(&text, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| uris.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Turns resolved markdown into the final HTML document.
pub fn transform<M: MarkdownRenderer + ?Sized>(
    resolved: &str,
    title: &str,
    options: &TransformOptions,
    renderer: &M,
) -> Result<HtmlDocument, TransformError> {
    let markdown = sanitize(resolved, options.page_breaks);
    let body = renderer.to_html(&markdown);
    let html = render_document(
        title,
        options.author.as_deref(),
        &stylesheet(options.font_size),
        &body,
    )?;
    Ok(HtmlDocument {
        title: title.to_string(),
        html,
    })
}
