//! Print style sheet for Kindle exports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base font size of the exported document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    /// CSS length for the body font size.
    pub fn css_value(self) -> &'static str {
        match self {
            FontSize::Small => "16px",
            FontSize::Medium => "18px",
            FontSize::Large => "20px",
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        };
        f.write_str(name)
    }
}

/// Fixed rules shared by every export. Sizes are relative to the body font.
const BASE_CSS: &str = r#"
@page { margin: 1.5cm; }
body {
    font-family: Georgia, 'Bookerly', serif;
    line-height: 1.5;
    color: #000;
    background: #fff;
    margin: 0;
}
h1, h2, h3, h4, h5, h6 { line-height: 1.25; margin: 1.2em 0 0.5em; page-break-after: avoid; }
h1 { font-size: 1.8em; }
h2 { font-size: 1.5em; }
h3 { font-size: 1.25em; }
p, ul, ol, blockquote, table, pre { margin: 0 0 0.9em; }
img { max-width: 100%; height: auto; page-break-inside: avoid; }
pre {
    white-space: pre-wrap;
    word-wrap: break-word;
    border: 1px solid #ccc;
    padding: 0.6em;
    font-size: 0.85em;
}
code { font-family: 'Courier New', monospace; font-size: 0.9em; }
blockquote { border-left: 3px solid #888; margin-left: 0; padding-left: 0.8em; color: #333; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #999; padding: 0.3em 0.5em; text-align: left; }
mark { background: #ddd; color: inherit; }
.page-break { page-break-after: always; break-after: page; height: 0; }
"#;

/// Returns the complete style sheet for `font_size`.
///
/// # Example
///
/// ```
/// use vellum::export::{FontSize, stylesheet};
///
/// assert!(stylesheet(FontSize::Large).contains("font-size: 20px"));
/// ```
pub fn stylesheet(font_size: FontSize) -> String {
    format!(
        "{}body {{ font-size: {}; }}\n",
        BASE_CSS,
        font_size.css_value()
    )
}
